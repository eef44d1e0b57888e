//! This crate defines the rowsource engine of Rasqal.
//!
//! # Rowsources
//!
//! A query is executed by a tree of [`RowSource`](rowsource::RowSource)s. Each rowsource pulls
//! rows from its inputs on demand and produces rows aligned with its own list of variables. The
//! leaves of the tree are constant rowsources such as `EMPTY` and `VALUES`, while the inner nodes
//! implement the SPARQL algebra (`EXTEND`, `FILTER`, `HAVING`, `MINUS`, joins, ...).
//!
//! # Variables and Scopes
//!
//! All rowsources of a query share a [`QueryContext`]. It holds the [`VariablesTable`] that maps
//! variable names to [`VariableId`]s and the [`ScopeTree`] that models the nesting of groups,
//! sub-queries, and `EXISTS` patterns. Expressions look up variables through the scope tree so
//! that a variable declared in an isolated group is not visible outside of it.
//!
//! # Results
//!
//! A [`SolutionStream`] drives a pipeline to completion and yields [`Solution`]s.

mod compatibility;
mod context;
pub mod expr;
mod results;
mod row;
pub mod rowsource;
mod scope;
mod variables;

pub use compatibility::{CompatibilitySlot, RowCompatibility};
pub use context::QueryContext;
pub use results::{Solution, SolutionStream};
pub use row::Row;
pub use scope::{
    ResolutionContext, ResolvedVariable, Scope, ScopeId, ScopeKind, ScopeTree, SearchPolicy,
};
pub use variables::{
    QueryVariable, VariableId, VariableKind, VariablesTable, DEFAULT_MAX_VARIABLES,
};

pub use rasqal_common::{
    CompatibilityPolicy, EngineError, EngineResult, ExecutionOptions, ExtendErrorPolicy,
};
