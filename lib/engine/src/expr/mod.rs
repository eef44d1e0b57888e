//! Expression evaluation against the bindings of a row.

mod bindings;
mod evaluator;

pub use bindings::{Bindings, RowBindings};
pub use evaluator::{effective_boolean_value, ExpressionEvaluator, SparqlExpressionEvaluator};
