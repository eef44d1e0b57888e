//! Pull-based operators over streams of rows.
//!
//! Every operator follows the same lifecycle:
//! 1. `ensure_variables()` computes the output variables, recursively for all inputs. Operators
//!    that introduce variables register them in the [`QueryContext`] here.
//! 2. `read_row()` is called until it returns `None`. Once exhausted, it keeps returning `None`.
//! 3. `reset()` rewinds the operator so that its rows can be read again.
//! 4. `finish()` releases the inputs and all buffered rows. The operator cannot be used anymore.
//!
//! Reading before the variables are ensured, or using a finished operator, is a programming
//! error and panics.

mod distinct;
mod empty;
mod extend;
mod filter;
mod having;
mod join;
mod minus;
mod project;
mod slice;
mod sort;
mod union;
mod values;

pub use distinct::DistinctRowSource;
pub use empty::EmptyRowSource;
pub use extend::ExtendRowSource;
pub use filter::FilterRowSource;
pub use having::HavingRowSource;
pub use join::{JoinKind, JoinRowSource};
pub use minus::MinusRowSource;
pub use project::ProjectRowSource;
pub use slice::SliceRowSource;
pub use sort::{compare_order_terms, SortRowSource};
pub use union::UnionRowSource;
pub use values::ValuesRowSource;

use crate::context::QueryContext;
use crate::row::Row;
use crate::variables::VariableId;
use rasqal_common::EngineResult;
use std::fmt;
use std::sync::Arc;

/// An operator that produces rows on demand.
pub trait RowSource: fmt::Debug {
    /// A short name of the operator, used in logs and panic messages.
    fn name(&self) -> &'static str;

    /// Computes the output variables of this operator and its inputs.
    ///
    /// Calling this more than once has no effect.
    fn ensure_variables(&mut self, context: &mut QueryContext) -> EngineResult<()>;

    /// The output variables. Rows produced by this operator are aligned with them.
    ///
    /// # Panics
    ///
    /// Panics if the variables have not been ensured.
    fn variables(&self) -> &Arc<[VariableId]>;

    /// Produces the next row, or `None` if the operator is exhausted.
    fn read_row(&mut self, context: &QueryContext) -> EngineResult<Option<Row>>;

    /// Produces all remaining rows.
    fn read_all_rows(&mut self, context: &QueryContext) -> EngineResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.read_row(context)? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Rewinds the operator to its first row.
    fn reset(&mut self) -> EngineResult<()>;

    /// Releases all inputs and buffered rows.
    fn finish(&mut self);
}

/// Boxed rowsource for dynamic dispatch.
pub type BoxedRowSource = Box<dyn RowSource>;

/// Lifecycle of a rowsource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RowSourceState {
    /// The variables have not been ensured yet.
    #[default]
    Uninitialized,
    /// The variables are known and no row has been read since the last reset.
    Initialized,
    /// At least one row has been produced.
    Streaming,
    /// The last read returned `None`.
    Exhausted,
    /// The operator has been finished.
    Finished,
}

impl RowSourceState {
    /// Marks the variables as ensured. Returns `false` if they were already ensured.
    ///
    /// # Panics
    ///
    /// Panics if the operator has been finished.
    pub fn initialize(&mut self, operator: &str) -> bool {
        match self {
            RowSourceState::Uninitialized => {
                *self = RowSourceState::Initialized;
                true
            }
            RowSourceState::Finished => panic!("{operator}: ensure_variables() after finish()"),
            _ => false,
        }
    }

    /// Checks that a row may be read. Returns `false` if the operator is exhausted.
    ///
    /// # Panics
    ///
    /// Panics if the variables have not been ensured or the operator has been finished.
    pub fn begin_read(self, operator: &str) -> bool {
        match self {
            RowSourceState::Uninitialized => {
                panic!("{operator}: read_row() before ensure_variables()")
            }
            RowSourceState::Finished => panic!("{operator}: read_row() after finish()"),
            RowSourceState::Exhausted => false,
            RowSourceState::Initialized | RowSourceState::Streaming => true,
        }
    }

    /// Records the outcome of a read and passes it through.
    pub fn end_read(&mut self, row: Option<Row>) -> Option<Row> {
        *self = match row {
            Some(_) => RowSourceState::Streaming,
            None => RowSourceState::Exhausted,
        };
        row
    }

    /// Rewinds to [`RowSourceState::Initialized`].
    ///
    /// # Panics
    ///
    /// Panics if the variables have not been ensured or the operator has been finished.
    pub fn reset(&mut self, operator: &str) {
        match self {
            RowSourceState::Uninitialized => {
                panic!("{operator}: reset() before ensure_variables()")
            }
            RowSourceState::Finished => panic!("{operator}: reset() after finish()"),
            _ => *self = RowSourceState::Initialized,
        }
    }

    pub fn is_finished(self) -> bool {
        self == RowSourceState::Finished
    }
}

/// Returns the variables of an operator whose variables have been ensured.
pub(crate) fn ensured<'a>(
    variables: &'a Option<Arc<[VariableId]>>,
    operator: &str,
) -> &'a Arc<[VariableId]> {
    match variables {
        Some(variables) => variables,
        None => panic!("{operator}: variables() before ensure_variables()"),
    }
}

/// Numbers the rows produced by an operator.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RowCounter(usize);

impl RowCounter {
    /// Assigns the next offset to `row`.
    pub(crate) fn number(&mut self, mut row: Row) -> Row {
        row.set_offset(self.0);
        self.0 += 1;
        row
    }

    pub(crate) fn reset(&mut self) {
        self.0 = 0;
    }
}
