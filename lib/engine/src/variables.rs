//! Variables of a query.
//!
//! Every variable that occurs in a query is registered once in the [`VariablesTable`] and is
//! referenced by its [`VariableId`] everywhere else (scopes, operator schemas, compatibility maps).

use rasqal_common::{EngineError, EngineResult};
use rasqal_model::Term;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Default upper bound for the number of variables in a single query.
pub const DEFAULT_MAX_VARIABLES: usize = u16::MAX as usize;

/// Compact identifier of a variable in a [`VariablesTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub(crate) u32);

impl VariableId {
    /// Position of the variable in its table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a variable was written by the user or introduced by the query compiler (e.g., for
/// blank nodes in patterns).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Normal,
    Anonymous,
}

/// A variable registered in a [`VariablesTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryVariable {
    name: Arc<str>,
    kind: VariableKind,
    offset: usize,
    value: Option<Term>,
}

impl QueryVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// Position of the variable in its owning table.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The value bound to the variable outside of any row, if any.
    pub fn value(&self) -> Option<&Term> {
        self.value.as_ref()
    }
}

/// Registry of all variables of a query.
///
/// A name is registered at most once; offsets are stable for the lifetime of the table.
#[derive(Debug)]
pub struct VariablesTable {
    variables: Vec<QueryVariable>,
    by_name: FxHashMap<Arc<str>, VariableId>,
    max_variables: usize,
}

impl VariablesTable {
    /// Creates an empty table that accepts up to [`DEFAULT_MAX_VARIABLES`] variables.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_VARIABLES)
    }

    /// Creates an empty table that accepts up to `max_variables` variables.
    pub fn with_limit(max_variables: usize) -> Self {
        Self {
            variables: Vec::new(),
            by_name: FxHashMap::default(),
            max_variables: max_variables.min(u32::MAX as usize),
        }
    }

    /// Registers a variable.
    ///
    /// If a variable with the same name exists, its id is returned and `value` is discarded.
    pub fn add_variable(
        &mut self,
        kind: VariableKind,
        name: &str,
        value: Option<Term>,
    ) -> EngineResult<VariableId> {
        if let Some(id) = self.by_name.get(name) {
            return Ok(*id);
        }

        if self.variables.len() >= self.max_variables {
            return Err(EngineError::TooManyVariables(self.max_variables));
        }

        let offset = self.variables.len();
        let id = u32::try_from(offset)
            .map(VariableId)
            .map_err(|_| EngineError::TooManyVariables(self.max_variables))?;
        let name: Arc<str> = Arc::from(name);
        self.by_name.insert(Arc::clone(&name), id);
        self.variables.push(QueryVariable {
            name,
            kind,
            offset,
            value,
        });
        Ok(id)
    }

    /// Returns the id of the variable called `name`.
    pub fn lookup(&self, name: &str) -> Option<VariableId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn get(&self, id: VariableId) -> Option<&QueryVariable> {
        self.variables.get(id.index())
    }

    /// Returns the name of the variable.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this table.
    pub fn name(&self, id: VariableId) -> &str {
        &self.variables[id.index()].name
    }

    /// Binds (or unbinds) the value of a variable outside of any row.
    pub fn set_value(&mut self, id: VariableId, value: Option<Term>) -> EngineResult<()> {
        let variable = self
            .variables
            .get_mut(id.index())
            .ok_or_else(|| EngineError::UnknownVariable(format!("#{}", id.index())))?;
        variable.value = value;
        Ok(())
    }

    /// Iterates the variables by offset.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The table never holds more than u32::MAX variables"
    )]
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &QueryVariable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(offset, variable)| (VariableId(offset as u32), variable))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn named_count(&self) -> usize {
        self.count_kind(VariableKind::Normal)
    }

    pub fn anonymous_count(&self) -> usize {
        self.count_kind(VariableKind::Anonymous)
    }

    fn count_kind(&self, kind: VariableKind) -> usize {
        self.variables.iter().filter(|v| v.kind == kind).count()
    }
}

impl Default for VariablesTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasqal_model::Literal;

    #[test]
    fn test_add_variable_is_idempotent() {
        let mut table = VariablesTable::new();
        let s = table.add_variable(VariableKind::Normal, "s", None).unwrap();
        let p = table.add_variable(VariableKind::Normal, "p", None).unwrap();
        assert_eq!(s.index(), 0);
        assert_eq!(p.index(), 1);

        let again = table
            .add_variable(VariableKind::Normal, "s", Some(Literal::from(1_i64).into()))
            .unwrap();
        assert_eq!(again, s);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(s).unwrap().value(), None);
    }

    #[test]
    fn test_lookup_and_counts() {
        let mut table = VariablesTable::new();
        table.add_variable(VariableKind::Normal, "a", None).unwrap();
        table
            .add_variable(VariableKind::Anonymous, "_b0", None)
            .unwrap();

        assert!(table.contains("a"));
        assert!(!table.contains("b"));
        assert_eq!(table.lookup("_b0").map(VariableId::index), Some(1));
        assert_eq!(table.named_count(), 1);
        assert_eq!(table.anonymous_count(), 1);

        let names = table.iter().map(|(_, v)| v.name()).collect::<Vec<_>>();
        assert_eq!(names, ["a", "_b0"]);
    }

    #[test]
    fn test_set_value() {
        let mut table = VariablesTable::new();
        let a = table.add_variable(VariableKind::Normal, "a", None).unwrap();
        let value: Term = Literal::from(42_i64).into();
        table.set_value(a, Some(value.clone())).unwrap();
        assert_eq!(table.get(a).unwrap().value(), Some(&value));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut table = VariablesTable::with_limit(1);
        table.add_variable(VariableKind::Normal, "a", None).unwrap();
        assert!(matches!(
            table.add_variable(VariableKind::Normal, "b", None),
            Err(EngineError::TooManyVariables(1))
        ));
        // Known names are still returned.
        assert!(table.add_variable(VariableKind::Normal, "a", None).is_ok());
    }
}
