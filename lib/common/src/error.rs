use thiserror::Error;

/// Result type of plan construction and row production.
pub type EngineResult<T> = Result<T, EngineError>;

/// An error that aborts building or running a rowsource pipeline.
///
/// Errors that occur while evaluating an expression for a single row are not represented here.
/// They are `ThinError`s and are handled by the operator that evaluated the expression.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The variables table cannot hold another variable.
    #[error("Too many variables: the table is limited to {0} entries")]
    TooManyVariables(usize),
    /// A variable name was referenced that is not declared.
    #[error("Unknown variable: ?{0}")]
    UnknownVariable(String),
    /// A scope id was referenced that does not belong to the scope tree.
    #[error("Unknown scope: {0}")]
    UnknownScope(usize),
    /// The operators cannot be combined as requested.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}

impl EngineError {
    /// Builds an [`EngineError::InvalidPlan`] from a printable message.
    pub fn invalid_plan(msg: impl Into<String>) -> Self {
        Self::InvalidPlan(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EngineError::UnknownVariable("x".to_owned()).to_string(),
            "Unknown variable: ?x"
        );
        assert_eq!(
            EngineError::invalid_plan("MINUS needs two inputs").to_string(),
            "Invalid plan: MINUS needs two inputs"
        );
    }
}
