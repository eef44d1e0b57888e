/// What EXTEND does with a row for which the bound expression cannot be evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExtendErrorPolicy {
    /// The row is emitted with the new variable left unbound.
    #[default]
    PassThrough,
    /// The row is discarded.
    Drop,
}

/// Rule used to decide whether two rows are compatible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompatibilityPolicy {
    /// SPARQL join compatibility. Rows without a shared bound variable are compatible.
    Join,
    /// MINUS compatibility. Rows are only compatible if they agree on at least one shared
    /// variable that is bound on both sides.
    #[default]
    Minus,
}

/// Options that control how a rowsource pipeline is executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// How EXTEND handles expression errors.
    pub extend_error_policy: ExtendErrorPolicy,
    /// Maximum number of scopes recorded in the path of a resolved variable. Resolution continues
    /// past this depth, only the recorded path is truncated.
    pub max_scope_path: usize,
    /// The compatibility rule applied by MINUS.
    pub minus_policy: CompatibilityPolicy,
}

impl ExecutionOptions {
    #[must_use]
    pub fn with_extend_error_policy(mut self, policy: ExtendErrorPolicy) -> Self {
        self.extend_error_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_scope_path(mut self, max_scope_path: usize) -> Self {
        self.max_scope_path = max_scope_path;
        self
    }

    #[must_use]
    pub fn with_minus_policy(mut self, policy: CompatibilityPolicy) -> Self {
        self.minus_policy = policy;
        self
    }
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            extend_error_policy: ExtendErrorPolicy::default(),
            max_scope_path: 16,
            minus_policy: CompatibilityPolicy::default(),
        }
    }
}
