mod config;
pub mod error;

pub use config::{CompatibilityPolicy, ExecutionOptions, ExtendErrorPolicy};
pub use error::{EngineError, EngineResult};
