//! Error types for the decision engine

use thiserror::Error;

/// Decision engine errors
///
/// A denial is never an error: `is_allowed` reports it as `Ok(false)`.
/// Every variant here is either a configuration fault that must surface
/// immediately or a collaborator failure the host has to handle itself.
#[derive(Debug, Error)]
pub enum AclError {
    /// Required collaborator or setting missing at build or call time
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Loaded principal does not satisfy the principal abstraction
    #[error("principal mismatch: {0}")]
    PrincipalMismatch(String),

    /// A configured pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Permission store unreachable or failed; no decision was made
    #[error("store error: {0}")]
    Store(String),
}

/// Result type for decision-engine operations
pub type Result<T> = std::result::Result<T, AclError>;
