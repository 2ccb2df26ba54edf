use sy_common::Position;
use thiserror::Error;

/// Validation errors raised while building or inserting into the
/// Artifact Graph. Distinct from `sy_deploy::DeployError`, which wraps
/// this together with XML parse failures and attaches file position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("malformed URI template {0:?}: {1}")]
    MalformedUriTemplate(String, String),

    #[error("duplicate {kind} name {name:?}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("duplicate API context {0:?}")]
    DuplicateContext(String),

    #[error("API context must start with '/': {0:?}")]
    InvalidContext(String),

    #[error("resource must declare at least one HTTP method")]
    EmptyMethods,

    #[error("version present without versionType, or versionType without version")]
    VersionMismatch,

    #[error("versionType=\"context\" requires a {{version}} placeholder in context: {0:?}")]
    MissingVersionPlaceholder(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedModelError {
    pub error: ModelError,
    pub position: Position,
}

impl std::fmt::Display for PositionedModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.error)
    }
}
