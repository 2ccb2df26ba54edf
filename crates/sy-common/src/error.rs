use thiserror::Error;

/// Crate-wide error kinds shared across the engine, mirrored per-crate by
/// more specific `thiserror` enums (`DeployError`, `RouterError`, ...) that
/// wrap or convert into this one at the boundary.
#[derive(Error, Debug)]
pub enum SwitchyardError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("mediation error: {0}")]
    Mediation(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SwitchyardError>;
