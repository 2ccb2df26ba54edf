use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediationError {
    #[error("sequence {0:?} not found in the artifact graph")]
    SequenceNotFound(String),

    #[error("endpoint {0:?} not found in the artifact graph")]
    EndpointNotFound(String),

    #[error("mediation cancelled before execution started")]
    Cancelled,

    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid XML payload: {0}")]
    InvalidXml(String),

    #[error("outbound request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
