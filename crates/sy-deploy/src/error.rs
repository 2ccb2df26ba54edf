use sy_common::Position;
use sy_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("{position}: XML parse error: {message}")]
    Parse { position: Position, message: String },

    #[error("{position}: {source}")]
    Model {
        position: Position,
        #[source]
        source: ModelError,
    },

    #[error("{0}: duplicate name, artifact skipped")]
    Duplicate(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    pub fn parse(position: Position, message: impl Into<String>) -> Self {
        DeployError::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn model(position: Position, source: ModelError) -> Self {
        DeployError::Model { position, source }
    }
}
