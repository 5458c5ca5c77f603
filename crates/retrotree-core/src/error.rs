use crate::detect::DetectModeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    DetectMode(#[from] DetectModeError),

    #[error("Unsupported render mode: {mode}")]
    UnsupportedMode { mode: String },

    #[error("Payload JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload for mode `{mode}` is missing tree `{key}`")]
    MissingTree { mode: &'static str, key: &'static str },

    #[error("Invalid tree node at `{path}`: {message}")]
    InvalidNode { path: String, message: String },

    #[error("Invalid config JSON: {message}")]
    InvalidConfig { message: String },
}
