use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("content hash mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("content hash is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerificationError>;
