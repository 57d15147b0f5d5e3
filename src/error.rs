//! Error types for baku operations.

use thiserror::Error;

/// Errors that can occur during backup reading, writing, or conversion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Protobuf decoding error: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    #[error("Invalid Kotatsu backup: {0}")]
    InvalidKotatsu(String),

    #[error("Invalid Mihon backup: {0}")]
    InvalidMihon(String),

    #[error("Missing required resource '{wanted}' (archive contains: {})", found.join(", "))]
    MissingResource { wanted: String, found: Vec<String> },

    #[error("Backup contains no manga entries")]
    EmptyBackup,

    #[error("Input and output formats are the same")]
    SameFormat,
}

pub type Result<T> = std::result::Result<T, Error>;
