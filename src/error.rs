use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MigrationError>;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid legacy identifier: {0:?}")]
    InvalidLegacyId(String),

    /// No row in the domain class catalog for the entity type.
    #[error("domain class not registered: {0}")]
    UnknownDomainClass(String),

    #[error("unknown space type: {0}")]
    UnknownSpaceType(String),

    #[error("classification code doesn't exist: {0}")]
    MissingClassification(String),

    #[error("space doesn't exist {0}, abort")]
    MissingSpace(String),

    #[error("unknown occupation frequency: {0}")]
    UnknownFrequency(String),

    #[error("bad date {value:?} (expected {format})")]
    BadDate { value: String, format: &'static str },

    #[error("blueprint is not valid base64: {0}")]
    BadBlueprint(#[from] base64::DecodeError),
}
