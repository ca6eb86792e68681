use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("'{}' does not look like a variant store (missing or unreadable '{}')", .0.display(), super::METADATA_FILE)]
    NotAStore(PathBuf),

    #[error("Unsupported store format version {0} (expected {})", super::FORMAT_VERSION)]
    UnsupportedVersion(u32),

    #[error("Store dimension '{0}' must be greater than zero")]
    InvalidDimension(&'static str),

    #[error("Variant refers to contig index {0}, which was never registered")]
    UnknownContig(usize),

    #[error("Expected {want} entries, got {got}")]
    ShapeMismatch{want: usize, got: usize},

    #[error("Variant chunk columns disagree on the number of variants")]
    CorruptedChunk,

    #[error("Failed to compress variant chunk: {0}")]
    Compress(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize store contents")]
    Encode(#[source] serde_yaml::Error),

    #[error("Failed to deserialize store contents")]
    Decode(#[source] serde_yaml::Error),
}
