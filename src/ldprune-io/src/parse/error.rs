use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to create parent directory")]
    CreateParentDirectory(#[source] std::io::Error),

    #[error("File or directory returned an empty string, and may contain invalid UTF-8 characters")]
    InvalidFilename,

    #[error("'{}' does not end with the expected '{}' store extension", path.display(), super::STORE_EXT)]
    MissingStoreExt{path: PathBuf},
}
