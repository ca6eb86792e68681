pub mod coordinate;

mod dataset;
pub use dataset::{VariantDataset, VariantRecord, DatasetError, MISSING_CALL, FILL_CALL, DEFAULT_CHUNK_LENGTH};

pub mod window;
pub use window::{Window, Windows};

pub mod ld;
