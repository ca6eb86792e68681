use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Column '{column}' holds {got} entries, while {want} were expected")]
    ShapeMismatch{column: &'static str, want: usize, got: usize},

    #[error("Variant refers to contig index {0}, which is absent from the contig table")]
    UnknownContig(usize),

    #[error("Invalid genotype call value {0}. Calls must either be allele indices, or {missing} (missing) / {fill} (fill)", missing = super::MISSING_CALL, fill = super::FILL_CALL)]
    InvalidCall(i16),

    #[error("Variant index {index} is out of bounds for a dataset of {len} variants")]
    IndexOutOfBounds{index: usize, len: usize},

    #[error("Variant indices must be strictly increasing, in order to preserve positional order")]
    UnsortedIndices,

    #[error("Window size and window step must both be greater than zero")]
    InvalidWindow,

    #[error("Chunk length must be greater than zero")]
    InvalidChunkLength,

    #[error("Ploidy must be greater than zero")]
    InvalidPloidy,
}
