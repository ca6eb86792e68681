use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContigIdxError {
    #[error("Failed to parse contig index into a valid u32: {0}")]
    Parse(String),

    #[error("Too many contigs: index {0} does not fit within a u32")]
    Overflow(usize),
}
