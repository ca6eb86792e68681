use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to create output file")]
    Create(#[source] std::io::Error),

    #[error("Failed to write contents into file")]
    IOError(#[source] std::io::Error),

    #[error("Variant {0} refers to a contig that is absent from the dataset's contig table")]
    UnknownContig(usize),
}
