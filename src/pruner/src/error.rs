use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrunerError {
    #[error("The maximum number of pruning iterations must be greater than zero")]
    ZeroIterations,

    #[error("Invalid LD threshold {0}: must lie between 0.0 and 1.0")]
    InvalidThreshold(f64),

    #[error("Failed to create a temporary directory for intermediate stores")]
    TempDir(#[source] std::io::Error),
}
