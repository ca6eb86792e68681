use std::{fmt::{self, Display, Formatter}, str::FromStr};

mod error;
pub use error::ContigIdxError;

/// Index of a contig within the `contigs` table of a `VariantDataset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContigIdx(pub u32);

impl ContigIdx {
    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl FromStr for ContigIdx {
    type Err = ContigIdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>().map(Self).map_err(|_| ContigIdxError::Parse(s.to_owned()))
    }
}

impl TryFrom<usize> for ContigIdx {
    type Error = ContigIdxError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Self).map_err(|_| ContigIdxError::Overflow(value))
    }
}

impl Display for ContigIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for ContigIdx {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<ContigIdx> for u32 {
    fn from(value: ContigIdx) -> Self {
        value.0
    }
}
