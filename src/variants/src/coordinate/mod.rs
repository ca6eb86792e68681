use std::{cmp::Ordering, fmt::Display};

pub mod contig_index;
pub use contig_index::{ContigIdx, ContigIdxError};

pub mod position;
pub use position::{Position, ParsePositionError};

/// Genomic coordinate of a variant: contig index + 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub contig  : ContigIdx,
    pub position: Position,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&format!("[{: <3} {: >9}]", self.contig, self.position), f)
    }
}

impl Coordinate {
    #[must_use]
    pub fn new(contig: impl Into<ContigIdx>, position: impl Into<Position>) -> Self {
        Self{contig: contig.into(), position: position.into()}
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.contig, self.position).cmp(&(other.contig, other.position))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let (contig, pos) = (3, 230_564_555);
        let want = format!("{:_^18}", format!("[{contig: <3} {pos: >9}]"));
        let got = format!("{:_^18}", Coordinate::new(ContigIdx(contig), Position(pos)));
        assert_eq!(want, got);
    }

    #[test]
    fn ordering_is_contig_major() {
        let a = Coordinate::new(0u32, 900u32);
        let b = Coordinate::new(1u32, 10u32);
        let c = Coordinate::new(1u32, 11u32);
        assert!(a < b && b < c);
    }
}
