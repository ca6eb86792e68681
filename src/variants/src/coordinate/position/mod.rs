use std::{fmt::{self, Display, Formatter}, str::FromStr};
mod error;
pub use error::ParsePositionError;

/// 1-based physical position of a variant, as found in the `POS` column of a VCF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(pub u32);

impl Position {
    /// 0-based, half-open `[start, end)` interval spanned by this position.
    #[must_use]
    pub fn bed_interval(self) -> (u32, u32) {
        (self.0.saturating_sub(1), self.0)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<u32>()?))
    }
}

impl From<u32> for Position {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Position> for u32 {
    fn from(value: Position) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let pos = 139543;
        let want = format!("{pos:_^12}");
        let got = format!("{:_^12}", Position(pos));
        assert_eq!(want, got);
    }

    #[test]
    fn bed_interval() {
        assert_eq!(Position(60026).bed_interval(), (60025, 60026));
        assert_eq!(Position(1).bed_interval(), (0, 1));
    }

    #[test]
    fn parse_invalid() {
        assert!("12a".parse::<Position>().is_err());
        assert_eq!("42".parse::<Position>().ok(), Some(Position(42)));
    }
}
