//! The four movement directions and their grid offsets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor lookup order. Generation is reproducible only if this
    /// order never changes.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector `(dx, dy)`; y grows downward.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Slot of this side in a cell's wall array; matches `ALL`.
    pub(crate) fn wall_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(MazeError::UnknownDirection(s.to_string())),
        }
    }
}

/// Numeric move codes: 0=up, 1=down, 2=left, 3=right.
impl TryFrom<u8> for Direction {
    type Error = MazeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| MazeError::UnknownDirection(code.to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_cancels_offset() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0), "{} and its opposite", dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!(" l ".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("r".parse::<Direction>().unwrap(), Direction::Right);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "north".parse::<Direction>().unwrap_err();
        assert_eq!(err, MazeError::UnknownDirection("north".into()));
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(Direction::try_from(0).unwrap(), Direction::Up);
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Right);
        assert_eq!(
            Direction::try_from(4),
            Err(MazeError::UnknownDirection("4".into()))
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let back: Direction = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(back, Direction::Right);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for dir in Direction::ALL {
            assert_eq!(dir.to_string().parse::<Direction>().unwrap(), dir);
        }
    }
}
