use super::board::Bounds;
use ratatui::layout::Position;
use serde::{Deserialize, Serialize};

/// The heading of the snake
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Return the position one cell from `pos` in this direction.  If that
    /// would leave `bounds`, either wrap around to the opposite edge (if
    /// `bounds.wrap` is true) or return `None`.
    pub(super) fn advance(self, pos: Position, bounds: Bounds) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::North => {
                y = decrement_in_bounds(y, bounds.height, bounds.wrap)?;
            }
            Direction::East => {
                x = increment_in_bounds(x, bounds.width, bounds.wrap)?;
            }
            Direction::South => {
                y = increment_in_bounds(y, bounds.height, bounds.wrap)?;
            }
            Direction::West => {
                x = decrement_in_bounds(x, bounds.width, bounds.wrap)?;
            }
        }
        Some(Position { x, y })
    }

    /// Return the direction in which a single step leads from `from` to
    /// `to` within `bounds`, if there is one
    pub(super) fn between(from: Position, to: Position, bounds: Bounds) -> Option<Direction> {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
        .into_iter()
        .find(|d| d.advance(from, bounds) == Some(to))
    }

    pub(super) fn is_reverse_of(self, other: Direction) -> bool {
        self.reverse() == other
    }

    pub(super) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

fn decrement_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_sub(1) {
        Some(x2)
    } else if wrap {
        Some(max - 1)
    } else {
        None
    }
}

fn increment_in_bounds(x: u16, max: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_add(1).filter(|&xx| xx < max) {
        Some(x2)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}
