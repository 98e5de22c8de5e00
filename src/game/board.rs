use super::direction::Direction;
use super::hurdles::hurdles;
use ratatui::layout::{Position, Positions, Rect, Size};
use std::collections::HashSet;

/// The playing field: its size, whether its edges wrap, and where the
/// hurdles are
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Board {
    bounds: Bounds,
    hurdles: HashSet<Position>,
    snake_start: (Position, Direction),
}

impl Board {
    pub(super) fn new(bounds: Bounds) -> Board {
        let snake_head = Position::new(bounds.width / 2, bounds.height / 2);
        Board {
            bounds,
            hurdles: HashSet::new(),
            snake_start: (snake_head, Direction::North),
        }
    }

    /// Lay out or clear the hurdles
    pub(super) fn set_hurdles(&mut self, enabled: bool) {
        self.hurdles = if enabled {
            hurdles(self.size())
        } else {
            HashSet::new()
        };
    }

    pub(super) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(super) fn hurdles(&self) -> &HashSet<Position> {
        &self.hurdles
    }

    pub(super) fn has_hurdles(&self) -> bool {
        !self.hurdles.is_empty()
    }

    pub(super) fn snake_start(&self) -> (Position, Direction) {
        self.snake_start
    }

    pub(super) fn size(&self) -> Size {
        self.bounds.size()
    }

    pub(super) fn wrap(&self) -> bool {
        self.bounds.wrap
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Bounds {
    pub(super) width: u16,
    pub(super) height: u16,
    pub(super) wrap: bool,
}

impl Bounds {
    pub(super) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub(super) fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub(super) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }
}

impl From<(Size, bool)> for Bounds {
    fn from((size, wrap): (Size, bool)) -> Bounds {
        Bounds {
            width: size.width,
            height: size.height,
            wrap,
        }
    }
}
