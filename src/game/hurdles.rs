//! Fixed hurdle layouts
use crate::consts;
use ratatui::layout::{Position, Size};
use std::collections::HashSet;

/// Return the hurdles for a board of the given size.
///
/// The layout consists of an L-shaped bracket in each corner region plus a
/// short post at mid-height near the left & right edges, mirrored across
/// both axes.  The column the snake starts in is always left clear.  Boards
/// smaller than [`MIN_GRID`][consts::MIN_GRID] get no hurdles.
pub(crate) fn hurdles(grid: Size) -> HashSet<Position> {
    let Size {
        width: w,
        height: h,
    } = grid;
    if w < consts::MIN_GRID.width || h < consts::MIN_GRID.height {
        return HashSet::new();
    }
    let inset_x = w / 6;
    let inset_y = h / 5;
    let arm_x = (w / 6).max(2);
    let arm_y = (h / 5).max(2);
    let bracket = (0..arm_x)
        .map(|dx| Position::new(inset_x + dx, inset_y))
        .chain((1..arm_y).map(|dy| Position::new(inset_x, inset_y + dy)));
    let post_x = inset_x / 2;
    let post = [h / 2 - 1, h / 2].map(|y| Position::new(post_x, y));
    let mut cells = HashSet::new();
    for Position { x, y } in bracket.chain(post) {
        let (mx, my) = (w - 1 - x, h - 1 - y);
        cells.extend([
            Position::new(x, y),
            Position::new(mx, y),
            Position::new(x, my),
            Position::new(mx, my),
        ]);
    }
    cells
}
