//! Mapping between the board's cell grid and the terminal window
use crate::consts;
use crate::util::{center_rect, get_display_area};
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect, Size};

/// Where the parts of the game screen go within a window of a given size
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BoardLayout {
    /// Size of the board in cells
    pub(crate) grid: Size,
    /// The status bar line
    pub(crate) status: Rect,
    /// The board including its border
    pub(crate) frame: Rect,
    /// The interior of the board, where cells are drawn
    pub(crate) board: Rect,
    /// The message lines below the board
    pub(crate) messages: Rect,
}

impl BoardLayout {
    /// Lay out the largest board that fits in `area`, up to
    /// [`MAX_GRID`][consts::MAX_GRID].  Returns `None` if the result would be
    /// smaller than [`MIN_GRID`][consts::MIN_GRID].
    pub(crate) fn fit(area: Rect) -> Option<BoardLayout> {
        let display = get_display_area(area);
        let cols = (display.width.saturating_sub(2) / consts::CELL_WIDTH)
            .min(consts::MAX_GRID.width);
        let rows = display
            .height
            .saturating_sub(consts::STATUS_ROWS + consts::MESSAGE_ROWS + 2)
            .min(consts::MAX_GRID.height);
        if cols < consts::MIN_GRID.width || rows < consts::MIN_GRID.height {
            return None;
        }
        Some(BoardLayout::centered(area, Size::new(cols, rows)))
    }

    /// Lay out a board of `grid` cells centered in `area`.  If `area` is too
    /// small, the board is clipped; cf. [`BoardLayout::fits()`].
    pub(crate) fn centered(area: Rect, grid: Size) -> BoardLayout {
        let display = get_display_area(area);
        let [status, middle, messages] = Layout::vertical([
            Constraint::Length(consts::STATUS_ROWS),
            Constraint::Fill(1),
            Constraint::Length(consts::MESSAGE_ROWS),
        ])
        .areas(display);
        let frame_size = Size {
            width: grid
                .width
                .saturating_mul(consts::CELL_WIDTH)
                .saturating_add(2),
            height: grid.height.saturating_add(2),
        };
        let frame = center_rect(middle, frame_size);
        let board = frame.inner(Margin::new(1, 1));
        BoardLayout {
            grid,
            status,
            frame,
            board,
            messages,
        }
    }

    /// Is the whole board visible?
    pub(crate) fn fits(&self) -> bool {
        self.board.width == self.grid.width.saturating_mul(consts::CELL_WIDTH)
            && self.board.height == self.grid.height
    }

    /// Return the screen area covered by the board cell at `pos`, or `None`
    /// if `pos` is off the board or the cell lies outside the drawn area
    pub(crate) fn cell_rect(&self, pos: Position) -> Option<Rect> {
        if pos.x >= self.grid.width || pos.y >= self.grid.height {
            return None;
        }
        let x = self
            .board
            .x
            .checked_add(pos.x.checked_mul(consts::CELL_WIDTH)?)?;
        let y = self.board.y.checked_add(pos.y)?;
        let rect = Rect::new(x, y, consts::CELL_WIDTH, 1);
        (rect.right() <= self.board.right() && rect.bottom() <= self.board.bottom())
            .then_some(rect)
    }
}
