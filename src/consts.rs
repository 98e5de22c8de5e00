//! Assorted constants & hard-coded configuration
use ratatui::layout::Size;
use std::time::Duration;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// How long the main loop waits for input before redrawing & advancing the
/// clock
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Longest stretch of time a single frame may advance the game clock by, so
/// that a stalled terminal does not replay a burst of ticks
pub(crate) const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Number of terminal columns used to draw a single board cell
pub(crate) const CELL_WIDTH: u16 = 2;

/// The largest board, in cells, that will be laid out
pub(crate) const MAX_GRID: Size = Size {
    width: 39,
    height: 17,
};

/// The smallest board, in cells, that a game can be played on
pub(crate) const MIN_GRID: Size = Size {
    width: 16,
    height: 10,
};

/// The smallest window in which a [`MIN_GRID`] board can be laid out
pub(crate) const MIN_WINDOW: Size = Size {
    width: MIN_GRID.width * CELL_WIDTH + 2,
    height: MIN_GRID.height + STATUS_ROWS + MESSAGE_ROWS + 2,
};

/// Rows above the board taken up by the status bar
pub(crate) const STATUS_ROWS: u16 = 1;

/// Rows below the board taken up by messages & key hints
pub(crate) const MESSAGE_ROWS: u16 = 2;

/// Maximum snake length before any food has been eaten
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// How many cells the snake's length increases by upon eating
pub(crate) const SNAKE_GROWTH: usize = 2;

/// In classic mode, the snake speeds up after eating this many pieces of
/// food
pub(crate) const SPEEDUP_EVERY: u32 = 5;

/// Percentage of the tick period kept at each classic-mode speed-up
pub(crate) const SPEEDUP_PERCENT: u64 = 90;

/// The tick period never drops below this many milliseconds
pub(crate) const MIN_TICK_MILLIS: u64 = 50;

/// The tick period never drops below this
pub(crate) const MIN_TICK_PERIOD: Duration = Duration::from_millis(MIN_TICK_MILLIS);

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for hurdles
pub(crate) const HURDLE_SYMBOL: char = '█';

/// Glyph for the snake's head when it's collided with something
pub(crate) const COLLISION_SYMBOL: char = '×';
