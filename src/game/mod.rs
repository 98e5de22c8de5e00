mod board;
mod direction;
mod hurdles;
mod paused;
mod save;
mod snake;
mod story;
pub(crate) use self::save::SaveGame;
use self::board::{Board, Bounds};
use self::direction::Direction;
use self::paused::{PauseOpt, Paused};
use self::snake::Snake;
use self::story::{Stage, STAGES};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::layout::BoardLayout;
use crate::menu::MainMenu;
use crate::options::{Difficulty, GameMode};
use crate::theme::Theme;
use crate::util::{center_rect, get_display_area, Globals, SaveError};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::Event;
use rand::{rngs::ThreadRng, seq::IteratorRandom, Rng};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Position, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Widget},
};
use std::time::Duration;

/// A game in progress, from the first tick until the player leaves it
#[derive(Clone, Debug)]
pub(crate) struct Game<R = ThreadRng> {
    rng: R,
    globals: Globals,
    theme: Theme,
    score: u32,
    /// Food eaten over the whole game
    eaten: u32,
    /// Index into [`STAGES`] of the current story stage; always 0 in classic
    /// mode
    stage: usize,
    /// Food eaten in the current story stage
    stage_eaten: u32,
    snake: Snake,
    /// `None` only when the board is full
    food: Option<Position>,
    board: Board,
    state: GameState,
    /// Time accumulated towards the next tick
    tick_accum: Duration,
    /// Total time spent running
    elapsed: Duration,
    /// Whether the final score set a new record
    new_high_score: bool,
    warning: Option<Warning>,
}

impl Game<ThreadRng> {
    pub(crate) fn new(globals: Globals, grid: Size) -> Self {
        Game::new_with_rng(globals, grid, rand::rng())
    }

    pub(crate) fn from_save(globals: Globals, save: &SaveGame) -> Self {
        Game::from_save_with_rng(globals, save, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    /// Start a new game on a board of `grid` cells using the options in
    /// `globals`
    pub(crate) fn new_with_rng(globals: Globals, grid: Size, rng: R) -> Game<R> {
        let board = Board::new(Bounds::from((grid, globals.options.mode.wraps())));
        let (head, direction) = board.snake_start();
        let theme = globals.theme();
        let mut game = Game {
            rng,
            globals,
            theme,
            score: 0,
            eaten: 0,
            stage: 0,
            stage_eaten: 0,
            snake: Snake::new(head, direction),
            food: None,
            board,
            state: GameState::Running,
            tick_accum: Duration::ZERO,
            elapsed: Duration::ZERO,
            new_high_score: false,
            warning: None,
        };
        log::info!(
            "Starting new {} game on {} difficulty with a {}x{} board",
            game.mode(),
            game.difficulty(),
            grid.width,
            grid.height
        );
        game.start_stage();
        game
    }

    /// Recreate a saved game.  The game starts out paused, and the mode &
    /// difficulty of `globals` are replaced with those of the save.
    pub(crate) fn from_save_with_rng(mut globals: Globals, save: &SaveGame, rng: R) -> Game<R> {
        globals.options.mode = save.mode;
        globals.options.difficulty = save.difficulty;
        if save.mode == GameMode::Classic {
            globals.options.hurdles = save.hurdles;
        }
        let mut board = Board::new(Bounds::from((save.grid(), save.mode.wraps())));
        board.set_hurdles(save.hurdles);
        let snake = Snake {
            head: to_position(save.head),
            body: save.body.iter().copied().map(to_position).collect(),
            max_len: save.max_len,
            direction: save.direction,
            queued: save.queued,
        };
        let theme = globals.theme();
        let mut game = Game {
            rng,
            globals,
            theme,
            score: save.score,
            eaten: save.eaten,
            stage: save.stage,
            stage_eaten: save.stage_eaten,
            snake,
            food: save.food.map(to_position),
            board,
            state: GameState::Paused(Paused::new(theme)),
            tick_accum: Duration::ZERO,
            elapsed: Duration::from_millis(save.elapsed_ms),
            new_high_score: false,
            warning: None,
        };
        log::info!(
            "Resuming {} game on {} difficulty with score {}",
            save.mode,
            save.difficulty,
            save.score
        );
        if game.food.is_none() {
            game.place_food();
        }
        game
    }

    /// Advance the game clock by `dt`, moving the snake once for every full
    /// tick period that has elapsed
    pub(crate) fn update(&mut self, dt: Duration) {
        if !self.running() {
            return;
        }
        let dt = dt.min(consts::MAX_FRAME_DELTA);
        self.elapsed = self.elapsed.saturating_add(dt);
        self.tick_accum = self.tick_accum.saturating_add(dt);
        loop {
            let period = self.tick_period();
            let Some(rest) = self.tick_accum.checked_sub(period) else {
                break;
            };
            self.tick_accum = rest;
            self.advance();
            if !self.running() {
                break;
            }
        }
    }

    /// Handle an input event.  `area` is the area of the whole terminal
    /// window.  Returns `Some` if the application should switch to a
    /// different screen.
    pub(crate) fn handle_event(&mut self, event: Event, area: Rect) -> Option<Screen> {
        if let Some(ref mut warning) = self.warning {
            let cmd = Command::from_key_event(event.as_key_press_event()?)?;
            match warning.handle_command(cmd)? {
                WarningOutcome::Dismissed => self.warning = None,
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        if let Event::Resize(width, height) = event {
            if self.running() && !self.fits(Rect::new(0, 0, width, height)) {
                log::info!("Window shrank below the board; pausing");
                self.pause();
            }
            return None;
        }
        match self.state {
            GameState::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match Command::from_key_event(event.as_key_press_event()?)? {
                        Command::Quit => return Some(Screen::Quit),
                        Command::Up => self.snake.turn(Direction::North),
                        Command::Left => self.snake.turn(Direction::West),
                        Command::Down => self.snake.turn(Direction::South),
                        Command::Right => self.snake.turn(Direction::East),
                        Command::Esc | Command::P => self.pause(),
                        _ => (),
                    }
                }
            }
            GameState::Paused(ref mut paused) => match paused.handle_event(event)? {
                PauseOpt::Resume => {
                    if self.fits(area) {
                        self.state = GameState::Running;
                    }
                }
                PauseOpt::Restart => return Some(self.restart(area)),
                PauseOpt::SaveAndExit => return self.save_and_exit(),
                PauseOpt::MainMenu => return Some(self.main_menu()),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            GameState::StageCleared => {
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::Enter | Command::Space => self.next_stage(area),
                    Command::M => return Some(self.main_menu()),
                    Command::Quit | Command::Q => return Some(Screen::Quit),
                    _ => (),
                }
            }
            GameState::Over(_) => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::R => return Some(self.restart(area)),
                Command::M => return Some(self.main_menu()),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
        }
        None
    }

    /// Move the snake one cell and resolve whatever it runs into
    fn advance(&mut self) {
        if !self.running() {
            return;
        }
        if !self.snake.advance(self.board.bounds()) {
            self.end(Ending::Crashed);
            return;
        }
        let head = self.snake.head();
        if self.snake.body().contains(&head) || self.board.hurdles().contains(&head) {
            self.end(Ending::Crashed);
        } else if self.food == Some(head) {
            self.food = None;
            self.eat();
        }
    }

    fn eat(&mut self) {
        self.score = self.score.saturating_add(self.difficulty().points());
        self.eaten += 1;
        self.snake.grow();
        if self.mode() == GameMode::Story {
            self.stage_eaten += 1;
            if self.stage_eaten >= self.current_stage().food_target {
                self.clear_stage();
                return;
            }
        }
        self.place_food();
    }

    /// Put the food on a random free cell.  If there are none, the game ends.
    fn place_food(&mut self) {
        let snake = &self.snake;
        let hurdles = self.board.hurdles();
        self.food = self
            .board
            .bounds()
            .positions()
            .filter(|&p| !snake.occupies(p) && !hurdles.contains(&p))
            .choose(&mut self.rng);
        if self.food.is_none() {
            self.end(Ending::BoardFull);
        }
    }

    /// Reset the board for the current stage (or for the whole game, in
    /// classic mode) and start running
    fn start_stage(&mut self) {
        let hurdles = match self.mode() {
            GameMode::Classic => self.globals.options.hurdles,
            GameMode::Story => self.current_stage().hurdles,
        };
        self.board.set_hurdles(hurdles);
        let (head, direction) = self.board.snake_start();
        self.snake = Snake::new(head, direction);
        self.stage_eaten = 0;
        self.tick_accum = Duration::ZERO;
        self.food = None;
        self.state = GameState::Running;
        self.place_food();
    }

    /// Start the next story stage.  If the board does not fit in `area`, the
    /// stage starts out paused.
    fn next_stage(&mut self, area: Rect) {
        if self.state == GameState::StageCleared && self.stage + 1 < STAGES.len() {
            self.stage += 1;
            log::info!("Starting stage {}", self.stage + 1);
            self.start_stage();
            if !self.fits(area) {
                self.pause();
            }
        }
    }
}

impl<R> Game<R> {
    fn mode(&self) -> GameMode {
        self.globals.options.mode
    }

    fn difficulty(&self) -> Difficulty {
        self.globals.options.difficulty
    }

    fn current_stage(&self) -> Stage {
        STAGES[self.stage.min(STAGES.len() - 1)]
    }

    /// The time between movements of the snake at this point in the game
    fn tick_period(&self) -> Duration {
        match self.mode() {
            GameMode::Classic => self.difficulty().classic_tick_period(self.eaten),
            GameMode::Story => self.current_stage().tick_period(self.difficulty()),
        }
    }

    fn running(&self) -> bool {
        self.state == GameState::Running
    }

    fn pause(&mut self) {
        self.state = GameState::Paused(Paused::new(self.theme));
    }

    /// Does the whole board fit in a window of the given area?
    fn fits(&self, area: Rect) -> bool {
        BoardLayout::centered(area, self.board.size()).fits()
    }

    fn clear_stage(&mut self) {
        log::info!(
            "Cleared stage {} with score {} after {:?}",
            self.stage + 1,
            self.score,
            self.elapsed
        );
        if self.stage + 1 >= STAGES.len() {
            self.end(Ending::Victory);
        } else {
            self.state = GameState::StageCleared;
        }
    }

    /// End the game and record the final score
    fn end(&mut self, ending: Ending) {
        self.state = GameState::Over(ending);
        let mode = self.mode();
        let difficulty = self.difficulty();
        log::info!(
            "Game over ({ending:?}): {mode} mode on {difficulty} difficulty, score {}, time {:?}",
            self.score,
            self.elapsed
        );
        if self.globals.high_scores.record(mode, difficulty, self.score) {
            self.new_high_score = true;
            log::info!("New high score for {mode}/{difficulty}: {}", self.score);
            if let Err(e) = self.save_high_scores() {
                log::error!("Failed to save high scores: {e}");
                self.warning = Some(Warning::from(e));
            }
        }
    }

    fn save_high_scores(&self) -> Result<(), SaveError> {
        let path = self
            .globals
            .config
            .high_scores_file()
            .ok_or_else(|| SaveError::no_path("high scores"))?;
        self.globals.high_scores.save(&path)
    }

    /// Capture the game's current state for the save slot
    pub(crate) fn to_save(&self) -> SaveGame {
        let size = self.board.size();
        SaveGame {
            mode: self.mode(),
            difficulty: self.difficulty(),
            hurdles: self.board.has_hurdles(),
            width: size.width,
            height: size.height,
            score: self.score,
            eaten: self.eaten,
            stage: self.stage,
            stage_eaten: self.stage_eaten,
            elapsed_ms: u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            direction: self.snake.direction,
            queued: self.snake.queued,
            head: from_position(self.snake.head()),
            body: self.snake.body().iter().copied().map(from_position).collect(),
            max_len: self.snake.max_len,
            food: self.food.map(from_position),
        }
    }

    fn save_and_exit(&mut self) -> Option<Screen> {
        let r = self
            .globals
            .config
            .save_file()
            .ok_or_else(|| SaveError::no_path("saved game"))
            .and_then(|path| self.to_save().save(&path));
        match r {
            Ok(()) => {
                log::info!("Saved game with score {}", self.score);
                Some(self.main_menu())
            }
            Err(e) => {
                log::error!("Failed to save game: {e}");
                self.warning = Some(Warning::from(e));
                None
            }
        }
    }

    /// Start a fresh game with the same options.  The board keeps its size
    /// if it still fits in `area`, else it shrinks to fit.  If no board fits
    /// at all, the new game starts out paused.
    fn restart(&self, area: Rect) -> Screen {
        let current = self.board.size();
        let grid = if self.fits(area) {
            current
        } else {
            BoardLayout::fit(area).map_or(current, |layout| layout.grid)
        };
        let mut game = Game::new(self.globals.clone(), grid);
        if !game.fits(area) {
            log::info!("Window too small for the restarted game; pausing");
            game.pause();
        }
        Screen::Game(game)
    }

    fn main_menu(&self) -> Screen {
        Screen::Main(MainMenu::new(self.globals.clone()))
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.status_bar);
        let mode = match self.mode() {
            GameMode::Classic => String::from("Classic"),
            GameMode::Story => format!("Story {}/{}", self.stage + 1, STAGES.len()),
        };
        Line::from(format!(
            " Score: {}   {mode} · {}",
            self.score,
            self.difficulty()
        ))
        .render(area, buf);
        let secs = self.elapsed.as_secs();
        Line::from(format!("Time: {}:{:02} ", secs / 60, secs % 60))
            .right_aligned()
            .render(area, buf);
    }

    fn render_board(&self, layout: BoardLayout, buf: &mut Buffer) {
        if self.board.wrap() {
            DottedBorder {
                style: self.theme.border,
            }
            .render(layout.frame, buf);
        } else {
            Block::bordered()
                .border_style(self.theme.border)
                .render(layout.frame, buf);
        }
        let mut canvas = Canvas { layout, buf };
        for &pos in self.board.hurdles() {
            canvas.draw_cell(
                pos,
                [consts::HURDLE_SYMBOL, consts::HURDLE_SYMBOL],
                self.theme.hurdle,
            );
        }
        if let Some(pos) = self.food {
            canvas.draw_cell(pos, [consts::FOOD_SYMBOL, ' '], self.theme.food);
        }
        for &pos in self.snake.body() {
            canvas.draw_cell(pos, [consts::SNAKE_BODY_SYMBOL, ' '], self.theme.snake);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if self.state == GameState::Over(Ending::Crashed) {
            canvas.draw_cell(
                self.snake.head(),
                [consts::COLLISION_SYMBOL, ' '],
                self.theme.collision,
            );
        } else {
            canvas.draw_cell(
                self.snake.head(),
                [self.snake.head_symbol(), ' '],
                self.theme.snake,
            );
        }
    }

    fn render_messages(&self, area: Rect, buf: &mut Buffer) {
        let [msg1_area, msg2_area] = Layout::vertical([1, 1]).areas(area);
        let key = self.theme.key;
        match self.state {
            GameState::Running => {
                choices_line(" ", &[("Pause", "p")], key).render(msg2_area, buf);
            }
            GameState::Paused(_) => (),
            GameState::StageCleared => {
                Span::from(format!(" — STAGE {} CLEARED —", self.stage + 1))
                    .render(msg1_area, buf);
                choices_line(
                    " Choose One: ",
                    &[("Next Stage", "Enter"), ("Main Menu", "m"), ("Quit", "q")],
                    key,
                )
                .render(msg2_area, buf);
            }
            GameState::Over(ending) => {
                let mut line = Line::from(match ending {
                    Ending::Crashed => " — GAME OVER —",
                    Ending::BoardFull => " — BOARD FULL: YOU WIN! —",
                    Ending::Victory => " — ALL STAGES CLEARED: YOU WIN! —",
                });
                if self.new_high_score {
                    line.push_span("  New high score!");
                }
                line.render(msg1_area, buf);
                choices_line(
                    " Choose One: ",
                    &[("Restart", "r"), ("Main Menu", "m"), ("Quit", "q")],
                    key,
                )
                .render(msg2_area, buf);
            }
        }
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let layout = BoardLayout::centered(area, self.board.size());
        self.render_status(layout.status, buf);
        if layout.fits() {
            self.render_board(layout, buf);
            self.render_messages(layout.messages, buf);
            if let GameState::Paused(paused) = self.state {
                let pause_area = center_rect(display, Size::new(Paused::WIDTH, Paused::HEIGHT));
                paused.render(pause_area, buf);
            }
        } else {
            let [notice_area] = Layout::vertical([2]).flex(Flex::Center).areas(display);
            Text::from_iter([
                "The window is too small for the board.",
                "Enlarge it to keep playing.",
            ])
            .centered()
            .render(notice_area, buf);
        }
        if let Some(ref warning) = self.warning {
            warning.render(area, buf);
        }
    }
}

/// Render a line of the form "Label (key) — Label (key) — ..."
fn choices_line(
    prefix: &'static str,
    choices: &[(&'static str, &'static str)],
    key_style: Style,
) -> Line<'static> {
    let mut line = Line::from(prefix);
    for (i, &(label, key)) in choices.iter().enumerate() {
        if i > 0 {
            line.push_span(" — ");
        }
        line.push_span(label);
        line.push_span(" (");
        line.push_span(Span::styled(key, key_style));
        line.push_span(")");
    }
    line
}

fn to_position([x, y]: [u16; 2]) -> Position {
    Position::new(x, y)
}

fn from_position(pos: Position) -> [u16; 2] {
    [pos.x, pos.y]
}

/// Draws board cells into a buffer at the screen positions given by a
/// [`BoardLayout`]
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    layout: BoardLayout,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw a cell as `glyphs`, one per terminal column
    fn draw_cell(&mut self, pos: Position, glyphs: [char; 2], style: Style) {
        let Some(rect) = self.layout.cell_rect(pos) else {
            return;
        };
        for (p, ch) in rect.positions().zip(glyphs) {
            if let Some(cell) = self.buf.cell_mut(p) {
                cell.set_char(ch);
                cell.set_style(Style::reset().patch(style));
            }
        }
    }
}

/// The border drawn around a board whose edges wrap around
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder {
    style: Style,
}

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let right = area.right() - 1;
        let bottom = area.bottom() - 1;
        for p in area.positions() {
            let vertical = p.x == area.left() || p.x == right;
            let horizontal = p.y == area.top() || p.y == bottom;
            let ch = match (vertical, horizontal) {
                (true, true) => '·',
                (false, true) => '⋯',
                (true, false) => '⋮',
                (false, false) => continue,
            };
            if let Some(cell) = buf.cell_mut(p) {
                cell.set_char(ch);
                cell.set_style(self.style);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameState {
    Running,
    Paused(Paused),
    /// A story stage's food target has been reached, and the game is waiting
    /// for the player to start the next one
    StageCleared,
    Over(Ending),
}

/// How a game came to an end
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Ending {
    /// The snake ran into itself, a hurdle, or a wall
    Crashed,
    /// The snake has filled the board and there is nowhere left to put food
    BoardFull,
    /// The last story stage was cleared
    Victory,
}
