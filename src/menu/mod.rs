mod widgets;
use self::widgets::{Instructions, Logo, OptionsBox};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::game::{Game, SaveGame};
use crate::layout::BoardLayout;
use crate::options::{Adjustable, OptKey, OptValue, Options};
use crate::theme::Theme;
use crate::util::{get_display_area, EnumExt, Globals};
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::Event;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Clone, Debug)]
pub(crate) struct MainMenu {
    globals: Globals,
    theme: Theme,
    focus: Focus,
    /// Whether the save slot holds a game
    has_save: bool,
    /// The options as of the last attempt to write them to disk
    persisted: Options,
    /// Pending warnings, shown one at a time
    warnings: VecDeque<Warning>,
}

impl MainMenu {
    pub(crate) fn new(globals: Globals) -> MainMenu {
        let has_save = globals.config.has_saved_game();
        MainMenu {
            theme: globals.theme(),
            persisted: globals.options,
            globals,
            focus: Focus::NewGame,
            has_save,
            warnings: VecDeque::new(),
        }
    }

    /// Queue a warning to show over the menu
    pub(crate) fn warn<W: Into<Warning>>(&mut self, warning: W) {
        self.warnings.push_back(warning.into());
    }

    /// Handle an input event.  `area` is the area of the whole terminal
    /// window.  Returns `Some` if the application should switch to a
    /// different screen.
    pub(crate) fn handle_event(&mut self, event: Event, area: Rect) -> Option<Screen> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(warning) = self.warnings.front_mut() {
            match warning.handle_command(cmd)? {
                WarningOutcome::Dismissed => {
                    self.warnings.pop_front();
                }
                WarningOutcome::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match (self.focus, cmd) {
            (_, Command::Quit | Command::Q) | (Focus::Quit, Command::Enter) => {
                return Some(Screen::Quit)
            }
            (Focus::NewGame, Command::Enter) | (_, Command::N) => return self.new_game(area),
            (Focus::Continue, Command::Enter) | (_, Command::C) => {
                return self.continue_game(area)
            }
            (_, Command::Home) => self.focus = Focus::NewGame,
            (_, Command::End) => self.focus = Focus::Quit,
            (_, Command::Up | Command::Prev) => self.focus = self.step_focus(false),
            (_, Command::Down | Command::Next) => self.focus = self.step_focus(true),
            (Focus::Option(key), Command::Left) => self.adjust(key, OptValue::decrease),
            (Focus::Option(key), Command::Right) => self.adjust(key, OptValue::increase),
            (Focus::Option(key), Command::Space | Command::Enter) => {
                self.adjust(key, OptValue::cycle);
            }
            _ => (),
        }
        None
    }

    /// The menu items that can currently receive focus, in order
    fn items(&self) -> Vec<Focus> {
        let mut items = vec![Focus::NewGame];
        if self.has_save {
            items.push(Focus::Continue);
        }
        items.extend(OptKey::iter().map(Focus::Option));
        items.push(Focus::Quit);
        items
    }

    fn step_focus(&self, forwards: bool) -> Focus {
        let items = self.items();
        let Some(i) = items.iter().position(|&f| f == self.focus) else {
            return Focus::NewGame;
        };
        let j = if forwards {
            (i + 1) % items.len()
        } else if i == 0 {
            items.len() - 1
        } else {
            i - 1
        };
        items[j]
    }

    fn adjust(&mut self, key: OptKey, f: fn(&mut OptValue)) {
        let mut value = self.globals.options.get(key);
        f(&mut value);
        self.globals.options.set(key, value);
        self.theme = self.globals.theme();
    }

    /// Write the options to disk if they changed since the last attempt.
    /// Returns `false` if this failed, in which case a warning has been
    /// queued.
    fn persist_options(&mut self) -> bool {
        let options = self.globals.options;
        if options == self.persisted {
            return true;
        }
        self.persisted = options;
        match self.globals.config.save_options(options) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to save options: {e}");
                self.warn(e);
                false
            }
        }
    }

    fn new_game(&mut self, area: Rect) -> Option<Screen> {
        let Some(layout) = BoardLayout::fit(area) else {
            log::warn!(
                "Refusing to start a game in a {}x{} window",
                area.width,
                area.height
            );
            self.warn(StartError::WindowTooSmall {
                width: area.width,
                height: area.height,
            });
            return None;
        };
        if !self.persist_options() {
            return None;
        }
        Some(Screen::Game(Game::new(self.globals.clone(), layout.grid)))
    }

    fn continue_game(&mut self, area: Rect) -> Option<Screen> {
        let Some(path) = self.globals.config.save_file() else {
            self.warn(StartError::NoSave);
            return None;
        };
        let save = match SaveGame::load(&path) {
            Ok(Some(save)) => save,
            Ok(None) => {
                self.has_save = false;
                if self.focus == Focus::Continue {
                    self.focus = Focus::NewGame;
                }
                self.warn(StartError::NoSave);
                return None;
            }
            Err(e) => {
                log::error!("Failed to load saved game: {e}");
                self.warn(e);
                return None;
            }
        };
        let grid = save.grid();
        if !BoardLayout::centered(area, grid).fits() {
            self.warn(StartError::BoardTooLarge {
                width: grid.width,
                height: grid.height,
            });
            return None;
        }
        if let Err(e) = SaveGame::remove(&path) {
            log::error!("Failed to clear save slot: {e}");
            self.warn(e);
            return None;
        }
        log::info!(
            "Resuming saved {} game with score {} on a {}x{} board",
            save.mode,
            save.score,
            grid.width,
            grid.height
        );
        Some(Screen::Game(Game::from_save(self.globals.clone(), &save)))
    }

    fn best_score_line(&self) -> Line<'static> {
        let Options {
            mode, difficulty, ..
        } = self.globals.options;
        let best = match self.globals.high_scores.get(mode, difficulty) {
            Some(score) => score.to_string(),
            None => String::from("—"),
        };
        Line::from(format!("Best {mode} · {difficulty}: {best}")).centered()
    }

    fn button(&self, label: &'static str, key: &'static str, focus: Focus) -> Vec<Span<'static>> {
        let enabled = focus != Focus::Continue || self.has_save;
        let (style, key_style) = if !enabled {
            let dim = Style::new().add_modifier(Modifier::DIM);
            (dim, dim)
        } else if self.focus == focus {
            (self.theme.selection, self.theme.key.patch(self.theme.selection))
        } else {
            (Style::new(), self.theme.key)
        };
        vec![
            Span::styled(format!("[{label} ("), style),
            Span::styled(key, key_style),
            Span::styled(")]", style),
        ]
    }
}

impl Widget for &MainMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [logo_area, best_area, buttons_area, options_area, quit_area, instructions_area] =
            Layout::vertical([
                Logo::HEIGHT,
                1,
                1,
                OptionsBox::HEIGHT,
                1,
                Instructions::HEIGHT,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        let [logo_area] = Layout::horizontal([Logo::WIDTH])
            .flex(Flex::Center)
            .areas(logo_area);
        Logo { theme: self.theme }.render(logo_area, buf);

        self.best_score_line().render(best_area, buf);

        let mut buttons = self.button("New Game", "n", Focus::NewGame);
        buttons.push(Span::raw("    "));
        buttons.extend(self.button("Continue", "c", Focus::Continue));
        Line::from(buttons).centered().render(buttons_area, buf);

        let [options_area] = Layout::horizontal([OptionsBox::WIDTH])
            .flex(Flex::Center)
            .areas(options_area);
        OptionsBox {
            options: self.globals.options,
            selection: match self.focus {
                Focus::Option(key) => Some(key),
                _ => None,
            },
            theme: self.theme,
        }
        .render(options_area, buf);

        Line::from(self.button("Quit", "q", Focus::Quit))
            .centered()
            .render(quit_area, buf);

        Instructions { theme: self.theme }.render(instructions_area, buf);

        if let Some(warning) = self.warnings.front() {
            warning.render(area, buf);
        }
    }
}

/// The menu item with focus
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Focus {
    NewGame,
    Continue,
    Option(OptKey),
    Quit,
}

/// Reasons the menu could not start a game
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum StartError {
    #[error(
        "the window is too small to play in: it is {width}x{height}, but at least {min_width}x{min_height} is needed",
        min_width = consts::MIN_WINDOW.width,
        min_height = consts::MIN_WINDOW.height
    )]
    WindowTooSmall { width: u16, height: u16 },
    #[error("the window is too small for the saved {width}x{height} board; enlarge it and try again")]
    BoardTooLarge { width: u16, height: u16 },
    #[error("there is no saved game to continue")]
    NoSave,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Difficulty, GameMode, ThemeName};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Size;

    const WINDOW: Rect = Rect::new(0, 0, 80, 24);

    fn press(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    fn screen_text(menu: &MainMenu, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        menu.render(area, &mut buffer);
        let mut s = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                s.push_str(buffer[(x, y)].symbol());
            }
            s.push('\n');
        }
        s
    }

    /// Write a saved game on a `grid`-sized board to the save slot
    fn write_save(globals: &Globals, grid: Size) -> SaveGame {
        let save = Game::new(globals.clone(), grid).to_save();
        let path = globals.config.save_file().unwrap();
        save.save(&path).unwrap();
        save
    }

    #[test]
    fn navigate_without_save() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut menu = MainMenu::new(Globals::in_dir(tmpdir.path()));
        assert!(!menu.has_save);
        let mut seen = vec![menu.focus];
        for _ in 0..6 {
            assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
            seen.push(menu.focus);
        }
        assert_eq!(
            seen,
            [
                Focus::NewGame,
                Focus::Option(OptKey::Mode),
                Focus::Option(OptKey::Difficulty),
                Focus::Option(OptKey::Hurdles),
                Focus::Option(OptKey::Theme),
                Focus::Quit,
                Focus::NewGame,
            ]
        );
        assert!(menu.handle_event(press(KeyCode::Up), WINDOW).is_none());
        assert_eq!(menu.focus, Focus::Quit);
        assert!(menu.handle_event(press(KeyCode::Home), WINDOW).is_none());
        assert_eq!(menu.focus, Focus::NewGame);
        assert!(menu.handle_event(press(KeyCode::BackTab), WINDOW).is_none());
        assert_eq!(menu.focus, Focus::Quit);
    }

    #[test]
    fn navigate_with_save() {
        let tmpdir = tempfile::tempdir().unwrap();
        let globals = Globals::in_dir(tmpdir.path());
        write_save(&globals, Size::new(20, 12));
        let mut menu = MainMenu::new(globals);
        assert!(menu.has_save);
        assert!(menu.handle_event(press(KeyCode::Tab), WINDOW).is_none());
        assert_eq!(menu.focus, Focus::Continue);
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert_eq!(menu.focus, Focus::Option(OptKey::Mode));
    }

    #[test]
    fn adjust_options() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut menu = MainMenu::new(Globals::in_dir(tmpdir.path()));
        // Left/Right do nothing on buttons
        assert!(menu.handle_event(press(KeyCode::Right), WINDOW).is_none());
        assert_eq!(menu.globals.options, Options::default());
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Right), WINDOW).is_none());
        assert_eq!(menu.globals.options.mode, GameMode::Story);
        assert!(menu.handle_event(press(KeyCode::Right), WINDOW).is_none());
        assert_eq!(menu.globals.options.mode, GameMode::Story);
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Enter), WINDOW).is_none());
        assert_eq!(menu.globals.options.difficulty, Difficulty::Hard);
        assert!(menu.handle_event(press(KeyCode::Enter), WINDOW).is_none());
        assert_eq!(menu.globals.options.difficulty, Difficulty::Easy);
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Char(' ')), WINDOW).is_none());
        assert!(menu.globals.options.hurdles);
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Right), WINDOW).is_none());
        assert_eq!(menu.globals.options.theme, ThemeName::Forest);
        assert_eq!(menu.theme, Theme::new(ThemeName::Forest));
        assert!(menu.handle_event(press(KeyCode::Left), WINDOW).is_none());
        assert_eq!(menu.theme, Theme::new(ThemeName::Classic));
    }

    #[test]
    fn quit() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut menu = MainMenu::new(Globals::in_dir(tmpdir.path()));
        assert!(matches!(
            menu.handle_event(press(KeyCode::Char('q')), WINDOW),
            Some(Screen::Quit)
        ));
        assert!(matches!(
            menu.handle_event(
                Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
                WINDOW
            ),
            Some(Screen::Quit)
        ));
        assert!(menu.handle_event(press(KeyCode::End), WINDOW).is_none());
        assert!(matches!(
            menu.handle_event(press(KeyCode::Enter), WINDOW),
            Some(Screen::Quit)
        ));
    }

    #[test]
    fn new_game_saves_options() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut menu = MainMenu::new(Globals::in_dir(tmpdir.path()));
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Right), WINDOW).is_none());
        let Some(Screen::Game(game)) = menu.handle_event(press(KeyCode::Char('n')), WINDOW) else {
            panic!("'n' did not start a game");
        };
        assert_eq!(game.to_save().mode, GameMode::Story);
        assert_eq!(
            menu.globals.config.load_options().unwrap().mode,
            GameMode::Story
        );
    }

    #[test]
    fn new_game_window_too_small() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut menu = MainMenu::new(Globals::in_dir(tmpdir.path()));
        let small = Rect::new(0, 0, 30, 12);
        assert!(menu.handle_event(press(KeyCode::Enter), small).is_none());
        assert_eq!(menu.warnings.len(), 1);
        let text = screen_text(&menu, WINDOW);
        assert!(text.contains("WARNING"));
        assert!(text.contains("the window is too small to play in: it is 30x12,"));
        assert!(text.contains("but at least 34x15 is needed"));
        // Keys go to the warning until it is dismissed
        assert!(menu.handle_event(press(KeyCode::Down), small).is_none());
        assert_eq!(menu.focus, Focus::NewGame);
        assert!(menu.handle_event(press(KeyCode::Enter), small).is_none());
        assert!(menu.warnings.is_empty());
        assert!(!tmpdir.path().join("options.json").exists());
    }

    #[test]
    fn continue_consumes_save() {
        let tmpdir = tempfile::tempdir().unwrap();
        let globals = Globals::in_dir(tmpdir.path());
        let save = write_save(&globals, Size::new(20, 12));
        let mut menu = MainMenu::new(globals);
        let Some(Screen::Game(game)) = menu.handle_event(press(KeyCode::Char('c')), WINDOW) else {
            panic!("'c' did not continue the saved game");
        };
        assert_eq!(game.to_save(), save);
        assert!(!menu.globals.config.has_saved_game());
    }

    #[test]
    fn continue_without_save() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut menu = MainMenu::new(Globals::in_dir(tmpdir.path()));
        assert!(menu.handle_event(press(KeyCode::Char('c')), WINDOW).is_none());
        assert!(screen_text(&menu, WINDOW).contains("there is no saved game to continue"));
    }

    #[test]
    fn continue_board_too_large() {
        let tmpdir = tempfile::tempdir().unwrap();
        let globals = Globals::in_dir(tmpdir.path());
        write_save(&globals, consts::MAX_GRID);
        let mut menu = MainMenu::new(globals);
        assert!(menu
            .handle_event(press(KeyCode::Char('c')), Rect::new(0, 0, 60, 24))
            .is_none());
        assert_eq!(menu.warnings.len(), 1);
        assert!(menu.globals.config.has_saved_game());
    }

    #[test]
    fn continue_invalid_save() {
        let tmpdir = tempfile::tempdir().unwrap();
        let globals = Globals::in_dir(tmpdir.path());
        let path = globals.config.save_file().unwrap();
        fs_err::write(&path, "mode = \"classic\"\nwidth = 3\n").unwrap();
        let mut menu = MainMenu::new(globals);
        assert!(menu.has_save);
        assert!(menu.handle_event(press(KeyCode::Char('c')), WINDOW).is_none());
        let text = screen_text(&menu, WINDOW);
        assert!(text.contains("failed to load saved game from disk"));
        assert!(path.exists());
    }

    #[test]
    fn render_menu() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut globals = Globals::in_dir(tmpdir.path());
        globals
            .high_scores
            .record(GameMode::Classic, Difficulty::Normal, 42);
        let mut menu = MainMenu::new(globals);
        let text = screen_text(&menu, WINDOW);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 24);
        assert_eq!(lines[8].trim(), "Best Classic · Normal: 42");
        assert_eq!(lines[10].trim(), "[New Game (n)]    [Continue (c)]");
        assert_eq!(lines[12].trim(), "┌ Options: ─────────────────┐");
        assert_eq!(lines[13].trim(), "│   Mode        ◁ Classic ▶ │");
        assert_eq!(lines[19].trim(), "[Quit (q)]");
        assert!(lines[21].contains("Steer with"));
        assert!(lines[22].contains("don't bite yourself!"));

        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Down), WINDOW).is_none());
        assert!(menu.handle_event(press(KeyCode::Right), WINDOW).is_none());
        let text = screen_text(&menu, WINDOW);
        assert!(text.contains("Best Classic · Hard: —"));
        assert!(text.contains("│ » Difficulty  ◀  Hard   ▷ │"));
    }

    #[test]
    fn start_error_messages() {
        assert_eq!(
            StartError::WindowTooSmall {
                width: 30,
                height: 12
            }
            .to_string(),
            "the window is too small to play in: it is 30x12, but at least 34x15 is needed"
        );
    }
}
