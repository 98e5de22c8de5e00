use crate::consts;
use crate::game::Game;
use crate::menu::MainMenu;
use crossterm::event::{poll, read, Event};
use ratatui::{backend::Backend, layout::Rect, Terminal};
use std::io;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    pub(crate) fn new(menu: MainMenu) -> App {
        App {
            screen: Screen::Main(menu),
        }
    }

    /// Run the main loop: draw a frame, wait up to one frame period for
    /// input, then advance the game clock by the time that actually passed
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        let mut last_frame = Instant::now();
        while !self.quitting() {
            let area = self.draw(&mut terminal)?;
            if poll(consts::FRAME_PERIOD)? {
                self.handle_event(read()?, area);
            }
            let now = Instant::now();
            self.update(now.saturating_duration_since(last_frame));
            last_frame = now;
        }
        log::info!("Exiting");
        Ok(())
    }

    /// Draw the current screen and return the area of the terminal window
    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<Rect> {
        let completed = match self.screen {
            Screen::Main(ref menu) => terminal.draw(|frame| frame.render_widget(menu, frame.area()))?,
            Screen::Game(ref game) => terminal.draw(|frame| frame.render_widget(game, frame.area()))?,
            Screen::Quit => return Ok(Rect::ZERO),
        };
        Ok(completed.area)
    }

    fn handle_event(&mut self, event: Event, area: Rect) {
        let next = match self.screen {
            Screen::Main(ref mut menu) => menu.handle_event(event, area),
            Screen::Game(ref mut game) => game.handle_event(event, area),
            Screen::Quit => None,
        };
        if let Some(screen) = next {
            log::debug!("Switching to {} screen", screen.name());
            self.screen = screen;
        }
    }

    fn update(&mut self, dt: Duration) {
        if let Screen::Game(ref mut game) = self.screen {
            game.update(dt);
        }
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

/// The screens the application moves between
#[derive(Clone, Debug)]
pub(crate) enum Screen {
    Main(MainMenu),
    Game(Game),
    Quit,
}

impl Screen {
    fn name(&self) -> &'static str {
        match self {
            Screen::Main(_) => "main menu",
            Screen::Game(_) => "game",
            Screen::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Globals;
    use crossterm::event::KeyCode;
    use ratatui::backend::TestBackend;

    fn press(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[test]
    fn menu_to_game_and_back() {
        let tmpdir = tempfile::tempdir().unwrap();
        let mut app = App::new(MainMenu::new(Globals::in_dir(tmpdir.path())));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let area = app.draw(&mut terminal).unwrap();
        assert_eq!(area, Rect::new(0, 0, 80, 24));
        app.handle_event(press(KeyCode::Char('n')), area);
        assert!(matches!(app.screen, Screen::Game(_)));
        app.update(Duration::from_millis(100));
        app.draw(&mut terminal).unwrap();
        app.handle_event(press(KeyCode::Char('p')), area);
        app.handle_event(press(KeyCode::Char('m')), area);
        assert!(matches!(app.screen, Screen::Main(_)));
        app.handle_event(press(KeyCode::Char('q')), area);
        assert!(app.quitting());
        assert_eq!(app.draw(&mut terminal).unwrap(), Rect::ZERO);
    }
}
