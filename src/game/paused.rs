use crate::command::Command;
use crate::theme::Theme;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// A widget for displaying a pause menu pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused {
    /// The currently-selected item in the pause menu
    selection: PauseOpt,
    theme: Theme,
}

impl Paused {
    /// The height that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const HEIGHT: u16 = 7;

    /// The width that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const WIDTH: u16 = 21;

    pub(super) fn new(theme: Theme) -> Paused {
        Paused {
            selection: PauseOpt::min(),
            theme,
        }
    }

    /// Handle an input event.  Returns `Some` if the user made a choice.
    pub(super) fn handle_event(&mut self, event: Event) -> Option<PauseOpt> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Esc | Command::P => return Some(PauseOpt::Resume),
            Command::R => return Some(PauseOpt::Restart),
            Command::E => return Some(PauseOpt::SaveAndExit),
            Command::M => return Some(PauseOpt::MainMenu),
            Command::Q | Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter => return Some(self.selection),
            Command::Up => {
                if let Some(opt) = self.selection.prev() {
                    self.selection = opt;
                }
            }
            Command::Down => {
                if let Some(opt) = self.selection.next() {
                    self.selection = opt;
                }
            }
            Command::Next => self.selection = self.selection.next_cyclic(),
            Command::Prev => self.selection = self.selection.prev_cyclic(),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }
}

/// The choices in the pause menu
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    /// Unpause/resume the game
    Resume,

    /// Start the game over
    Restart,

    /// Write the game to the save slot and return to the main menu
    SaveAndExit,

    /// Return to the main menu, abandoning the game
    MainMenu,

    /// Quit the application
    Quit,
}

impl PauseOpt {
    fn label(self) -> (&'static str, &'static str) {
        match self {
            PauseOpt::Resume => ("Resume", "Esc"),
            PauseOpt::Restart => ("Restart", "r"),
            PauseOpt::SaveAndExit => ("Save & Exit", "e"),
            PauseOpt::MainMenu => ("Main Menu", "m"),
            PauseOpt::Quit => ("Quit", "q"),
        }
    }

    /// Render the option as a `Line` for display in the pause menu.  If
    /// `selected` is `true`, this option is the currently-selected/active one.
    fn to_line(self, selected: bool, theme: &Theme) -> Line<'static> {
        let (text, key) = self.label();
        let mut line = Line::from(if selected { "» " } else { "  " });
        line.push_span(text);
        line.push_span(" (");
        line.push_span(Span::styled(key, theme.key));
        line.push_span(")");
        if selected {
            line = line.style(theme.selection);
        }
        line
    }
}

impl Widget for Paused {
    /*
     * ┌───── PAUSED ──────┐
     * │ » Resume (Esc)    │
     * │   Restart (r)     │
     * │   Save & Exit (e) │
     * │   Main Menu (m)   │
     * │   Quit (q)        │
     * └───────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt, &self.theme)
                .render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use rstest::rstest;

    fn press(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[rstest]
    #[case(KeyCode::Esc, PauseOpt::Resume)]
    #[case(KeyCode::Char('p'), PauseOpt::Resume)]
    #[case(KeyCode::Char('r'), PauseOpt::Restart)]
    #[case(KeyCode::Char('e'), PauseOpt::SaveAndExit)]
    #[case(KeyCode::Char('m'), PauseOpt::MainMenu)]
    #[case(KeyCode::Char('q'), PauseOpt::Quit)]
    fn hotkeys(#[case] code: KeyCode, #[case] opt: PauseOpt) {
        let mut paused = Paused::new(Theme::default());
        assert_eq!(paused.handle_event(press(code)), Some(opt));
    }

    #[test]
    fn navigate_and_choose() {
        let mut paused = Paused::new(Theme::default());
        assert_eq!(paused.handle_event(press(KeyCode::Up)), None);
        assert_eq!(paused.selection, PauseOpt::Resume);
        assert_eq!(paused.handle_event(press(KeyCode::Down)), None);
        assert_eq!(paused.handle_event(press(KeyCode::Down)), None);
        assert_eq!(paused.handle_event(press(KeyCode::Enter)), Some(PauseOpt::SaveAndExit));
        assert_eq!(paused.handle_event(press(KeyCode::End)), None);
        assert_eq!(paused.handle_event(press(KeyCode::Tab)), None);
        assert_eq!(paused.selection, PauseOpt::Resume);
        assert_eq!(paused.handle_event(press(KeyCode::BackTab)), None);
        assert_eq!(paused.selection, PauseOpt::Quit);
    }

    #[test]
    fn render() {
        let theme = Theme::default();
        let paused = Paused::new(theme);
        let area = Rect::new(0, 0, Paused::WIDTH, Paused::HEIGHT);
        let mut buffer = Buffer::empty(area);
        paused.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "┌───── PAUSED ──────┐",
            "│ » Resume (Esc)    │",
            "│   Restart (r)     │",
            "│   Save & Exit (e) │",
            "│   Main Menu (m)   │",
            "│   Quit (q)        │",
            "└───────────────────┘",
        ]);
        expected.set_style(area, Style::reset());
        expected.set_style(Rect::new(2, 1, 17, 1), theme.selection);
        expected.set_style(Rect::new(12, 1, 3, 1), theme.key.patch(theme.selection));
        expected.set_style(Rect::new(13, 2, 1, 1), theme.key);
        expected.set_style(Rect::new(17, 3, 1, 1), theme.key);
        expected.set_style(Rect::new(15, 4, 1, 1), theme.key);
        expected.set_style(Rect::new(10, 5, 1, 1), theme.key);
        pretty_assertions::assert_eq!(buffer, expected);
    }
}
