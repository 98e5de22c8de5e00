//! Color themes for the board & menus
use crate::options::ThemeName;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// The styles used to draw every themed element of the interface
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Theme {
    /// Style for the snake's head and body
    pub(crate) snake: Style,
    /// Style for the snake's head when it has crashed
    pub(crate) collision: Style,
    pub(crate) food: Style,
    pub(crate) hurdle: Style,
    /// Style for the border around the board
    pub(crate) border: Style,
    /// Style for the status bar at the top of the game screen
    pub(crate) status_bar: Style,
    /// Style for key codes shown in the interface
    pub(crate) key: Style,
    /// Style for the currently-selected menu item
    pub(crate) selection: Style,
}

impl Theme {
    pub(crate) fn new(name: ThemeName) -> Theme {
        match name {
            ThemeName::Classic => Theme {
                snake: Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
                collision: Style::new()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::REVERSED),
                food: Style::new().fg(Color::LightRed),
                hurdle: Style::new().fg(Color::Gray),
                border: Style::new(),
                status_bar: Style::new().add_modifier(Modifier::REVERSED),
                key: Style::new().fg(Color::Yellow),
                selection: Style::new().add_modifier(Modifier::UNDERLINED),
            },
            ThemeName::Forest => Theme {
                snake: Style::new().fg(Color::LightGreen),
                collision: Style::new().fg(Color::Black).bg(Color::Yellow),
                food: Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                hurdle: Style::new().fg(Color::Rgb(139, 90, 43)),
                border: Style::new().fg(Color::Green),
                status_bar: Style::new().fg(Color::Black).bg(Color::Green),
                key: Style::new().fg(Color::LightYellow),
                selection: Style::new()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::UNDERLINED),
            },
            ThemeName::Mono => Theme {
                snake: Style::new().add_modifier(Modifier::BOLD),
                collision: Style::new().add_modifier(Modifier::REVERSED),
                food: Style::new(),
                hurdle: Style::new().add_modifier(Modifier::DIM),
                border: Style::new(),
                status_bar: Style::new().add_modifier(Modifier::REVERSED),
                key: Style::new().add_modifier(Modifier::BOLD),
                selection: Style::new().add_modifier(Modifier::REVERSED),
            },
            ThemeName::Neon => Theme {
                snake: Style::new().fg(Color::LightCyan).add_modifier(Modifier::BOLD),
                collision: Style::new().fg(Color::Black).bg(Color::LightMagenta),
                food: Style::new().fg(Color::LightMagenta),
                hurdle: Style::new().fg(Color::Blue),
                border: Style::new().fg(Color::Magenta),
                status_bar: Style::new().fg(Color::Black).bg(Color::Magenta),
                key: Style::new().fg(Color::LightYellow),
                selection: Style::new()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::UNDERLINED),
            },
        }
    }

    /// Patch each style with the corresponding override, if any
    pub(crate) fn with_overrides(mut self, overrides: &StyleOverrides) -> Theme {
        for (style, over) in [
            (&mut self.snake, &overrides.snake),
            (&mut self.collision, &overrides.collision),
            (&mut self.food, &overrides.food),
            (&mut self.hurdle, &overrides.hurdle),
            (&mut self.border, &overrides.border),
            (&mut self.status_bar, &overrides.status_bar),
            (&mut self.key, &overrides.key),
            (&mut self.selection, &overrides.selection),
        ] {
            if let Some(over) = over {
                *style = style.patch(Style::from(over.clone()));
            }
        }
        self
    }
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::new(ThemeName::default())
    }
}

/// Style overrides read from the `[styles]` table of the configuration file,
/// e.g., `snake = "bold magenta"`
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct StyleOverrides {
    pub(crate) snake: Option<parse_style::Style>,
    pub(crate) collision: Option<parse_style::Style>,
    pub(crate) food: Option<parse_style::Style>,
    pub(crate) hurdle: Option<parse_style::Style>,
    pub(crate) border: Option<parse_style::Style>,
    pub(crate) status_bar: Option<parse_style::Style>,
    pub(crate) key: Option<parse_style::Style>,
    pub(crate) selection: Option<parse_style::Style>,
}
