use crate::consts;
use crate::options::{OptKey, OptValue, Options};
use crate::theme::Theme;
use crate::util::EnumExt;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo {
    pub(super) theme: Theme,
}

impl Logo {
    const HURDLE_WIDTH: u16 = 36;
    const WORD_GUTTER: u16 = 2;
    const SNAKE_WIDTH: u16 = 28;
    const SNAKE_BODY_LENGTH: u16 = 12;
    const GUTTER: u16 = 2;
    const TEXT_HEIGHT: u16 = 5;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = Self::HURDLE_WIDTH + Self::WORD_GUTTER + Self::SNAKE_WIDTH;

    #[rustfmt::skip]
    const HURDLE: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " _   _                   _  _       ",
         "| | | | _   _  _ __   __| || |  ___ ",
        r"| |_| || | | || '__| / _` || | / _ \",
         "|  _  || |_| || |   | (_| || ||  __/",
        r"|_| |_| \__,_||_|    \__,_||_| \___|",
    ];

    #[rustfmt::skip]
    const SNAKE: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____              _        ",
         "/ ___| _ __   __ _| | _____ ",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];

    fn fill(area: Rect, buf: &mut Buffer, symbol: char, style: Style) {
        for p in area.positions() {
            if let Some(cell) = buf.cell_mut(p) {
                cell.set_char(symbol);
                cell.set_style(style);
            }
        }
    }
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Start)
            .areas(area);
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        let [hurdle_area, snake_area] =
            Layout::horizontal([Self::HURDLE_WIDTH, Self::SNAKE_WIDTH])
                .flex(Flex::Start)
                .spacing(Self::WORD_GUTTER)
                .areas(words_area);
        Text::from_iter(Self::HURDLE)
            .style(self.theme.hurdle)
            .render(hurdle_area, buf);
        Text::from_iter(Self::SNAKE)
            .style(self.theme.snake)
            .render(snake_area, buf);
        // A snake heading for its food, with a hurdle behind
        let [body_area, head_area, _, food_area, _, hurdle_area] = Layout::horizontal([
            Constraint::Length(Self::SNAKE_BODY_LENGTH),
            Constraint::Length(1),
            Constraint::Length(Self::GUTTER),
            Constraint::Length(1),
            Constraint::Length(Self::GUTTER),
            Constraint::Length(consts::CELL_WIDTH),
        ])
        .flex(Flex::Center)
        .areas(diagram_area);
        Logo::fill(body_area, buf, consts::SNAKE_BODY_SYMBOL, self.theme.snake);
        Logo::fill(head_area, buf, consts::SNAKE_HEAD_EAST_SYMBOL, self.theme.snake);
        Logo::fill(food_area, buf, consts::FOOD_SYMBOL, self.theme.food);
        Logo::fill(hurdle_area, buf, consts::HURDLE_SYMBOL, self.theme.hurdle);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions {
    pub(super) theme: Theme,
}

impl Instructions {
    pub(super) const HEIGHT: u16 = 2;

    fn keys<'a>(&self, line: &mut Line<'a>, keys: [&'a str; 4]) {
        for (i, k) in keys.into_iter().enumerate() {
            if i > 0 {
                line.push_span(" ");
            }
            line.push_span(Span::styled(k, self.theme.key));
        }
    }
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut steer = Line::from("Steer with ");
        self.keys(&mut steer, ["←", "↓", "↑", "→"]);
        steer.push_span(" or ");
        self.keys(&mut steer, ["h", "j", "k", "l"]);
        steer.push_span(" or ");
        self.keys(&mut steer, ["a", "s", "w", "d"]);
        steer.push_span(".  Pause with ");
        steer.push_span(Span::styled("p", self.theme.key));
        steer.push_span(".");
        let text = Text::from_iter([
            steer,
            Line::from("Eat the food, jump no hurdles, and don't bite yourself!"),
        ])
        .centered();
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        text.render(area, buf);
    }
}

/// The box of adjustable options on the main menu
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct OptionsBox {
    pub(super) options: Options,
    /// The option with focus, if any
    pub(super) selection: Option<OptKey>,
    pub(super) theme: Theme,
}

impl OptionsBox {
    #[allow(clippy::cast_possible_truncation)]
    pub(super) const HEIGHT: u16 = (OptKey::LENGTH as u16) + 2 /* for border */;
    const HORIZONTAL_PADDING: u16 = 1; // padding on each side
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;
    pub(super) const WIDTH: u16 = 2 /* for border */ + 2 * Self::HORIZONTAL_PADDING + Self::POINTER_WIDTH + OptKey::DISPLAY_WIDTH + Self::LABEL_VALUE_GUTTER + OptValue::DISPLAY_WIDTH;
}

impl Widget for OptionsBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Options: ")
            .padding(Padding::horizontal(OptionsBox::HORIZONTAL_PADDING));
        let menu_area = block.inner(area);
        block.render(area, buf);
        for (key, row) in OptKey::iter().zip(menu_area.rows()) {
            let selected = Some(key) == self.selection;
            let style = if selected {
                self.theme.selection
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(OptionsBox::POINTER_WIDTH),
                lwidth = usize::from(OptKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(OptionsBox::LABEL_VALUE_GUTTER),
                value = self.options.get(key),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}
