use crate::command::Command;
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    symbols,
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;

/// A pop-up reporting a failure and its chain of causes
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Warning {
    /// The message and its causes, already wrapped to `TEXT_WIDTH`
    lines: Vec<String>,
    /// Index of the first line shown
    scroll_offset: usize,
}

impl Warning {
    /// Most lines of text shown at once; longer reports scroll
    const MAX_LINES: u16 = 16;
    const TEXT_WIDTH: u16 = 48;
    const WIDTH: u16 = Self::TEXT_WIDTH + 4;

    /// React to a command while the pop-up is shown.  Returns `Some` once the
    /// pop-up should go away.
    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<WarningOutcome> {
        match cmd {
            Command::Enter | Command::Esc => Some(WarningOutcome::Dismissed),
            Command::Q | Command::Quit => Some(WarningOutcome::Quit),
            Command::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            Command::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1).min(self.last_offset());
                None
            }
            _ => None,
        }
    }

    fn scrolling(&self) -> bool {
        self.last_offset() > 0
    }

    /// The largest scroll offset that still fills the text area
    fn last_offset(&self) -> usize {
        self.lines.len().saturating_sub(usize::from(Self::MAX_LINES))
    }

    fn visible_lines(&self) -> Text<'_> {
        self.lines
            .iter()
            .skip(self.scroll_offset)
            .take(usize::from(Self::MAX_LINES))
            .map(String::as_str)
            .collect()
    }

    /// Size of the whole pop-up, border included
    fn popup_size(&self) -> Size {
        let text_height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .min(Self::MAX_LINES);
        let scrollbar_width = if self.scrolling() { 2 } else { 0 };
        Size {
            width: Self::WIDTH + scrollbar_width,
            // border, blank line & "[OK]"
            height: text_height.saturating_add(4),
        }
    }

    fn push_wrapped(lines: &mut Vec<String>, msg: &str, initial: &str, subsequent: &str) {
        let opts = textwrap::Options::new(usize::from(Self::TEXT_WIDTH))
            .break_words(true)
            .initial_indent(initial)
            .subsequent_indent(subsequent);
        lines.extend(textwrap::wrap(msg, opts).into_iter().map(Cow::into_owned));
    }

    /// Lay out an error message followed by its causes, if any.  A lone
    /// cause is indented; two or more are numbered.
    fn from_error_messages(msgs: Vec<String>) -> Self {
        let mut msgs = msgs.into_iter();
        let mut lines = Vec::new();
        match msgs.next() {
            Some(first) => Warning::push_wrapped(&mut lines, &first, "", ""),
            None => lines.push(String::from("Something went wrong.")),
        }
        let causes = msgs.collect::<Vec<_>>();
        if !causes.is_empty() {
            lines.extend([String::new(), String::from("Caused by:")]);
        }
        if let [cause] = causes.as_slice() {
            Warning::push_wrapped(&mut lines, cause, "    ", "    ");
        } else {
            for (i, cause) in causes.iter().enumerate() {
                Warning::push_wrapped(&mut lines, cause, &format!("{i:>5}: "), "       ");
            }
        }
        Warning {
            lines,
            scroll_offset: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WarningOutcome {
    Dismissed,
    Quit,
}

impl<E: std::error::Error> From<E> for Warning {
    fn from(e: E) -> Warning {
        let mut msgs = vec![e.to_string()];
        let mut cause = e.source();
        while let Some(c) = cause {
            msgs.push(c.to_string());
            cause = c.source();
        }
        Warning::from_error_messages(msgs)
    }
}

impl Widget for &Warning {
    /// Draw the pop-up centered over `area`, which is the whole window
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = center_rect(area, self.popup_size());
        let block = Block::bordered()
            .title(" WARNING ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, ok_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
            .flex(Flex::Start)
            .spacing(1)
            .areas(block.inner(popup));
        Clear.render(popup, buf);
        block.render(popup, buf);
        if self.scrolling() {
            let [text_area, bar_area] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)])
                    .flex(Flex::Start)
                    .spacing(1)
                    .areas(text_area);
            self.visible_lines().render(text_area, buf);
            let mut state =
                ScrollbarState::new(self.last_offset() + 1).position(self.scroll_offset);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(symbols::shade::MEDIUM))
                .render(bar_area, buf, &mut state);
        } else {
            self.visible_lines().render(text_area, buf);
        }
        Line::from("[OK]").centered().render(ok_area, buf);
    }
}
