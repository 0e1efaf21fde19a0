//! # Passage Component
//!
//! Renders the engine's visible lines. The engine has already wrapped and
//! scrolled them to the viewport, so this only styles: verse numbers are
//! dimmed, and the whole view is highlighted while text is selected.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::library::engine::PageView;
use crate::tui::component::Component;

pub struct Passage<'a> {
    pub view: &'a PageView,
}

impl<'a> Passage<'a> {
    pub fn new(view: &'a PageView) -> Self {
        Self { view }
    }

    fn line(&self, index: usize) -> Line<'a> {
        let view: &'a PageView = self.view;
        let line = &view.lines[index];
        let first_of_verse = index == 0
            || view
                .lines
                .get(index - 1)
                .is_some_and(|previous| previous.verse != line.verse);

        let number = line.verse.to_string();
        let numbered = first_of_verse
            && line
                .text
                .strip_prefix(number.as_str())
                .is_some_and(|rest| rest.starts_with(' '));

        if !numbered {
            return Line::from(line.text.as_str());
        }
        let split = number.len();
        Line::from(vec![
            Span::styled(
                &line.text[..split],
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(&line.text[split..]),
        ])
    }
}

impl Component for Passage<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = (0..self.view.lines.len()).map(|i| self.line(i)).collect();
        let style = if self.view.selecting {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(lines).style(style), area);
    }
}
