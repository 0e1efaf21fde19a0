//! # Secondary Overlay Component
//!
//! Stand-in for the secondary interactions the main screen launches
//! (document chooser, settings, notes, search...). Each overlay shows a few
//! lines of context and an optional list of choices.
//!
//! Enter finishes the interaction with `ResultCode::Ok` and the highlighted
//! choice; Esc finishes it with `ResultCode::Canceled`. Either way the
//! result goes back to the main screen.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::collaborators::LaunchRequest;
use crate::core::result::ResultCode;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// A pickable row: what is shown and what is reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Emitted when the interaction is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayResult {
    pub result: ResultCode,
    pub choice: Option<String>,
}

pub struct OverlayState {
    pub request: LaunchRequest,
    pub title: String,
    pub body: Vec<String>,
    pub choices: Vec<Choice>,
    pub selected: usize,
}

impl OverlayState {
    pub fn new(request: LaunchRequest, title: &str) -> Self {
        Self {
            request,
            title: title.to_string(),
            body: Vec::new(),
            choices: Vec::new(),
            selected: 0,
        }
    }

    pub fn with_body(mut self, lines: Vec<String>) -> Self {
        self.body = lines;
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    fn finish(&self, result: ResultCode) -> OverlayResult {
        let choice = match result {
            ResultCode::Ok => self.choices.get(self.selected).map(|c| c.value.clone()),
            _ => None,
        };
        OverlayResult { result, choice }
    }
}

impl EventHandler for OverlayState {
    type Event = OverlayResult;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<OverlayResult> {
        match event {
            TuiEvent::Escape => Some(self.finish(ResultCode::Canceled)),
            TuiEvent::Submit => Some(self.finish(ResultCode::Ok)),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if !self.choices.is_empty() {
                    self.selected = (self.selected + 1).min(self.choices.len() - 1);
                }
                None
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the overlay.
pub struct Overlay<'a> {
    state: &'a OverlayState,
}

impl<'a> Overlay<'a> {
    pub fn new(state: &'a OverlayState) -> Self {
        Self { state }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let help_text = if self.state.choices.is_empty() {
            " Enter OK  Esc Back "
        } else {
            " ↑↓ Select  Enter OK  Esc Back "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.state.title))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        let inner_width = overlay.width.saturating_sub(4) as usize;
        let mut lines: Vec<Line> = self
            .state
            .body
            .iter()
            .map(|text| Line::styled(text.as_str(), Style::default().fg(Color::Gray)))
            .collect();
        if !self.state.body.is_empty() && !self.state.choices.is_empty() {
            lines.push(Line::raw(""));
        }
        for (i, choice) in self.state.choices.iter().enumerate() {
            let label = truncate_to_width(&choice.label, inner_width.saturating_sub(2));
            let style = if i == self.state.selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::styled(format!("  {label}"), style));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, overlay);
    }
}

/// Truncate to fit within `max_width` display columns, adding "..." if needed.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collaborators::LaunchTarget;
    use crate::core::result::RequestCode;

    fn chooser() -> OverlayState {
        OverlayState::new(
            LaunchRequest::new(LaunchTarget::ChooseDocument, RequestCode::Standard),
            "Choose document",
        )
        .with_choices(vec![
            Choice::new("King James Version", "KJV"),
            Choice::new("Matthew Henry Concise", "MHC"),
        ])
    }

    #[test]
    fn test_enter_reports_selected_choice() {
        let mut overlay = chooser();
        overlay.handle_event(&TuiEvent::CursorDown);
        overlay.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            overlay.handle_event(&TuiEvent::Submit),
            Some(OverlayResult {
                result: ResultCode::Ok,
                choice: Some("MHC".to_string()),
            })
        );
    }

    #[test]
    fn test_escape_cancels_without_choice() {
        let mut overlay = chooser();
        assert_eq!(
            overlay.handle_event(&TuiEvent::Escape),
            Some(OverlayResult {
                result: ResultCode::Canceled,
                choice: None,
            })
        );
    }

    #[test]
    fn test_other_keys_are_swallowed() {
        let mut overlay = chooser();
        assert_eq!(overlay.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(overlay.handle_event(&TuiEvent::PageDown), None);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Psalm 23", 20), "Psalm 23");
        assert_eq!(truncate_to_width("The Pilgrim's Progress", 10), "The Pil...");
        assert_eq!(truncate_to_width("abcdef", 2), "..");
    }
}
