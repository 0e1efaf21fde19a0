//! # TitleBar Component
//!
//! Top status line showing the main screen's chrome.
//!
//! ## Conditional Formatting
//!
//! 1. **Changing page**: `"⠋ Loading... | Copied"`
//! 2. **Title visible**: `"King James Version | Genesis 1:3 | Copied"`
//! 3. **Nothing to show**: only the status message, if any
//!
//! TitleBar is purely presentational. It receives everything as props and
//! never reads the screen or the engine itself.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct TitleBar {
    pub document_title: String,
    pub page_title: String,
    pub title_visible: bool,
    pub progress_visible: bool,
    pub status_message: String,
    pub spinner_frame: usize,
}

impl TitleBar {
    /// The text that will be rendered, without styling.
    pub fn text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.progress_visible {
            let frame = SPINNER[self.spinner_frame % SPINNER.len()];
            parts.push(format!("{frame} Loading..."));
        } else if self.title_visible {
            parts.push(self.document_title.clone());
            parts.push(self.page_title.clone());
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = if self.progress_visible {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let line = Line::from(Span::styled(self.text(), style));
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn bar() -> TitleBar {
        TitleBar {
            document_title: "King James Version".to_string(),
            page_title: "Genesis 1:1".to_string(),
            title_visible: true,
            progress_visible: false,
            status_message: String::new(),
            spinner_frame: 0,
        }
    }

    #[test]
    fn test_titles_when_idle() {
        assert_eq!(bar().text(), "King James Version | Genesis 1:1");
    }

    #[test]
    fn test_progress_replaces_titles() {
        let mut title_bar = bar();
        title_bar.title_visible = false;
        title_bar.progress_visible = true;
        title_bar.spinner_frame = 11;
        assert_eq!(title_bar.text(), "⠙ Loading...");
    }

    #[test]
    fn test_status_is_appended() {
        let mut title_bar = bar();
        title_bar.status_message = "Copied".to_string();
        assert_eq!(title_bar.text(), "King James Version | Genesis 1:1 | Copied");

        title_bar.title_visible = false;
        assert_eq!(title_bar.text(), "Copied");
    }

    #[test]
    fn test_render_writes_titles() {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut title_bar = bar();

        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("King James Version"));
        assert!(text.contains("Genesis 1:1"));
    }
}
