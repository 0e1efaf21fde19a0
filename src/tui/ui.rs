use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::Chrome;
use crate::library::ReaderEngine;
use crate::tui::component::Component;
use crate::tui::components::{MenuPopup, Overlay, Passage, TitleBar};
use crate::tui::host::TuiState;

const KEY_HINTS: &str = "m Menu  c Verse  f Full screen  q Quit";

pub fn draw_ui(
    frame: &mut Frame,
    chrome: &Chrome,
    engine: &ReaderEngine,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    let area = frame.area();
    let passage_area = if chrome.full_screen {
        area
    } else {
        use Constraint::{Length, Min};
        let [title_area, passage_area, footer_area] =
            Layout::vertical([Length(1), Min(0), Length(1)]).areas(area);

        let mut title_bar = TitleBar {
            document_title: chrome.document_title.clone(),
            page_title: chrome.page_title.clone(),
            title_visible: chrome.title_visible,
            progress_visible: chrome.progress_visible,
            status_message: tui.status.clone(),
            spinner_frame,
        };
        title_bar.render(frame, title_area);
        draw_footer(frame, footer_area, chrome);
        passage_area
    };

    engine.set_viewport(passage_area.width as usize, passage_area.height as usize);
    let view = engine.page_view();
    Passage::new(&view).render(frame, passage_area);

    if let Some(menu) = tui.menu.as_mut() {
        MenuPopup::new(menu).render(frame, area);
    }
    if let Some(overlay) = tui.overlay.as_ref() {
        Overlay::new(overlay).render(frame, area);
    }
}

fn footer_text(chrome: &Chrome) -> String {
    if chrome.suggested_documents.is_empty() {
        return KEY_HINTS.to_string();
    }
    let ids: Vec<&str> = chrome
        .suggested_documents
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    format!("Also in: {} | {}", ids.join(", "), KEY_HINTS)
}

fn draw_footer(frame: &mut Frame, area: Rect, chrome: &Chrome) {
    let line = Line::from(Span::styled(
        footer_text(chrome),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(line, area);
}
