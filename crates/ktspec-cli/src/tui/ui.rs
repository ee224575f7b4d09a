//! UI rendering for the TUI.

use ratatui::{prelude::*, widgets::Paragraph};

use super::app::{App, Focus};
use super::components::{files, request, toolbar, tree};

/// Render the entire UI.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: toolbar, content, run request, status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Toolbar
            Constraint::Min(10),   // Main content
            Constraint::Length(4), // Run request
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    toolbar::render(app, frame, chunks[0]);
    render_main_content(app, frame, chunks[1]);
    request::render(app, frame, chunks[2]);
    render_status_bar(app, frame, chunks[3]);
}

/// Render the main content area (files and tree side by side).
fn render_main_content(app: &App, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Files
            Constraint::Percentage(70), // Tree
        ])
        .split(area);

    files::render(app, frame, chunks[0]);
    tree::render(app, frame, chunks[1]);
}

/// Render the status bar.
fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let keys = match app.focus {
        Focus::Files => "[Enter] Open  [Tab] Tree  [j/k] Move  [q] Quit",
        Focus::Tree => "[Enter] Toggle  [r/d/c] Run  [e/x] Expand  [Tab] Files  [q] Quit",
    };

    let status = match &app.status_message {
        Some(message) => format!("{}  |  {}", keys, message),
        None => keys.to_string(),
    };

    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status_bar, area);
}
