//! Toolbar with the run actions.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs as RataTabs},
};

use ktspec_core::RunMode;

use crate::tui::app::App;

/// Render the toolbar.
///
/// Actions are only highlighted while the selection can be run.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<String> = RunMode::ALL
        .iter()
        .map(|mode| {
            let key = mode.name().chars().next().unwrap_or(' ').to_ascii_lowercase();
            format!("[{}] {}", key, mode.name())
        })
        .collect();

    let runnable = app.explorer.run_selected(RunMode::Run).is_some();
    let selected = app
        .last_request
        .as_ref()
        .and_then(|(request, _)| RunMode::ALL.iter().position(|m| *m == request.mode));

    let title = if app.explorer.is_indexing() {
        " ktspec (indexing) "
    } else {
        " ktspec "
    };

    let mut tabs = RataTabs::new(titles)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .style(Style::default().fg(if runnable { Color::White } else { Color::DarkGray }))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" | ");
    if let Some(index) = selected {
        tabs = tabs.select(index);
    }

    frame.render_widget(tabs, area);
}
