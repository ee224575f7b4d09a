//! Last run request.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::tui::app::App;

/// Render the command line of the last run request.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Run ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = match &app.last_request {
        Some((request, command)) => Text::from(vec![
            Line::from(vec![
                Span::styled(
                    format!("{} ", request.mode),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(request.name(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(command.to_string(), Style::default().fg(Color::Cyan))),
        ]),
        None => Text::from(Span::styled(
            "Select a spec or test and press r, d or c",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
