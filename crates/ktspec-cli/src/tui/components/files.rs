//! Open file list component.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem},
};

use crate::tui::app::{App, Focus};

/// Render the list of open files.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let border_style = if app.focus == Focus::Files {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Files ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.open_files.is_empty() {
        let hint = if app.explorer.is_indexing() {
            " Scanning..."
        } else {
            " No spec files"
        };
        frame.render_widget(
            List::new([ListItem::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))]),
            inner_area,
        );
        return;
    }

    let active = app.explorer.selected_file();
    let items: Vec<ListItem> = (0..app.open_files.len())
        .map(|i| {
            let is_active = active == Some(app.open_files[i].as_path());
            let (icon, icon_style) = if is_active {
                ("●", Style::default().fg(Color::Green))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            let label_style = if i == app.file_cursor && app.focus == Focus::Files {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", icon), icon_style),
                Span::styled(app.file_label(i), label_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner_area);
}
