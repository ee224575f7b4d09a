//! Spec tree component.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};

use ktspec_core::NodeKind;

use crate::tui::app::{App, Focus};

/// Render the spec tree of the selected file.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let border_style = if app.focus == Focus::Tree {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Kotest ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    let tree = app.explorer.tree();
    if tree.is_empty() {
        let hint = if app.explorer.is_indexing() {
            " Waiting for indexing to finish..."
        } else {
            " No specs in this file"
        };
        let list = List::new([ListItem::new(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        ))])
        .block(block);
        frame.render_widget(list, area);
        return;
    }

    let items: Vec<ListItem> = tree
        .visible_rows()
        .iter()
        .map(|row| {
            let marker = match (row.has_children(), row.node.expanded) {
                (false, _) => "  ",
                (true, true) => "▾ ",
                (true, false) => "▸ ",
            };
            let style = match &row.node.kind {
                NodeKind::File { .. } => Style::default().fg(Color::Cyan),
                NodeKind::Module { .. } => Style::default().fg(Color::Blue),
                NodeKind::Spec { .. } => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                NodeKind::Test { test, .. } if test.disabled => Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
                NodeKind::Test { .. } => Style::default().fg(Color::White),
            };

            ListItem::new(Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::styled(row.node.label(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(tree.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}
