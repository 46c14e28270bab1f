// src/ui/tree_pane.rs

//! Left pane: the navigable hierarchy tree.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use super::state::Pane;
use super::App;

pub fn draw_tree(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let rows = app.state.visible_rows();

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let indent = "  ".repeat(row.depth);

            let connector = if row.depth == 0 {
                ""
            } else if row.last_sibling {
                "└─ "
            } else {
                "├─ "
            };

            // Fold indicator for expandable nodes
            let fold = if row.has_children {
                if row.collapsed { "▶ " } else { "▼ " }
            } else {
                "  "
            };

            let style = if idx == app.state.selected && app.state.focus == Pane::Tree {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if idx == app.state.selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(Span::styled(
                format!("{}{}{}{}", indent, connector, fold, row.name),
                style,
            )))
        })
        .collect();

    let border_style = if app.state.focus == Pane::Tree {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" Struktur ({}) ", rows.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let list = List::new(items).block(block);
    let mut list_state = ListState::default().with_selected(Some(app.state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
