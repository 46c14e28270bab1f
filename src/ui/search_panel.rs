// src/ui/search_panel.rs

//! Search overlay: query line plus the first page of hits.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use super::{centered_rect, App};

pub fn draw_search(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let popup = centered_rect(area.width.saturating_sub(10).min(90), 20, area);
    frame.render_widget(Clear, popup);

    let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.state.search_query.clone()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))];

    for (idx, hit) in app.state.search_results.iter().enumerate() {
        let style = if idx == app.state.search_selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(hit.name.clone(), style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", hit.path),
                style.fg(if idx == app.state.search_selected {
                    Color::Black
                } else {
                    Color::DarkGray
                }),
            ),
        ])));
    }

    let block = Block::default()
        .title(" Cari Jabatan (Enter: buka, Esc: tutup) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let list = List::new(items).block(block);
    // Offset by one for the query line.
    let mut state = ListState::default().with_selected(Some(app.state.search_selected + 1));
    frame.render_stateful_widget(list, popup, &mut state);
}
