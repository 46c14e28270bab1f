// src/ui/chart_pane.rs

//! Right pane: the depth-aligned org chart.
//!
//! Ghost entries render as dim vertical spacers so sibling boxes of the
//! same tier line up at the same depth, the way the printed chart does.
//! The pane shares the expansion state with the tree: a collapsed unit
//! hides its whole subtree, spacers included.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use super::state::{ChartLine, Pane};
use super::App;

pub fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let chart_lines = app.state.chart_lines();
    let total = chart_lines.len();

    let items: Vec<ListItem> = chart_lines.iter().map(render_line).collect();

    let focused = app.state.focus == Pane::Chart;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if app.state.chart_filter_editing {
        format!(" Peta Jabatan | saring: {}_ ", app.state.chart_query)
    } else if !app.state.chart_query.is_empty() {
        format!(" Peta Jabatan | saring: {} ", app.state.chart_query)
    } else {
        format!(" Peta Jabatan ({}) ", total)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let highlight = if focused {
        Style::default().bg(Color::Cyan).fg(Color::Black)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut list_state = ListState::default().with_selected(if total == 0 {
        None
    } else {
        Some(app.state.chart_selected.min(total - 1))
    });
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_line<'a>(line: &ChartLine<'a>) -> ListItem<'a> {
    match line {
        ChartLine::Spacer { depth } => ListItem::new(Line::from(Span::styled(
            format!("{}│", "  ".repeat(*depth)),
            Style::default().fg(Color::DarkGray),
        ))),
        ChartLine::Unit {
            unit,
            depth,
            collapsed,
        } => {
            let indent = "  ".repeat(*depth);
            let fold = if unit.has_children() {
                if *collapsed {
                    "▶ "
                } else {
                    "▼ "
                }
            } else {
                "  "
            };
            let selisih = unit.selisih();
            let selisih_style = if selisih < 0 {
                Style::default().fg(Color::Red)
            } else if selisih > 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            let mut spans = vec![
                Span::raw(indent),
                Span::raw(fold),
                Span::styled(
                    unit.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  [{}]", unit.tier.label()),
                    Style::default().fg(Color::Blue),
                ),
            ];
            if let Some(kelas) = &unit.kelas_jabatan {
                spans.push(Span::styled(
                    format!("  kls {}", kelas),
                    Style::default().fg(Color::Magenta),
                ));
            }
            spans.push(Span::raw(format!(
                "  B/K {}/{}",
                unit.bezetting.unwrap_or(0),
                unit.kebutuhan_pegawai.unwrap_or(0)
            )));
            spans.push(Span::styled(format!("  {:+}", selisih), selisih_style));
            ListItem::new(Line::from(spans))
        }
    }
}
