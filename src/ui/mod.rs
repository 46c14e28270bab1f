// src/ui/mod.rs

// Declare sub-modules for the terminal UI
pub mod app;
pub mod chart_pane;
pub mod modals;
pub mod search_panel;
pub mod state;
pub mod tree_pane;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub use app::App;

use crate::sync::status::SyncStatus;
use crate::ui::state::ModalState;

/// Render one frame: header, the two panes, status bar, then whatever
/// overlay is active on top.
pub fn draw(frame: &mut ratatui::Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    tree_pane::draw_tree(frame, panes[0], app);
    chart_pane::draw_chart(frame, panes[1], app);

    draw_status_bar(frame, chunks[2], app);

    if app.state.search_open {
        search_panel::draw_search(frame, frame.area(), app);
    }
    if !matches!(app.state.modal, ModalState::None) {
        modals::draw_modal(frame, frame.area(), app);
    }
}

fn draw_header(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let title = Span::styled(
        "PetaSync",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    );
    let mut spans = vec![
        title,
        Span::raw("  "),
        Span::styled(&app.config.api_base_url, Style::default().fg(Color::DarkGray)),
        Span::raw("  lingkup: "),
        Span::styled(app.state.scope.label(), Style::default().fg(Color::Yellow)),
    ];
    if app.state.loading {
        spans.push(Span::styled("  memuat...", Style::default().fg(Color::Gray)));
    }
    let mut lines = vec![Line::from(spans)];
    if let Some(err) = &app.state.last_error {
        lines.push(Line::from(Span::styled(
            format!("ERROR: {}", err),
            Style::default().fg(Color::Red),
        )));
    }
    let header = Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_status_bar(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let status_style = match &app.state.sync_status {
        SyncStatus::Error(_) => Style::default().fg(Color::Red),
        SyncStatus::Idle => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::Yellow),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.state.sync_status.label()),
            status_style.add_modifier(Modifier::REVERSED),
        ),
        Span::raw(
            "  q keluar | tab panel | / cari | a tambah | e ubah | d hapus | s lingkup | r muat ulang",
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Centered popup rectangle, clamped to the parent area.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
