// src/ui/modals.rs
// Module for rendering modal dialogs

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tree::ParentOption;

use super::state::{FormField, ModalState, NodeForm};
use super::{centered_rect, App};

pub fn draw_modal(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    match &app.state.modal {
        ModalState::None => {}
        ModalState::Error(msg) => draw_error(frame, area, msg),
        ModalState::ConfirmDelete {
            name, subtree_size, ..
        } => draw_confirm_delete(frame, area, name, *subtree_size),
        ModalState::Add {
            parent_name, form, ..
        } => draw_form(
            frame,
            area,
            " Tambah Unit ",
            form,
            parent_name.as_deref(),
            None,
        ),
        ModalState::Edit {
            form,
            parents,
            parent_idx,
            ..
        } => draw_form(
            frame,
            area,
            " Ubah Unit ",
            form,
            None,
            Some((parents, *parent_idx)),
        ),
    }
}

fn draw_error(frame: &mut ratatui::Frame<'_>, area: Rect, msg: &str) {
    let popup = centered_rect(60, 7, area);
    frame.render_widget(Clear, popup);
    let para = Paragraph::new(vec![
        Line::from(Span::styled(msg, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "tekan tombol apa saja",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Gagal ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(para, popup);
}

fn draw_confirm_delete(frame: &mut ratatui::Frame<'_>, area: Rect, name: &str, subtree_size: usize) {
    let popup = centered_rect(60, 7, area);
    frame.render_widget(Clear, popup);
    let para = Paragraph::new(vec![
        Line::from(format!("Hapus \"{}\"?", name)),
        Line::from(Span::styled(
            format!("Seluruh {} unit di bawahnya ikut terhapus.", subtree_size),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y: hapus   n/Esc: batal",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Konfirmasi ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(para, popup);
}

fn field_line<'a>(form: &NodeForm, field: FormField, value: String) -> Line<'a> {
    let focused = form.field == field;
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<18}", field.label()), label_style),
        Span::raw(value),
        Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])
}

fn draw_form(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    form: &NodeForm,
    parent_name: Option<&str>,
    parents: Option<(&Vec<ParentOption>, usize)>,
) {
    let popup = centered_rect(70, 16, area);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::new();
    if let Some(parent) = parent_name {
        lines.push(Line::from(vec![
            Span::styled("Induk: ", Style::default().fg(Color::Gray)),
            Span::styled(parent.to_string(), Style::default().fg(Color::Yellow)),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(field_line(form, FormField::Name, form.name.clone()));
    lines.push(field_line(form, FormField::Slug, form.slug.clone()));
    lines.push(field_line(form, FormField::UnitKerja, form.unit_kerja.clone()));
    lines.push(field_line(
        form,
        FormField::KelasJabatan,
        form.kelas_jabatan.clone(),
    ));
    lines.push(field_line(form, FormField::Bezetting, form.bezetting.clone()));
    lines.push(field_line(
        form,
        FormField::Kebutuhan,
        form.kebutuhan_pegawai.clone(),
    ));
    lines.push(field_line(
        form,
        FormField::Jenis,
        format!("< {} >", form.jenis_jabatan.label()),
    ));
    lines.push(field_line(
        form,
        FormField::IsPusat,
        format!("< {} >", if form.is_pusat { "Pusat" } else { "Daerah" }),
    ));
    if let Some((options, idx)) = parents {
        let label = options
            .get(idx)
            .map(|p| p.label.clone())
            .unwrap_or_else(|| "-".to_string());
        lines.push(field_line(form, FormField::Parent, format!("< {} >", label)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: simpan   Esc: batal   Tab: pindah kolom",
        Style::default().fg(Color::DarkGray),
    )));

    let para = Paragraph::new(lines).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(para, popup);
}
