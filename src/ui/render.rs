//! Screen layout: header with actions, three tier panels, status line, and
//! an optional modal notice on top.

use super::state::{AppState, Notice};
use crate::models::ImportanceTier;
use crate::utils::{DISPLAY_WIDTH, truncate_for_display};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

const ACCENT: Color = Color::Rgb(0x11, 0x18, 0x27);
const MUTED: Color = Color::Rgb(0x6B, 0x72, 0x80);

pub fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], state);
    for (i, tier) in ImportanceTier::ALL.into_iter().enumerate() {
        draw_panel(f, chunks[i + 1], state, i, tier);
    }
    draw_status(f, chunks[4], state);

    if let Some(notice) = &state.notice {
        draw_notice(f, notice);
    }
}

fn action(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let style = if enabled {
        Style::default().fg(Color::White).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED).add_modifier(Modifier::DIM)
    };
    vec![
        Span::styled(format!(" [{key}] {label} "), style),
        Span::raw("  "),
    ]
}

fn draw_header(f: &mut Frame, area: Rect, state: &AppState) {
    let mut actions = action("s", "Scrape Headlines", state.can_scrape());
    actions.extend(action("e", "Convert to Excel", state.can_export()));
    actions.extend(action("q", "Quit", true));

    let lines = vec![
        Line::from(Span::styled(
            "Scraperly News 🔥",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Grouped by Importance Level | Select a headline and open corresponding news site",
            Style::default().fg(MUTED),
        )),
        Line::from(""),
        Line::from(actions),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_panel(f: &mut Frame, area: Rect, state: &AppState, index: usize, tier: ImportanceTier) {
    let focused = state.focus == index;
    let (r, g, b) = tier.rgb();
    let tier_color = Color::Rgb(r, g, b);
    let rows_in_group = &state.groups[index];

    let border_style = if focused {
        Style::default().fg(tier_color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    };
    let visit_style = if state.can_visit(index) && focused {
        Style::default().fg(tier_color)
    } else {
        Style::default().fg(MUTED).add_modifier(Modifier::DIM)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} {} Importance ({}) ", tier.glyph(), tier.label(), rows_in_group.len()),
            Style::default().fg(tier_color).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(Span::styled(" [Enter] Go to the website ", visit_style)).alignment(Alignment::Right),
        );

    let rows = rows_in_group.iter().map(|h| {
        Row::new(vec![
            Cell::from(h.source.clone()),
            Cell::from(truncate_for_display(&h.text, DISPLAY_WIDTH)),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(20)])
        .header(
            Row::new(vec!["Source", "Headline"]).style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        )
        .block(block)
        .row_highlight_style(Style::default().bg(tier_color).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(state.selected[index]);
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(state.title(), Style::default().fg(ACCENT))];
    if state.failed_sites > 0 {
        spans.push(Span::styled(
            format!("  ({} sites unreachable)", state.failed_sites),
            Style::default().fg(MUTED),
        ));
    }
    spans.push(Span::styled(
        "   Tab: switch panel  ↑/↓: select",
        Style::default().fg(MUTED),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_notice(f: &mut Frame, notice: &Notice) {
    let full = f.area();
    let width = full.width.saturating_sub(10).min(60);
    let height = full.height.saturating_sub(6).min(8);
    let area = Rect {
        x: full.width.saturating_sub(width) / 2,
        y: full.height.saturating_sub(height) / 2,
        width,
        height,
    };

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            format!(" {} ", notice.title),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .title_bottom(Line::from(" [Enter] OK ").alignment(Alignment::Center));
    let body = Paragraph::new(notice.body.as_str())
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    f.render_widget(body, area);
}
