use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::{
    app::App,
    scoring::ArrowScore,
    ui::{arrow_cell, arrow_style, charting::histogram_data, help_line, tier_style},
    ui::{HORIZONTAL_MARGIN, VERTICAL_MARGIN},
    util::{date_time, to_fixed},
};

pub fn render_results(app: &App, f: &mut Frame) {
    let Some(session) = app.viewing.as_ref() else {
        return;
    };
    let config = &session.config;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let notes: Vec<Line> = session
        .sets
        .iter()
        .enumerate()
        .filter(|(_, set)| !set.note.trim().is_empty())
        .map(|(idx, set)| {
            Line::from(vec![
                Span::styled(format!("{}. ", idx + 1), bold_style),
                Span::raw(set.note.trim().to_string()),
            ])
        })
        .collect();
    let notes_height = if notes.is_empty() {
        0
    } else {
        notes.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(5),            // summary
            Constraint::Length(10),           // histogram
            Constraint::Min(3),               // per-set grid
            Constraint::Length(notes_height), // notes
            Constraint::Length(1),            // help
        ])
        .split(f.area());

    let created = session.created_at.with_timezone(&Local);
    let summary = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "{}   {}   {}组   {}支/组",
                config.bow_type, config.distance, config.set_count, config.arrows_per_set
            ),
            bold_style,
        )),
        Line::from(Span::styled(
            format!(
                "{} / {}",
                session.total_score,
                to_fixed(session.average_score, 2)
            ),
            bold_style,
        )),
        Line::from(Span::styled(date_time(&created), dim_style)),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" result "));
    f.render_widget(summary, chunks[0]);

    let dist = session.distribution();
    let bars: Vec<Bar> = histogram_data(&dist)
        .into_iter()
        .zip(ArrowScore::ALL)
        .map(|((label, count), score)| {
            Bar::default()
                .value(count)
                .label(Line::from(label))
                .style(tier_style(score.tier()))
                .value_style(bold_style)
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" distribution "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .max(u64::from(dist.max_count().max(1)));
    f.render_widget(chart, chunks[1]);

    let arrows_per_set = session
        .sets
        .iter()
        .map(|s| s.arrows.len())
        .max()
        .unwrap_or(0);
    let rows: Vec<Row> = session
        .sets
        .iter()
        .enumerate()
        .map(|(idx, set)| {
            let mut cells = vec![Cell::from(Span::styled(format!("{}.", idx + 1), bold_style))];
            cells.extend(
                set.arrows
                    .iter()
                    .map(|a| Cell::from(Span::styled(arrow_cell(*a), arrow_style(*a)))),
            );
            cells.push(Cell::from(Span::styled(set.total.to_string(), bold_style)));
            Row::new(cells)
        })
        .collect();
    let widths = std::iter::once(Constraint::Length(4))
        .chain(std::iter::repeat(Constraint::Length(4)).take(arrows_per_set))
        .chain(std::iter::once(Constraint::Length(5)));
    let table = Table::new(rows, widths)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL).title(" sets "));
    f.render_widget(table, chunks[2]);

    if !notes.is_empty() {
        let notes_widget =
            Paragraph::new(notes).block(Block::default().borders(Borders::ALL).title(" notes "));
        f.render_widget(notes_widget, chunks[3]);
    }

    f.render_widget(
        help_line("e export   d delete   Esc back to list   q quit"),
        chunks[4],
    );
}
