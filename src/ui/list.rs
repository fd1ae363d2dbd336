use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::{
    app::App,
    report::{age, pad_to, shape_label},
    ui::{help_line, HORIZONTAL_MARGIN, VERTICAL_MARGIN},
    util::long_date,
};

pub fn render_list(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let block = Block::default().borders(Borders::ALL).title(" sessions ");

    if app.sessions.is_empty() {
        let empty = Paragraph::new("No sessions yet. Press r to start recording.")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let now = Utc::now();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let items: Vec<ListItem> = app
            .sessions
            .iter()
            .map(|session| {
                let created = session.created_at.with_timezone(&Local);
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>5}  ", session.total_score), bold_style),
                    Span::raw(pad_to(&shape_label(session), 24)),
                    Span::raw(pad_to(&long_date(&created), 16)),
                    Span::styled(age(session, now), dim_style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Magenta).fg(Color::White))
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(app.selected));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    f.render_widget(
        help_line("r record   Enter view   ↑↓ select   q quit"),
        chunks[1],
    );
}
