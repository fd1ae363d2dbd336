use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    app::App,
    scoring::ArrowScore,
    ui::{arrow_cell, arrow_style, help_line, tier_style, HORIZONTAL_MARGIN, VERTICAL_MARGIN},
    util::to_fixed,
};

const KEYPAD_KEYS: [(char, ArrowScore); 12] = [
    ('x', ArrowScore::X),
    ('0', ArrowScore::Ten),
    ('9', ArrowScore::Nine),
    ('8', ArrowScore::Eight),
    ('7', ArrowScore::Seven),
    ('6', ArrowScore::Six),
    ('5', ArrowScore::Five),
    ('4', ArrowScore::Four),
    ('3', ArrowScore::Three),
    ('2', ArrowScore::Two),
    ('1', ArrowScore::One),
    ('m', ArrowScore::M),
];

pub fn render_record(app: &App, f: &mut Frame) {
    let Some(editor) = app.editor.as_ref() else {
        return;
    };
    let session = editor.session();
    let config = editor.config();
    let set = editor.current_set();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let cursor_style = Style::default()
        .bg(Color::Magenta)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // total
            Constraint::Length(3), // config selectors
            Constraint::Length(3), // arrow row
            Constraint::Length(3), // note
            Constraint::Length(1), // set navigation
            Constraint::Length(4), // keypad
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        format!(
            "Total: {}   Avg: {}",
            session.total_score,
            to_fixed(session.average_score, 2)
        ),
        bold_style,
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let selector = |key: &str, label: String| {
        vec![
            Span::styled(format!("[{key}] "), dim_style),
            Span::styled(label, bold_style),
            Span::raw("    "),
        ]
    };
    let selectors: Vec<Span> = [
        selector("b", config.bow_type.to_string()),
        selector("d", config.distance.to_string()),
        selector("s", format!("{}组", config.set_count)),
        selector("a", format!("{}支/组", config.arrows_per_set)),
    ]
    .concat();
    let config_widget = Paragraph::new(Line::from(selectors))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" config "));
    f.render_widget(config_widget, chunks[1]);

    let mut arrow_spans = vec![Span::styled(
        format!("{}. ", editor.current_set_index() + 1),
        bold_style,
    )];
    for (idx, arrow) in set.arrows.iter().enumerate() {
        let style = if idx == editor.selected_arrow_index() {
            cursor_style
        } else {
            arrow_style(*arrow)
        };
        let label = if arrow.is_miss() && idx != editor.selected_arrow_index() {
            "  · ".to_string()
        } else {
            arrow_cell(*arrow)
        };
        arrow_spans.push(Span::styled(label, style));
        arrow_spans.push(Span::raw(" "));
    }
    arrow_spans.push(Span::styled(format!(" = {}", set.total), bold_style));
    let arrows_widget = Paragraph::new(Line::from(arrow_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(arrows_widget, chunks[2]);

    let (note_text, note_border) = if app.note_mode {
        (format!("{}_", set.note), Style::default().fg(Color::Yellow))
    } else if set.note.is_empty() {
        ("press n to add a note".to_string(), dim_style)
    } else {
        (set.note.clone(), Style::default())
    };
    let note_widget = Paragraph::new(note_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(note_border)
            .title(" note "),
    );
    f.render_widget(note_widget, chunks[3]);

    let set_count = session.sets.len();
    let at_first = editor.current_set_index() == 0;
    let at_last = editor.current_set_index() + 1 == set_count;
    let nav = Line::from(vec![
        Span::styled("◀ prev", if at_first { dim_style } else { bold_style }),
        Span::raw(format!(
            "     {} / {}     ",
            editor.current_set_index() + 1,
            set_count
        )),
        Span::styled("next ▶", if at_last { dim_style } else { bold_style }),
    ]);
    f.render_widget(Paragraph::new(nav).alignment(Alignment::Center), chunks[4]);

    let keypad_rows: Vec<Line> = KEYPAD_KEYS
        .chunks(6)
        .flat_map(|row| {
            let keys: Vec<Span> = row
                .iter()
                .flat_map(|(_, score)| {
                    [
                        Span::styled(format!("{:^6}", score.to_string()), tier_style(score.tier())),
                        Span::raw(" "),
                    ]
                })
                .collect();
            let hints: Vec<Span> = row
                .iter()
                .flat_map(|(key, _)| [Span::styled(format!("{key:^6}"), dim_style), Span::raw(" ")])
                .collect();
            [Line::from(keys), Line::from(hints)]
        })
        .collect();
    f.render_widget(
        Paragraph::new(keypad_rows).alignment(Alignment::Center),
        chunks[5],
    );

    let help = if app.note_mode {
        "typing edits the note   Enter/Esc done"
    } else {
        "Enter save   f finish early   c clear set   ⌫ delete arrow   n note   ↑↓ set   ←→ arrow   Esc discard"
    };
    f.render_widget(help_line(help), chunks[7]);
}
