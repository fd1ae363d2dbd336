pub mod charting;
pub mod list;
pub mod record;
pub mod results;
pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    app::App,
    scoring::{ArrowScore, ScoreTier},
};

pub(crate) const HORIZONTAL_MARGIN: u16 = 2;
pub(crate) const VERTICAL_MARGIN: u16 = 1;

/// Target face colours: gold, red, blue, black, and grey for the rest
pub fn tier_style(tier: ScoreTier) -> Style {
    match tier {
        ScoreTier::Gold => Style::default().bg(Color::Yellow).fg(Color::Black),
        ScoreTier::Red => Style::default().bg(Color::Red).fg(Color::White),
        ScoreTier::Blue => Style::default().bg(Color::Blue).fg(Color::White),
        ScoreTier::Black => Style::default().bg(Color::Black).fg(Color::White),
        ScoreTier::Neutral => Style::default().bg(Color::Gray).fg(Color::White),
    }
}

/// Style for an arrow already on the sheet; unshot arrows stay dim
pub fn arrow_style(arrow: ArrowScore) -> Style {
    if arrow.is_miss() {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        tier_style(arrow.tier())
    }
}

/// Arrow label padded to a fixed cell
pub fn arrow_cell(arrow: ArrowScore) -> String {
    format!("{:^4}", arrow.to_string())
}

pub fn help_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
}

/// Rect of the given percentage size centred in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
    render_overlays(app, f);
}

fn render_overlays(app: &App, f: &mut Frame) {
    let area = f.area();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    if let Some(text) = &app.export_preview {
        let popup = centered_rect(80, 70, area);
        let widget = Paragraph::new(text.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" export (any key closes) "),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(Clear, popup);
        f.render_widget(widget, popup);
        return;
    }

    if let Some(prompt) = &app.prompt {
        let popup = centered_rect(60, 20, area);
        let widget = Paragraph::new(Line::from(Span::styled(prompt.question(), bold_style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, popup);
        f.render_widget(widget, popup);
        return;
    }

    if let Some(status) = &app.status {
        if area.height == 0 {
            return;
        }
        let line = Rect {
            y: area.bottom() - 1,
            height: 1,
            ..area
        };
        let widget = Paragraph::new(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        f.render_widget(Clear, line);
        f.render_widget(widget, line);
    }
}
