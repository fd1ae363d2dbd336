//! Plain-text renderings of saved sessions for the non-interactive commands.

use chrono::{DateTime, Local, Utc};
use itertools::Itertools;
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use crate::scoring::Session;
use crate::ui::charting::scaled_bar;
use crate::util::{date_time, long_date, to_fixed};

const HISTOGRAM_WIDTH: usize = 30;

/// `Compound/50m/72箭`
pub fn shape_label(session: &Session) -> String {
    format!(
        "{}/{}/{}箭",
        session.config.bow_type,
        session.config.distance,
        session.config.arrow_count()
    )
}

/// `3 days ago` style age of a session
pub fn age(session: &Session, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(session.created_at);
    let secs = u64::try_from(elapsed.num_seconds()).unwrap_or(0);
    HumanTime::from(std::time::Duration::from_secs(secs)).to_text_en(Accuracy::Rough, Tense::Past)
}

/// One line per session, newest first is up to the caller
pub fn list_line(session: &Session, now: DateTime<Utc>) -> String {
    let created = session.created_at.with_timezone(&Local);
    format!(
        "{:<16} {:>5}  {} {} ({})",
        session.id,
        session.total_score,
        pad_to(&shape_label(session), 22),
        long_date(&created),
        age(session, now)
    )
}

/// Result view as text: summary, histogram, per-set grid and notes
pub fn session_report(session: &Session) -> String {
    let config = &session.config;
    let created = session.created_at.with_timezone(&Local);
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}  {}组  {}支/组\n",
        config.bow_type, config.distance, config.set_count, config.arrows_per_set
    ));
    out.push_str(&format!(
        "{} / {}\n",
        session.total_score,
        to_fixed(session.average_score, 2)
    ));
    out.push_str(&format!("{}\n\n", date_time(&created)));

    let dist = session.distribution();
    let max = dist.max_count();
    for (score, count) in dist.iter() {
        out.push_str(&format!(
            "{:>2} | {:<width$} {}\n",
            score.to_string(),
            scaled_bar(count, max, HISTOGRAM_WIDTH),
            count,
            width = HISTOGRAM_WIDTH
        ));
    }
    out.push('\n');

    for (idx, set) in session.sets.iter().enumerate() {
        let arrows = set.arrows.iter().map(|a| format!("{:>2}", a.to_string())).join(" ");
        out.push_str(&format!("{:>2}. {}  {:>3}\n", idx + 1, arrows, set.total));
    }

    let notes: Vec<String> = session
        .sets
        .iter()
        .enumerate()
        .filter(|(_, set)| !set.note.trim().is_empty())
        .map(|(idx, set)| format!("{:>2}. {}", idx + 1, set.note.trim()))
        .collect();
    if !notes.is_empty() {
        out.push('\n');
        for note in notes {
            out.push_str(&note);
            out.push('\n');
        }
    }
    out
}

/// Pad `s` to `width` terminal columns
pub fn pad_to(s: &str, width: usize) -> String {
    let used = s.width();
    if used >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{SessionEditor, SetDirection};
    use crate::scoring::{ArrowScore, ArrowsPerSet, BowType, Distance, SessionConfig, SetCount};
    use chrono::Duration;

    fn finished() -> Session {
        let config = SessionConfig {
            bow_type: BowType::Recurve,
            distance: Distance::M70,
            set_count: SetCount::from_choice(3).unwrap(),
            arrows_per_set: ArrowsPerSet::Three,
        };
        let mut e = SessionEditor::with_identity("s1", config, Utc::now());
        e.record_score(ArrowScore::X);
        e.record_score(ArrowScore::Ten);
        e.record_score(ArrowScore::Nine);
        e.set_note("  steady  ");
        e.navigate_set(SetDirection::Next);
        e.record_score(ArrowScore::Five);
        e.finalize()
    }

    #[test]
    fn report_has_summary_histogram_sets_and_notes() {
        let text = session_report(&finished());
        assert!(text.starts_with("Recurve  70m  3组  3支/组\n34 / 3.78\n"));
        assert!(text.contains(" X | "));
        assert!(text.contains(" M | ██████████████████████████████ 5\n"));
        assert!(text.contains(" 1.  X 10  9   29\n"));
        assert!(text.contains(" 2.  5  M  M    5\n"));
        assert!(text.contains(" 1. steady\n"));
    }

    #[test]
    fn list_line_shows_total_shape_and_age() {
        let session = finished();
        let line = list_line(&session, session.created_at + Duration::days(3));
        assert!(line.starts_with("s1"));
        assert!(line.contains("34"));
        assert!(line.contains("Recurve/70m/9箭"));
        assert!(line.contains("ago"));
    }

    #[test]
    fn pad_to_counts_wide_characters() {
        assert_eq!(pad_to("组", 4), "组  ");
        assert_eq!(pad_to("abc", 2), "abc");
    }
}
