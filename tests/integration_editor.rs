use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use quiver::editor::{SessionEditor, SetDirection};
use quiver::error::QuiverError;
use quiver::scoring::{
    distribution, format_for_export_in, set_total, ArrowScore, ArrowsPerSet, BowType, Distance,
    Session, SessionConfig, SetCount,
};

fn config(sets: usize, arrows: ArrowsPerSet) -> SessionConfig {
    SessionConfig {
        bow_type: BowType::Compound,
        distance: Distance::M50,
        set_count: SetCount::from_choice(sets).unwrap(),
        arrows_per_set: arrows,
    }
}

fn assert_consistent(s: &Session) {
    for set in &s.sets {
        assert_eq!(set.total, set_total(&set.arrows));
    }
    let sum: u32 = s.sets.iter().map(|set| set.total).sum();
    assert_eq!(s.total_score, sum);
    let arrows = s.config.set_count.get() * s.config.arrows_per_set.get();
    assert_eq!(s.average_score, sum as f64 / arrows as f64);
}

#[test]
fn three_set_session_totals_and_export() {
    let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    let mut e = SessionEditor::with_identity("ex", config(3, ArrowsPerSet::Three), created);
    for a in [ArrowScore::Ten, ArrowScore::Nine, ArrowScore::X] {
        e.record_score(a);
    }
    e.navigate_set(SetDirection::Next);
    for _ in 0..3 {
        e.record_score(ArrowScore::M);
    }

    let s = e.finalize();
    assert_eq!(s.total_score, 29);
    assert_eq!(
        s.sets.iter().map(|set| set.total).collect::<Vec<_>>(),
        vec![29, 0, 0]
    );

    let text = format_for_export_in(&s, &Utc);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Compound - 50m - 3组 - 3支/组");
    assert_eq!(lines[1], "29 - 3.22");
    assert_eq!(lines[2], "2025/6/1");
    assert_eq!(lines[3], "1 - 10 9 X - 29 - ");
    assert_eq!(lines[5], "3 - M M M - 0 - ");

    let dist = distribution(&s);
    assert_eq!(dist.get(ArrowScore::M), 6);
    assert_eq!(dist.get(ArrowScore::X), 1);
}

#[test]
fn totals_stay_consistent_through_every_edit() {
    let mut e = SessionEditor::new(config(4, ArrowsPerSet::Six));
    let scores = [
        ArrowScore::X,
        ArrowScore::Seven,
        ArrowScore::One,
        ArrowScore::M,
        ArrowScore::Ten,
        ArrowScore::Four,
        ArrowScore::Nine,
    ];
    for (i, score) in scores.iter().cycle().take(40).enumerate() {
        e.record_score(*score);
        assert_consistent(e.session());
        match i % 7 {
            2 => e.navigate_set(SetDirection::Next),
            4 => e.delete_selected_arrow(),
            5 => e.navigate_arrow(i % 6),
            6 if i % 3 == 0 => e.navigate_set(SetDirection::Prev),
            _ => {}
        }
        assert_consistent(e.session());
    }
    e.reconfigure(config(12, ArrowsPerSet::Nine));
    assert_consistent(e.session());
    e.clear_set();
    assert_consistent(e.session());
    e.reconfigure(config(3, ArrowsPerSet::Three));
    assert_consistent(e.session());
}

#[test]
fn shrink_then_grow_restores_surviving_values() {
    let mut e = SessionEditor::new(config(5, ArrowsPerSet::Nine));
    for set in 0..5 {
        for _ in 0..9 {
            e.record_score(if set % 2 == 0 {
                ArrowScore::Eight
            } else {
                ArrowScore::Six
            });
        }
        e.set_note(format!("set {set}"));
        e.navigate_set(SetDirection::Next);
    }
    let before = e.session().clone();

    e.reconfigure(config(3, ArrowsPerSet::Six));
    e.reconfigure(config(5, ArrowsPerSet::Nine));
    let after = e.session();

    for set in 0..3 {
        assert_eq!(after.sets[set].arrows[..6], before.sets[set].arrows[..6]);
        assert_eq!(after.sets[set].note, before.sets[set].note);
    }
    assert!(after.sets[3].arrows.iter().all(|a| *a == ArrowScore::M));
    assert_eq!(after.sets[3].note, "");
}

#[test]
fn early_finish_keeps_gap_sets_before_last_activity() {
    let mut e = SessionEditor::new(config(4, ArrowsPerSet::Three));
    e.record_score(ArrowScore::Nine);
    e.navigate_set(SetDirection::Next);
    e.navigate_set(SetDirection::Next);
    e.record_score(ArrowScore::Nine);

    let s = e.early_finish().unwrap();
    assert_eq!(s.sets.len(), 3);
    assert_eq!(s.config.set_count.get(), 3);
    assert_eq!(s.sets[1].total, 0);
    assert_eq!(s.average_score, 18.0 / 9.0);
}

#[test]
fn early_finish_on_untouched_session_is_rejected() {
    let e = SessionEditor::new(config(6, ArrowsPerSet::Six));
    let before = e.session().clone();
    assert_matches!(e.early_finish(), Err(QuiverError::EarlyFinishRejected));
    assert_eq!(e.session(), &before);
}
