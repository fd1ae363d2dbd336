//! Scoring model: the shape of a recorded session and the pure arithmetic
//! that derives totals, averages, distributions and the export text from it.
//!
//! Nothing in here keeps state or touches I/O. Every function is total over
//! its input types; invalid selections are unrepresentable rather than
//! runtime errors.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::InvalidSelection;
use crate::util::{short_date, to_fixed};

/// Step to the neighbouring option, wrapping at both ends
fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let pos = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    options[next]
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum BowType {
    #[serde(alias = "复合")]
    Compound,
    #[serde(alias = "反曲")]
    Recurve,
}

impl BowType {
    pub const ALL: [BowType; 2] = [BowType::Compound, BowType::Recurve];

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

impl FromStr for BowType {
    type Err = InvalidSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidSelection::new("bow type", s))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Distance {
    #[serde(rename = "18m")]
    #[strum(serialize = "18m")]
    M18,
    #[serde(rename = "30m")]
    #[strum(serialize = "30m")]
    M30,
    #[serde(rename = "50m")]
    #[strum(serialize = "50m")]
    M50,
    #[serde(rename = "70m")]
    #[strum(serialize = "70m")]
    M70,
    #[serde(rename = "90m")]
    #[strum(serialize = "90m")]
    M90,
}

impl Distance {
    pub const ALL: [Distance; 5] = [
        Distance::M18,
        Distance::M30,
        Distance::M50,
        Distance::M70,
        Distance::M90,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

impl FromStr for Distance {
    type Err = InvalidSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                let label = d.to_string();
                label.eq_ignore_ascii_case(s) || label.trim_end_matches('m') == s
            })
            .ok_or_else(|| InvalidSelection::new("distance", s))
    }
}

/// Number of sets in a session.
///
/// Only [`SetCount::OPTIONS`] can be picked for a new session. A session that
/// was finished early stores however many sets were actually kept, so stored
/// values are accepted as long as they are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SetCount(u8);

impl SetCount {
    pub const OPTIONS: [SetCount; 5] = [
        SetCount(3),
        SetCount(4),
        SetCount(5),
        SetCount(6),
        SetCount(12),
    ];

    /// A selectable set count, or `None` for anything outside the options.
    pub fn from_choice(n: usize) -> Option<Self> {
        Self::OPTIONS.into_iter().find(|c| c.get() == n)
    }

    /// The count of sets kept by an early finish. Never zero.
    pub(crate) fn kept(n: usize) -> Self {
        SetCount(u8::try_from(n.max(1)).unwrap_or(u8::MAX))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn is_selectable(self) -> bool {
        Self::OPTIONS.contains(&self)
    }

    pub fn next(self) -> Self {
        cycle(&Self::OPTIONS, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::OPTIONS, self, false)
    }
}

impl TryFrom<u8> for SetCount {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if n == 0 {
            Err("a session needs at least one set".to_string())
        } else {
            Ok(SetCount(n))
        }
    }
}

impl From<SetCount> for u8 {
    fn from(c: SetCount) -> u8 {
        c.0
    }
}

impl fmt::Display for SetCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SetCount {
    type Err = InvalidSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(SetCount::from_choice)
            .ok_or_else(|| InvalidSelection::new("set count", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ArrowsPerSet {
    Three = 3,
    Six = 6,
    Nine = 9,
    Twelve = 12,
}

impl ArrowsPerSet {
    pub const ALL: [ArrowsPerSet; 4] = [
        ArrowsPerSet::Three,
        ArrowsPerSet::Six,
        ArrowsPerSet::Nine,
        ArrowsPerSet::Twelve,
    ];

    pub fn get(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, true)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, false)
    }
}

impl TryFrom<u8> for ArrowsPerSet {
    type Error = InvalidSelection;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|a| a.get() == n as usize)
            .ok_or_else(|| InvalidSelection::new("arrows per set", n.to_string()))
    }
}

impl From<ArrowsPerSet> for u8 {
    fn from(a: ArrowsPerSet) -> u8 {
        a as u8
    }
}

impl fmt::Display for ArrowsPerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for ArrowsPerSet {
    type Err = InvalidSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| InvalidSelection::new("arrows per set", s))
            .and_then(ArrowsPerSet::try_from)
    }
}

/// Ring value of a single arrow.
///
/// `M` is both a recorded miss and an arrow that has not been shot yet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum ArrowScore {
    X,
    #[serde(rename = "10")]
    #[strum(serialize = "10")]
    Ten,
    #[serde(rename = "9")]
    #[strum(serialize = "9")]
    Nine,
    #[serde(rename = "8")]
    #[strum(serialize = "8")]
    Eight,
    #[serde(rename = "7")]
    #[strum(serialize = "7")]
    Seven,
    #[serde(rename = "6")]
    #[strum(serialize = "6")]
    Six,
    #[serde(rename = "5")]
    #[strum(serialize = "5")]
    Five,
    #[serde(rename = "4")]
    #[strum(serialize = "4")]
    Four,
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    Three,
    #[serde(rename = "2")]
    #[strum(serialize = "2")]
    Two,
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    One,
    M,
}

impl ArrowScore {
    /// Keypad order, highest first
    pub const ALL: [ArrowScore; 12] = [
        ArrowScore::X,
        ArrowScore::Ten,
        ArrowScore::Nine,
        ArrowScore::Eight,
        ArrowScore::Seven,
        ArrowScore::Six,
        ArrowScore::Five,
        ArrowScore::Four,
        ArrowScore::Three,
        ArrowScore::Two,
        ArrowScore::One,
        ArrowScore::M,
    ];

    /// Position in [`ArrowScore::ALL`]
    pub fn index(self) -> usize {
        match self {
            ArrowScore::X => 0,
            ArrowScore::Ten => 1,
            ArrowScore::Nine => 2,
            ArrowScore::Eight => 3,
            ArrowScore::Seven => 4,
            ArrowScore::Six => 5,
            ArrowScore::Five => 6,
            ArrowScore::Four => 7,
            ArrowScore::Three => 8,
            ArrowScore::Two => 9,
            ArrowScore::One => 10,
            ArrowScore::M => 11,
        }
    }

    pub fn value(self) -> u32 {
        arrow_value(self)
    }

    pub fn is_miss(self) -> bool {
        self == ArrowScore::M
    }

    pub fn tier(self) -> ScoreTier {
        match self {
            ArrowScore::X | ArrowScore::Ten | ArrowScore::Nine => ScoreTier::Gold,
            ArrowScore::Eight | ArrowScore::Seven => ScoreTier::Red,
            ArrowScore::Six | ArrowScore::Five => ScoreTier::Blue,
            ArrowScore::Four | ArrowScore::Three => ScoreTier::Black,
            ArrowScore::Two | ArrowScore::One | ArrowScore::M => ScoreTier::Neutral,
        }
    }
}

impl FromStr for ArrowScore {
    type Err = InvalidSelection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidSelection::new("arrow score", s))
    }
}

/// Target face colour band an arrow landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Gold,
    Red,
    Blue,
    Black,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub bow_type: BowType,
    pub distance: Distance,
    #[serde(rename = "sets")]
    pub set_count: SetCount,
    pub arrows_per_set: ArrowsPerSet,
}

impl SessionConfig {
    /// Arrows a full session of this shape holds
    pub fn arrow_count(&self) -> usize {
        self.set_count.get() * self.arrows_per_set.get()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bow_type: BowType::Compound,
            distance: Distance::M50,
            set_count: SetCount(12),
            arrows_per_set: ArrowsPerSet::Six,
        }
    }
}

/// Stored arrows keep the `{ "value": ... }` record shape.
mod arrow_records {
    use super::ArrowScore;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct ArrowRecord {
        value: ArrowScore,
    }

    pub fn serialize<S: Serializer>(arrows: &[ArrowScore], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(arrows.iter().map(|&value| ArrowRecord { value }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ArrowScore>, D::Error> {
        let records = Vec::<ArrowRecord>::deserialize(d)?;
        Ok(records.into_iter().map(|r| r.value).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    #[serde(with = "arrow_records")]
    pub arrows: Vec<ArrowScore>,
    #[serde(default)]
    pub note: String,
    pub total: u32,
}

impl SetScore {
    /// A set of `arrows` unshot arrows
    pub fn empty(arrows: usize) -> Self {
        Self {
            arrows: vec![ArrowScore::M; arrows],
            note: String::new(),
            total: 0,
        }
    }

    pub fn from_arrows(arrows: Vec<ArrowScore>, note: impl Into<String>) -> Self {
        let total = set_total(&arrows);
        Self {
            arrows,
            note: note.into(),
            total,
        }
    }

    pub fn recompute(&mut self) {
        self.total = set_total(&self.arrows);
    }

    /// Any arrow other than M, or a note with visible text
    pub fn has_activity(&self) -> bool {
        self.arrows.iter().any(|a| !a.is_miss()) || !self.note.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub config: SessionConfig,
    pub sets: Vec<SetScore>,
    pub total_score: u32,
    pub average_score: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A fresh session: every arrow M, every total zero
    pub fn new(id: impl Into<String>, config: SessionConfig, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            config,
            sets: (0..config.set_count.get())
                .map(|_| SetScore::empty(config.arrows_per_set.get()))
                .collect(),
            total_score: 0,
            average_score: 0.0,
            created_at,
            completed_at: None,
        }
    }

    /// Arrows actually held by the sets
    pub fn arrow_count(&self) -> usize {
        self.sets.iter().map(|s| s.arrows.len()).sum()
    }

    pub fn distribution(&self) -> ScoreDistribution {
        distribution(self)
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Occurrences of each of the 12 arrow scores across a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreDistribution {
    counts: [u32; 12],
}

impl ScoreDistribution {
    pub fn get(&self, score: ArrowScore) -> u32 {
        self.counts[score.index()]
    }

    pub fn add(&mut self, score: ArrowScore) {
        self.counts[score.index()] += 1;
    }

    /// Buckets in keypad order (X first, M last)
    pub fn iter(&self) -> impl Iterator<Item = (ArrowScore, u32)> + '_ {
        ArrowScore::ALL.iter().map(|&a| (a, self.get(a)))
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

pub fn arrow_value(a: ArrowScore) -> u32 {
    match a {
        ArrowScore::X | ArrowScore::Ten => 10,
        ArrowScore::Nine => 9,
        ArrowScore::Eight => 8,
        ArrowScore::Seven => 7,
        ArrowScore::Six => 6,
        ArrowScore::Five => 5,
        ArrowScore::Four => 4,
        ArrowScore::Three => 3,
        ArrowScore::Two => 2,
        ArrowScore::One => 1,
        ArrowScore::M => 0,
    }
}

pub fn set_total(arrows: &[ArrowScore]) -> u32 {
    arrows.iter().copied().map(arrow_value).sum()
}

/// Sum of the cached set totals
pub fn session_total(session: &Session) -> u32 {
    session.sets.iter().map(|s| s.total).sum()
}

/// `total / arrows`, or 0 when there are no arrows
pub fn average_score(total_score: u32, arrow_count: usize) -> f64 {
    if arrow_count > 0 {
        total_score as f64 / arrow_count as f64
    } else {
        0.0
    }
}

pub fn distribution(session: &Session) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();
    for arrow in session.sets.iter().flat_map(|s| s.arrows.iter()) {
        dist.add(*arrow);
    }
    dist
}

/// Plain-text export with the creation date rendered in local time
pub fn format_for_export(session: &Session) -> String {
    format_for_export_in(session, &Local)
}

/// Plain-text export with the creation date rendered in `tz`.
///
/// Layout:
/// ```text
/// Compound - 50m - 3组 - 3支/组
/// 29 - 3.22
/// 2024/3/9
/// 1 - 10 9 X - 29 - <note>
/// ```
pub fn format_for_export_in<Tz: TimeZone>(session: &Session, tz: &Tz) -> String {
    let config = &session.config;
    let mut out = format!(
        "{} - {} - {}组 - {}支/组\n",
        config.bow_type, config.distance, config.set_count, config.arrows_per_set
    );
    out.push_str(&format!(
        "{} - {}\n",
        session.total_score,
        to_fixed(session.average_score, 2)
    ));
    out.push_str(&short_date(&session.created_at.with_timezone(tz)));
    out.push('\n');

    for (idx, set) in session.sets.iter().enumerate() {
        out.push_str(&format!(
            "{} - {} - {} - {}\n",
            idx + 1,
            set.arrows.iter().join(" "),
            set.total,
            set.note
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_session() -> Session {
        let config = SessionConfig {
            bow_type: BowType::Compound,
            distance: Distance::M50,
            set_count: SetCount(3),
            arrows_per_set: ArrowsPerSet::Three,
        };
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 10, 30, 0).unwrap();
        let mut session = Session::new("abc", config, created);
        session.sets[0] = SetScore::from_arrows(
            vec![ArrowScore::Ten, ArrowScore::Nine, ArrowScore::X],
            "",
        );
        session.total_score = session_total(&session);
        session.average_score = average_score(session.total_score, config.arrow_count());
        session
    }

    #[test]
    fn test_arrow_value_range() {
        for a in ArrowScore::ALL {
            assert!(arrow_value(a) <= 10);
        }
        assert_eq!(arrow_value(ArrowScore::X), 10);
        assert_eq!(arrow_value(ArrowScore::Ten), 10);
        assert_eq!(arrow_value(ArrowScore::M), 0);
        assert_eq!(arrow_value(ArrowScore::Seven), 7);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, a) in ArrowScore::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
        }
    }

    #[test]
    fn test_set_total() {
        assert_eq!(set_total(&[]), 0);
        assert_eq!(
            set_total(&[ArrowScore::X, ArrowScore::M, ArrowScore::Five]),
            15
        );
    }

    #[test]
    fn test_average_score_no_arrows() {
        assert_eq!(average_score(0, 0), 0.0);
        assert_eq!(average_score(29, 9), 29.0 / 9.0);
    }

    #[test]
    fn test_distribution_counts_every_arrow() {
        let session = sample_session();
        let dist = distribution(&session);
        assert_eq!(dist.get(ArrowScore::X), 1);
        assert_eq!(dist.get(ArrowScore::Ten), 1);
        assert_eq!(dist.get(ArrowScore::Nine), 1);
        assert_eq!(dist.get(ArrowScore::M), 6);
        assert_eq!(dist.total(), 9);
        assert_eq!(dist.max_count(), 6);
        assert_eq!(dist.iter().count(), 12);
    }

    #[test]
    fn test_format_for_export_layout() {
        let session = sample_session();
        let text = format_for_export_in(&session, &Utc);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Compound - 50m - 3组 - 3支/组");
        assert_eq!(lines[1], "29 - 3.22");
        assert_eq!(lines[2], "2024/3/9");
        assert_eq!(lines[3], "1 - 10 9 X - 29 - ");
        assert_eq!(lines[4], "2 - M M M - 0 - ");
        assert_eq!(lines.len(), 6);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_format_for_export_keeps_note() {
        let mut session = sample_session();
        session.sets[1].note = "wind from left".into();
        let text = format_for_export_in(&session, &Utc);
        assert!(text.contains("2 - M M M - 0 - wind from left\n"));
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ArrowScore::X.tier(), ScoreTier::Gold);
        assert_eq!(ArrowScore::Nine.tier(), ScoreTier::Gold);
        assert_eq!(ArrowScore::Seven.tier(), ScoreTier::Red);
        assert_eq!(ArrowScore::Five.tier(), ScoreTier::Blue);
        assert_eq!(ArrowScore::Three.tier(), ScoreTier::Black);
        assert_eq!(ArrowScore::One.tier(), ScoreTier::Neutral);
        assert_eq!(ArrowScore::M.tier(), ScoreTier::Neutral);
    }

    #[test]
    fn test_parse_selections() {
        assert_eq!("recurve".parse::<BowType>().unwrap(), BowType::Recurve);
        assert_eq!("70m".parse::<Distance>().unwrap(), Distance::M70);
        assert_eq!("90".parse::<Distance>().unwrap(), Distance::M90);
        assert!("60m".parse::<Distance>().is_err());
        assert_eq!("12".parse::<SetCount>().unwrap().get(), 12);
        assert!("7".parse::<SetCount>().is_err());
        assert_eq!("9".parse::<ArrowsPerSet>().unwrap(), ArrowsPerSet::Nine);
        assert!("4".parse::<ArrowsPerSet>().is_err());
        assert_eq!("x".parse::<ArrowScore>().unwrap(), ArrowScore::X);
        assert_eq!("10".parse::<ArrowScore>().unwrap(), ArrowScore::Ten);
        assert!("11".parse::<ArrowScore>().is_err());
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Distance::M90.next(), Distance::M18);
        assert_eq!(Distance::M18.prev(), Distance::M90);
        assert_eq!(SetCount(12).next().get(), 3);
        assert_eq!(ArrowsPerSet::Three.prev(), ArrowsPerSet::Twelve);
        assert_eq!(BowType::Compound.next(), BowType::Recurve);
    }

    #[test]
    fn test_session_json_shape() {
        let session = sample_session();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["config"]["bowType"], "Compound");
        assert_eq!(json["config"]["distance"], "50m");
        assert_eq!(json["config"]["sets"], 3);
        assert_eq!(json["config"]["arrowsPerSet"], 3);
        assert_eq!(json["sets"][0]["arrows"][2]["value"], "X");
        assert_eq!(json["sets"][0]["arrows"][0]["value"], "10");
        assert_eq!(json["totalScore"], 29);
        assert!(json.get("completedAt").is_none());

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_stored_early_finish_set_count_is_accepted() {
        let json = serde_json::json!({
            "bowType": "Recurve", "distance": "18m", "sets": 2, "arrowsPerSet": 6
        });
        let config: SessionConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.set_count.get(), 2);
        assert!(!config.set_count.is_selectable());

        let bad = serde_json::json!({
            "bowType": "Recurve", "distance": "18m", "sets": 3, "arrowsPerSet": 4
        });
        assert!(serde_json::from_value::<SessionConfig>(bad).is_err());
    }
}
