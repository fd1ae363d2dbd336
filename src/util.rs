use chrono::{Datelike, Timelike};

/// Fixed-point formatting of the exact binary value.
///
/// Only an exact tie rounds away from zero (`3.125` -> `"3.13"`); a value
/// stored just below one rounds down (`9.0 / 120.0` -> `"0.07"`).
pub fn to_fixed(value: f64, digits: u32) -> String {
    let digits = digits as usize;
    if is_exact_tie(value, digits) {
        let half_step = 0.5 / 10f64.powi(digits as i32);
        return format!("{:.*}", digits, value + half_step.copysign(value));
    }
    format!("{:.*}", digits, value)
}

/// Whether the full decimal expansion of `value` ends in a single `5` right
/// after `digits` fractional digits
fn is_exact_tie(value: f64, digits: usize) -> bool {
    // every finite f64 expands to at most 1074 fractional digits
    let expanded = format!("{:.1100}", value.abs());
    let Some((_, fraction)) = expanded.split_once('.') else {
        return false;
    };
    let (_, rest) = fraction.split_at(digits.min(fraction.len()));
    rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0')
}

/// `2024/3/9`
pub fn short_date(d: &impl Datelike) -> String {
    format!("{}/{}/{}", d.year(), d.month(), d.day())
}

/// `2024年3月9日`
pub fn long_date(d: &impl Datelike) -> String {
    format!("{}年{}月{}日", d.year(), d.month(), d.day())
}

/// `2024/3/9 14:05:09`
pub fn date_time<D: Datelike + Timelike>(d: &D) -> String {
    format!(
        "{} {:02}:{:02}:{:02}",
        short_date(d),
        d.hour(),
        d.minute(),
        d.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(29.0 / 9.0, 2), "3.22");
        assert_eq!(to_fixed(0.0, 2), "0.00");
        assert_eq!(to_fixed(10.0, 2), "10.00");
    }

    #[test]
    fn test_to_fixed_ties_round_up() {
        assert_eq!(to_fixed(3.125, 2), "3.13");
        assert_eq!(to_fixed(75.0 / 24.0, 2), "3.13");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
    }

    #[test]
    fn test_to_fixed_just_below_a_tie_rounds_down() {
        // 120 kept arrows after an early finish of 10 sets of 12
        assert_eq!(to_fixed(9.0 / 120.0, 2), "0.07");
        assert_eq!(to_fixed(99.0 / 120.0, 2), "0.82");
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_dates_are_not_zero_padded() {
        let d = Utc.with_ymd_and_hms(2024, 1, 5, 7, 3, 9).unwrap();
        assert_eq!(short_date(&d), "2024/1/5");
        assert_eq!(long_date(&d), "2024年1月5日");
        assert_eq!(date_time(&d), "2024/1/5 07:03:09");
    }
}
