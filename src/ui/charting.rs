use crate::scoring::ScoreDistribution;

/// Length of a bar for `count` when `max` fills `full`.
/// Non-empty buckets always get at least one unit.
pub fn scaled_length(count: u32, max: u32, full: usize) -> usize {
    if max == 0 || count == 0 {
        return 0;
    }
    let len = (count as f64 / max as f64 * full as f64).round() as usize;
    len.clamp(1, full)
}

pub fn scaled_bar(count: u32, max: u32, width: usize) -> String {
    "█".repeat(scaled_length(count, max, width))
}

/// `(label, count)` pairs in keypad order, ready for a bar chart
pub fn histogram_data(dist: &ScoreDistribution) -> Vec<(String, u64)> {
    dist.iter()
        .map(|(score, count)| (score.to_string(), count as u64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ArrowScore;

    #[test]
    fn test_scaled_length_empty() {
        assert_eq!(scaled_length(0, 0, 10), 0);
        assert_eq!(scaled_length(0, 5, 10), 0);
    }

    #[test]
    fn test_scaled_length_scales_to_max() {
        assert_eq!(scaled_length(5, 5, 10), 10);
        assert_eq!(scaled_length(1, 2, 10), 5);
        assert_eq!(scaled_length(1, 100, 10), 1);
    }

    #[test]
    fn test_histogram_data_order() {
        let mut dist = ScoreDistribution::default();
        dist.add(ArrowScore::M);
        dist.add(ArrowScore::X);
        dist.add(ArrowScore::X);
        let data = histogram_data(&dist);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0], ("X".to_string(), 2));
        assert_eq!(data[1], ("10".to_string(), 0));
        assert_eq!(data[11], ("M".to_string(), 1));
    }
}
