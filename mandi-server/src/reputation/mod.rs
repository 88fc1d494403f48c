//! 评分引擎
//!
//! 供应商的 rating / review_count 是派生聚合：每次写入评价后
//! 从全量评价重算，绝不增量累加，避免缓存漂移。

pub mod service;

pub use service::{AddReviewInput, ReviewPage, ReviewPageQuery, ReviewService};

use serde::Serialize;

/// Round a rating to one decimal place, half away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-star review counts across the platform
#[derive(Debug, Clone, Serialize)]
pub struct RatingBreakdown {
    #[serde(rename = "1")]
    pub one: i64,
    #[serde(rename = "2")]
    pub two: i64,
    #[serde(rename = "3")]
    pub three: i64,
    #[serde(rename = "4")]
    pub four: i64,
    #[serde(rename = "5")]
    pub five: i64,
    pub total_reviews: i64,
}

/// Build the star histogram from `(rating, count)` pairs
///
/// Missing stars fill with zero; anything outside 1..=5 is ignored.
pub fn breakdown_from_counts(counts: &[(i64, i64)]) -> RatingBreakdown {
    let mut breakdown = RatingBreakdown {
        one: 0,
        two: 0,
        three: 0,
        four: 0,
        five: 0,
        total_reviews: 0,
    };
    for &(rating, count) in counts {
        match rating {
            1 => breakdown.one = count,
            2 => breakdown.two = count,
            3 => breakdown.three = count,
            4 => breakdown.four = count,
            5 => breakdown.five = count,
            _ => continue,
        }
        breakdown.total_reviews += count;
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth_half_rounds_up() {
        assert_eq!(round_to_tenth(4.25), 4.3);
        assert_eq!(round_to_tenth(4.24), 4.2);
        assert_eq!(round_to_tenth(4.26), 4.3);
    }

    #[test]
    fn test_round_to_tenth_whole_and_zero() {
        assert_eq!(round_to_tenth(5.0), 5.0);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }

    #[test]
    fn test_round_to_tenth_mean_of_two() {
        // (4 + 5) / 2 = 4.5
        assert_eq!(round_to_tenth(9.0 / 2.0), 4.5);
        // (3 + 4 + 5) / 3 = 4.0
        assert_eq!(round_to_tenth(12.0 / 3.0), 4.0);
        // (5 + 4 + 4) / 3 = 4.333...
        assert_eq!(round_to_tenth(13.0 / 3.0), 4.3);
    }

    #[test]
    fn test_breakdown_fills_missing_stars() {
        let breakdown = breakdown_from_counts(&[(5, 12), (3, 2)]);
        assert_eq!(breakdown.five, 12);
        assert_eq!(breakdown.three, 2);
        assert_eq!(breakdown.one, 0);
        assert_eq!(breakdown.two, 0);
        assert_eq!(breakdown.four, 0);
        assert_eq!(breakdown.total_reviews, 14);
    }

    #[test]
    fn test_breakdown_ignores_out_of_range() {
        let breakdown = breakdown_from_counts(&[(0, 7), (6, 3), (4, 1)]);
        assert_eq!(breakdown.four, 1);
        assert_eq!(breakdown.total_reviews, 1);
    }

    #[test]
    fn test_breakdown_empty() {
        let breakdown = breakdown_from_counts(&[]);
        assert_eq!(breakdown.total_reviews, 0);
        assert_eq!(breakdown.one, 0);
        assert_eq!(breakdown.five, 0);
    }

    #[test]
    fn test_breakdown_serializes_star_keys() {
        let breakdown = breakdown_from_counts(&[(1, 2), (5, 8)]);
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["1"], 2);
        assert_eq!(json["5"], 8);
        assert_eq!(json["total_reviews"], 10);
    }
}
