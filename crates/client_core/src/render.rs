//! Turning a raw probability into what the user reads.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::json;
use shared::protocol::PredictResponse;

/// Probabilities strictly above this are called a blitz.
pub const BLITZ_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitzVerdict {
    BlitzLikely,
    NoBlitz,
}

impl BlitzVerdict {
    pub fn from_proba(proba: f64) -> Self {
        if proba > BLITZ_THRESHOLD {
            BlitzVerdict::BlitzLikely
        } else {
            BlitzVerdict::NoBlitz
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BlitzVerdict::BlitzLikely => "BLITZ LIKELY",
            BlitzVerdict::NoBlitz => "NO BLITZ",
        }
    }
}

impl fmt::Display for BlitzVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `proba * 100` with two decimals and a percent sign.
///
/// A value sitting exactly halfway between two hundredths rounds away from
/// zero, so 12.125 prints as `12.13`.
pub fn format_probability(proba: f64) -> String {
    format!("{}%", to_fixed_2(proba * 100.0))
}

fn to_fixed_2(value: f64) -> String {
    // Only odd multiples of 1/8 land exactly on a .xx5 tie; `{:.2}` would
    // round those to even.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        return format!("{:.2}", (value * 100.0).round() / 100.0);
    }
    format!("{value:.2}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub proba: f64,
    pub verdict: BlitzVerdict,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionOutcome {
    pub fn new(response: PredictResponse) -> Self {
        Self {
            proba: response.proba,
            verdict: BlitzVerdict::from_proba(response.proba),
            predicted_at: Utc::now(),
        }
    }

    pub fn percent(&self) -> String {
        format_probability(self.proba)
    }

    pub fn headline(&self) -> String {
        format!("Blitz Probability: {}", self.percent())
    }

    pub fn report(&self) -> serde_json::Value {
        json!({
            "proba": self.proba,
            "percent": self.percent(),
            "verdict": self.verdict.label(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_likely_blitz() {
        let outcome = PredictionOutcome::new(PredictResponse { proba: 0.73 });
        assert_eq!(outcome.percent(), "73.00%");
        assert_eq!(outcome.verdict.label(), "BLITZ LIKELY");
        assert_eq!(outcome.headline(), "Blitz Probability: 73.00%");
    }

    #[test]
    fn renders_no_blitz() {
        let outcome = PredictionOutcome::new(PredictResponse { proba: 0.2 });
        assert_eq!(outcome.percent(), "20.00%");
        assert_eq!(outcome.verdict, BlitzVerdict::NoBlitz);
        assert_eq!(outcome.verdict.to_string(), "NO BLITZ");
    }

    #[test]
    fn threshold_itself_is_not_a_blitz() {
        assert_eq!(BlitzVerdict::from_proba(0.5), BlitzVerdict::NoBlitz);
        assert_eq!(BlitzVerdict::from_proba(0.5001), BlitzVerdict::BlitzLikely);
        assert_eq!(format_probability(1.0), "100.00%");
        assert_eq!(format_probability(0.0), "0.00%");
    }

    #[test]
    fn halfway_hundredths_round_up() {
        assert_eq!(format_probability(0.00125), "0.13%");
        assert_eq!(format_probability(0.12125), "12.13%");
        assert_eq!(format_probability(0.1234), "12.34%");
        assert_eq!(to_fixed_2(0.625), "0.63");
        assert_eq!(to_fixed_2(42.875), "42.88");
        assert_eq!(to_fixed_2(2.5), "2.50");
    }

    #[test]
    fn report_carries_rendered_fields() {
        let report = PredictionOutcome::new(PredictResponse { proba: 0.73 }).report();
        assert_eq!(report["percent"], "73.00%");
        assert_eq!(report["verdict"], "BLITZ LIKELY");
        assert_eq!(report["proba"], 0.73);
    }
}
