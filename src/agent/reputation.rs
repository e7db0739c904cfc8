//! Reputation scoring.
//!
//! Fixed weighted formula over success rate, response time, uptime, and
//! transaction volume. The weights are part of the public contract: given
//! perfect metrics at 1000 transactions the score is exactly 100.

use serde::{Deserialize, Serialize};

const SUCCESS_WEIGHT: f64 = 0.4;
const RESPONSE_WEIGHT: f64 = 0.2;
const UPTIME_WEIGHT: f64 = 0.3;
const VOLUME_WEIGHT: f64 = 0.1;

/// Metrics supplied by the evaluator when updating reputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReputationSample {
    /// Percentage, 0-100.
    pub success_rate: f64,
    /// Milliseconds.
    pub response_time: f64,
    /// Percentage, 0-100.
    pub uptime: f64,
    pub transaction_count: u64,
}

/// Compute the 0-100 reputation score.
///
/// Response time is penalized linearly (10 points per second, floored at
/// 0); volume is a bonus capped at 1000 transactions.
pub fn score(sample: &ReputationSample) -> u32 {
    let success_score = sample.success_rate;
    let response_score = (100.0 - (sample.response_time / 1000.0) * 10.0).max(0.0);
    let uptime_score = sample.uptime;
    let volume_score = ((sample.transaction_count as f64 / 1000.0) * 100.0).min(100.0);

    let total = success_score * SUCCESS_WEIGHT
        + response_score * RESPONSE_WEIGHT
        + uptime_score * UPTIME_WEIGHT
        + volume_score * VOLUME_WEIGHT;

    total.clamp(0.0, 100.0).round() as u32
}
