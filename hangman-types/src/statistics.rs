use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Computed summary over a set of history records. Never persisted; the
/// default value is the empty snapshot returned for an empty record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatisticsSnapshot {
    pub total_games: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// Percentage, 0-100.
    pub win_rate: f64,
    pub average_attempts: f64,
    /// Up to three letters, comma-joined, most missed first.
    pub most_missed_letters: String,
    pub best_performing_word: String,
    pub worst_performing_word: String,
    /// Games per hour of day, keyed "HH:00" (zero-padded, 24-hour).
    pub time_distribution: BTreeMap<String, u32>,
    /// Win rate per calendar date, keyed "YYYY-MM-DD", ascending.
    pub progress_trend: BTreeMap<String, f64>,
}
