use std::collections::BTreeMap;

use chrono::Timelike;
use hangman_types::StatisticsSnapshot;

use crate::history::HistoryRecord;

/// Where the won/lost/win-rate triple comes from. Teachers get the
/// class-wide average success rate computed by the history store over all
/// students of their assigned courses; everyone else gets counts from the
/// record set itself. The remaining snapshot fields always derive from the
/// record set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WinLossSource {
    Records,
    ClassAverage(Option<f64>),
}

/// Reduces a set of history records into a statistics snapshot. Pure; an
/// empty record set (or a missing class average) yields the empty snapshot.
pub fn build_snapshot(records: &[HistoryRecord], source: WinLossSource) -> StatisticsSnapshot {
    if records.is_empty() {
        return StatisticsSnapshot::default();
    }

    let total = records.len() as u32;
    let (games_won, games_lost, win_rate) = match source {
        WinLossSource::Records => {
            let wins = records.iter().filter(|r| r.success).count() as u32;
            (wins, total - wins, win_rate_of(records))
        }
        WinLossSource::ClassAverage(Some(average)) => {
            let won = (f64::from(total) * average).round() as u32;
            (won, total - won, average * 100.0)
        }
        WinLossSource::ClassAverage(None) => return StatisticsSnapshot::default(),
    };

    let average_attempts = records
        .iter()
        .map(|r| f64::from(r.wrong_attempts))
        .sum::<f64>()
        / records.len() as f64;

    let (best_word, worst_word) = word_performance(records);

    StatisticsSnapshot {
        total_games: total,
        games_won,
        games_lost,
        win_rate,
        average_attempts,
        most_missed_letters: most_missed_letters(records),
        best_performing_word: best_word,
        worst_performing_word: worst_word,
        time_distribution: time_distribution(records),
        progress_trend: progress_trend(records),
    }
}

fn win_rate_of(records: &[HistoryRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let wins = records.iter().filter(|r| r.success).count();
    wins as f64 / records.len() as f64 * 100.0
}

/// Top three missed letters, most missed first. The tally keeps letters in
/// first-encounter order and the sort is stable, so ties resolve to the
/// letter seen first.
fn most_missed_letters(records: &[HistoryRecord]) -> String {
    let mut tally: Vec<(char, u32)> = Vec::new();
    for record in records {
        for piece in record.wrong_letters.split(',') {
            let Some(letter) = piece.chars().next() else {
                continue;
            };
            match tally.iter_mut().find(|(c, _)| *c == letter) {
                Some((_, count)) => *count += 1,
                None => tally.push((letter, 1)),
            }
        }
    }

    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .iter()
        .take(3)
        .map(|(letter, _)| letter.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Best and worst word by per-word success ratio. Grouping preserves
/// first-encounter order and comparisons are strict, so the first word seen
/// wins any tie.
fn word_performance(records: &[HistoryRecord]) -> (String, String) {
    let mut groups: Vec<(&str, u32, u32)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(word, _, _)| *word == record.word) {
            Some((_, wins, plays)) => {
                if record.success {
                    *wins += 1;
                }
                *plays += 1;
            }
            None => groups.push((&record.word, u32::from(record.success), 1)),
        }
    }

    let mut best: Option<(&str, f64)> = None;
    let mut worst: Option<(&str, f64)> = None;
    for &(word, wins, plays) in &groups {
        let ratio = f64::from(wins) / f64::from(plays);
        if best.is_none_or(|(_, r)| ratio > r) {
            best = Some((word, ratio));
        }
        if worst.is_none_or(|(_, r)| ratio < r) {
            worst = Some((word, ratio));
        }
    }

    (
        best.map(|(word, _)| word.to_string()).unwrap_or_default(),
        worst.map(|(word, _)| word.to_string()).unwrap_or_default(),
    )
}

fn time_distribution(records: &[HistoryRecord]) -> BTreeMap<String, u32> {
    let mut distribution = BTreeMap::new();
    for record in records {
        let bucket = format!("{:02}:00", record.played_at.hour());
        *distribution.entry(bucket).or_insert(0) += 1;
    }
    distribution
}

/// Win rate per calendar date; the BTreeMap keeps ISO date keys ascending.
fn progress_trend(records: &[HistoryRecord]) -> BTreeMap<String, f64> {
    let mut daily: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for record in records {
        let date = record.played_at.date_naive().to_string();
        let entry = daily.entry(date).or_insert((0, 0));
        if record.success {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    daily
        .into_iter()
        .map(|(date, (wins, plays))| (date, f64::from(wins) / f64::from(plays) * 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn record(word: &str, success: bool, wrong_letters: &str, played_at: &str) -> HistoryRecord {
        let played_at = NaiveDateTime::parse_from_str(played_at, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
        HistoryRecord {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            word_id: Uuid::new_v4(),
            word: word.to_string(),
            category: "animals".to_string(),
            success,
            wrong_attempts: wrong_letters.split(',').filter(|s| !s.is_empty()).count() as i32,
            wrong_letters: wrong_letters.to_string(),
            played_at,
        }
    }

    #[test]
    fn test_empty_records_yield_empty_snapshot() {
        let snapshot = build_snapshot(&[], WinLossSource::Records);
        assert_eq!(snapshot, StatisticsSnapshot::default());
        assert_eq!(snapshot.total_games, 0);
        assert_eq!(snapshot.win_rate, 0.0);
        assert!(snapshot.time_distribution.is_empty());
    }

    #[test]
    fn test_basic_counts_and_rates() {
        let records = vec![
            record("CAT", true, "", "2024-03-15 09:10:00"),
            record("CAT", false, "X,Y", "2024-03-15 10:20:00"),
            record("DOG", true, "Z", "2024-03-16 09:30:00"),
            record("DOG", true, "", "2024-03-16 11:40:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.total_games, 4);
        assert_eq!(snapshot.games_won, 3);
        assert_eq!(snapshot.games_lost, 1);
        assert_eq!(snapshot.win_rate, 75.0);
        assert_eq!(snapshot.average_attempts, 0.75);
    }

    #[test]
    fn test_best_and_worst_performing_word() {
        let records = vec![
            record("CAT", true, "", "2024-03-15 09:00:00"),
            record("CAT", false, "X", "2024-03-15 09:00:00"),
            record("CAT", true, "", "2024-03-15 09:00:00"),
            record("DOG", false, "Y", "2024-03-15 09:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.best_performing_word, "CAT");
        assert_eq!(snapshot.worst_performing_word, "DOG");
    }

    #[test]
    fn test_word_ratio_ties_go_to_first_encountered() {
        let records = vec![
            record("CAT", true, "", "2024-03-15 09:00:00"),
            record("DOG", true, "", "2024-03-15 09:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.best_performing_word, "CAT");
        assert_eq!(snapshot.worst_performing_word, "CAT");
    }

    #[test]
    fn test_most_missed_letters_top_three() {
        let records = vec![
            record("CAT", false, "X,Y,Z", "2024-03-15 09:00:00"),
            record("DOG", false, "X,Y", "2024-03-15 09:00:00"),
            record("OWL", false, "X,Q", "2024-03-15 09:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.most_missed_letters, "X,Y,Z");
    }

    #[test]
    fn test_missed_letter_ties_keep_first_encounter_order() {
        let records = vec![
            record("CAT", false, "Q,R,S,T", "2024-03-15 09:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.most_missed_letters, "Q,R,S");
    }

    #[test]
    fn test_records_without_wrong_letters_add_nothing() {
        let records = vec![
            record("CAT", true, "", "2024-03-15 09:00:00"),
            record("DOG", true, "", "2024-03-15 09:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.most_missed_letters, "");
    }

    #[test]
    fn test_hour_buckets_are_zero_padded() {
        let records = vec![
            record("CAT", true, "", "2024-03-15 09:05:00"),
            record("DOG", false, "X", "2024-03-15 09:55:00"),
            record("OWL", true, "", "2024-03-15 23:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        assert_eq!(snapshot.time_distribution.get("09:00"), Some(&2));
        assert_eq!(snapshot.time_distribution.get("23:00"), Some(&1));
        assert!(!snapshot.time_distribution.contains_key("9:00"));
    }

    #[test]
    fn test_progress_trend_is_per_day_and_ascending() {
        let records = vec![
            record("CAT", false, "X", "2024-03-16 09:00:00"),
            record("CAT", true, "", "2024-03-15 09:00:00"),
            record("DOG", true, "", "2024-03-15 18:00:00"),
            record("DOG", true, "", "2024-03-16 19:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::Records);
        let entries: Vec<(String, f64)> = snapshot.progress_trend.into_iter().collect();
        assert_eq!(
            entries,
            vec![
                ("2024-03-15".to_string(), 100.0),
                ("2024-03-16".to_string(), 50.0),
            ]
        );
    }

    #[test]
    fn test_class_average_drives_teacher_win_loss() {
        let records = vec![
            record("CAT", true, "", "2024-03-15 09:00:00"),
            record("CAT", true, "", "2024-03-15 10:00:00"),
            record("DOG", false, "X", "2024-03-15 11:00:00"),
        ];

        let snapshot = build_snapshot(&records, WinLossSource::ClassAverage(Some(0.5)));
        // round(3 * 0.5) = 2 — the counts come from the class average, not
        // from the records themselves.
        assert_eq!(snapshot.games_won, 2);
        assert_eq!(snapshot.games_lost, 1);
        assert_eq!(snapshot.win_rate, 50.0);

        // Every other field still derives from the record set.
        assert_eq!(snapshot.total_games, 3);
        assert_eq!(snapshot.best_performing_word, "CAT");
        assert_eq!(snapshot.worst_performing_word, "DOG");
    }

    #[test]
    fn test_missing_class_average_yields_empty_snapshot() {
        let records = vec![record("CAT", true, "", "2024-03-15 09:00:00")];

        let snapshot = build_snapshot(&records, WinLossSource::ClassAverage(None));
        assert_eq!(snapshot, StatisticsSnapshot::default());
    }
}
