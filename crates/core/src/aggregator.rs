//! Summary views over a slice of chat records.
//!
//! Every function takes the user selection and the record slice and returns
//! an owned view. Nothing is cached: each call re-scans the input.

use crate::domain::{ChatRecord, OVERALL};
use crate::links;
use crate::stop_words::StopWords;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// `(key, count)` pairs sorted by descending count.
pub type FrequencyTable = Vec<(String, usize)>;

/// Headline counts for a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BasicStats {
    pub messages: usize,
    /// Whitespace-separated words, media placeholders excluded.
    pub words: usize,
    pub media_messages: usize,
    pub links: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCount {
    pub user: String,
    pub messages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserShare {
    pub user: String,
    /// Share of all messages, 0.0..=100.0.
    pub percent: f64,
}

/// Busiest users leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusyUsers {
    /// Top users by message count.
    pub top: Vec<UserCount>,
    /// Percentage share of every user, same order as the counts.
    pub shares: Vec<UserShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month_num: u32,
    pub month: String,
    pub messages: usize,
}

impl MonthlyBucket {
    /// Display label, e.g. "March-2024".
    pub fn label(&self) -> String {
        format!("{}-{}", self.month, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub messages: usize,
}

/// Message counts per weekday and hour period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub days: Vec<String>,
    pub periods: Vec<String>,
    /// `cells[d][p]` counts messages on `days[d]` during `periods[p]`.
    pub cells: Vec<Vec<usize>>,
}

impl Heatmap {
    /// Count for a cell; combinations never seen report 0.
    pub fn count(&self, day: &str, period: &str) -> usize {
        let d = self.days.iter().position(|x| x == day);
        let p = self.periods.iter().position(|x| x == period);
        match (d, p) {
            (Some(d), Some(p)) => self
                .cells
                .get(d)
                .and_then(|row| row.get(p))
                .copied()
                .unwrap_or(0),
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Counter that remembers first-seen order so ties stay stable.
#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn most_common(mut self, limit: Option<usize>) -> FrequencyTable {
        // stable: equal counts keep first-seen order
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            self.entries.truncate(limit);
        }
        self.entries
    }
}

fn tally<'a>(keys: impl IntoIterator<Item = &'a str>) -> Tally {
    let mut tally = Tally::default();
    for key in keys {
        tally.add(key);
    }
    tally
}

/// Records sent by `user`, or every record when `user` is "Overall".
pub fn filter_by_user<'a>(user: &str, records: &'a [ChatRecord]) -> Vec<&'a ChatRecord> {
    if user == OVERALL {
        records.iter().collect()
    } else {
        records.iter().filter(|r| r.user == user).collect()
    }
}

pub fn basic_stats(user: &str, records: &[ChatRecord]) -> BasicStats {
    let selected = filter_by_user(user, records);
    let extractor = links::shared();

    let mut stats = BasicStats {
        messages: selected.len(),
        ..BasicStats::default()
    };
    for record in &selected {
        if record.is_media() {
            stats.media_messages += 1;
        } else {
            stats.words += record.message.split_whitespace().count();
        }
        stats.links += extractor.count_urls(&record.message);
    }

    debug!(user, ?stats, "Computed basic stats");
    stats
}

/// Top `limit` users by message count with every user's percentage share.
pub fn top_users(records: &[ChatRecord], limit: usize) -> BusyUsers {
    let counts = tally(records.iter().map(|r| r.user.as_str())).most_common(None);
    let total = records.len();

    let shares = counts
        .iter()
        .map(|(user, n)| UserShare {
            user: user.clone(),
            percent: *n as f64 / total as f64 * 100.0,
        })
        .collect();
    let top = counts
        .into_iter()
        .take(limit)
        .map(|(user, messages)| UserCount { user, messages })
        .collect();

    BusyUsers { top, shares }
}

/// Most frequent words, ignoring notices, media placeholders and stop words.
pub fn word_frequency(
    user: &str,
    records: &[ChatRecord],
    stop_words: &StopWords,
    limit: usize,
) -> FrequencyTable {
    let mut words = Tally::default();
    for record in filter_by_user(user, records) {
        if record.is_notification() || record.is_media() {
            continue;
        }
        for word in record.message.to_lowercase().split_whitespace() {
            if !stop_words.contains(word) {
                words.add(word);
            }
        }
    }
    words.most_common(Some(limit))
}

/// Fitzpatrick skin-tone modifiers, counted as emoji in their own right.
fn is_skin_tone(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

/// Full emoji frequency table; empty when no message holds an emoji.
pub fn emoji_frequency(user: &str, records: &[ChatRecord]) -> FrequencyTable {
    let mut found = Tally::default();
    let mut buf = [0u8; 4];
    for record in filter_by_user(user, records) {
        for c in record.message.chars() {
            let symbol: &str = c.encode_utf8(&mut buf);
            if is_skin_tone(c) || emojis::get(symbol).is_some() {
                found.add(symbol);
            }
        }
    }
    found.most_common(None)
}

/// Messages per calendar month, oldest first.
pub fn monthly_timeline(user: &str, records: &[ChatRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<(i32, u32, &str), usize> = BTreeMap::new();
    for record in filter_by_user(user, records) {
        *buckets
            .entry((record.year, record.month_num, record.month.as_str()))
            .or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month_num, month), messages)| MonthlyBucket {
            year,
            month_num,
            month: month.to_string(),
            messages,
        })
        .collect()
}

/// Messages per day, oldest first.
pub fn daily_timeline(user: &str, records: &[ChatRecord]) -> Vec<DailyBucket> {
    let mut buckets: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in filter_by_user(user, records) {
        *buckets.entry(record.only_date).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(date, messages)| DailyBucket { date, messages })
        .collect()
}

/// Messages per weekday name, busiest first.
pub fn weekly_activity(user: &str, records: &[ChatRecord]) -> FrequencyTable {
    tally(filter_by_user(user, records).into_iter().map(|r| r.day_name.as_str())).most_common(None)
}

/// Messages per month name, busiest first.
pub fn monthly_activity(user: &str, records: &[ChatRecord]) -> FrequencyTable {
    tally(filter_by_user(user, records).into_iter().map(|r| r.month.as_str())).most_common(None)
}

/// Weekday × period cross-tabulation. Rows and columns are sorted by label.
pub fn activity_heatmap(user: &str, records: &[ChatRecord]) -> Heatmap {
    let selected = filter_by_user(user, records);

    let days: BTreeSet<&str> = selected.iter().map(|r| r.day_name.as_str()).collect();
    let periods: BTreeSet<&str> = selected.iter().map(|r| r.period.as_str()).collect();
    let day_index: HashMap<&str, usize> = days.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    let period_index: HashMap<&str, usize> =
        periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

    let mut cells = vec![vec![0; periods.len()]; days.len()];
    for record in &selected {
        let d = day_index[record.day_name.as_str()];
        let p = period_index[record.period.as_str()];
        cells[d][p] += 1;
    }

    Heatmap {
        days: days.into_iter().map(str::to_string).collect(),
        periods: periods.into_iter().map(str::to_string).collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GROUP_NOTIFICATION, MEDIA_PLACEHOLDER};
    use crate::utils::derive_time_fields;

    fn record(user: &str, message: &str, timestamp: &str) -> ChatRecord {
        ChatRecord::new(user, message, derive_time_fields(timestamp).unwrap())
    }

    fn sample() -> Vec<ChatRecord> {
        vec![
            record(GROUP_NOTIFICATION, "Asha created group \"Trip\"", "2024-01-15 09:00:00"),
            record("Asha", "Hello everyone 😀\n", "2024-01-15 09:05:00"),
            record("Ravi", "hi Asha see https://example.com\n", "2024-01-15 09:30:00"),
            record("Asha", MEDIA_PLACEHOLDER, "2024-01-16 21:10:00"),
            record("Meera", "trip plan trip plan 😀😀 👍\n", "2024-02-03 23:45:00"),
            record("Ravi", "plan is fine\n", "2024-02-03 23:50:00"),
            record("Asha", "ok 👍\n", "2024-03-04 00:15:00"),
        ]
    }

    #[test]
    fn test_filter_overall_returns_everything() {
        let records = sample();
        let all = filter_by_user(OVERALL, &records);
        assert!(all.into_iter().eq(records.iter()));
    }

    #[test]
    fn test_filter_by_user() {
        let records = sample();
        let asha = filter_by_user("Asha", &records);
        assert_eq!(asha.len(), 3);
        assert!(asha.iter().all(|r| r.user == "Asha"));
        assert!(filter_by_user("Nobody", &records).is_empty());
    }

    #[test]
    fn test_basic_stats_two_record_example() {
        let records = vec![
            record("A", "hi", "2024-01-01 10:00:00"),
            record("B", MEDIA_PLACEHOLDER, "2024-01-01 10:01:00"),
        ];
        let stats = basic_stats(OVERALL, &records);
        assert_eq!(
            stats,
            BasicStats {
                messages: 2,
                words: 1,
                media_messages: 1,
                links: 0,
            }
        );
    }

    #[test]
    fn test_basic_stats_message_count_matches_filter() {
        let records = sample();
        for user in [OVERALL, "Asha", "Ravi", "Meera", "Nobody"] {
            assert_eq!(
                basic_stats(user, &records).messages,
                filter_by_user(user, &records).len()
            );
        }
    }

    #[test]
    fn test_basic_stats_counts_words_and_links() {
        let records = sample();
        let ravi = basic_stats("Ravi", &records);
        assert_eq!(ravi.words, 7);
        assert_eq!(ravi.links, 1);
        assert_eq!(ravi.media_messages, 0);

        let asha = basic_stats("Asha", &records);
        assert_eq!(asha.media_messages, 1);
        assert_eq!(asha.words, 5);
    }

    #[test]
    fn test_top_users_counts_and_shares() {
        let records = sample();
        let busy = top_users(&records, 2);

        assert_eq!(busy.top.len(), 2);
        assert_eq!(
            busy.top[0],
            UserCount {
                user: "Asha".to_string(),
                messages: 3
            }
        );
        assert_eq!(busy.top[1].messages, 2);
        assert_eq!(busy.shares.len(), 4);

        for entry in &busy.top {
            assert_eq!(entry.messages, filter_by_user(&entry.user, &records).len());
        }

        let sum: f64 = busy.shares.iter().map(|s| s.percent).sum();
        assert!(sum <= 100.0 + 1e-9);
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_users_ties_are_unordered() {
        let records = vec![
            record("A", "x", "2024-01-01 10:00:00"),
            record("B", "y", "2024-01-01 10:00:00"),
        ];
        let busy = top_users(&records, 5);
        let mut users: Vec<_> = busy.top.iter().map(|u| u.user.as_str()).collect();
        users.sort();
        assert_eq!(users, vec!["A", "B"]);
        assert!(busy.shares.iter().all(|s| (s.percent - 50.0).abs() < 1e-9));
    }

    #[test]
    fn test_top_users_empty() {
        let busy = top_users(&[], 5);
        assert!(busy.top.is_empty());
        assert!(busy.shares.is_empty());
    }

    #[test]
    fn test_word_frequency_excludes_stop_words() {
        let records = sample();
        let stop_words = StopWords::from_words(["is", "hi", "PLAN"]);
        let words = word_frequency(OVERALL, &records, &stop_words, 20);

        assert!(words.iter().all(|(w, _)| !stop_words.contains(w)));
        assert_eq!(words[0], ("trip".to_string(), 2));
    }

    #[test]
    fn test_word_frequency_skips_notifications_and_media() {
        let records = sample();
        let words = word_frequency(OVERALL, &records, &StopWords::default(), 100);

        assert!(words.iter().all(|(w, _)| w != "created" && w != "<media"));
        assert_eq!(words[0], ("plan".to_string(), 3));
        assert!(words.contains(&("hello".to_string(), 1)));
    }

    #[test]
    fn test_word_frequency_limit() {
        let records = sample();
        let words = word_frequency(OVERALL, &records, &StopWords::default(), 3);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_emoji_frequency() {
        let records = sample();
        let emojis = emoji_frequency(OVERALL, &records);
        assert_eq!(
            emojis,
            vec![("😀".to_string(), 3), ("👍".to_string(), 2)]
        );

        let ravi = emoji_frequency("Ravi", &records);
        assert!(ravi.is_empty());
    }

    #[test]
    fn test_emoji_frequency_skin_tone_and_variation_selector() {
        let records = vec![
            record("A", "👍🏽 nice", "2024-01-01 10:00:00"),
            record("B", "❤\u{fe0f}❤\u{fe0f}", "2024-01-01 10:01:00"),
        ];
        let emojis = emoji_frequency(OVERALL, &records);
        assert_eq!(
            emojis,
            vec![
                ("❤".to_string(), 2),
                ("👍".to_string(), 1),
                ("🏽".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_monthly_timeline_is_chronological() {
        let mut records = sample();
        records.reverse();
        let timeline = monthly_timeline(OVERALL, &records);

        let labels: Vec<_> = timeline.iter().map(MonthlyBucket::label).collect();
        assert_eq!(labels, vec!["January-2024", "February-2024", "March-2024"]);
        let counts: Vec<_> = timeline.iter().map(|b| b.messages).collect();
        assert_eq!(counts, vec![4, 2, 1]);
    }

    #[test]
    fn test_daily_timeline() {
        let records = sample();
        let timeline = daily_timeline("Asha", &records);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(timeline.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(timeline.iter().map(|b| b.messages).sum::<usize>(), 3);
    }

    #[test]
    fn test_weekly_and_monthly_activity() {
        let records = sample();

        let weekly = weekly_activity(OVERALL, &records);
        assert_eq!(weekly[0], ("Monday".to_string(), 4));
        assert_eq!(weekly.iter().map(|(_, n)| n).sum::<usize>(), records.len());

        let monthly = monthly_activity(OVERALL, &records);
        assert_eq!(monthly[0], ("January".to_string(), 4));
        assert!(monthly.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_activity_heatmap_fills_missing_cells() {
        let records = sample();
        let heatmap = activity_heatmap(OVERALL, &records);

        assert_eq!(heatmap.days, vec!["Monday", "Saturday", "Tuesday"]);
        assert_eq!(heatmap.count("Monday", "9-10"), 3);
        assert_eq!(heatmap.count("Saturday", "23-00"), 2);
        assert_eq!(heatmap.count("Monday", "00-1"), 1);
        assert_eq!(heatmap.count("Tuesday", "9-10"), 0);
        assert_eq!(heatmap.count("Sunday", "9-10"), 0);
        assert_eq!(heatmap.total(), records.len());
        assert!(heatmap
            .cells
            .iter()
            .all(|row| row.len() == heatmap.periods.len()));
    }

    #[test]
    fn test_heatmap_count_with_ragged_cells() {
        let heatmap = Heatmap {
            days: vec!["Monday".to_string(), "Tuesday".to_string()],
            periods: vec!["9-10".to_string(), "10-11".to_string()],
            cells: vec![vec![4]],
        };
        assert_eq!(heatmap.count("Monday", "9-10"), 4);
        assert_eq!(heatmap.count("Monday", "10-11"), 0);
        assert_eq!(heatmap.count("Tuesday", "9-10"), 0);
    }

    #[test]
    fn test_empty_input_views() {
        let records: Vec<ChatRecord> = Vec::new();
        assert_eq!(basic_stats(OVERALL, &records), BasicStats::default());
        assert!(emoji_frequency(OVERALL, &records).is_empty());
        assert!(monthly_timeline(OVERALL, &records).is_empty());
        assert!(activity_heatmap(OVERALL, &records).is_empty());
    }
}
