//! Day-bucketed index for range queries over timestamps (C2, §4.6).

use chrono::{DateTime, Utc};
use dashmap::DashMap;

const BUCKET_SECONDS: i64 = 86_400;

fn bucket_for(ts: DateTime<Utc>) -> i64 {
    ts.timestamp().div_euclid(BUCKET_SECONDS)
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    timestamp: DateTime<Utc>,
}

/// Maps a day-bucket to the keys whose timestamp falls in it. `query` unions
/// the buckets spanning `[from, to]` and filters down to the exact range,
/// returning keys sorted ascending by timestamp.
#[derive(Debug, Default)]
pub struct TimeIndex {
    buckets: DashMap<i64, Vec<Entry>>,
}

impl TimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, timestamp: DateTime<Utc>) {
        let key = key.into();
        self.buckets
            .entry(bucket_for(timestamp))
            .or_default()
            .push(Entry { key, timestamp });
    }

    pub fn query(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<String> {
        let start_bucket = bucket_for(from);
        let end_bucket = bucket_for(to);

        let mut matches: Vec<Entry> = (start_bucket..=end_bucket)
            .filter_map(|bucket| self.buckets.get(&bucket))
            .flat_map(|entries| entries.clone())
            .filter(|entry| entry.timestamp >= from && entry.timestamp <= to)
            .collect();

        matches.sort_by_key(|entry| entry.timestamp);
        matches.into_iter().map(|entry| entry.key).collect()
    }
}
