//! Session-scoped accumulation of paginated topic records.
//!
//! A viewing session grows one flat record set across paginated mirror
//! fetches, deduplicated by sequence number, and rebuilds the feed view
//! from scratch whenever a render needs it. The set is discarded when
//! the viewed topic changes; [`FeedAccumulator::clear`] covers reuse.

use std::collections::HashMap;

use crate::mirror::{MirrorPage, TopicRecord};

use super::algorithm::{build_feed, BuildOptions};
use super::types::FeedView;

/// Accumulates the flat record set for one topic across paginated fetches.
///
/// Records are deduplicated by sequence number and kept in first-seen
/// order, which is the order the built view presents top-level posts in.
/// Pages may arrive in ascending or descending order; the accumulator
/// does not care.
#[derive(Debug, Clone, Default)]
pub struct FeedAccumulator {
    topic_id: String,
    records: HashMap<u64, TopicRecord>,
    // First-seen order of sequence numbers; drives view ordering
    order: Vec<u64>,
    pages_absorbed: usize,
}

impl FeedAccumulator {
    /// Create an accumulator for the given topic.
    pub fn new(topic_id: &str) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            records: HashMap::new(),
            order: Vec::new(),
            pages_absorbed: 0,
        }
    }

    /// Create an accumulator with pre-allocated capacity.
    pub fn with_capacity(topic_id: &str, capacity: usize) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            records: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            pages_absorbed: 0,
        }
    }

    /// Get the topic this accumulator belongs to.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Get the number of accumulated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the accumulator holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if a sequence number has been accumulated.
    pub fn contains(&self, sequence_number: u64) -> bool {
        self.records.contains_key(&sequence_number)
    }

    /// Get an accumulated record by sequence number.
    pub fn get(&self, sequence_number: u64) -> Option<&TopicRecord> {
        self.records.get(&sequence_number)
    }

    /// Highest sequence number seen so far.
    pub fn latest_sequence(&self) -> Option<u64> {
        self.records.keys().max().copied()
    }

    /// Lowest sequence number seen so far.
    pub fn earliest_sequence(&self) -> Option<u64> {
        self.records.keys().min().copied()
    }

    /// Number of pages absorbed via [`FeedAccumulator::add_page`].
    pub fn pages_absorbed(&self) -> usize {
        self.pages_absorbed
    }

    /// Add a single record. Returns `false` if its sequence number was
    /// already present (the duplicate is discarded).
    pub fn add_record(&mut self, record: TopicRecord) -> bool {
        let sequence_number = record.sequence_number;
        if self.records.contains_key(&sequence_number) {
            log::debug!(
                "topic {}: duplicate record {sequence_number} discarded",
                self.topic_id
            );
            return false;
        }
        self.order.push(sequence_number);
        self.records.insert(sequence_number, record);
        true
    }

    /// Add many records, deduplicating by sequence number.
    ///
    /// Returns the number of records actually added.
    pub fn add_records(&mut self, records: impl IntoIterator<Item = TopicRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.add_record(record) {
                added += 1;
            }
        }
        added
    }

    /// Decode and absorb one mirror page.
    ///
    /// Records that fail to decode are dropped individually; duplicates
    /// of already-absorbed sequence numbers are discarded. Returns the
    /// number of new records added.
    pub fn add_page(&mut self, page: &MirrorPage) -> usize {
        let added = self.add_records(page.decode_records());
        self.pages_absorbed += 1;
        added
    }

    /// Build the hierarchical view over the current record set.
    ///
    /// The accumulator retains its records; callers re-invoke this after
    /// each fetch-merge step rather than patching an earlier view.
    pub fn build(&self, options: &BuildOptions) -> FeedView {
        let records: Vec<TopicRecord> = self
            .order
            .iter()
            .filter_map(|sequence| self.records.get(sequence).cloned())
            .collect();
        build_feed(&records, options)
    }

    /// Build the view and consume the accumulator.
    pub fn into_feed(mut self, options: &BuildOptions) -> FeedView {
        let records: Vec<TopicRecord> = self
            .order
            .iter()
            .filter_map(|sequence| self.records.remove(sequence))
            .collect();
        build_feed(&records, options)
    }

    /// Drop all accumulated records, keeping the topic binding.
    pub fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
        self.pages_absorbed = 0;
    }

    /// Merge another accumulator's records into this one.
    pub fn merge(&mut self, other: FeedAccumulator) {
        for sequence in other.order {
            if let Some(record) = other.records.get(&sequence) {
                self.add_record(record.clone());
            }
        }
        self.pages_absorbed += other.pages_absorbed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn content(seq: u64, message: &str) -> TopicRecord {
        TopicRecord {
            sequence_number: seq,
            sender: "0.0.1001".to_string(),
            consensus_timestamp: format!("{seq}.000000000"),
            payload: Payload::Content {
                message: message.to_string(),
                media: None,
            },
        }
    }

    fn like(seq: u64, like_to: u64) -> TopicRecord {
        TopicRecord {
            sequence_number: seq,
            sender: "0.0.1002".to_string(),
            consensus_timestamp: format!("{seq}.000000000"),
            payload: Payload::Like { like_to },
        }
    }

    #[test]
    fn test_accumulator_new() {
        let acc = FeedAccumulator::new("0.0.4242");
        assert_eq!(acc.topic_id(), "0.0.4242");
        assert!(acc.is_empty());
        assert_eq!(acc.len(), 0);
        assert!(acc.latest_sequence().is_none());
    }

    #[test]
    fn test_accumulator_add_and_dedup() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        assert!(acc.add_record(content(1, "Hello")));
        assert!(!acc.add_record(content(1, "Hello again")));
        assert_eq!(acc.len(), 1);
        // First arrival wins
        assert!(matches!(
            &acc.get(1).unwrap().payload,
            Payload::Content { message, .. } if message == "Hello"
        ));
    }

    #[test]
    fn test_accumulator_sequence_bounds() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        acc.add_record(content(5, "a"));
        acc.add_record(content(2, "b"));
        acc.add_record(content(9, "c"));
        assert_eq!(acc.earliest_sequence(), Some(2));
        assert_eq!(acc.latest_sequence(), Some(9));
    }

    #[test]
    fn test_accumulator_build_preserves_first_seen_order() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        // Descending fetch order, as a newest-first mirror page delivers
        acc.add_record(content(9, "Newest"));
        acc.add_record(content(5, "Older"));
        let view = acc.build(&BuildOptions::default());
        let order: Vec<u64> = view.iter().map(|p| p.sequence_number).collect();
        assert_eq!(order, vec![9, 5]);
    }

    #[test]
    fn test_accumulator_rebuild_after_merge_step() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        acc.add_record(content(1, "Hello"));

        let first = acc.build(&BuildOptions::default());
        assert_eq!(first.posts()[0].likes, 0);

        // A later page supplies the reaction; the next build sees it
        acc.add_record(like(2, 1));
        let second = acc.build(&BuildOptions::default());
        assert_eq!(second.posts()[0].likes, 1);

        // The accumulator still holds everything
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_accumulator_add_records_counts_new_only() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        acc.add_record(content(1, "Hello"));
        let added = acc.add_records(vec![content(1, "dup"), content(2, "new")]);
        assert_eq!(added, 1);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_accumulator_clear() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        acc.add_record(content(1, "Hello"));
        acc.clear();
        assert!(acc.is_empty());
        assert_eq!(acc.pages_absorbed(), 0);
        assert_eq!(acc.topic_id(), "0.0.4242");
    }

    #[test]
    fn test_accumulator_merge() {
        let mut left = FeedAccumulator::new("0.0.4242");
        left.add_record(content(1, "Hello"));

        let mut right = FeedAccumulator::new("0.0.4242");
        right.add_record(content(1, "dup"));
        right.add_record(like(2, 1));

        left.merge(right);
        assert_eq!(left.len(), 2);
        let view = left.build(&BuildOptions::default());
        assert_eq!(view.posts()[0].likes, 1);
    }

    #[test]
    fn test_accumulator_into_feed() {
        let mut acc = FeedAccumulator::new("0.0.4242");
        acc.add_record(content(1, "Hello"));
        acc.add_record(like(2, 1));
        let view = acc.into_feed(&BuildOptions::default());
        assert_eq!(view.len(), 1);
        assert_eq!(view.posts()[0].likes, 1);
    }
}
