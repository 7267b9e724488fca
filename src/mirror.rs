//! Mirror API record types and sans-io pagination.
//!
//! The mirror is a read-only HTTP service exposing historical topic
//! messages, independent of the write path. This module decodes its JSON
//! pages into [`TopicRecord`]s and provides [`MirrorPager`], a sans-io
//! driver for walking a topic's pages: the caller performs each HTTP GET
//! however it likes and feeds the response body back in.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payload::Payload;

/// Page ordering for topic message listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Oldest messages first
    Asc,
    /// Newest messages first
    Desc,
}

impl Order {
    /// Query-parameter value for this ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// One raw message record as returned by the mirror API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MirrorMessage {
    /// Per-topic monotonically increasing position in the log
    pub sequence_number: u64,
    /// Opaque consensus timestamp string (seconds.nanoseconds)
    pub consensus_timestamp: String,
    /// Account that paid for the submission (the sender)
    #[serde(default)]
    pub payer_account_id: String,
    /// Base64-encoded payload bytes
    pub message: String,
    /// Topic this message belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

/// Pagination links carried on a mirror page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PageLinks {
    /// Path (with query string) of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
}

/// One page of a topic message listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MirrorPage {
    /// Raw message records on this page
    #[serde(default)]
    pub messages: Vec<MirrorMessage>,
    /// Pagination links
    #[serde(default)]
    pub links: PageLinks,
}

impl MirrorPage {
    /// Parse a page from a raw response body.
    pub fn parse(body: &[u8]) -> Result<MirrorPage> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decode all records on this page, silently dropping the ones whose
    /// payload cannot be decoded.
    ///
    /// Decode failure is per-record, never per-page: a record with broken
    /// base64 or non-JSON payload is logged at debug level and skipped.
    pub fn decode_records(&self) -> Vec<TopicRecord> {
        self.messages
            .iter()
            .filter_map(TopicRecord::from_mirror)
            .collect()
    }
}

/// A decoded topic record: identity fields plus the classified payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRecord {
    /// Per-topic sequence number (the identity key for references)
    pub sequence_number: u64,
    /// Sender account identifier
    pub sender: String,
    /// Opaque ordering/display timestamp
    pub consensus_timestamp: String,
    /// Classified payload
    pub payload: Payload,
}

impl TopicRecord {
    /// Decode a raw mirror record.
    ///
    /// Returns `None` when the payload bytes cannot be decoded; the
    /// caller is expected to drop such records from aggregation.
    pub fn from_mirror(message: &MirrorMessage) -> Option<TopicRecord> {
        let data = match BASE64.decode(&message.message) {
            Ok(data) => data,
            Err(err) => {
                log::debug!(
                    "dropping record {}: invalid base64 payload: {err}",
                    message.sequence_number
                );
                return None;
            }
        };
        let payload = match Payload::decode(&data) {
            Ok(payload) => payload,
            Err(err) => {
                log::debug!(
                    "dropping record {}: {err}",
                    message.sequence_number
                );
                return None;
            }
        };
        Some(TopicRecord {
            sequence_number: message.sequence_number,
            sender: message.payer_account_id.clone(),
            consensus_timestamp: message.consensus_timestamp.clone(),
            payload,
        })
    }
}

/// Sans-io pagination driver for one topic's message listing.
///
/// The pager produces the request path to fetch next and consumes raw
/// response bodies, accumulating decoded records until the mirror stops
/// handing out `links.next`.
///
/// # Example
///
/// ```
/// use ibird::mirror::MirrorPager;
///
/// let mut pager = MirrorPager::new("0.0.4242");
/// while let Some(path) = pager.next_request() {
///     // Perform the GET through your I/O layer, then:
///     // pager.feed_page(&body)?;
///     # let _ = path; break;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MirrorPager {
    topic_id: String,
    limit: u32,
    order: Order,
    next: Option<String>,
    started: bool,
    records: Vec<TopicRecord>,
    pages_fetched: usize,
}

impl MirrorPager {
    /// Default page size requested from the mirror.
    pub const DEFAULT_LIMIT: u32 = 25;

    /// Create a pager for a topic with default limit and descending order.
    pub fn new(topic_id: &str) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            limit: Self::DEFAULT_LIMIT,
            order: Order::Desc,
            next: None,
            started: false,
            records: Vec::new(),
            pages_fetched: 0,
        }
    }

    /// Set the page size requested from the mirror.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the page ordering.
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Get the topic this pager walks.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Get the request path for the next page, or `None` when the
    /// listing is exhausted.
    pub fn next_request(&self) -> Option<String> {
        if !self.started {
            return Some(format!(
                "/api/v1/topics/{}/messages?limit={}&order={}",
                self.topic_id,
                self.limit,
                self.order.as_str()
            ));
        }
        self.next.clone()
    }

    /// Feed a raw page body fetched from the mirror.
    ///
    /// Returns the number of records decoded from the page. Records that
    /// fail to decode are dropped individually; a body that is not a
    /// valid page at all is an error and leaves the pager unchanged.
    pub fn feed_page(&mut self, body: &[u8]) -> Result<usize> {
        let page = MirrorPage::parse(body)?;
        let decoded = page.decode_records();
        let count = decoded.len();
        self.records.extend(decoded);
        self.next = page.links.next;
        self.started = true;
        self.pages_fetched += 1;
        log::debug!(
            "topic {}: page {} fed, {count} records decoded",
            self.topic_id,
            self.pages_fetched
        );
        Ok(count)
    }

    /// Check whether the mirror has no further pages.
    pub fn is_exhausted(&self) -> bool {
        self.started && self.next.is_none()
    }

    /// Number of pages fed so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Records decoded so far, in fetch order.
    pub fn records(&self) -> &[TopicRecord] {
        &self.records
    }

    /// Take the records decoded so far, leaving the pager's cursor
    /// intact so the walk can continue.
    pub fn take_records(&mut self) -> Vec<TopicRecord> {
        std::mem::take(&mut self.records)
    }

    /// Consume the pager, returning the decoded records.
    pub fn into_records(self) -> Vec<TopicRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_payload(json: &str) -> String {
        BASE64.encode(json.as_bytes())
    }

    fn page_body(messages: &[(u64, &str)], next: Option<&str>) -> Vec<u8> {
        let page = MirrorPage {
            messages: messages
                .iter()
                .map(|(seq, json)| MirrorMessage {
                    sequence_number: *seq,
                    consensus_timestamp: format!("{seq}.000000000"),
                    payer_account_id: "0.0.1001".to_string(),
                    message: encode_payload(json),
                    topic_id: Some("0.0.4242".to_string()),
                })
                .collect(),
            links: PageLinks {
                next: next.map(|s| s.to_string()),
            },
        };
        serde_json::to_vec(&page).unwrap()
    }

    #[test]
    fn test_parse_page() {
        let body = page_body(&[(1, r#"{"message":"Hello"}"#)], None);
        let page = MirrorPage::parse(&body).unwrap();
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].sequence_number, 1);
        assert!(page.links.next.is_none());
    }

    #[test]
    fn test_parse_empty_page() {
        let page = MirrorPage::parse(b"{}").unwrap();
        assert!(page.messages.is_empty());
        assert!(page.links.next.is_none());
    }

    #[test]
    fn test_decode_records_drops_bad_base64() {
        let mut page = MirrorPage::parse(&page_body(
            &[(1, r#"{"message":"Hello"}"#)],
            None,
        ))
        .unwrap();
        page.messages.push(MirrorMessage {
            sequence_number: 2,
            consensus_timestamp: "2.000000000".to_string(),
            payer_account_id: "0.0.1001".to_string(),
            message: "%%% not base64 %%%".to_string(),
            topic_id: None,
        });

        let records = page.decode_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence_number, 1);
    }

    #[test]
    fn test_decode_records_drops_non_json_payload() {
        let body = page_body(&[(1, "plain text, not json")], None);
        let page = MirrorPage::parse(&body).unwrap();
        assert!(page.decode_records().is_empty());
    }

    #[test]
    fn test_decode_records_keeps_unrecognized_shapes() {
        // A valid JSON object of unknown shape stays in the set; the
        // aggregator ignores it later.
        let body = page_body(&[(1, r#"{"something":"else"}"#)], None);
        let page = MirrorPage::parse(&body).unwrap();
        let records = page.decode_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload, Payload::Unrecognized);
    }

    #[test]
    fn test_pager_initial_request() {
        let pager = MirrorPager::new("0.0.4242").with_limit(10).with_order(Order::Asc);
        assert_eq!(
            pager.next_request().unwrap(),
            "/api/v1/topics/0.0.4242/messages?limit=10&order=asc"
        );
        assert!(!pager.is_exhausted());
    }

    #[test]
    fn test_pager_follows_next_link() {
        let mut pager = MirrorPager::new("0.0.4242");

        let next = "/api/v1/topics/0.0.4242/messages?limit=25&order=desc&sequencenumber=lt:2";
        let count = pager
            .feed_page(&page_body(&[(3, r#"{"message":"Third"}"#)], Some(next)))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(pager.next_request().unwrap(), next);
        assert!(!pager.is_exhausted());

        pager
            .feed_page(&page_body(&[(1, r#"{"message":"First"}"#)], None))
            .unwrap();
        assert!(pager.is_exhausted());
        assert!(pager.next_request().is_none());
        assert_eq!(pager.pages_fetched(), 2);
        assert_eq!(pager.records().len(), 2);
    }

    #[test]
    fn test_pager_rejects_invalid_body() {
        let mut pager = MirrorPager::new("0.0.4242");
        assert!(pager.feed_page(b"<html>oops</html>").is_err());
        // Pager state unchanged: still on the initial request
        assert!(pager.next_request().unwrap().starts_with("/api/v1/topics/"));
        assert_eq!(pager.pages_fetched(), 0);
    }

    #[test]
    fn test_record_from_mirror() {
        let message = MirrorMessage {
            sequence_number: 7,
            consensus_timestamp: "7.000000000".to_string(),
            payer_account_id: "0.0.1001".to_string(),
            message: encode_payload(r#"{"replyTo":"3","message":"Nice!"}"#),
            topic_id: None,
        };
        let record = TopicRecord::from_mirror(&message).unwrap();
        assert_eq!(record.sequence_number, 7);
        assert_eq!(record.sender, "0.0.1001");
        assert_eq!(record.payload.reference(), Some(3));
    }
}
