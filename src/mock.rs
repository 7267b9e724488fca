//! Mock mirror node for testing purposes.
//!
//! [`MockMirror`] holds one topic's message log in memory and serves the
//! same paginated JSON pages a real mirror node would, including next
//! links and cursor parameters. It implements
//! [`MirrorTransport`](crate::client::MirrorTransport) so the full
//! client path can be exercised without a network.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::client::MirrorTransport;
use crate::error::{Error, Result};
use crate::mirror::{MirrorMessage, MirrorPage, PageLinks};
use crate::payload::Payload;

/// A mock mirror node serving one topic from memory.
#[derive(Debug, Clone)]
pub struct MockMirror {
    topic_id: String,
    messages: Vec<MirrorMessage>,
    next_sequence: u64,
}

impl MockMirror {
    /// Create a mock mirror with an empty topic.
    pub fn new(topic_id: &str) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            messages: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Get the topic this mirror serves.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Number of seeded messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the topic holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Seed a well-formed payload, returning its sequence number.
    pub fn seed_payload(&mut self, sender: &str, payload: &Payload) -> Result<u64> {
        let bytes = payload.encode()?;
        Ok(self.seed_raw(sender, &bytes))
    }

    /// Seed raw payload bytes, returning the sequence number.
    ///
    /// Accepts anything, including bytes that are not valid JSON; use
    /// this to simulate garbage records on the topic.
    pub fn seed_raw(&mut self, sender: &str, bytes: &[u8]) -> u64 {
        let sequence_number = self.next_sequence;
        self.next_sequence += 1;
        self.messages.push(MirrorMessage {
            sequence_number,
            consensus_timestamp: format!("{}.{:09}", 1_700_000_000 + sequence_number, 0),
            payer_account_id: sender.to_string(),
            message: BASE64.encode(bytes),
            topic_id: Some(self.topic_id.clone()),
        });
        sequence_number
    }

    /// Seed a message whose base64 itself is broken.
    pub fn seed_invalid_base64(&mut self, sender: &str) -> u64 {
        let sequence_number = self.next_sequence;
        self.next_sequence += 1;
        self.messages.push(MirrorMessage {
            sequence_number,
            consensus_timestamp: format!("{}.{:09}", 1_700_000_000 + sequence_number, 0),
            payer_account_id: sender.to_string(),
            message: "%%% not base64 %%%".to_string(),
            topic_id: Some(self.topic_id.clone()),
        });
        sequence_number
    }

    /// Serve a mirror API path, returning the JSON page body.
    ///
    /// Understands the topic message listing path with `limit`, `order`
    /// and `sequencenumber=gt:`/`lt:` cursor parameters, which is exactly
    /// what [`MirrorPager`](crate::mirror::MirrorPager) emits and
    /// follows. Unknown paths and unknown topics return an error.
    pub fn page_body(&self, path: &str) -> Result<Vec<u8>> {
        let (route, query) = match path.split_once('?') {
            Some((route, query)) => (route, query),
            None => (path, ""),
        };

        let expected = format!("/api/v1/topics/{}/messages", self.topic_id);
        if route != expected {
            return Err(Error::Mirror {
                status: 404,
                message: format!("Not found: {route}"),
            });
        }

        let mut limit: usize = 25;
        let mut descending = true;
        let mut above: Option<u64> = None;
        let mut below: Option<u64> = None;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "limit" => {
                    limit = value.parse().map_err(|_| Error::Mirror {
                        status: 400,
                        message: format!("Bad limit: {value}"),
                    })?;
                }
                "order" => descending = value != "asc",
                "sequencenumber" => {
                    let (op, raw) = value.split_once(':').unwrap_or(("eq", value));
                    let bound: u64 = raw.parse().map_err(|_| Error::Mirror {
                        status: 400,
                        message: format!("Bad sequence cursor: {value}"),
                    })?;
                    match op {
                        "gt" => above = Some(bound),
                        "lt" => below = Some(bound),
                        _ => {
                            return Err(Error::Mirror {
                                status: 400,
                                message: format!("Unsupported cursor operator: {op}"),
                            })
                        }
                    }
                }
                _ => {}
            }
        }

        let mut matching: Vec<&MirrorMessage> = self
            .messages
            .iter()
            .filter(|m| above.map_or(true, |b| m.sequence_number > b))
            .filter(|m| below.map_or(true, |b| m.sequence_number < b))
            .collect();
        matching.sort_by_key(|m| m.sequence_number);
        if descending {
            matching.reverse();
        }

        let has_more = matching.len() > limit;
        let served: Vec<MirrorMessage> = matching.into_iter().take(limit).cloned().collect();

        let next = if has_more {
            let last = served.last().map(|m| m.sequence_number).unwrap_or(0);
            let cursor = if descending {
                format!("lt:{last}")
            } else {
                format!("gt:{last}")
            };
            let order = if descending { "desc" } else { "asc" };
            Some(format!(
                "{expected}?limit={limit}&order={order}&sequencenumber={cursor}"
            ))
        } else {
            None
        };

        let page = MirrorPage {
            messages: served,
            links: PageLinks { next },
        };
        serde_json::to_vec(&page).map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl MirrorTransport for MockMirror {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.page_body(path)
    }
}
