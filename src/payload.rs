//! Topic payload types, classification, and encoding.
//!
//! Every message carried on an iBird topic is a small UTF-8 JSON object.
//! The shape of the object determines its role in the feed: a content
//! post, a reply, a reaction, or topic-housekeeping metadata. This module
//! defines the [`Payload`] union and the explicit decoder that classifies
//! a raw payload into exactly one variant.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A classified topic payload.
///
/// Classification is mutually exclusive and total: every syntactically
/// valid JSON object maps to exactly one variant. Objects that set more
/// than one distinguishing field are ambiguous and classify as
/// [`Payload::Unrecognized`] rather than being resolved by field order.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A top-level content post
    Content {
        /// Post text
        message: String,
        /// Optional media reference (storage network CID or URL)
        media: Option<String>,
    },

    /// A reply to an earlier message, referenced by sequence number
    Reply {
        /// Sequence number of the message being replied to
        reply_to: u64,
        /// Reply text
        message: String,
        /// Optional media reference
        media: Option<String>,
    },

    /// A like reaction targeting an earlier message
    Like {
        /// Sequence number of the liked message
        like_to: u64,
    },

    /// A dislike reaction targeting an earlier message
    Dislike {
        /// Sequence number of the disliked message
        dislike_to: u64,
    },

    /// Topic-housekeeping metadata (e.g., the initiator record written
    /// when a topic is created); excluded from the content view
    Metadata {
        /// Application identifier carried by the metadata record
        identifier: String,
    },

    /// A payload that parsed as JSON but fits no known shape
    Unrecognized,
}

/// Wire representation of a payload: optional fields, camelCase keys,
/// sequence references as decimal strings.
#[derive(Debug, Default, Deserialize, Serialize)]
struct RawPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media: Option<String>,
    #[serde(rename = "replyTo", default, skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
    #[serde(rename = "likeTo", default, skip_serializing_if = "Option::is_none")]
    like_to: Option<String>,
    #[serde(
        rename = "dislikeTo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    dislike_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
}

impl Payload {
    /// Decode and classify a raw payload.
    ///
    /// Returns an error only when the bytes are not a valid JSON object;
    /// a well-formed object that fits no known shape classifies as
    /// [`Payload::Unrecognized`] instead of failing.
    ///
    /// # Classification rule
    ///
    /// Exactly one of `identifier`, `likeTo`, `dislikeTo`, `replyTo` may
    /// be set. If more than one is set the payload is ambiguous and
    /// classifies as `Unrecognized`. With none set, a non-empty `message`
    /// makes the payload `Content`; `replyTo` additionally requires a
    /// non-empty `message`. Sequence references must parse as unsigned
    /// decimal integers.
    pub fn decode(data: &[u8]) -> Result<Payload> {
        let raw: RawPayload = serde_json::from_slice(data)?;
        Ok(Self::classify(raw))
    }

    fn classify(raw: RawPayload) -> Payload {
        let distinguishing = [
            raw.identifier.is_some(),
            raw.like_to.is_some(),
            raw.dislike_to.is_some(),
            raw.reply_to.is_some(),
        ];
        if distinguishing.iter().filter(|set| **set).count() > 1 {
            return Payload::Unrecognized;
        }

        if let Some(identifier) = raw.identifier {
            return Payload::Metadata { identifier };
        }
        if let Some(target) = raw.like_to {
            return match parse_sequence(&target) {
                Some(like_to) => Payload::Like { like_to },
                None => Payload::Unrecognized,
            };
        }
        if let Some(target) = raw.dislike_to {
            return match parse_sequence(&target) {
                Some(dislike_to) => Payload::Dislike { dislike_to },
                None => Payload::Unrecognized,
            };
        }
        if let Some(target) = raw.reply_to {
            let message = match raw.message {
                Some(message) if !message.trim().is_empty() => message,
                _ => return Payload::Unrecognized,
            };
            return match parse_sequence(&target) {
                Some(reply_to) => Payload::Reply {
                    reply_to,
                    message,
                    media: raw.media,
                },
                None => Payload::Unrecognized,
            };
        }
        match raw.message {
            Some(message) if !message.trim().is_empty() => Payload::Content {
                message,
                media: raw.media,
            },
            _ => Payload::Unrecognized,
        }
    }

    /// Encode the payload as the exact JSON bytes to submit to a topic.
    ///
    /// Signing and submission are external; this only produces the
    /// message body. `Unrecognized` payloads cannot be encoded.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let raw = match self {
            Payload::Content { message, media } => RawPayload {
                message: Some(message.clone()),
                media: media.clone(),
                ..RawPayload::default()
            },
            Payload::Reply {
                reply_to,
                message,
                media,
            } => RawPayload {
                message: Some(message.clone()),
                media: media.clone(),
                reply_to: Some(reply_to.to_string()),
                ..RawPayload::default()
            },
            Payload::Like { like_to } => RawPayload {
                like_to: Some(like_to.to_string()),
                ..RawPayload::default()
            },
            Payload::Dislike { dislike_to } => RawPayload {
                dislike_to: Some(dislike_to.to_string()),
                ..RawPayload::default()
            },
            Payload::Metadata { identifier } => RawPayload {
                identifier: Some(identifier.clone()),
                ..RawPayload::default()
            },
            Payload::Unrecognized => {
                return Err(Error::InvalidPayload(
                    "Unrecognized payloads cannot be encoded".to_string(),
                ))
            }
        };
        Ok(serde_json::to_vec(&raw)?)
    }

    /// Check if this payload is a like or dislike reaction.
    pub fn is_reaction(&self) -> bool {
        matches!(self, Payload::Like { .. } | Payload::Dislike { .. })
    }

    /// Get the sequence number this payload references, if any.
    pub fn reference(&self) -> Option<u64> {
        match self {
            Payload::Reply { reply_to, .. } => Some(*reply_to),
            Payload::Like { like_to } => Some(*like_to),
            Payload::Dislike { dislike_to } => Some(*dislike_to),
            _ => None,
        }
    }

    /// Short role name for diagnostics.
    pub fn role(&self) -> &'static str {
        match self {
            Payload::Content { .. } => "content",
            Payload::Reply { .. } => "reply",
            Payload::Like { .. } => "like",
            Payload::Dislike { .. } => "dislike",
            Payload::Metadata { .. } => "metadata",
            Payload::Unrecognized => "unrecognized",
        }
    }
}

/// Parse a sequence reference carried as a decimal string.
fn parse_sequence(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
