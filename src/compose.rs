//! Payload composition for posting.
//!
//! Composes and validates the payloads a wallet would sign and submit to
//! a topic. Signing and submission are external; this module only
//! produces well-formed [`Payload`]s and their wire bytes.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::payload::Payload;

/// Maximum encoded payload size accepted for a single topic submission.
///
/// Ledger topic messages are chunked at this boundary; the client keeps
/// each social payload within one chunk.
pub const MAX_PAYLOAD_BYTES: usize = 1024;

/// Builder for composing new posts and replies.
///
/// # Example
///
/// ```
/// use ibird::compose::PostComposer;
///
/// let payload = PostComposer::new()
///     .message("Hello from iBird!")
///     .build()
///     .unwrap();
/// let bytes = payload.encode().unwrap();
/// // Hand `bytes` to your wallet/submission layer
/// # let _ = bytes;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostComposer {
    message: Option<String>,
    media: Option<String>,
    reply_to: Option<u64>,
}

impl PostComposer {
    /// Create a new composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the post text (required).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a media reference (storage network CID or URL).
    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    /// Compose this post as a reply to an earlier message.
    pub fn reply_to(mut self, sequence_number: u64) -> Self {
        self.reply_to = Some(sequence_number);
        self
    }

    /// Validate and build the payload.
    pub fn build(self) -> Result<Payload> {
        let message = match self.message {
            Some(message) if !message.trim().is_empty() => message,
            _ => {
                return Err(Error::InvalidPayload(
                    "Post message must not be empty".to_string(),
                ))
            }
        };

        let payload = match self.reply_to {
            Some(reply_to) => Payload::Reply {
                reply_to,
                message,
                media: self.media,
            },
            None => Payload::Content {
                message,
                media: self.media,
            },
        };

        let encoded = payload.encode()?;
        if encoded.len() > MAX_PAYLOAD_BYTES {
            return Err(Error::InvalidPayload(format!(
                "Encoded payload is {} bytes, limit is {MAX_PAYLOAD_BYTES}",
                encoded.len()
            )));
        }
        Ok(payload)
    }

    /// Validate, build, and encode in one step.
    pub fn encode(self) -> Result<Bytes> {
        let payload = self.build()?;
        Ok(Bytes::from(payload.encode()?))
    }
}

/// Compose a like reaction targeting a message.
pub fn like(sequence_number: u64) -> Payload {
    Payload::Like {
        like_to: sequence_number,
    }
}

/// Compose a dislike reaction targeting a message.
pub fn dislike(sequence_number: u64) -> Payload {
    Payload::Dislike {
        dislike_to: sequence_number,
    }
}

/// Compose a topic-housekeeping metadata record.
///
/// Workflows write one of these as the first message of a freshly
/// created topic so readers can recognize it.
pub fn metadata(identifier: impl Into<String>) -> Result<Payload> {
    let identifier = identifier.into();
    if identifier.trim().is_empty() {
        return Err(Error::InvalidPayload(
            "Metadata identifier must not be empty".to_string(),
        ));
    }
    Ok(Payload::Metadata { identifier })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_content() {
        let payload = PostComposer::new().message("Hello").build().unwrap();
        assert_eq!(
            payload,
            Payload::Content {
                message: "Hello".to_string(),
                media: None
            }
        );
    }

    #[test]
    fn test_compose_reply_with_media() {
        let payload = PostComposer::new()
            .message("Look at this")
            .media("ipfs://cid")
            .reply_to(7)
            .build()
            .unwrap();
        assert_eq!(
            payload,
            Payload::Reply {
                reply_to: 7,
                message: "Look at this".to_string(),
                media: Some("ipfs://cid".to_string())
            }
        );
    }

    #[test]
    fn test_compose_rejects_empty_message() {
        assert!(PostComposer::new().build().is_err());
        assert!(PostComposer::new().message("   ").build().is_err());
    }

    #[test]
    fn test_compose_rejects_oversized_payload() {
        let huge = "x".repeat(MAX_PAYLOAD_BYTES + 1);
        let result = PostComposer::new().message(huge).build();
        assert!(matches!(result, Err(Error::InvalidPayload(_))));
    }

    #[test]
    fn test_compose_encode_round_trips() {
        let bytes = PostComposer::new().message("Hello").encode().unwrap();
        let decoded = Payload::decode(&bytes).unwrap();
        assert!(matches!(decoded, Payload::Content { .. }));
    }

    #[test]
    fn test_reactions() {
        assert_eq!(like(5), Payload::Like { like_to: 5 });
        assert_eq!(dislike(5), Payload::Dislike { dislike_to: 5 });
    }

    #[test]
    fn test_metadata() {
        let payload = metadata("ibird").unwrap();
        assert_eq!(
            payload,
            Payload::Metadata {
                identifier: "ibird".to_string()
            }
        );
        assert!(metadata(" ").is_err());
    }
}
