//! Feed aggregation: from a flat topic log to a hierarchical view.
//!
//! A topic's log is a flat sequence of records: posts, replies,
//! reactions, housekeeping. This module turns that flat set into the
//! annotated, nested view a timeline renders:
//!
//! - [`build_feed`]: the pure aggregation pass over a record slice
//! - [`FeedAccumulator`]: grows the record set across paginated fetches
//! - [`PostEntry`] / [`FeedView`]: the resulting annotated tree
//! - [`MirrorFeedExt`]: one-call fetch-and-aggregate on a mirror client
//!
//! # Example
//!
//! ```
//! use ibird::feed::{build_feed, BuildOptions};
//! use ibird::mirror::TopicRecord;
//! use ibird::payload::Payload;
//!
//! let records = vec![
//!     TopicRecord {
//!         sequence_number: 1,
//!         sender: "0.0.1001".to_string(),
//!         consensus_timestamp: "1700000001.000000000".to_string(),
//!         payload: Payload::Content {
//!             message: "Hello world".to_string(),
//!             media: None,
//!         },
//!     },
//!     TopicRecord {
//!         sequence_number: 2,
//!         sender: "0.0.1002".to_string(),
//!         consensus_timestamp: "1700000002.000000000".to_string(),
//!         payload: Payload::Like { like_to: 1 },
//!     },
//! ];
//!
//! let feed = build_feed(&records, &BuildOptions::default());
//! assert_eq!(feed.len(), 1);
//! assert_eq!(feed.posts()[0].likes, 1);
//! ```

mod accumulator;
mod algorithm;
mod ext;
mod types;

pub use accumulator::FeedAccumulator;
pub use algorithm::{build_feed, BuildOptions};
pub use ext::MirrorFeedExt;
pub use types::{EntryIterator, FeedView, PostEntry};
