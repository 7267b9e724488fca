//! # ibird
//!
//! A sans-io client library for the iBird social protocol: posts,
//! replies, and reactions published as messages on distributed-ledger
//! topics and read back through a mirror node's REST API.
//!
//! ## Design Philosophy
//!
//! This library follows the "sans-io" design pattern:
//! - **Protocol Logic**: Payload classification, pagination, and feed
//!   aggregation are pure and byte-oriented
//! - **I/O Separation**: HTTP fetching lives behind the
//!   [`MirrorTransport`](client::MirrorTransport) seam; wallet signing
//!   and topic submission stay outside the library entirely
//! - **Flexibility**: Works with any HTTP stack or test double
//!
//! ## Examples
//!
//! ### Sans-IO Usage
//!
//! ```rust
//! use ibird::feed::{build_feed, BuildOptions, FeedAccumulator};
//! use ibird::mirror::MirrorPager;
//!
//! let mut pager = MirrorPager::new("0.0.4242");
//! let mut session = FeedAccumulator::new("0.0.4242");
//! while let Some(path) = pager.next_request() {
//!     // Perform the GET through your I/O layer, then:
//!     // pager.feed_page(&body)?;
//!     # let _ = path; break;
//! }
//! session.add_records(pager.into_records());
//! let feed = session.build(&BuildOptions::default());
//! ```
//!
//! ### With the HTTP Client
//!
//! ```rust,no_run
//! # #[cfg(feature = "mirror-client")]
//! # {
//! use ibird::client::MirrorClient;
//! use ibird::feed::MirrorFeedExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MirrorClient::new("https://mainnet.mirrornode.example.com");
//! let feed = client.recent_feed("0.0.4242", 100).await?;
//! # Ok(())
//! # }
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod compose;
pub mod error;
pub mod events;
pub mod feed;
pub mod mirror;
pub mod payload;
pub mod workflow;

// Mock mirror node for testing
pub mod mock;

pub use compose::PostComposer;
pub use error::{Error, Result};
pub use feed::{build_feed, BuildOptions, FeedAccumulator, FeedView, PostEntry};
pub use mirror::{MirrorPager, Order, TopicRecord};
pub use payload::Payload;
