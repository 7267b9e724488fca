//! Extension trait for high-level feed operations.
//!
//! This module defines the `MirrorFeedExt` trait which adds feed-aware
//! operations to mirror clients.

use async_trait::async_trait;

use crate::client::{MirrorClient, MirrorTransport};
use crate::error::Result;
use crate::mirror::{MirrorPager, Order};

use super::accumulator::FeedAccumulator;
use super::algorithm::BuildOptions;
use super::types::FeedView;

/// Extension trait adding high-level feed operations to mirror clients.
///
/// Builds on the low-level pagination operations to fetch a whole topic
/// and aggregate it into the hierarchical feed view in one call.
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "mirror-client")]
/// # async fn run() -> ibird::Result<()> {
/// use ibird::client::MirrorClient;
/// use ibird::feed::MirrorFeedExt;
///
/// let client = MirrorClient::new("https://mainnet.mirrornode.example.com");
/// let feed = client.recent_feed("0.0.4242", 100).await?;
/// for post in feed.iter() {
///     println!("{} ({} likes)", post.message, post.likes);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MirrorFeedExt {
    /// Fetch a topic into an accumulator, following pagination links.
    ///
    /// At most `max_pages` pages are fetched when a bound is given.
    async fn fetch_accumulator(
        &self,
        topic_id: &str,
        limit: u32,
        order: Order,
        max_pages: Option<usize>,
    ) -> Result<FeedAccumulator>;

    /// Fetch a whole topic and build its feed view.
    async fn fetch_feed(&self, topic_id: &str, options: &BuildOptions) -> Result<FeedView>;

    /// Get the most recent posts of a topic as a feed view.
    ///
    /// Fetches newest-first until `max_records` records have been
    /// accumulated or the topic is exhausted, then builds the view with
    /// default options.
    async fn recent_feed(&self, topic_id: &str, max_records: usize) -> Result<FeedView>;
}

#[async_trait]
impl<T: MirrorTransport> MirrorFeedExt for MirrorClient<T> {
    async fn fetch_accumulator(
        &self,
        topic_id: &str,
        limit: u32,
        order: Order,
        max_pages: Option<usize>,
    ) -> Result<FeedAccumulator> {
        let mut pager = MirrorPager::new(topic_id).with_limit(limit).with_order(order);
        let mut accumulator = FeedAccumulator::new(topic_id);
        while let Some(path) = pager.next_request() {
            if let Some(bound) = max_pages {
                if pager.pages_fetched() >= bound {
                    break;
                }
            }
            let body = self.transport().get(&path).await?;
            pager.feed_page(&body)?;
            accumulator.add_records(pager.take_records());
        }
        Ok(accumulator)
    }

    async fn fetch_feed(&self, topic_id: &str, options: &BuildOptions) -> Result<FeedView> {
        let records = self
            .fetch_topic(topic_id, MirrorPager::DEFAULT_LIMIT, Order::Desc, None)
            .await?;
        let mut accumulator = FeedAccumulator::new(topic_id);
        accumulator.add_records(records);
        Ok(accumulator.into_feed(options))
    }

    async fn recent_feed(&self, topic_id: &str, max_records: usize) -> Result<FeedView> {
        let mut pager = MirrorPager::new(topic_id).with_order(Order::Desc);
        let mut accumulator = FeedAccumulator::new(topic_id);
        while let Some(path) = pager.next_request() {
            if accumulator.len() >= max_records {
                break;
            }
            let body = self.transport().get(&path).await?;
            pager.feed_page(&body)?;
            accumulator.add_records(pager.take_records());
        }
        Ok(accumulator.into_feed(&BuildOptions::default()))
    }
}
