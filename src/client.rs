//! Async mirror client.
//!
//! [`MirrorClient`] drives a [`MirrorPager`] over a [`MirrorTransport`].
//! The transport is the only seam touching I/O: the default
//! [`HttpTransport`] speaks HTTP to a real mirror node (behind the
//! `mirror-client` feature), while [`MockMirror`](crate::mock::MockMirror)
//! implements the same trait for tests.

use async_trait::async_trait;

#[cfg(feature = "mirror-client")]
use crate::error::Error;
use crate::error::Result;
use crate::mirror::{MirrorPage, MirrorPager, Order, TopicRecord};

/// Transport seam for fetching mirror API paths.
///
/// Implementations resolve a path such as
/// `/api/v1/topics/0.0.4242/messages?limit=25&order=desc` and return the
/// raw response body. Non-success statuses are reported as
/// [`Error::Mirror`](crate::error::Error::Mirror).
#[async_trait]
pub trait MirrorTransport: Send + Sync {
    /// Fetch a mirror API path, returning the raw response body.
    async fn get(&self, path: &str) -> Result<Vec<u8>>;
}

/// HTTP transport backed by [`reqwest`].
#[cfg(feature = "mirror-client")]
#[cfg_attr(docsrs, doc(cfg(feature = "mirror-client")))]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

#[cfg(feature = "mirror-client")]
impl HttpTransport {
    /// Create a transport for a mirror node base URL, e.g.
    /// `https://mainnet.mirrornode.example.com`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "mirror-client")]
#[async_trait]
impl MirrorTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}{path}", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Mirror {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Async client for reading topics from a mirror node.
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "mirror-client")]
/// # async fn run() -> ibird::Result<()> {
/// use ibird::client::MirrorClient;
/// use ibird::feed::{build_feed, BuildOptions};
/// use ibird::mirror::Order;
///
/// let client = MirrorClient::new("https://mainnet.mirrornode.example.com");
/// let records = client.fetch_topic("0.0.4242", 25, Order::Desc, None).await?;
/// let feed = build_feed(&records, &BuildOptions::default());
/// println!("{} posts", feed.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MirrorClient<T> {
    transport: T,
}

#[cfg(feature = "mirror-client")]
impl MirrorClient<HttpTransport> {
    /// Create a client over HTTP for a mirror node base URL.
    #[cfg_attr(docsrs, doc(cfg(feature = "mirror-client")))]
    pub fn new(base_url: &str) -> Self {
        Self {
            transport: HttpTransport::new(base_url),
        }
    }
}

impl<T: MirrorTransport> MirrorClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and parse a single mirror API path.
    pub async fn fetch_page(&self, path: &str) -> Result<MirrorPage> {
        let body = self.transport.get(path).await?;
        MirrorPage::parse(&body)
    }

    /// Fetch a topic's records, following pagination links.
    ///
    /// Walks pages of `limit` records in the given order until the
    /// mirror stops handing out next links, or until `max_pages` pages
    /// have been fetched when a bound is given. Records that fail to
    /// decode are dropped individually.
    pub async fn fetch_topic(
        &self,
        topic_id: &str,
        limit: u32,
        order: Order,
        max_pages: Option<usize>,
    ) -> Result<Vec<TopicRecord>> {
        let mut pager = MirrorPager::new(topic_id).with_limit(limit).with_order(order);
        while let Some(path) = pager.next_request() {
            if let Some(bound) = max_pages {
                if pager.pages_fetched() >= bound {
                    break;
                }
            }
            let body = self.transport.get(&path).await?;
            pager.feed_page(&body)?;
        }
        log::debug!(
            "topic {topic_id}: fetched {} records over {} pages",
            pager.records().len(),
            pager.pages_fetched()
        );
        Ok(pager.into_records())
    }
}
