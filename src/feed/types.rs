//! Core types for the aggregated feed view.

/// One annotated entry in the hierarchical feed view.
///
/// Carries the content fields of the underlying record plus reaction and
/// reply annotations computed against the full accumulated record set.
/// `comment_count` counts every reply record referencing this entry;
/// `replies` holds the ones actually attached, which can be fewer when a
/// depth cap truncated the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PostEntry {
    /// Sequence number of the underlying record
    pub sequence_number: u64,
    /// Sender account identifier
    pub sender: String,
    /// Opaque ordering/display timestamp
    pub consensus_timestamp: String,
    /// Post or reply text
    pub message: String,
    /// Optional media reference
    pub media: Option<String>,
    /// Count of like records targeting this entry
    pub likes: u64,
    /// Count of dislike records targeting this entry
    pub dislikes: u64,
    /// Count of reply records targeting this entry
    pub comment_count: u64,
    /// Attached replies, each annotated by the same rule
    pub replies: Vec<PostEntry>,
}

impl PostEntry {
    /// Number of replies actually attached to this entry.
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Check if this entry has any attached replies.
    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }

    /// Count this entry and every attached descendant.
    ///
    /// Walks the subtree with an explicit stack, so arbitrarily deep
    /// reply chains are fine.
    pub fn total_entries(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(entry) = stack.pop() {
            count += 1;
            stack.extend(entry.replies.iter());
        }
        count
    }

    /// Get the maximum attached reply depth below this entry (0 if none).
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((entry, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for reply in &entry.replies {
                stack.push((reply, depth + 1));
            }
        }
        deepest
    }

    /// Find an entry by sequence number in this subtree.
    pub fn find_by_sequence(&self, sequence_number: u64) -> Option<&PostEntry> {
        let mut stack = vec![self];
        while let Some(entry) = stack.pop() {
            if entry.sequence_number == sequence_number {
                return Some(entry);
            }
            stack.extend(entry.replies.iter());
        }
        None
    }
}

/// The hierarchical view over one topic's accumulated records.
///
/// Holds the annotated top-level posts in the relative order their
/// records appeared in the input. The view is a pure snapshot: it is
/// recomputed wholesale from the flat set, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedView {
    posts: Vec<PostEntry>,
    truncated: usize,
}

impl FeedView {
    /// Create a view from annotated posts and a truncation count.
    pub fn new(posts: Vec<PostEntry>, truncated: usize) -> Self {
        Self { posts, truncated }
    }

    /// Get the top-level posts.
    pub fn posts(&self) -> &[PostEntry] {
        &self.posts
    }

    /// Get the number of top-level posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Check if the view has no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of reply entries cut off by the depth cap.
    ///
    /// Zero unless the input contained reply chains deeper than the
    /// configured maximum.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Total number of entries across all posts and attached replies.
    pub fn total_entries(&self) -> usize {
        self.iter_entries().count()
    }

    /// Find an entry anywhere in the view by sequence number.
    pub fn find_by_sequence(&self, sequence_number: u64) -> Option<&PostEntry> {
        self.posts
            .iter()
            .find_map(|p| p.find_by_sequence(sequence_number))
    }

    /// Iterate over all entries in the view (depth-first traversal).
    pub fn iter_entries(&self) -> EntryIterator<'_> {
        EntryIterator::new(&self.posts)
    }

    /// Iterate over the top-level posts.
    pub fn iter(&self) -> impl Iterator<Item = &PostEntry> {
        self.posts.iter()
    }
}

impl IntoIterator for FeedView {
    type Item = PostEntry;
    type IntoIter = std::vec::IntoIter<PostEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeedView {
    type Item = &'a PostEntry;
    type IntoIter = std::slice::Iter<'a, PostEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

/// Iterator over all entries in a feed view (depth-first traversal).
pub struct EntryIterator<'a> {
    stack: Vec<&'a PostEntry>,
}

impl<'a> EntryIterator<'a> {
    fn new(posts: &'a [PostEntry]) -> Self {
        // Push posts in reverse order so they're yielded left-to-right
        Self {
            stack: posts.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for EntryIterator<'a> {
    type Item = &'a PostEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        for reply in entry.replies.iter().rev() {
            self.stack.push(reply);
        }
        Some(entry)
    }
}
