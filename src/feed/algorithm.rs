//! Feed building algorithm.
//!
//! This module implements the pure transform from a flat, order-irrelevant
//! collection of topic records to the hierarchical, annotated feed view:
//! top-level posts carrying like/dislike/reply counts and recursively
//! nested reply trees.

use std::collections::{HashMap, HashSet};

use crate::mirror::TopicRecord;
use crate::payload::Payload;

use super::types::{FeedView, PostEntry};

/// Options controlling feed construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Maximum attached reply depth (root = 0). Replies nested deeper
    /// are counted as truncated instead of attached. `None` removes the
    /// cap; the build is iterative either way and cannot overflow the
    /// stack.
    pub max_depth: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(Self::DEFAULT_MAX_DEPTH),
        }
    }
}

impl BuildOptions {
    /// Default reply depth cap. Human conversations stay far shallower;
    /// the cap only guards against degenerate chains.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Options without a depth cap.
    pub fn unbounded() -> Self {
        Self { max_depth: None }
    }
}

/// Build the hierarchical feed view from the flat accumulated record set.
///
/// The transform is pure and total: it has no I/O, never fails, and
/// produces the same output for the same input. Top-level posts keep the
/// relative order their records appeared in `records`; replies under a
/// parent likewise keep input order.
///
/// Records play exactly one role each. Content records become roots;
/// reply records attach under the entry their `replyTo` names; like and
/// dislike records contribute only counts; metadata and unrecognized
/// records are ignored. Reactions or replies referencing a sequence
/// number with no entry in the current set (not yet fetched, or pointing
/// at a non-content record) are simply not surfaced.
pub fn build_feed(records: &[TopicRecord], options: &BuildOptions) -> FeedView {
    if records.is_empty() {
        return FeedView::default();
    }

    let mut likes: HashMap<u64, u64> = HashMap::new();
    let mut dislikes: HashMap<u64, u64> = HashMap::new();
    // Sequence number -> indices of reply records targeting it, input order
    let mut children: HashMap<u64, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match &record.payload {
            Payload::Content { .. } => roots.push(index),
            Payload::Reply { reply_to, .. } => {
                children.entry(*reply_to).or_default().push(index);
            }
            Payload::Like { like_to } => {
                *likes.entry(*like_to).or_default() += 1;
            }
            Payload::Dislike { dislike_to } => {
                *dislikes.entry(*dislike_to).or_default() += 1;
            }
            Payload::Metadata { .. } | Payload::Unrecognized => {}
        }
    }

    let mut posts = Vec::with_capacity(roots.len());
    let mut truncated = 0;
    for root_index in roots {
        let (entry, cut) = build_entry_tree(
            root_index,
            records,
            &children,
            &likes,
            &dislikes,
            options.max_depth,
        );
        posts.push(entry);
        truncated += cut;
    }

    FeedView::new(posts, truncated)
}

/// Annotate a single record against the precomputed count maps.
fn annotate(
    record: &TopicRecord,
    children: &HashMap<u64, Vec<usize>>,
    likes: &HashMap<u64, u64>,
    dislikes: &HashMap<u64, u64>,
) -> PostEntry {
    let sequence_number = record.sequence_number;
    let (message, media) = match &record.payload {
        Payload::Content { message, media } | Payload::Reply { message, media, .. } => {
            (message.clone(), media.clone())
        }
        // Only content and reply records reach annotation
        _ => (String::new(), None),
    };
    PostEntry {
        sequence_number,
        sender: record.sender.clone(),
        consensus_timestamp: record.consensus_timestamp.clone(),
        message,
        media,
        likes: likes.get(&sequence_number).copied().unwrap_or(0),
        dislikes: dislikes.get(&sequence_number).copied().unwrap_or(0),
        comment_count: children
            .get(&sequence_number)
            .map(|c| c.len() as u64)
            .unwrap_or(0),
        replies: Vec::new(),
    }
}

/// Iteratively build one root's entry tree, bottom-up.
///
/// The two-phase construction supports arbitrarily deep reply chains
/// without recursing. Returns the root entry and the number of reply
/// records cut off by the depth cap.
fn build_entry_tree(
    root_index: usize,
    records: &[TopicRecord],
    children: &HashMap<u64, Vec<usize>>,
    likes: &HashMap<u64, u64>,
    dislikes: &HashMap<u64, u64>,
    max_depth: Option<usize>,
) -> (PostEntry, usize) {
    // Phase 1: collect reachable nodes with their depths. The visited
    // set keeps a malformed self- or forward-reference from looping.
    let mut nodes: Vec<(usize, usize)> = Vec::new();
    let mut visited: HashSet<u64> = HashSet::new();
    let mut stack: Vec<(usize, usize)> = vec![(root_index, 0)];

    while let Some((index, depth)) = stack.pop() {
        let sequence_number = records[index].sequence_number;
        if !visited.insert(sequence_number) {
            continue;
        }
        nodes.push((index, depth));
        if let Some(child_indexes) = children.get(&sequence_number) {
            for &child_index in child_indexes {
                stack.push((child_index, depth + 1));
            }
        }
    }

    // Phase 2: drop nodes beyond the cap, reporting how many were cut.
    let mut truncated = 0;
    if let Some(cap) = max_depth {
        let before = nodes.len();
        nodes.retain(|(_, depth)| *depth <= cap);
        truncated = before - nodes.len();
    }

    // Phase 3: build bottom-up so every child exists before its parent.
    nodes.sort_by(|a, b| b.1.cmp(&a.1));
    let mut built: HashMap<u64, PostEntry> = HashMap::with_capacity(nodes.len());

    for (index, _depth) in nodes {
        let record = &records[index];
        let mut entry = annotate(record, children, likes, dislikes);
        if let Some(child_indexes) = children.get(&record.sequence_number) {
            for &child_index in child_indexes {
                let child_sequence = records[child_index].sequence_number;
                if let Some(child_entry) = built.remove(&child_sequence) {
                    entry.replies.push(child_entry);
                }
            }
        }
        built.insert(record.sequence_number, entry);
    }

    let root_sequence = records[root_index].sequence_number;
    let root = built
        .remove(&root_sequence)
        .unwrap_or_else(|| annotate(&records[root_index], children, likes, dislikes));
    (root, truncated)
}
