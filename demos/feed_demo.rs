//! Sans-io feed aggregation demo.
//!
//! Builds the hierarchical feed view from a hand-assembled flat record
//! set, without touching the network.
//!
//! Run with: `cargo run --example feed_demo`

use ibird::{build_feed, BuildOptions, Payload, TopicRecord};

fn record(seq: u64, sender: &str, payload: Payload) -> TopicRecord {
    TopicRecord {
        sequence_number: seq,
        sender: sender.to_string(),
        consensus_timestamp: format!("{}.000000000", 1_700_000_000 + seq),
        payload,
    }
}

fn print_entry(entry: &ibird::PostEntry, indent: usize) {
    println!(
        "{:indent$}#{} {}: \"{}\"  [{} likes, {} dislikes, {} comments]",
        "",
        entry.sequence_number,
        entry.sender,
        entry.message,
        entry.likes,
        entry.dislikes,
        entry.comment_count,
        indent = indent
    );
    for reply in &entry.replies {
        print_entry(reply, indent + 4);
    }
}

fn main() {
    env_logger::init();

    // A topic log as it would come back from the mirror, newest first
    let records = vec![
        record(
            6,
            "0.0.1003",
            Payload::Like { like_to: 4 },
        ),
        record(
            5,
            "0.0.1002",
            Payload::Reply {
                reply_to: 4,
                message: "Welcome aboard!".to_string(),
                media: None,
            },
        ),
        record(
            4,
            "0.0.1001",
            Payload::Content {
                message: "First post on my new topic".to_string(),
                media: None,
            },
        ),
        record(
            3,
            "0.0.1009",
            Payload::Dislike { dislike_to: 2 },
        ),
        record(
            2,
            "0.0.1001",
            Payload::Content {
                message: "Testing, testing".to_string(),
                media: Some("ipfs://bafy...".to_string()),
            },
        ),
        record(
            1,
            "0.0.1001",
            Payload::Metadata {
                identifier: "ibird".to_string(),
            },
        ),
    ];

    let feed = build_feed(&records, &BuildOptions::default());

    println!(
        "{} top-level posts, {} entries total\n",
        feed.len(),
        feed.total_entries()
    );
    for post in feed.iter() {
        print_entry(post, 0);
    }
}
