//! Full client flow against the in-memory mock mirror.
//!
//! Seeds a topic, runs the thread creation workflow with event bus
//! reporting, then fetches and aggregates the feed through the client.
//!
//! Run with: `cargo run --example mock_mirror`

use std::sync::Arc;

use ibird::client::MirrorClient;
use ibird::compose::{self, PostComposer};
use ibird::events::{Event, EventBus, WorkflowOutcome};
use ibird::feed::MirrorFeedExt;
use ibird::mock::MockMirror;
use ibird::workflow::{Progress, StepSequence};

fn seed(mirror: &mut MockMirror, bus: &EventBus) -> Result<(), Box<dyn std::error::Error>> {
    // The thread creation workflow, with the mock standing in for the
    // ledger: each step seeds what the real call would submit.
    let mut flow = StepSequence::thread_creation();
    let mut step = flow.begin()?.to_string();
    loop {
        match step.as_str() {
            "create-topic" => { /* topic exists: the mock itself */ }
            "publish-initiator" => {
                mirror.seed_payload("0.0.1001", &compose::metadata("ibird")?)?;
            }
            "announce-thread" => { /* would post to the home topic */ }
            other => unreachable!("unknown step {other}"),
        }
        match flow.advance()? {
            Progress::Advanced { step: next, .. } => {
                bus.publish(Event::WorkflowAdvanced {
                    workflow: flow.name().to_string(),
                    step: next.clone(),
                });
                step = next;
            }
            Progress::Complete => {
                bus.publish(Event::WorkflowFinished {
                    workflow: flow.name().to_string(),
                    outcome: WorkflowOutcome::Complete,
                });
                break;
            }
        }
    }

    let hello = PostComposer::new()
        .message("Hello from the mock ledger")
        .build()?;
    let post = mirror.seed_payload("0.0.1001", &hello)?;
    bus.publish(Event::PostSubmitted {
        topic_id: mirror.topic_id().to_string(),
    });

    mirror.seed_payload("0.0.1002", &compose::like(post))?;
    let nice = PostComposer::new()
        .message("Nice!")
        .reply_to(post)
        .build()?;
    mirror.seed_payload("0.0.1003", &nice)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let bus = Arc::new(EventBus::new());
    let events = bus.subscribe();

    let mut mirror = MockMirror::new("0.0.4242");
    seed(&mut mirror, &bus)?;

    let client = MirrorClient::with_transport(mirror);
    let feed = client.recent_feed("0.0.4242", 100).await?;
    bus.publish(Event::FeedRefreshed {
        topic_id: "0.0.4242".to_string(),
        post_count: feed.len(),
    });

    println!("Feed for 0.0.4242:");
    for post in feed.iter() {
        println!(
            "  #{} \"{}\" - {} likes, {} comments",
            post.sequence_number, post.message, post.likes, post.comment_count
        );
        for reply in &post.replies {
            println!("      #{} \"{}\"", reply.sequence_number, reply.message);
        }
    }

    println!("\nEvents observed:");
    for event in events.try_iter() {
        println!("  {event:?}");
    }
    Ok(())
}
