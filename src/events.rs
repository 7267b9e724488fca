//! Typed in-process event bus.
//!
//! Components that need to react to feed refreshes, post submissions, or
//! workflow progress subscribe to a shared [`EventBus`] handed to them at
//! construction time. Events are typed; there is no global registry and
//! no stringly-typed topic matching.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// Terminal outcome of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// All steps completed
    Complete,
    /// Cancelled between steps
    Cancelled,
    /// A step failed
    Failed,
}

/// Events published by clients, accumulators, and workflows.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A topic's feed view was rebuilt
    FeedRefreshed {
        /// Topic whose feed was rebuilt
        topic_id: String,
        /// Number of top-level posts in the new view
        post_count: usize,
    },
    /// A composed payload was handed off for submission
    PostSubmitted {
        /// Topic the payload targets
        topic_id: String,
    },
    /// A workflow moved on to a new step
    WorkflowAdvanced {
        /// Workflow name
        workflow: String,
        /// Name of the step now running
        step: String,
    },
    /// A workflow reached a terminal state
    WorkflowFinished {
        /// Workflow name
        workflow: String,
        /// How it ended
        outcome: WorkflowOutcome,
    },
}

/// Fan-out channel for [`Event`]s.
///
/// Subscribers receive every event published after they subscribe, each
/// on their own receiver. Publishing never blocks; receivers whose
/// subscriber went away are pruned on the next publish.
///
/// # Example
///
/// ```
/// use ibird::events::{Event, EventBus};
///
/// let bus = EventBus::new();
/// let events = bus.subscribe();
/// bus.publish(Event::PostSubmitted {
///     topic_id: "0.0.4242".to_string(),
/// });
/// assert!(matches!(events.recv().unwrap(), Event::PostSubmitted { .. }));
/// ```
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<Event>>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> Receiver<Event> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .expect("event bus lock poisoned")
            .push(sender);
        receiver
    }

    /// Publish an event to every live subscriber.
    ///
    /// Returns the number of subscribers that received it. Dropped
    /// receivers are pruned here.
    pub fn publish(&self, event: Event) -> usize {
        let mut subscribers = self.subscribers.lock().expect("event bus lock poisoned");
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        subscribers.len()
    }

    /// Get the current subscriber count.
    ///
    /// Counts channels whose receiver may already be dropped; the count
    /// is exact right after a publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("event bus lock poisoned")
            .len()
    }
}
