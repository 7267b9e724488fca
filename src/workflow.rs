//! Multi-step workflow state machines.
//!
//! Thread and profile creation chain several remote calls: create a
//! topic, publish a housekeeping record, announce the result. Each flow
//! is modeled as an explicit finite state machine with a step cursor and
//! a cancellation surface checked between steps, and every step's
//! failure is reported distinctly instead of being collapsed into a
//! generic outcome. The machine performs no I/O itself: the caller runs
//! each remote call and drives the machine with the result.

use crate::error::{Error, Result};

/// State of a step sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceState {
    /// Not yet started
    Ready,
    /// Running the step at this index
    Running(usize),
    /// All steps completed
    Complete,
    /// Cancelled while the step at this index was pending
    Cancelled(usize),
    /// The step at this index failed
    Failed {
        /// Index of the failed step
        step: usize,
        /// Step-specific failure description
        reason: String,
    },
}

/// Result of advancing a sequence past its current step.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The sequence moved on to the named step
    Advanced {
        /// Name of the step now running
        step: String,
        /// Index of the step now running
        index: usize,
    },
    /// The final step succeeded and the sequence is complete
    Complete,
}

/// A finite sequence of named remote steps with an explicit cursor.
///
/// Transitions happen only through [`begin`](StepSequence::begin),
/// [`advance`](StepSequence::advance), [`cancel`](StepSequence::cancel)
/// and [`fail`](StepSequence::fail); driving the machine from a terminal
/// state is an error rather than a silent no-op.
///
/// # Example
///
/// ```
/// use ibird::workflow::{Progress, StepSequence};
///
/// let mut flow = StepSequence::thread_creation();
/// let first = flow.begin().unwrap();
/// assert_eq!(first, "create-topic");
/// // ... perform the remote call, then:
/// match flow.advance().unwrap() {
///     Progress::Advanced { step, .. } => assert_eq!(step, "publish-initiator"),
///     Progress::Complete => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StepSequence {
    name: String,
    steps: Vec<String>,
    state: SequenceState,
}

impl StepSequence {
    /// Create a sequence from a workflow name and ordered step names.
    ///
    /// The step list must not be empty.
    pub fn new(name: &str, steps: Vec<&str>) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::InvalidTransition(
                "A step sequence needs at least one step".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            steps: steps.into_iter().map(|s| s.to_string()).collect(),
            state: SequenceState::Ready,
        })
    }

    /// The thread creation flow: create the thread topic, publish its
    /// initiator record, announce the thread on the author's home topic.
    pub fn thread_creation() -> Self {
        Self::new(
            "thread-creation",
            vec!["create-topic", "publish-initiator", "announce-thread"],
        )
        .expect("non-empty step list")
    }

    /// The profile creation flow: create the profile topic, publish the
    /// profile record, link the profile from the account directory.
    pub fn profile_creation() -> Self {
        Self::new(
            "profile-creation",
            vec!["create-topic", "publish-profile", "link-profile"],
        )
        .expect("non-empty step list")
    }

    /// Get the workflow name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the ordered step names.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Get the current state.
    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    /// Name of the step currently running, if any.
    pub fn current_step(&self) -> Option<&str> {
        match self.state {
            SequenceState::Running(index) => Some(self.steps[index].as_str()),
            _ => None,
        }
    }

    /// Completed and total step counts.
    pub fn progress(&self) -> (usize, usize) {
        let done = match self.state {
            SequenceState::Ready => 0,
            SequenceState::Running(index) | SequenceState::Cancelled(index) => index,
            SequenceState::Failed { step, .. } => step,
            SequenceState::Complete => self.steps.len(),
        };
        (done, self.steps.len())
    }

    /// Check if the sequence reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            SequenceState::Complete | SequenceState::Cancelled(_) | SequenceState::Failed { .. }
        )
    }

    /// Start the sequence, returning the name of the first step.
    pub fn begin(&mut self) -> Result<&str> {
        match self.state {
            SequenceState::Ready => {
                self.state = SequenceState::Running(0);
                Ok(self.steps[0].as_str())
            }
            _ => Err(self.transition_error("begin")),
        }
    }

    /// Record the current step as succeeded and move to the next.
    pub fn advance(&mut self) -> Result<Progress> {
        match self.state {
            SequenceState::Running(index) => {
                let next = index + 1;
                if next == self.steps.len() {
                    self.state = SequenceState::Complete;
                    Ok(Progress::Complete)
                } else {
                    self.state = SequenceState::Running(next);
                    Ok(Progress::Advanced {
                        step: self.steps[next].clone(),
                        index: next,
                    })
                }
            }
            _ => Err(self.transition_error("advance")),
        }
    }

    /// Cancel the sequence between steps.
    ///
    /// Cancelling an unstarted sequence cancels it before its first
    /// step; cancelling a terminal sequence is an error.
    pub fn cancel(&mut self) -> Result<()> {
        match self.state {
            SequenceState::Ready => {
                self.state = SequenceState::Cancelled(0);
                Ok(())
            }
            SequenceState::Running(index) => {
                self.state = SequenceState::Cancelled(index);
                Ok(())
            }
            _ => Err(self.transition_error("cancel")),
        }
    }

    /// Record the current step as failed with a step-specific reason.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        match self.state {
            SequenceState::Running(index) => {
                self.state = SequenceState::Failed {
                    step: index,
                    reason: reason.into(),
                };
                Ok(())
            }
            _ => Err(self.transition_error("fail")),
        }
    }

    fn transition_error(&self, attempted: &str) -> Error {
        Error::InvalidTransition(format!(
            "Cannot {attempted} workflow '{}' in state {:?}",
            self.name, self.state
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_requires_steps() {
        assert!(StepSequence::new("empty", vec![]).is_err());
    }

    #[test]
    fn test_sequence_happy_path() {
        let mut flow = StepSequence::thread_creation();
        assert_eq!(flow.state(), &SequenceState::Ready);
        assert!(flow.current_step().is_none());

        assert_eq!(flow.begin().unwrap(), "create-topic");
        assert_eq!(flow.current_step(), Some("create-topic"));
        assert_eq!(flow.progress(), (0, 3));

        assert_eq!(
            flow.advance().unwrap(),
            Progress::Advanced {
                step: "publish-initiator".to_string(),
                index: 1
            }
        );
        assert_eq!(
            flow.advance().unwrap(),
            Progress::Advanced {
                step: "announce-thread".to_string(),
                index: 2
            }
        );
        assert_eq!(flow.advance().unwrap(), Progress::Complete);
        assert_eq!(flow.state(), &SequenceState::Complete);
        assert!(flow.is_terminal());
        assert_eq!(flow.progress(), (3, 3));
    }

    #[test]
    fn test_sequence_cancel_between_steps() {
        let mut flow = StepSequence::profile_creation();
        flow.begin().unwrap();
        flow.advance().unwrap();
        flow.cancel().unwrap();
        assert_eq!(flow.state(), &SequenceState::Cancelled(1));
        assert!(flow.is_terminal());

        // A cancelled sequence cannot be driven further
        assert!(flow.advance().is_err());
        assert!(flow.cancel().is_err());
    }

    #[test]
    fn test_sequence_cancel_before_start() {
        let mut flow = StepSequence::thread_creation();
        flow.cancel().unwrap();
        assert_eq!(flow.state(), &SequenceState::Cancelled(0));
    }

    #[test]
    fn test_sequence_step_failure_is_distinct() {
        let mut flow = StepSequence::thread_creation();
        flow.begin().unwrap();
        flow.advance().unwrap();
        flow.fail("topic submission rejected").unwrap();

        match flow.state() {
            SequenceState::Failed { step, reason } => {
                assert_eq!(*step, 1);
                assert_eq!(flow.steps()[*step], "publish-initiator");
                assert_eq!(reason, "topic submission rejected");
            }
            other => panic!("Expected Failed state, got {other:?}"),
        }
        assert!(flow.advance().is_err());
    }

    #[test]
    fn test_sequence_invalid_transitions() {
        let mut flow = StepSequence::thread_creation();
        // Cannot advance or fail before begin
        assert!(flow.advance().is_err());
        assert!(flow.fail("nope").is_err());

        flow.begin().unwrap();
        // Cannot begin twice
        assert!(flow.begin().is_err());
    }

    #[test]
    fn test_sequence_custom_steps() {
        let mut flow = StepSequence::new("poll-creation", vec!["create-topic", "publish-poll"])
            .unwrap();
        assert_eq!(flow.name(), "poll-creation");
        flow.begin().unwrap();
        flow.advance().unwrap();
        assert_eq!(flow.advance().unwrap(), Progress::Complete);
    }
}
