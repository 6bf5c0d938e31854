#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooperative round-robin turn scheduler with explicit suspension.
//!
//! The scheduler only decides whose turn it is. The session asks it for the
//! next actor while it is [`SchedulerState::Running`]; an actor that needs an
//! external event calls [`TurnScheduler::lock`], which holds the rotation
//! until [`TurnScheduler::unlock`] resumes it with the following actor.

use std::fmt;

use ananas_core::{ActorId, Outcome};
use thiserror::Error;
use tracing::{debug, trace};

/// Lifecycle of a [`TurnScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Actors are registered but the rotation has not started.
    Idle,
    /// The rotation hands out turns.
    Running,
    /// The actor in turn awaits an external event.
    WaitingForInput,
    /// The session ended; no actor will act again.
    Stopped(Outcome),
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::WaitingForInput => write!(f, "waiting for input"),
            Self::Stopped(outcome) => write!(f, "stopped ({outcome:?})"),
        }
    }
}

/// Misuse of the scheduler's state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The operation is not permitted in the current state.
    #[error("cannot {operation} a scheduler that is {state}")]
    InvalidTransition {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the scheduler was in.
        state: SchedulerState,
    },
    /// `start` was called without any registered actor.
    #[error("cannot start a scheduler without actors")]
    EmptyRoster,
    /// `lock` was called while no actor holds the turn.
    #[error("lock requires an actor to hold the turn")]
    NoActorInTurn,
}

/// Round-robin scheduler over a list of registered actors.
#[derive(Clone, Debug)]
pub struct TurnScheduler {
    roster: Vec<ActorId>,
    cursor: usize,
    current: Option<ActorId>,
    state: SchedulerState,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    /// Creates an idle scheduler without actors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            roster: Vec::new(),
            cursor: 0,
            current: None,
            state: SchedulerState::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Actor that most recently received the turn, if it still holds it.
    #[must_use]
    pub fn current(&self) -> Option<ActorId> {
        self.current
    }

    /// Registered actors in rotation order.
    #[must_use]
    pub fn roster(&self) -> &[ActorId] {
        &self.roster
    }

    /// Appends an actor to the end of the rotation.
    pub fn add(&mut self, actor: ActorId) {
        self.roster.push(actor);
    }

    /// Removes an actor from the rotation.
    ///
    /// The rotation continues with the actor that would have followed the
    /// removed one. Returns `false` when the actor was not registered.
    pub fn remove(&mut self, actor: ActorId) -> bool {
        let Some(index) = self.roster.iter().position(|entry| *entry == actor) else {
            return false;
        };

        let _ = self.roster.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.roster.len() {
            self.cursor = 0;
        }
        if self.current == Some(actor) {
            self.current = None;
        }
        debug!(actor = actor.get(), "actor_removed");
        true
    }

    /// Begins handing out turns.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        self.expect_state("start", SchedulerState::Idle)?;
        if self.roster.is_empty() {
            return Err(SchedulerError::EmptyRoster);
        }
        self.state = SchedulerState::Running;
        debug!(actors = self.roster.len(), "scheduler_started");
        Ok(())
    }

    /// Hands the turn to the next actor in rotation.
    ///
    /// Returns `None` unless the scheduler is running.
    pub fn next_actor(&mut self) -> Option<ActorId> {
        if self.state != SchedulerState::Running || self.roster.is_empty() {
            return None;
        }

        let actor = self.roster[self.cursor];
        self.cursor = (self.cursor + 1) % self.roster.len();
        self.current = Some(actor);
        trace!(actor = actor.get(), "turn_granted");
        Some(actor)
    }

    /// Suspends the rotation on the actor holding the turn.
    pub fn lock(&mut self) -> Result<(), SchedulerError> {
        self.expect_state("lock", SchedulerState::Running)?;
        if self.current.is_none() {
            return Err(SchedulerError::NoActorInTurn);
        }
        self.state = SchedulerState::WaitingForInput;
        trace!("scheduler_locked");
        Ok(())
    }

    /// Resumes the rotation after a [`lock`](Self::lock).
    ///
    /// The actor that locked does not act again; the next call to
    /// [`next_actor`](Self::next_actor) yields the actor after it.
    pub fn unlock(&mut self) -> Result<(), SchedulerError> {
        self.expect_state("unlock", SchedulerState::WaitingForInput)?;
        self.state = SchedulerState::Running;
        trace!("scheduler_unlocked");
        Ok(())
    }

    /// Ends the session permanently with the provided outcome.
    pub fn stop(&mut self, outcome: Outcome) -> Result<(), SchedulerError> {
        if let SchedulerState::Stopped(_) = self.state {
            return Err(SchedulerError::InvalidTransition {
                operation: "stop",
                state: self.state,
            });
        }
        self.state = SchedulerState::Stopped(outcome);
        self.current = None;
        debug!(?outcome, "scheduler_stopped");
        Ok(())
    }

    fn expect_state(
        &self,
        operation: &'static str,
        expected: SchedulerState,
    ) -> Result<(), SchedulerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SchedulerError::InvalidTransition {
                operation,
                state: self.state,
            })
        }
    }
}
