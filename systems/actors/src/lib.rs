#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-taking actors: the keyboard-driven player and the pursuing Pedro.
//!
//! Actors never touch [`GameState`] directly. They translate their decision
//! into a [`Command`], hand it to [`world::apply`], and drive the
//! [`TurnScheduler`] according to the outcome.

pub mod keymap;

use ananas_core::{Command, Event, InputEvent, Outcome};
use ananas_system_pathfinding::PathFinder;
use ananas_system_scheduler::{SchedulerError, SchedulerState, TurnScheduler};
use ananas_world::{self as world, query, GameState};
use tracing::{debug, info, trace};

pub use keymap::PlayerIntent;

/// How the player controller treated an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDisposition {
    /// The player moved and the turn passed on.
    Moved,
    /// The step targeted a wall; the player keeps the turn.
    Rejected,
    /// The key has no binding; the player keeps the turn.
    Ignored,
    /// The player searched their cell without finding the ananas.
    BoxSearched,
    /// The player found the ananas and the session ended.
    Won,
    /// The controller was not waiting for input.
    Inactive,
}

/// Keyboard-driven actor that suspends the rotation until a key arrives.
#[derive(Clone, Debug, Default)]
pub struct PlayerController {
    awaiting_input: bool,
}

impl PlayerController {
    /// Creates a controller that is not yet waiting for input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the controller holds the turn until a key arrives.
    #[must_use]
    pub fn is_awaiting_input(&self) -> bool {
        self.awaiting_input
    }

    /// Takes the turn by locking the scheduler. No movement happens here.
    pub fn act(&mut self, scheduler: &mut TurnScheduler) -> Result<(), SchedulerError> {
        scheduler.lock()?;
        self.awaiting_input = true;
        trace!("player_awaiting_input");
        Ok(())
    }

    /// Resolves a key press received while the scheduler is locked.
    pub fn on_input(
        &mut self,
        event: InputEvent,
        state: &mut GameState,
        scheduler: &mut TurnScheduler,
        out_events: &mut Vec<Event>,
    ) -> Result<InputDisposition, SchedulerError> {
        if !self.awaiting_input || scheduler.state() != SchedulerState::WaitingForInput {
            trace!(key = event.key_code(), "input_while_inactive");
            return Ok(InputDisposition::Inactive);
        }

        match keymap::intent(event) {
            PlayerIntent::Ignored => {
                trace!(key = event.key_code(), "input_ignored");
                Ok(InputDisposition::Ignored)
            }
            PlayerIntent::Move(direction) => {
                let before = query::player(state);
                world::apply(state, Command::MovePlayer { direction }, out_events);
                if query::player(state) == before {
                    debug!(?direction, "player_move_rejected");
                    return Ok(InputDisposition::Rejected);
                }
                self.awaiting_input = false;
                scheduler.unlock()?;
                Ok(InputDisposition::Moved)
            }
            PlayerIntent::Interact => {
                world::apply(state, Command::OpenBox, out_events);
                match query::outcome(state) {
                    Some(outcome) => {
                        self.awaiting_input = false;
                        scheduler.stop(outcome)?;
                        info!(?outcome, "player_found_ananas");
                        Ok(InputDisposition::Won)
                    }
                    None => Ok(InputDisposition::BoxSearched),
                }
            }
        }
    }
}

/// What the pursuer did with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuitStep {
    /// The pursuer stepped one cell closer to the player.
    Advanced,
    /// The pursuer was adjacent and caught the player.
    Captured,
    /// No route to the player exists; the turn was skipped.
    Stalled,
}

/// Pedro: walks the shortest route toward the player every turn.
#[derive(Debug, Default)]
pub struct Pursuer {
    finder: PathFinder,
}

impl Pursuer {
    /// Creates a pursuer with an empty search workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plans a fresh path and either captures the player or takes one step.
    pub fn act(
        &mut self,
        state: &mut GameState,
        scheduler: &mut TurnScheduler,
        out_events: &mut Vec<Event>,
    ) -> Result<PursuitStep, SchedulerError> {
        if query::outcome(state).is_some() {
            return Ok(PursuitStep::Stalled);
        }

        let from = query::pursuer(state);
        let target = query::player(state);
        let path = {
            let view: &GameState = state;
            self.finder
                .find_path(from, target, |cell| query::is_passable(view, cell))
        };

        let remaining = path.get(1..).unwrap_or_default();
        match remaining {
            [] => {
                debug!(?from, ?target, "pursuer_has_no_path");
                Ok(PursuitStep::Stalled)
            }
            [_] => {
                world::apply(state, Command::CapturePlayer, out_events);
                scheduler.stop(Outcome::Captured)?;
                Ok(PursuitStep::Captured)
            }
            [next, ..] => {
                world::apply(state, Command::MovePursuer { to: *next }, out_events);
                trace!(distance = remaining.len(), "pursuer_advanced");
                Ok(PursuitStep::Advanced)
            }
        }
    }
}

/// The closed set of participants in the turn rotation.
#[derive(Debug)]
pub enum Actor {
    /// The keyboard-driven player.
    Player(PlayerController),
    /// The pursuer.
    Pursuer(Pursuer),
}

impl Actor {
    /// Runs the actor's turn.
    pub fn act(
        &mut self,
        state: &mut GameState,
        scheduler: &mut TurnScheduler,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SchedulerError> {
        match self {
            Actor::Player(controller) => controller.act(scheduler),
            Actor::Pursuer(pursuer) => pursuer.act(state, scheduler, out_events).map(|_| ()),
        }
    }

    /// Player controller, when this actor is the player.
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerController> {
        match self {
            Actor::Player(controller) => Some(controller),
            Actor::Pursuer(_) => None,
        }
    }
}
