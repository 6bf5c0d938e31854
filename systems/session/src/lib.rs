#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Runtime harness that drives a single Ananas Hunt session.
//!
//! The session owns the game state, the scheduler, and both actors. It runs
//! turns until the player locks the scheduler, then waits for
//! [`Session::handle_input`] to deliver the next key. Every event produced
//! along the way is forwarded to the caller's [`Renderer`] before control
//! returns.

use ananas_core::{
    ActorId, ConfigError, Event, GameConfig, GenerationError, InputEvent, Outcome, WELCOME_BANNER,
};
use ananas_rendering::{self as rendering, Renderer};
use ananas_system_actors::{Actor, InputDisposition, PlayerController, Pursuer};
use ananas_system_dungeon::RandomSource;
use ananas_system_scheduler::{SchedulerError, SchedulerState, TurnScheduler};
use ananas_world::{query, GameState};
use thiserror::Error;
use tracing::{debug, info};

/// Failures that abort a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configuration is unusable.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    /// The dungeon could not be generated.
    #[error("dungeon generation failed")]
    Generation(#[from] GenerationError),
    /// The scheduler was driven through an invalid transition.
    #[error("scheduler misuse")]
    Scheduler(#[from] SchedulerError),
    /// The scheduler handed out an identifier with no registered actor.
    #[error("no actor registered as {id}")]
    UnknownActor {
        /// Identifier returned by the scheduler.
        id: u32,
    },
}

/// A running game: state, turn order, and the actors taking part.
#[derive(Debug)]
pub struct Session {
    state: GameState,
    scheduler: TurnScheduler,
    actors: Vec<(ActorId, Actor)>,
    player: ActorId,
    events: Vec<Event>,
}

impl Session {
    /// Validates the configuration and generates a fresh dungeon.
    pub fn new<R>(config: &GameConfig, rng: &mut R) -> Result<Self, SessionError>
    where
        R: RandomSource + ?Sized,
    {
        config.validate()?;
        let state = GameState::generate(config, rng)?;
        Ok(Self::from_state(state))
    }

    /// Wraps an existing state. The pursuer takes the first turn of every
    /// round, the player the second.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        let pursuer = ActorId::new(0);
        let player = ActorId::new(1);

        let mut scheduler = TurnScheduler::new();
        scheduler.add(pursuer);
        scheduler.add(player);

        Self {
            state,
            scheduler,
            actors: vec![
                (pursuer, Actor::Pursuer(Pursuer::new())),
                (player, Actor::Player(PlayerController::new())),
            ],
            player,
            events: Vec::new(),
        }
    }

    /// Read-only view of the game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current scheduler state.
    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Outcome of the session, once it has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        query::outcome(&self.state)
    }

    /// Reports whether the session reached a terminal outcome.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.scheduler.state(), SchedulerState::Stopped(_))
    }

    /// Draws the map and the banner, then runs turns until the player waits.
    pub fn start<R>(&mut self, renderer: &mut R) -> Result<(), SessionError>
    where
        R: Renderer + ?Sized,
    {
        self.scheduler.start()?;
        rendering::draw_whole_map(&self.state, renderer);
        renderer.show_message(WELCOME_BANNER);
        info!(
            player = ?query::player(&self.state),
            pursuer = ?query::pursuer(&self.state),
            "session_started"
        );
        self.run(renderer)
    }

    /// Delivers a key press to the player.
    ///
    /// A successful move resumes the rotation, so the pursuer acts before
    /// this returns. Input after the session ended is inert.
    pub fn handle_input<R>(
        &mut self,
        event: InputEvent,
        renderer: &mut R,
    ) -> Result<InputDisposition, SessionError>
    where
        R: Renderer + ?Sized,
    {
        if self.is_finished() {
            debug!(key = event.key_code(), "input_after_session_end");
            return Ok(InputDisposition::Inactive);
        }

        let player = self.player;
        let Self {
            state,
            scheduler,
            actors,
            events,
            ..
        } = self;
        let controller = actors
            .iter_mut()
            .find(|(id, _)| *id == player)
            .and_then(|(_, actor)| actor.as_player_mut())
            .ok_or(SessionError::UnknownActor { id: player.get() })?;

        let disposition = controller.on_input(event, state, scheduler, events)?;
        self.flush(renderer);

        if disposition == InputDisposition::Moved {
            self.run(renderer)?;
        }
        Ok(disposition)
    }

    fn run<R>(&mut self, renderer: &mut R) -> Result<(), SessionError>
    where
        R: Renderer + ?Sized,
    {
        while let Some(id) = self.scheduler.next_actor() {
            debug!(actor = id.get(), "turn_started");
            let Self {
                state,
                scheduler,
                actors,
                events,
                ..
            } = self;
            let actor = actors
                .iter_mut()
                .find(|(candidate, _)| *candidate == id)
                .map(|(_, actor)| actor)
                .ok_or(SessionError::UnknownActor { id: id.get() })?;

            actor.act(state, scheduler, events)?;
            self.flush(renderer);
        }
        Ok(())
    }

    fn flush<R>(&mut self, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        if self.events.is_empty() {
            return;
        }
        rendering::present(&self.events, &self.state, renderer);
        self.events.clear();
    }
}
