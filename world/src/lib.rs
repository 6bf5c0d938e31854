#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Ananas Hunt.

use ananas_core::{
    BoxContents, CellCoord, Command, Event, GameConfig, GenerationError, Grid, Outcome,
    EMPTY_BOX_MESSAGE, NO_BOX_MESSAGE,
};
use ananas_system_dungeon::{self as dungeon, RandomSource};
use tracing::{debug, info};

/// Actors that must fit in the dungeon besides the boxes.
const ACTOR_COUNT: usize = 2;

/// Represents the authoritative state of a single session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    width: u32,
    height: u32,
    player: CellCoord,
    pursuer: CellCoord,
    goal: CellCoord,
    outcome: Option<Outcome>,
}

impl GameState {
    /// Carves a dungeon, hides the boxes, and spawns both actors.
    ///
    /// Boxes are placed first, then the player, then the pursuer, each drawn
    /// from the remaining free cells.
    pub fn generate<R>(config: &GameConfig, rng: &mut R) -> Result<Self, GenerationError>
    where
        R: RandomSource + ?Sized,
    {
        let width = config.width;
        let height = config.play_height();
        let mut layout = dungeon::generate(width, height, &config.digger, rng)?;
        layout.ensure_capacity(config.marker_count.saturating_add(ACTOR_COUNT))?;

        let goal =
            dungeon::place_markers(&mut layout.grid, &mut layout.free_cells, config.marker_count, rng)?;
        let player = dungeon::place_entity(&mut layout.free_cells, rng)?;
        let pursuer = dungeon::place_entity(&mut layout.free_cells, rng)?;

        info!(
            width,
            height,
            floor = layout.grid.len(),
            boxes = config.marker_count,
            "session_generated"
        );

        Ok(Self::from_parts(layout.grid, width, height, player, pursuer, goal))
    }

    /// Assembles a state from an existing grid and positions.
    #[must_use]
    pub fn from_parts(
        grid: Grid,
        width: u32,
        height: u32,
        player: CellCoord,
        pursuer: CellCoord,
        goal: CellCoord,
    ) -> Self {
        Self {
            grid,
            width,
            height,
            player,
            pursuer,
            goal,
            outcome: None,
        }
    }

    fn conclude(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        out_events.push(Event::MessageLogged {
            text: outcome.message(),
        });
        out_events.push(Event::SessionEnded { outcome });
        info!(?outcome, "session_ended");
    }
}

/// Applies the provided command to the state, reporting what changed.
///
/// Once the session has an outcome every command is ignored.
pub fn apply(state: &mut GameState, command: Command, out_events: &mut Vec<Event>) {
    if let Some(outcome) = state.outcome {
        debug!(?command, ?outcome, "command_after_session_end");
        return;
    }

    match command {
        Command::MovePlayer { direction } => {
            let from = state.player;
            let to = from.step(direction);
            if state.grid.is_passable(to) {
                state.player = to;
                out_events.push(Event::PlayerMoved { from, to });
            } else {
                out_events.push(Event::PlayerMoveBlocked { target: to });
            }
        }
        Command::MovePursuer { to } => {
            let from = state.pursuer;
            if from.manhattan_distance(to) != 1 || !state.grid.is_passable(to) || to == state.player
            {
                debug!(?from, ?to, "pursuer_step_rejected");
                return;
            }
            state.pursuer = to;
            out_events.push(Event::PursuerMoved { from, to });
        }
        Command::OpenBox => {
            let cell = state.player;
            let contents = match state.grid.kind(cell) {
                Some(kind) if kind.holds_box() && cell == state.goal => BoxContents::Ananas,
                Some(kind) if kind.holds_box() => BoxContents::Empty,
                _ => BoxContents::NoBox,
            };
            out_events.push(Event::BoxOpened { cell, contents });

            match contents {
                BoxContents::NoBox => out_events.push(Event::MessageLogged {
                    text: NO_BOX_MESSAGE,
                }),
                BoxContents::Empty => out_events.push(Event::MessageLogged {
                    text: EMPTY_BOX_MESSAGE,
                }),
                BoxContents::Ananas => state.conclude(Outcome::Victory, out_events),
            }
        }
        Command::CapturePlayer => state.conclude(Outcome::Captured, out_events),
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use super::GameState;
    use ananas_core::{CellCoord, CellKind, Grid, Outcome};

    /// Provides read-only access to the walkable cells.
    #[must_use]
    pub fn grid(state: &GameState) -> &Grid {
        &state.grid
    }

    /// Width and height of the dungeon area.
    #[must_use]
    pub fn dimensions(state: &GameState) -> (u32, u32) {
        (state.width, state.height)
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(state: &GameState) -> CellCoord {
        state.player
    }

    /// Cell currently occupied by the pursuer.
    #[must_use]
    pub fn pursuer(state: &GameState) -> CellCoord {
        state.pursuer
    }

    /// Cell hiding the ananas.
    #[must_use]
    pub fn goal(state: &GameState) -> CellCoord {
        state.goal
    }

    /// Content of a cell, or `None` for walls.
    #[must_use]
    pub fn cell_kind(state: &GameState, cell: CellCoord) -> Option<CellKind> {
        state.grid.kind(cell)
    }

    /// Reports whether the cell can be entered.
    #[must_use]
    pub fn is_passable(state: &GameState, cell: CellCoord) -> bool {
        state.grid.is_passable(cell)
    }

    /// Outcome of the session, once it has ended.
    #[must_use]
    pub fn outcome(state: &GameState) -> Option<Outcome> {
        state.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ananas_core::{CellKind, Direction};
    use ananas_system_dungeon::SeededRandom;

    /// A 5x1 corridor: player at 1, empty box at 2, goal at 3, pursuer at 4.
    fn corridor() -> GameState {
        let mut grid = Grid::new();
        for x in 0..5 {
            let _ = grid.insert(CellCoord::new(x, 0), CellKind::Floor);
        }
        let _ = grid.mark(CellCoord::new(2, 0), CellKind::Collectible);
        let _ = grid.mark(CellCoord::new(3, 0), CellKind::Goal);
        GameState::from_parts(
            grid,
            5,
            1,
            CellCoord::new(1, 0),
            CellCoord::new(4, 0),
            CellCoord::new(3, 0),
        )
    }

    #[test]
    fn player_moves_onto_floor() {
        let mut state = corridor();
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );

        assert_eq!(query::player(&state), CellCoord::new(2, 0));
        assert_eq!(
            events,
            vec![Event::PlayerMoved {
                from: CellCoord::new(1, 0),
                to: CellCoord::new(2, 0),
            }]
        );
    }

    #[test]
    fn player_step_into_wall_is_blocked() {
        let mut state = corridor();
        let mut events = Vec::new();

        apply(
            &mut state,
            Command::MovePlayer {
                direction: Direction::North,
            },
            &mut events,
        );

        assert_eq!(query::player(&state), CellCoord::new(1, 0));
        assert_eq!(
            events,
            vec![Event::PlayerMoveBlocked {
                target: CellCoord::new(1, -1),
            }]
        );
    }

    #[test]
    fn searching_floor_finds_no_box() {
        let mut state = corridor();
        let mut events = Vec::new();

        apply(&mut state, Command::OpenBox, &mut events);

        assert_eq!(
            events,
            vec![
                Event::BoxOpened {
                    cell: CellCoord::new(1, 0),
                    contents: BoxContents::NoBox,
                },
                Event::MessageLogged {
                    text: NO_BOX_MESSAGE,
                },
            ]
        );
        assert_eq!(query::outcome(&state), None);
    }

    #[test]
    fn empty_box_stays_searchable() {
        let mut state = corridor();
        let mut events = Vec::new();
        apply(
            &mut state,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );

        for _ in 0..2 {
            events.clear();
            apply(&mut state, Command::OpenBox, &mut events);
            assert_eq!(
                events[0],
                Event::BoxOpened {
                    cell: CellCoord::new(2, 0),
                    contents: BoxContents::Empty,
                }
            );
        }
        assert_eq!(
            query::cell_kind(&state, query::player(&state)),
            Some(CellKind::Collectible)
        );
    }

    #[test]
    fn goal_box_ends_the_session() {
        let mut state = corridor();
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(
                &mut state,
                Command::MovePlayer {
                    direction: Direction::East,
                },
                &mut events,
            );
        }
        events.clear();

        apply(&mut state, Command::OpenBox, &mut events);

        assert_eq!(query::outcome(&state), Some(Outcome::Victory));
        assert_eq!(
            events.last(),
            Some(&Event::SessionEnded {
                outcome: Outcome::Victory,
            })
        );
    }

    #[test]
    fn commands_after_the_end_are_ignored() {
        let mut state = corridor();
        let mut events = Vec::new();
        apply(&mut state, Command::CapturePlayer, &mut events);
        events.clear();

        apply(
            &mut state,
            Command::MovePlayer {
                direction: Direction::East,
            },
            &mut events,
        );
        apply(&mut state, Command::CapturePlayer, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::player(&state), CellCoord::new(1, 0));
        assert_eq!(query::outcome(&state), Some(Outcome::Captured));
    }

    #[test]
    fn pursuer_cannot_step_onto_the_player() {
        let mut state = corridor();
        let mut events = Vec::new();
        apply(
            &mut state,
            Command::MovePursuer {
                to: CellCoord::new(3, 0),
            },
            &mut events,
        );
        apply(
            &mut state,
            Command::MovePursuer {
                to: CellCoord::new(2, 0),
            },
            &mut events,
        );
        apply(
            &mut state,
            Command::MovePursuer {
                to: CellCoord::new(1, 0),
            },
            &mut events,
        );

        assert_eq!(query::pursuer(&state), CellCoord::new(2, 0));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = GameConfig::default();
        let first = GameState::generate(&config, &mut SeededRandom::seeded(17)).expect("first");
        let second = GameState::generate(&config, &mut SeededRandom::seeded(17)).expect("second");

        assert_eq!(first, second);
        assert_eq!(query::dimensions(&first), (80, 44));
    }

    #[test]
    fn generated_actors_start_on_plain_floor() {
        let config = GameConfig::default();
        let state = GameState::generate(&config, &mut SeededRandom::seeded(3)).expect("state");

        assert_ne!(query::player(&state), query::pursuer(&state));
        assert_eq!(
            query::cell_kind(&state, query::player(&state)),
            Some(CellKind::Floor)
        );
        assert_eq!(
            query::cell_kind(&state, query::pursuer(&state)),
            Some(CellKind::Floor)
        );
        assert_eq!(
            query::cell_kind(&state, query::goal(&state)),
            Some(CellKind::Goal)
        );
    }

    #[test]
    fn oversized_marker_count_is_fatal() {
        let config = GameConfig {
            width: 7,
            height: 11,
            message_rows: 6,
            marker_count: 40,
            ..GameConfig::default()
        };

        assert!(matches!(
            GameState::generate(&config, &mut SeededRandom::seeded(0)),
            Err(GenerationError::InsufficientFloor { .. })
        ));
    }
}
