use ananas_core::{
    keys, ActorId, BoxContents, CellCoord, CellKind, Event, Grid, InputEvent, Outcome,
    EMPTY_BOX_MESSAGE,
};
use ananas_system_actors::{InputDisposition, PlayerController, Pursuer, PursuitStep};
use ananas_system_scheduler::{SchedulerState, TurnScheduler};
use ananas_world::{query, GameState};

/// Builds a state from rows of text.
///
/// `#` is a wall, `*` an empty box, `A` the ananas, `@` the player and `P`
/// the pursuer. Every other glyph is floor.
fn state_from_rows(rows: &[&str]) -> GameState {
    let mut grid = Grid::new();
    let mut player = None;
    let mut pursuer = None;
    let mut goal = None;
    for (y, row) in rows.iter().enumerate() {
        for (x, glyph) in row.chars().enumerate() {
            let cell = CellCoord::new(x as i32, y as i32);
            let kind = match glyph {
                '#' => continue,
                '*' => CellKind::Collectible,
                'A' => {
                    goal = Some(cell);
                    CellKind::Goal
                }
                '@' => {
                    player = Some(cell);
                    CellKind::Floor
                }
                'P' => {
                    pursuer = Some(cell);
                    CellKind::Floor
                }
                _ => CellKind::Floor,
            };
            let _ = grid.insert(cell, kind);
        }
    }
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
    GameState::from_parts(
        grid,
        width,
        rows.len() as u32,
        player.expect("player glyph"),
        pursuer.expect("pursuer glyph"),
        goal.expect("goal glyph"),
    )
}

/// A scheduler whose only actor is the player, already locked on its turn.
fn player_turn() -> (PlayerController, TurnScheduler) {
    let mut scheduler = TurnScheduler::new();
    scheduler.add(ActorId::new(0));
    scheduler.start().expect("start");
    let _ = scheduler.next_actor().expect("turn");

    let mut player = PlayerController::new();
    player.act(&mut scheduler).expect("act");
    (player, scheduler)
}

fn pursuer_turn() -> TurnScheduler {
    let mut scheduler = TurnScheduler::new();
    scheduler.add(ActorId::new(0));
    scheduler.start().expect("start");
    let _ = scheduler.next_actor().expect("turn");
    scheduler
}

fn press(
    player: &mut PlayerController,
    key: u32,
    state: &mut GameState,
    scheduler: &mut TurnScheduler,
    events: &mut Vec<Event>,
) -> InputDisposition {
    player
        .on_input(InputEvent::new(key), state, scheduler, events)
        .expect("input")
}

#[test]
fn act_locks_the_scheduler_without_moving() {
    let state = state_from_rows(&["#####", "#@.A#", "#P..#", "#####"]);
    let (player, scheduler) = player_turn();

    assert!(player.is_awaiting_input());
    assert_eq!(scheduler.state(), SchedulerState::WaitingForInput);
    assert_eq!(query::player(&state), CellCoord::new(1, 1));
}

#[test]
fn blocked_step_keeps_the_player_in_place_and_waiting() {
    let mut state = state_from_rows(&["#####", "#@.A#", "#P..#", "#####"]);
    let (mut player, mut scheduler) = player_turn();
    let mut events = Vec::new();

    let disposition = press(&mut player, keys::UP, &mut state, &mut scheduler, &mut events);

    assert_eq!(disposition, InputDisposition::Rejected);
    assert_eq!(query::player(&state), CellCoord::new(1, 1));
    assert_eq!(scheduler.state(), SchedulerState::WaitingForInput);
    assert!(player.is_awaiting_input());
}

#[test]
fn valid_step_moves_and_passes_the_turn() {
    let mut state = state_from_rows(&["#####", "#@.A#", "#P..#", "#####"]);
    let (mut player, mut scheduler) = player_turn();
    let mut events = Vec::new();

    let disposition = press(
        &mut player,
        keys::PAGE_DOWN,
        &mut state,
        &mut scheduler,
        &mut events,
    );

    assert_eq!(disposition, InputDisposition::Moved);
    assert_eq!(query::player(&state), CellCoord::new(2, 2));
    assert_eq!(scheduler.state(), SchedulerState::Running);
    assert!(!player.is_awaiting_input());
    assert_eq!(
        events,
        vec![Event::PlayerMoved {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(2, 2),
        }]
    );
}

#[test]
fn unbound_keys_keep_the_turn() {
    let mut state = state_from_rows(&["#####", "#@.A#", "#P..#", "#####"]);
    let (mut player, mut scheduler) = player_turn();
    let mut events = Vec::new();

    let disposition = press(&mut player, 65, &mut state, &mut scheduler, &mut events);

    assert_eq!(disposition, InputDisposition::Ignored);
    assert!(events.is_empty());
    assert_eq!(scheduler.state(), SchedulerState::WaitingForInput);
}

#[test]
fn empty_box_does_not_consume_the_turn() {
    let mut state = state_from_rows(&["######", "#@*.A#", "#P...#", "######"]);
    let (mut player, mut scheduler) = player_turn();
    let mut events = Vec::new();
    let _ = press(&mut player, keys::RIGHT, &mut state, &mut scheduler, &mut events);
    let _ = scheduler.next_actor().expect("turn");
    player.act(&mut scheduler).expect("act");
    events.clear();

    for _ in 0..2 {
        let disposition = press(&mut player, keys::SPACE, &mut state, &mut scheduler, &mut events);
        assert_eq!(disposition, InputDisposition::BoxSearched);
    }

    assert_eq!(scheduler.state(), SchedulerState::WaitingForInput);
    assert_eq!(
        events,
        vec![
            Event::BoxOpened {
                cell: CellCoord::new(2, 1),
                contents: BoxContents::Empty,
            },
            Event::MessageLogged {
                text: EMPTY_BOX_MESSAGE,
            },
            Event::BoxOpened {
                cell: CellCoord::new(2, 1),
                contents: BoxContents::Empty,
            },
            Event::MessageLogged {
                text: EMPTY_BOX_MESSAGE,
            },
        ]
    );
}

#[test]
fn opening_the_goal_wins_and_silences_input() {
    let mut state = state_from_rows(&["#####", "#@A.#", "#P..#", "#####"]);
    let (mut player, mut scheduler) = player_turn();
    let mut events = Vec::new();
    let _ = press(&mut player, keys::RIGHT, &mut state, &mut scheduler, &mut events);
    let _ = scheduler.next_actor().expect("turn");
    player.act(&mut scheduler).expect("act");
    events.clear();

    let disposition = press(&mut player, keys::ENTER, &mut state, &mut scheduler, &mut events);

    assert_eq!(disposition, InputDisposition::Won);
    assert_eq!(scheduler.state(), SchedulerState::Stopped(Outcome::Victory));
    assert_eq!(query::outcome(&state), Some(Outcome::Victory));
    assert!(events.contains(&Event::MessageLogged {
        text: Outcome::Victory.message(),
    }));

    events.clear();
    for key in [keys::LEFT, keys::ENTER, keys::DOWN] {
        let disposition = press(&mut player, key, &mut state, &mut scheduler, &mut events);
        assert_eq!(disposition, InputDisposition::Inactive);
    }
    assert!(events.is_empty());
    assert_eq!(query::player(&state), CellCoord::new(2, 1));
}

#[test]
fn input_outside_the_players_turn_is_inactive() {
    let mut state = state_from_rows(&["#####", "#@.A#", "#P..#", "#####"]);
    let mut scheduler = pursuer_turn();
    let mut player = PlayerController::new();
    let mut events = Vec::new();

    let disposition = press(&mut player, keys::RIGHT, &mut state, &mut scheduler, &mut events);

    assert_eq!(disposition, InputDisposition::Inactive);
    assert_eq!(query::player(&state), CellCoord::new(1, 1));
}

#[test]
fn pursuer_follows_the_shortest_route() {
    let mut state = state_from_rows(&[
        "#######",
        "#P#..A#",
        "#.#.#.#",
        "#...#@#",
        "#######",
    ]);
    let mut scheduler = pursuer_turn();
    let mut pursuer = Pursuer::new();
    let mut events = Vec::new();

    let step = pursuer
        .act(&mut state, &mut scheduler, &mut events)
        .expect("act");

    assert_eq!(step, PursuitStep::Advanced);
    assert_eq!(query::pursuer(&state), CellCoord::new(1, 2));
    assert_eq!(
        events,
        vec![Event::PursuerMoved {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(1, 2),
        }]
    );
    assert_eq!(scheduler.state(), SchedulerState::Running);
}

#[test]
fn adjacent_pursuer_captures_without_moving() {
    let mut state = state_from_rows(&["#####", "#P@A#", "#####"]);
    let mut scheduler = pursuer_turn();
    let mut pursuer = Pursuer::new();
    let mut events = Vec::new();

    let step = pursuer
        .act(&mut state, &mut scheduler, &mut events)
        .expect("act");

    assert_eq!(step, PursuitStep::Captured);
    assert_eq!(scheduler.state(), SchedulerState::Stopped(Outcome::Captured));
    assert_eq!(query::outcome(&state), Some(Outcome::Captured));
    assert_eq!(query::pursuer(&state), CellCoord::new(1, 1));
    assert_ne!(query::pursuer(&state), query::player(&state));
    assert_eq!(
        events,
        vec![
            Event::MessageLogged {
                text: Outcome::Captured.message(),
            },
            Event::SessionEnded {
                outcome: Outcome::Captured,
            },
        ]
    );
}

#[test]
fn diagonal_neighbour_is_not_yet_caught() {
    let mut state = state_from_rows(&["####", "#P.#", "#.@#", "#A.#", "####"]);
    let mut scheduler = pursuer_turn();
    let mut pursuer = Pursuer::new();
    let mut events = Vec::new();

    let step = pursuer
        .act(&mut state, &mut scheduler, &mut events)
        .expect("act");

    assert_eq!(step, PursuitStep::Advanced);
    assert_eq!(query::pursuer(&state).manhattan_distance(query::player(&state)), 1);
    assert_eq!(query::outcome(&state), None);
}

#[test]
fn unreachable_player_skips_the_turn() {
    let mut state = state_from_rows(&["#######", "#P.#@A#", "#######"]);
    let mut scheduler = pursuer_turn();
    let mut pursuer = Pursuer::new();
    let mut events = Vec::new();

    let step = pursuer
        .act(&mut state, &mut scheduler, &mut events)
        .expect("act");

    assert_eq!(step, PursuitStep::Stalled);
    assert!(events.is_empty());
    assert_eq!(query::pursuer(&state), CellCoord::new(1, 1));
    assert_eq!(scheduler.state(), SchedulerState::Running);
}
