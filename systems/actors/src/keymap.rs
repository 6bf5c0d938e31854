//! Translation of raw key codes into player intents.

use ananas_core::{keys, Direction, InputEvent};

/// What a key press asks the player to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerIntent {
    /// Step one cell in the direction.
    Move(Direction),
    /// Search the current cell for a box.
    Interact,
    /// The key has no binding.
    Ignored,
}

/// Maps a key event onto the player's intent.
#[must_use]
pub fn intent(event: InputEvent) -> PlayerIntent {
    let direction = match event.key_code() {
        keys::ENTER | keys::SPACE => return PlayerIntent::Interact,
        keys::UP => Direction::North,
        keys::PAGE_UP => Direction::NorthEast,
        keys::RIGHT => Direction::East,
        keys::PAGE_DOWN => Direction::SouthEast,
        keys::DOWN => Direction::South,
        keys::END => Direction::SouthWest,
        keys::LEFT => Direction::West,
        keys::HOME => Direction::NorthWest,
        _ => return PlayerIntent::Ignored,
    };
    PlayerIntent::Move(direction)
}
