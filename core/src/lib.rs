#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ananas Hunt engine.
//!
//! This crate defines the value types and message surface that connect the
//! adapters, the authoritative game state, and the turn-taking systems. Actors
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then reports [`Event`]
//! values that the session forwards to the renderer.

use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;

pub use config::{ConfigError, DiggerConfig, GameConfig, SizeRange};

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Can you find the ananas before Pedro catches you?";

/// Message reported when the player searches a cell without a box.
pub const NO_BOX_MESSAGE: &str = "There is no box here!";

/// Message reported when the player opens a box that holds nothing.
pub const EMPTY_BOX_MESSAGE: &str = "This box is empty :-(";

/// Location of a single grid cell expressed as signed column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the cell. Rows grow downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Returns the neighbouring coordinate in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Orthogonal neighbours in north, east, south, west order.
    #[must_use]
    pub const fn neighbors4(self) -> [CellCoord; 4] {
        [
            self.step(Direction::North),
            self.step(Direction::East),
            self.step(Direction::South),
            self.step(Direction::West),
        ]
    }
}

/// Compass directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Diagonal movement up and to the right.
    NorthEast,
    /// Movement toward increasing column indices.
    East,
    /// Diagonal movement down and to the right.
    SouthEast,
    /// Movement toward increasing row indices.
    South,
    /// Diagonal movement down and to the left.
    SouthWest,
    /// Movement toward decreasing column indices.
    West,
    /// Diagonal movement up and to the left.
    NorthWest,
}

impl Direction {
    /// All eight directions, clockwise starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The four orthogonal directions, clockwise starting at north.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row delta applied by a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// Content of a walkable cell.
///
/// Walls have no variant: a coordinate absent from the [`Grid`] is
/// impassable, and that absence is the only wall encoding in the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Plain walkable floor.
    Floor,
    /// Floor holding a searchable box.
    Collectible,
    /// The single box that holds the ananas.
    Goal,
}

impl CellKind {
    /// Reports whether the cell holds a box, regardless of its contents.
    #[must_use]
    pub const fn holds_box(self) -> bool {
        matches!(self, CellKind::Collectible | CellKind::Goal)
    }
}

/// Sparse passability map keyed by coordinate.
///
/// Every coordinate present in the grid is walkable. Iteration is ordered by
/// coordinate so whole-map traversals are reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<CellCoord, CellKind>,
}

impl Grid {
    /// Creates an empty grid in which every coordinate is a wall.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Carves the cell, making it walkable with the provided content.
    ///
    /// Returns the previous content when the cell was already walkable.
    pub fn insert(&mut self, cell: CellCoord, kind: CellKind) -> Option<CellKind> {
        self.cells.insert(cell, kind)
    }

    /// Replaces the content of an existing walkable cell.
    ///
    /// Returns `false` and leaves the grid untouched when the cell is a wall.
    pub fn mark(&mut self, cell: CellCoord, kind: CellKind) -> bool {
        match self.cells.get_mut(&cell) {
            Some(slot) => {
                *slot = kind;
                true
            }
            None => false,
        }
    }

    /// Content of the cell, or `None` for walls.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.cells.get(&cell).copied()
    }

    /// Reports whether the cell can be entered.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no walkable cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates walkable cells in coordinate order.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            inner: self.cells.iter(),
        }
    }
}

/// Iterator over the walkable cells of a [`Grid`].
#[derive(Debug)]
pub struct GridIter<'a> {
    inner: btree_map::Iter<'a, CellCoord, CellKind>,
}

impl Iterator for GridIter<'_> {
    type Item = (CellCoord, CellKind);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(cell, kind)| (*cell, *kind))
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = (CellCoord, CellKind);
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Unique identifier assigned to an actor registered with the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player opened the box holding the ananas.
    Victory,
    /// The pursuer reached the player.
    Captured,
}

impl Outcome {
    /// Line shown to the player when the session ends with this outcome.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Outcome::Victory => "Hooray! You found an ananas and won this game.",
            Outcome::Captured => "Game over - you were captured by Pedro!",
        }
    }
}

/// Discrete key press delivered by an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputEvent {
    key_code: u32,
}

impl InputEvent {
    /// Wraps a raw key code.
    #[must_use]
    pub const fn new(key_code: u32) -> Self {
        Self { key_code }
    }

    /// Raw key code carried by the event.
    #[must_use]
    pub const fn key_code(&self) -> u32 {
        self.key_code
    }
}

/// Key codes understood by the player controller.
///
/// Values follow the browser `keyCode` numbering so any front end can forward
/// its native codes after a trivial translation.
pub mod keys {
    /// Enter key.
    pub const ENTER: u32 = 13;
    /// Space bar.
    pub const SPACE: u32 = 32;
    /// Page Up, mapped to north-east.
    pub const PAGE_UP: u32 = 33;
    /// Page Down, mapped to south-east.
    pub const PAGE_DOWN: u32 = 34;
    /// End, mapped to south-west.
    pub const END: u32 = 35;
    /// Home, mapped to north-west.
    pub const HOME: u32 = 36;
    /// Left arrow.
    pub const LEFT: u32 = 37;
    /// Up arrow.
    pub const UP: u32 = 38;
    /// Right arrow.
    pub const RIGHT: u32 = 39;
    /// Down arrow.
    pub const DOWN: u32 = 40;
}

/// What the player found when searching their cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxContents {
    /// The cell holds no box.
    NoBox,
    /// The box was empty.
    Empty,
    /// The box held the ananas.
    Ananas,
}

/// Commands that express all permissible game state mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step one cell in the provided direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the pursuer relocate to an adjacent walkable cell.
    MovePursuer {
        /// Destination chosen by the pursuer's path search.
        to: CellCoord,
    },
    /// Requests that the player search the cell they stand on.
    OpenBox,
    /// Declares that the pursuer caught the player.
    CapturePlayer,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// Reports that a player step targeted a wall.
    PlayerMoveBlocked {
        /// Impassable cell the player attempted to enter.
        target: CellCoord,
    },
    /// Confirms that the pursuer moved between two cells.
    PursuerMoved {
        /// Cell the pursuer occupied before moving.
        from: CellCoord,
        /// Cell the pursuer occupies after the move.
        to: CellCoord,
    },
    /// Reports the result of searching a cell.
    BoxOpened {
        /// Cell that was searched.
        cell: CellCoord,
        /// What the search revealed.
        contents: BoxContents,
    },
    /// Text line describing an outcome for the player.
    MessageLogged {
        /// Message to display.
        text: &'static str,
    },
    /// Announces that the session reached a terminal outcome.
    SessionEnded {
        /// Outcome that ended the session.
        outcome: Outcome,
    },
}

/// Failures raised while laying out a new dungeon.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The requested area cannot hold even the smallest room.
    #[error("a {width}x{height} area cannot hold a {min_width}x{min_height} room and its walls")]
    AreaTooSmall {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
        /// Smallest total width that can be carved.
        min_width: u32,
        /// Smallest total height that can be carved.
        min_height: u32,
    },
    /// Carving produced fewer floor cells than the entities require.
    #[error("carved {carved} floor cells but {required} are required")]
    InsufficientFloor {
        /// Floor cells produced by carving.
        carved: usize,
        /// Floor cells needed for markers and actors.
        required: usize,
    },
    /// A placement drew from an empty free-cell pool.
    #[error("no free cells remain for placement")]
    PoolExhausted,
    /// Marker placement was requested with a zero count, leaving no goal.
    #[error("at least one marker is required to place the goal")]
    NoMarkers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let origin = CellCoord::new(-1, 2);
        let destination = CellCoord::new(3, -1);
        assert_eq!(origin.manhattan_distance(destination), 7);
        assert_eq!(destination.manhattan_distance(origin), 7);
    }

    #[test]
    fn direction_offsets_cover_every_neighbour_once() {
        let origin = CellCoord::new(5, 5);
        let mut seen: Vec<_> = Direction::ALL
            .iter()
            .map(|direction| origin.step(*direction))
            .collect();
        seen.sort();
        seen.dedup();

        assert_eq!(seen.len(), 8);
        assert!(seen.iter().all(|cell| {
            cell.x().abs_diff(origin.x()) <= 1 && cell.y().abs_diff(origin.y()) <= 1
        }));
    }

    #[test]
    fn opposite_direction_cancels_offset() {
        for direction in Direction::ALL {
            let cell = CellCoord::new(0, 0).step(direction).step(direction.opposite());
            assert_eq!(cell, CellCoord::new(0, 0));
        }
    }

    #[test]
    fn neighbors4_are_orthogonal() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(
            origin.neighbors4(),
            [
                CellCoord::new(2, 1),
                CellCoord::new(3, 2),
                CellCoord::new(2, 3),
                CellCoord::new(1, 2),
            ]
        );
    }

    #[test]
    fn absent_cells_are_walls() {
        let mut grid = Grid::new();
        let floor = CellCoord::new(1, 1);
        assert_eq!(grid.insert(floor, CellKind::Floor), None);

        assert!(grid.is_passable(floor));
        assert!(!grid.is_passable(CellCoord::new(1, 2)));
        assert_eq!(grid.kind(CellCoord::new(1, 2)), None);
    }

    #[test]
    fn mark_only_touches_walkable_cells() {
        let mut grid = Grid::new();
        let floor = CellCoord::new(0, 0);
        let _ = grid.insert(floor, CellKind::Floor);

        assert!(grid.mark(floor, CellKind::Goal));
        assert!(!grid.mark(CellCoord::new(9, 9), CellKind::Collectible));
        assert_eq!(grid.kind(floor), Some(CellKind::Goal));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn grid_iterates_in_coordinate_order() {
        let mut grid = Grid::new();
        let _ = grid.insert(CellCoord::new(2, 0), CellKind::Floor);
        let _ = grid.insert(CellCoord::new(0, 1), CellKind::Collectible);
        let _ = grid.insert(CellCoord::new(0, 0), CellKind::Floor);

        let cells: Vec<_> = grid.iter().map(|(cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(2, 0),
            ]
        );
    }

    #[test]
    fn boxes_include_the_goal() {
        assert!(CellKind::Goal.holds_box());
        assert!(CellKind::Collectible.holds_box());
        assert!(!CellKind::Floor.holds_box());
    }
}
