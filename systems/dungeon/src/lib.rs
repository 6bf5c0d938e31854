#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic dungeon generation: carving, box placement, and actor spawns.
//!
//! All randomness flows through a caller-supplied [`RandomSource`], so a
//! layout is fully reproducible from its seed.

use ananas_core::{CellCoord, CellKind, DiggerConfig, GenerationError, Grid};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

mod digger;

/// Supplies uniform draws for generation and placement.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform index into a collection of `len` elements.
    ///
    /// `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index requires a non-empty collection");
        let scaled = (self.uniform() * len as f64) as usize;
        scaled.min(len.saturating_sub(1))
    }

    /// Uniform integer in `min..=max`.
    fn between(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        let offset = (self.uniform() * span as f64) as u64;
        min + offset.min(span - 1) as u32
    }
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Reproducible random source used by sessions and tests.
pub type SeededRandom = RngSource<ChaCha8Rng>;

impl SeededRandom {
    /// Creates a ChaCha-backed source from a 64-bit seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Result of carving: the walkable cells and the pool of unassigned floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Every carved cell, marked as floor.
    pub grid: Grid,
    /// Floor cells in carve order, not yet assigned a role.
    pub free_cells: Vec<CellCoord>,
}

impl Layout {
    /// Fails when fewer than `required` free cells are available.
    pub fn ensure_capacity(&self, required: usize) -> Result<(), GenerationError> {
        if self.free_cells.len() < required {
            return Err(GenerationError::InsufficientFloor {
                carved: self.free_cells.len(),
                required,
            });
        }
        Ok(())
    }
}

/// Carves a single connected region of rooms and corridors.
///
/// Floor cells are emitted column by column, which defines the order of the
/// returned free-cell pool.
pub fn generate<R>(
    width: u32,
    height: u32,
    config: &DiggerConfig,
    rng: &mut R,
) -> Result<Layout, GenerationError>
where
    R: RandomSource + ?Sized,
{
    let min_width = config.room_width.min.saturating_add(2);
    let min_height = config.room_height.min.saturating_add(2);
    if width < min_width || height < min_height {
        return Err(GenerationError::AreaTooSmall {
            width,
            height,
            min_width,
            min_height,
        });
    }

    let carved = digger::Digger::new(width, height, config).dig(rng);

    let mut grid = Grid::new();
    let mut free_cells = Vec::with_capacity(carved.len());
    for cell in carved {
        let _ = grid.insert(cell, CellKind::Floor);
        free_cells.push(cell);
    }

    debug!(width, height, floor = free_cells.len(), "dungeon_carved");
    Ok(Layout { grid, free_cells })
}

/// Hides `count` boxes in the free-cell pool and returns the goal cell.
///
/// The first box drawn holds the ananas and is marked [`CellKind::Goal`]; the
/// rest are [`CellKind::Collectible`]. Each draw removes its cell from the
/// pool.
pub fn place_markers<R>(
    grid: &mut Grid,
    pool: &mut Vec<CellCoord>,
    count: usize,
    rng: &mut R,
) -> Result<CellCoord, GenerationError>
where
    R: RandomSource + ?Sized,
{
    if count == 0 {
        return Err(GenerationError::NoMarkers);
    }

    let mut goal = None;
    for _ in 0..count {
        let cell = draw(pool, rng)?;
        let kind = if goal.is_none() {
            goal = Some(cell);
            CellKind::Goal
        } else {
            CellKind::Collectible
        };
        let _ = grid.mark(cell, kind);
    }

    goal.ok_or(GenerationError::NoMarkers)
}

/// Draws a spawn cell for an actor, removing it from the pool.
pub fn place_entity<R>(pool: &mut Vec<CellCoord>, rng: &mut R) -> Result<CellCoord, GenerationError>
where
    R: RandomSource + ?Sized,
{
    draw(pool, rng)
}

fn draw<R>(pool: &mut Vec<CellCoord>, rng: &mut R) -> Result<CellCoord, GenerationError>
where
    R: RandomSource + ?Sized,
{
    if pool.is_empty() {
        return Err(GenerationError::PoolExhausted);
    }
    let index = rng.index(pool.len());
    Ok(pool.remove(index))
}
