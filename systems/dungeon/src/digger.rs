//! Room-and-corridor digger.
//!
//! The digger starts from a room in the middle of the area and keeps
//! attaching rooms and corridors to the walls of what it already carved.
//! Each feature shares its door cell with carved floor, so the result is a
//! single connected region by construction.

use ananas_core::{CellCoord, DiggerConfig, Direction};

use crate::RandomSource;

#[derive(Clone, Copy, Debug)]
struct WallCandidate {
    cell: CellCoord,
    outward: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FeatureKind {
    Room,
    Corridor,
}

#[derive(Debug)]
pub(crate) struct Digger<'a> {
    width: i32,
    height: i32,
    config: &'a DiggerConfig,
    dug: Vec<bool>,
    dug_count: usize,
    walls: Vec<WallCandidate>,
}

impl<'a> Digger<'a> {
    pub(crate) fn new(width: u32, height: u32, config: &'a DiggerConfig) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let capacity = usize::try_from(width)
            .unwrap_or(0)
            .saturating_mul(usize::try_from(height).unwrap_or(0));
        Self {
            width,
            height,
            config,
            dug: vec![false; capacity],
            dug_count: 0,
            walls: Vec::new(),
        }
    }

    /// Carves the area and returns floor cells column by column.
    pub(crate) fn dig<R>(mut self, rng: &mut R) -> Vec<CellCoord>
    where
        R: RandomSource + ?Sized,
    {
        self.carve_first_room(rng);

        let interior = usize::try_from((self.width - 2).max(0) * (self.height - 2).max(0))
            .unwrap_or(usize::MAX);
        let target = (interior as f64 * self.config.dug_percentage).ceil() as usize;

        let mut attempts = 0;
        while self.dug_count < target && attempts < self.config.max_attempts {
            if self.walls.is_empty() {
                break;
            }
            attempts += 1;

            let candidate = self.walls.swap_remove(rng.index(self.walls.len()));
            if !self.is_attachable(candidate) {
                continue;
            }

            let preferred = if rng.uniform() < 0.5 {
                FeatureKind::Room
            } else {
                FeatureKind::Corridor
            };
            let fallback = match preferred {
                FeatureKind::Room => FeatureKind::Corridor,
                FeatureKind::Corridor => FeatureKind::Room,
            };

            for kind in [preferred, fallback] {
                let footprint = self.footprint(kind, candidate, rng);
                if self.fits(&footprint) {
                    self.carve(&footprint);
                    break;
                }
            }
        }

        self.floor_cells()
    }

    fn carve_first_room<R>(&mut self, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        let max_width = u32::try_from(self.width - 2).unwrap_or(0);
        let max_height = u32::try_from(self.height - 2).unwrap_or(0);
        let room_width = rng
            .between(self.config.room_width.min, self.config.room_width.max)
            .min(max_width);
        let room_height = rng
            .between(self.config.room_height.min, self.config.room_height.max)
            .min(max_height);
        let room_width = i32::try_from(room_width).unwrap_or(0);
        let room_height = i32::try_from(room_height).unwrap_or(0);

        let left = (self.width - room_width) / 2;
        let top = (self.height - room_height) / 2;
        let cells = rect(left, top, room_width, room_height);
        self.carve(&cells);
    }

    /// Cells of a feature attached at `candidate`, door first.
    fn footprint<R>(
        &self,
        kind: FeatureKind,
        candidate: WallCandidate,
        rng: &mut R,
    ) -> Vec<CellCoord>
    where
        R: RandomSource + ?Sized,
    {
        let door = candidate.cell;
        match kind {
            FeatureKind::Corridor => {
                let length = rng.between(
                    self.config.corridor_length.min,
                    self.config.corridor_length.max,
                );
                let mut cells = Vec::with_capacity(length as usize);
                let mut cell = door;
                for _ in 0..length {
                    cells.push(cell);
                    cell = cell.step(candidate.outward);
                }
                cells
            }
            FeatureKind::Room => {
                let room_width = i32::try_from(
                    rng.between(self.config.room_width.min, self.config.room_width.max),
                )
                .unwrap_or(1);
                let room_height = i32::try_from(
                    rng.between(self.config.room_height.min, self.config.room_height.max),
                )
                .unwrap_or(1);
                let lateral_x = i32::try_from(rng.index(room_width.max(1) as usize)).unwrap_or(0);
                let lateral_y =
                    i32::try_from(rng.index(room_height.max(1) as usize)).unwrap_or(0);

                let (left, top) = match candidate.outward {
                    Direction::North => (door.x() - lateral_x, door.y() - room_height),
                    Direction::South => (door.x() - lateral_x, door.y() + 1),
                    Direction::East => (door.x() + 1, door.y() - lateral_y),
                    _ => (door.x() - room_width, door.y() - lateral_y),
                };

                let mut cells = Vec::with_capacity((room_width * room_height) as usize + 1);
                cells.push(door);
                cells.extend(rect(left, top, room_width, room_height));
                cells
            }
        }
    }

    /// A feature fits when it stays inside the border and, apart from its
    /// door, touches no carved cell.
    fn fits(&self, footprint: &[CellCoord]) -> bool {
        let Some((&door, body)) = footprint.split_first() else {
            return false;
        };

        if !self.is_interior(door) || self.is_dug(door) {
            return false;
        }

        body.iter().all(|&cell| {
            self.is_interior(cell)
                && !self.is_dug(cell)
                && Direction::ALL.iter().all(|&direction| {
                    let neighbor = cell.step(direction);
                    footprint.contains(&neighbor) || !self.is_dug(neighbor)
                })
        })
    }

    fn carve(&mut self, cells: &[CellCoord]) {
        for &cell in cells {
            if let Some(index) = self.index(cell) {
                if !self.dug[index] {
                    self.dug[index] = true;
                    self.dug_count += 1;
                }
            }
        }

        for &cell in cells {
            for direction in Direction::CARDINAL {
                let neighbor = cell.step(direction);
                if self.is_interior(neighbor) && !self.is_dug(neighbor) {
                    self.walls.push(WallCandidate {
                        cell: neighbor,
                        outward: direction,
                    });
                }
            }
        }
    }

    fn is_attachable(&self, candidate: WallCandidate) -> bool {
        !self.is_dug(candidate.cell) && self.is_dug(candidate.cell.step(candidate.outward.opposite()))
    }

    fn is_interior(&self, cell: CellCoord) -> bool {
        cell.x() >= 1 && cell.y() >= 1 && cell.x() <= self.width - 2 && cell.y() <= self.height - 2
    }

    fn is_dug(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.dug.get(index).copied())
            .unwrap_or(false)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.x() < 0 || cell.y() < 0 || cell.x() >= self.width || cell.y() >= self.height {
            return None;
        }
        let column = usize::try_from(cell.x()).ok()?;
        let row = usize::try_from(cell.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn floor_cells(&self) -> Vec<CellCoord> {
        let mut cells = Vec::with_capacity(self.dug_count);
        for x in 0..self.width {
            for y in 0..self.height {
                let cell = CellCoord::new(x, y);
                if self.is_dug(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}

fn rect(left: i32, top: i32, width: i32, height: i32) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    for y in top..top + height {
        for x in left..left + width {
            cells.push(CellCoord::new(x, y));
        }
    }
    cells
}
