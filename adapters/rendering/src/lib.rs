#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Ananas Hunt adapters.
//!
//! The session reports every visible change through the [`Renderer`]
//! capability. This crate owns the glyph table, translates world events into
//! cell repaints, and provides two concrete renderers: [`RecordingRenderer`]
//! for tests and headless runs, and [`TextFrame`] for character terminals.

mod text_frame;

use ananas_core::{CellCoord, CellKind, Event};
use ananas_world::{query, GameState};

pub use text_frame::{MessageLog, TextFrame};

/// Glyph used for walkable floor.
pub const FLOOR_GLYPH: char = '.';
/// Glyph used for any box, including the one holding the ananas.
pub const BOX_GLYPH: char = '*';
/// Glyph used for the player.
pub const PLAYER_GLYPH: char = '@';
/// Glyph used for the pursuer.
pub const PURSUER_GLYPH: char = 'P';

/// Foreground used for terrain and message text.
pub const DEFAULT_FOREGROUND: Color = Color::from_rgb_u8(0xcc, 0xcc, 0xcc);
/// Foreground used for the player.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0x00);
/// Foreground used for the pursuer.
pub const PURSUER_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);

/// RGBA color used when presenting cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB values, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }
}

fn channel_to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Output capability the session draws through.
pub trait Renderer {
    /// Paints a single cell.
    fn draw_cell(&mut self, cell: CellCoord, glyph: char, color: Color);

    /// Blanks a rectangle whose top-left corner is `origin`.
    fn clear_region(&mut self, origin: CellCoord, width: u32, height: u32);

    /// Reports a line of text to the player.
    fn show_message(&mut self, text: &str);
}

/// Glyph and color for a walkable cell without an actor on it.
#[must_use]
pub fn cell_glyph(kind: CellKind) -> (char, Color) {
    match kind {
        CellKind::Floor => (FLOOR_GLYPH, DEFAULT_FOREGROUND),
        CellKind::Collectible | CellKind::Goal => (BOX_GLYPH, DEFAULT_FOREGROUND),
    }
}

/// Paints every walkable cell, then the player, then the pursuer.
pub fn draw_whole_map<R>(state: &GameState, renderer: &mut R)
where
    R: Renderer + ?Sized,
{
    for (cell, kind) in query::grid(state) {
        let (glyph, color) = cell_glyph(kind);
        renderer.draw_cell(cell, glyph, color);
    }
    renderer.draw_cell(query::player(state), PLAYER_GLYPH, PLAYER_COLOR);
    renderer.draw_cell(query::pursuer(state), PURSUER_GLYPH, PURSUER_COLOR);
}

/// Forwards the visible consequences of `events` to the renderer.
///
/// `state` must already reflect the events. Vacated cells are repainted with
/// whatever now occupies them and entered cells with the actor glyph.
pub fn present<R>(events: &[Event], state: &GameState, renderer: &mut R)
where
    R: Renderer + ?Sized,
{
    for event in events {
        match event {
            Event::PlayerMoved { from, to } | Event::PursuerMoved { from, to } => {
                draw_occupant(state, *from, renderer);
                draw_occupant(state, *to, renderer);
            }
            Event::MessageLogged { text } => renderer.show_message(text),
            Event::PlayerMoveBlocked { .. }
            | Event::BoxOpened { .. }
            | Event::SessionEnded { .. } => {}
        }
    }
}

fn draw_occupant<R>(state: &GameState, cell: CellCoord, renderer: &mut R)
where
    R: Renderer + ?Sized,
{
    if cell == query::player(state) {
        renderer.draw_cell(cell, PLAYER_GLYPH, PLAYER_COLOR);
    } else if cell == query::pursuer(state) {
        renderer.draw_cell(cell, PURSUER_GLYPH, PURSUER_COLOR);
    } else if let Some(kind) = query::cell_kind(state, cell) {
        let (glyph, color) = cell_glyph(kind);
        renderer.draw_cell(cell, glyph, color);
    }
}

/// Single call received by a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    /// A cell was painted.
    Cell {
        /// Painted cell.
        cell: CellCoord,
        /// Glyph drawn.
        glyph: char,
        /// Foreground color.
        color: Color,
    },
    /// A region was blanked.
    Clear {
        /// Top-left corner of the region.
        origin: CellCoord,
        /// Width in cells.
        width: u32,
        /// Height in cells.
        height: u32,
    },
    /// A message was shown.
    Message(String),
}

/// Renderer that records every call in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingRenderer {
    operations: Vec<RenderOp>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn operations(&self) -> &[RenderOp] {
        &self.operations
    }

    /// Messages shown so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.operations
            .iter()
            .filter_map(|operation| match operation {
                RenderOp::Message(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Glyph most recently painted at `cell`, unless it was cleared since.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Option<char> {
        for operation in self.operations.iter().rev() {
            match operation {
                RenderOp::Cell {
                    cell: painted,
                    glyph,
                    ..
                } if *painted == cell => return Some(*glyph),
                RenderOp::Clear {
                    origin,
                    width,
                    height,
                } if region_contains(*origin, *width, *height, cell) => return None,
                _ => {}
            }
        }
        None
    }
}

impl Renderer for RecordingRenderer {
    fn draw_cell(&mut self, cell: CellCoord, glyph: char, color: Color) {
        self.operations.push(RenderOp::Cell { cell, glyph, color });
    }

    fn clear_region(&mut self, origin: CellCoord, width: u32, height: u32) {
        self.operations.push(RenderOp::Clear {
            origin,
            width,
            height,
        });
    }

    fn show_message(&mut self, text: &str) {
        self.operations.push(RenderOp::Message(text.to_owned()));
    }
}

fn region_contains(origin: CellCoord, width: u32, height: u32, cell: CellCoord) -> bool {
    let dx = i64::from(cell.x()) - i64::from(origin.x());
    let dy = i64::from(cell.y()) - i64::from(origin.y());
    (0..i64::from(width)).contains(&dx) && (0..i64::from(height)).contains(&dy)
}
