//! Character-cell frame with a scrolling message area below the map.

use std::collections::VecDeque;
use std::fmt::Write as _;

use ananas_core::CellCoord;

use crate::{Color, Renderer, DEFAULT_FOREGROUND};

/// Most recent messages, oldest first, bounded to a fixed number of lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl MessageLog {
    /// Creates an empty log holding at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a line, discarding the oldest once full.
    pub fn push(&mut self, text: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            let _ = self.lines.pop_front();
        }
        self.lines.push_back(text.to_owned());
    }

    /// Lines currently held, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of lines currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Reports whether the log holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameCell {
    glyph: char,
    color: Color,
}

const BLANK: FrameCell = FrameCell {
    glyph: ' ',
    color: DEFAULT_FOREGROUND,
};

/// In-memory terminal frame: the play area on top, messages underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFrame {
    width: u32,
    height: u32,
    message_top: u32,
    cells: Vec<FrameCell>,
    log: MessageLog,
}

impl TextFrame {
    /// Creates a blank frame of `width` columns with `message_rows` reserved
    /// below a play area `play_height` rows tall.
    #[must_use]
    pub fn new(width: u32, play_height: u32, message_rows: u32) -> Self {
        let height = play_height.saturating_add(message_rows);
        let len = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            message_top: play_height,
            cells: vec![BLANK; len],
            log: MessageLog::new(message_rows as usize),
        }
    }

    /// Messages currently on screen, oldest first.
    #[must_use]
    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    /// Glyph shown at `cell`, or `None` outside the frame.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Option<char> {
        self.index(cell).map(|index| self.cells[index].glyph)
    }

    /// Frame rows as plain text with trailing blanks removed.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        self.rows()
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.glyph).collect();
                line.trim_end().to_owned()
            })
            .collect()
    }

    /// Frame rendered with 24-bit ANSI foreground escapes, one line per row.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in self.rows() {
            let mut current = None;
            for cell in row {
                if current != Some(cell.color) {
                    let (red, green, blue) = cell.color.to_rgb_u8();
                    let _ = write!(out, "\x1b[38;2;{red};{green};{blue}m");
                    current = Some(cell.color);
                }
                out.push(cell.glyph);
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }

    fn rows(&self) -> impl Iterator<Item = &[FrameCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let x = u32::try_from(cell.x()).ok()?;
        let y = u32::try_from(cell.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn redraw_messages(&mut self) {
        let origin = CellCoord::new(0, self.message_top as i32);
        let rows = self.height - self.message_top;
        self.clear_region(origin, self.width, rows);

        let lines: Vec<String> = self.log.lines().map(str::to_owned).collect();
        for (row, line) in lines.iter().enumerate() {
            for (column, glyph) in line.chars().enumerate() {
                let cell = origin.offset(column as i32, row as i32);
                self.draw_cell(cell, glyph, DEFAULT_FOREGROUND);
            }
        }
    }
}

impl Renderer for TextFrame {
    fn draw_cell(&mut self, cell: CellCoord, glyph: char, color: Color) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = FrameCell { glyph, color };
        }
    }

    fn clear_region(&mut self, origin: CellCoord, width: u32, height: u32) {
        for dy in 0..height {
            for dx in 0..width {
                let cell = origin.offset(dx as i32, dy as i32);
                if let Some(index) = self.index(cell) {
                    self.cells[index] = BLANK;
                }
            }
        }
    }

    fn show_message(&mut self, text: &str) {
        self.log.push(text);
        self.redraw_messages();
    }
}
