// ============================================================
// Layer 3 — Grid Encoder
// ============================================================
// Lays a text out as a 2-D "image" of symbol IDs.
//
// The grid has a fixed width W and a variable height H:
//
//   text:  "Hi there!"   width = 4, max_rows = 8
//
//   row 0:  H  i  ␠  t
//   row 1:  h  e  r  e
//   row 2:  !  ·  ·  ·      ← last row right-padded with PAD
//
//   H = ceil(9 / 4) = 3
//
// Rules:
//   - At most width * max_rows characters are kept (the rest is dropped)
//   - H is the smallest row count holding every kept character,
//     capped at max_rows
//   - An empty text still produces one all-PAD row, so H >= 1
//
// Encoding never fails for any input text — unknown characters
// simply become PAD (see vocabulary.rs).
//
// width and max_rows must stay the same for every text a model is
// trained and evaluated on, which is why they live in GridConfig and
// are saved with the checkpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::vocabulary::{char_to_id, SymbolId, PAD_ID};

pub const DEFAULT_WIDTH: usize = 128;
pub const DEFAULT_MAX_ROWS: usize = 64;

/// Invalid grid dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridConfigError {
    #[error("grid width must be at least 1")]
    ZeroWidth,
    #[error("grid max_rows must be at least 1")]
    ZeroMaxRows,
}

// ─── GridConfig ───────────────────────────────────────────────────────────────
/// Grid dimensions shared by the encoder and the model.
/// Both values are guaranteed to be >= 1 once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    width: usize,
    max_rows: usize,
}

impl GridConfig {
    pub fn new(width: usize, max_rows: usize) -> Result<Self, GridConfigError> {
        if width == 0 {
            return Err(GridConfigError::ZeroWidth);
        }
        if max_rows == 0 {
            return Err(GridConfigError::ZeroMaxRows);
        }
        Ok(Self { width, max_rows })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Number of characters a grid can hold before truncation.
    pub fn max_chars(&self) -> usize {
        self.width.saturating_mul(self.max_rows)
    }

    /// Encode one text with these dimensions.
    pub fn encode(&self, text: &str) -> Grid {
        encode_with(text, self.width, self.max_rows)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

// ─── Grid ─────────────────────────────────────────────────────────────────────
/// A row-major (rows, width) block of symbol IDs.
/// Only [`encode`] builds one, so `ids.len() == rows * width` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    ids: Vec<SymbolId>,
    rows: usize,
    width: usize,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// (rows, width)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.width)
    }

    /// All cells, row after row.
    #[cfg(test)]
    pub fn as_slice(&self) -> &[SymbolId] {
        &self.ids
    }

    #[cfg(test)]
    pub fn row(&self, index: usize) -> Option<&[SymbolId]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.width;
        Some(&self.ids[start..start + self.width])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[SymbolId]> {
        self.ids.chunks_exact(self.width)
    }

    pub fn into_ids(self) -> Vec<SymbolId> {
        self.ids
    }
}

/// Encode `text` into a grid of `width` columns and at most `max_rows` rows.
///
/// # Panics
/// Panics if `width` or `max_rows` is 0. Use [`GridConfig`] to validate
/// dimensions up front.
pub fn encode(text: &str, width: usize, max_rows: usize) -> Grid {
    assert!(width > 0, "grid width must be at least 1");
    assert!(max_rows > 0, "grid max_rows must be at least 1");
    encode_with(text, width, max_rows)
}

fn encode_with(text: &str, width: usize, max_rows: usize) -> Grid {
    // Saturates so absurd dimensions still mean "keep everything"
    let max_len = width.saturating_mul(max_rows);

    // Truncation happens on characters, not bytes
    let mut ids: Vec<SymbolId> = text.chars().take(max_len).map(char_to_id).collect();
    if ids.is_empty() {
        ids.push(PAD_ID);
    }

    let rows = ids.len().div_ceil(width).min(max_rows);
    let cells = rows * width;

    // No-op after the take() above; guards the rows * width invariant
    ids.truncate(cells);
    ids.resize(cells, PAD_ID);

    Grid { ids, rows, width }
}
