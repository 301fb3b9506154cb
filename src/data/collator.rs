// ============================================================
// Layer 4 — Variable-Height Collator
// ============================================================
// Stacks grids of different heights into one rectangular batch.
//
// Grids share a width W but each has its own height H_i.
// The batch height is the tallest grid in THIS batch, not a
// fixed worst case — short texts don't pay for long ones:
//
//   sample 0  (1, 5)      sample 1  (2, 5)
//   ┌───────────┐         ┌───────────┐
//   │ 41 74 2 0 0│         │ 52 69 ... │
//   └───────────┘         │ 80 82 ... │
//                          └───────────┘
//            │ collate
//            ▼
//   batch (2, 2, 5)
//   [0] 41 74 2 0 0
//       0  0  0 0 0   ← PAD row appended
//   [1] 52 69 ...
//       80 82 ...
//
// Content is top-aligned and never altered; only whole PAD rows
// are added at the bottom. Sample order and label order are kept.
//
// Mixing widths means two encoders with different configurations
// fed the same batch. That is a bug in the caller, so it is
// reported as an error instead of being reshaped away.

use thiserror::Error;

use crate::domain::grid::Grid;
use crate::domain::vocabulary::{SymbolId, PAD_ID};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollateError {
    #[error("cannot collate an empty batch")]
    Empty,
    #[error("all widths in a batch must be the same: sample {index} has width {found}, expected {expected}")]
    WidthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

// ─── PaddedBatch ──────────────────────────────────────────────────────────────
/// A (batch_size, height, width) block of IDs plus one label per sample.
/// Backend-agnostic: the burn batcher turns this into tensors.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedBatch {
    ids: Vec<SymbolId>,
    labels: Vec<f32>,
    batch_size: usize,
    height: usize,
    width: usize,
}

impl PaddedBatch {
    /// Wrap one grid as a batch of size 1 (the inference path).
    pub fn single(grid: Grid) -> Self {
        let (height, width) = grid.shape();
        Self {
            ids: grid.into_ids(),
            labels: vec![0.0],
            batch_size: 1,
            height,
            width,
        }
    }

    /// (batch_size, height, width)
    pub fn shape(&self) -> [usize; 3] {
        [self.batch_size, self.height, self.width]
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[cfg(test)]
    pub fn ids(&self) -> &[SymbolId] {
        &self.ids
    }

    #[cfg(test)]
    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    /// The (height, width) slice belonging to sample `index`.
    #[cfg(test)]
    pub fn sample(&self, index: usize) -> Option<&[SymbolId]> {
        if index >= self.batch_size {
            return None;
        }
        let stride = self.height * self.width;
        Some(&self.ids[index * stride..(index + 1) * stride])
    }

    pub fn into_parts(self) -> (Vec<SymbolId>, Vec<f32>) {
        (self.ids, self.labels)
    }
}

/// Pad every grid to the tallest height in `samples` and stack them.
pub fn collate(samples: Vec<(Grid, f32)>) -> Result<PaddedBatch, CollateError> {
    let (grids, labels): (Vec<Grid>, Vec<f32>) = samples.into_iter().unzip();

    let width = grids.first().ok_or(CollateError::Empty)?.width();
    if let Some((index, grid)) = grids.iter().enumerate().find(|(_, g)| g.width() != width) {
        return Err(CollateError::WidthMismatch {
            index,
            expected: width,
            found: grid.width(),
        });
    }

    let height = grids.iter().map(Grid::rows).max().unwrap_or(1);
    let batch_size = grids.len();

    let mut ids = Vec::with_capacity(batch_size * height * width);
    for grid in grids {
        let pad_rows = height - grid.rows();
        ids.extend(grid.into_ids());
        ids.extend(std::iter::repeat(PAD_ID).take(pad_rows * width));
    }

    tracing::trace!(batch_size, height, width, "Collated batch");

    Ok(PaddedBatch {
        ids,
        labels,
        batch_size,
        height,
        width,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::encode;

    #[test]
    fn test_pads_shorter_grid_with_pad_rows() {
        let short = encode("Hi!", 5, 2);
        let tall = encode("Hello!", 5, 2);
        assert_eq!(tall.shape(), (2, 5));

        let batch = collate(vec![(short.clone(), 0.0), (tall.clone(), 1.0)]).unwrap();
        assert_eq!(batch.shape(), [2, 2, 5]);

        let first = batch.sample(0).unwrap();
        assert_eq!(&first[..5], short.as_slice());
        assert_eq!(&first[5..], &[0, 0, 0, 0, 0]);
        assert_eq!(batch.sample(1).unwrap(), tall.as_slice());
    }

    #[test]
    fn test_uniform_heights_pass_through() {
        let a = encode("abc", 3, 4);
        let b = encode("xyz", 3, 4);
        let batch = collate(vec![(a.clone(), 1.0), (b.clone(), 0.0)]).unwrap();
        assert_eq!(batch.shape(), [2, 1, 3]);
        assert_eq!(batch.sample(0).unwrap(), a.as_slice());
        assert_eq!(batch.sample(1).unwrap(), b.as_slice());
    }

    #[test]
    fn test_preserves_rows_and_appends_pad_rows() {
        let texts = ["a", "abcdefghij", "abcde", ""];
        let grids: Vec<Grid> = texts.iter().map(|t| encode(t, 3, 10)).collect();
        let max_h = grids.iter().map(Grid::rows).max().unwrap();

        let samples = grids.iter().cloned().map(|g| (g, 0.0)).collect();
        let batch = collate(samples).unwrap();
        assert_eq!(batch.shape(), [4, max_h, 3]);

        for (i, grid) in grids.iter().enumerate() {
            let slice = batch.sample(i).unwrap();
            let (content, padding) = slice.split_at(grid.as_slice().len());
            assert_eq!(content, grid.as_slice());
            assert!(padding.iter().all(|&id| id == PAD_ID));
        }
    }

    #[test]
    fn test_label_order_follows_sample_order() {
        // Distinct labels and heights so any reordering shows up
        let inputs = [
            (encode("one", 4, 4), 0.25),
            (encode("two two two", 4, 4), 0.5),
            (encode("three three three", 4, 4), 0.75),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for order in orders {
            let samples: Vec<(Grid, f32)> = order.iter().map(|&i| inputs[i].clone()).collect();
            let batch = collate(samples.clone()).unwrap();

            for (i, (grid, label)) in samples.iter().enumerate() {
                assert_eq!(batch.labels()[i], *label, "order {order:?}, index {i}");

                let slice = batch.sample(i).unwrap();
                let (content, padding) = slice.split_at(grid.as_slice().len());
                assert_eq!(content, grid.as_slice(), "order {order:?}, index {i}");
                assert!(padding.iter().all(|&id| id == PAD_ID));
            }
        }
    }

    #[test]
    fn test_width_mismatch_is_reported() {
        let samples = vec![
            (encode("abc", 5, 2), 0.0),
            (encode("abc", 5, 2), 0.0),
            (encode("abc", 4, 2), 1.0),
        ];
        assert_eq!(
            collate(samples),
            Err(CollateError::WidthMismatch { index: 2, expected: 5, found: 4 })
        );
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        assert_eq!(collate(Vec::new()), Err(CollateError::Empty));
    }

    #[test]
    fn test_single_wraps_grid() {
        let grid = encode("Hi!", 5, 2);
        let batch = PaddedBatch::single(grid.clone());
        assert_eq!(batch.shape(), [1, 1, 5]);
        assert_eq!(batch.ids(), grid.as_slice());
    }
}
