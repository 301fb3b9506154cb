// ============================================================
// Layer 4 — Grid Batcher
// ============================================================
// Implements Burn's Batcher trait on top of the pure collator.
//
// How batching works here:
//   Input:  Vec of N GridSamples, grid i has shape [H_i, W]
//   Output: GridBatch with
//             grids  [N, H_max, W]  Int
//             labels [N]            Float
//
//   H_max changes from batch to batch; W never does.
//
// The collator does the padding and the shape checks; this
// file only moves the flat buffers onto the device.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::collator::{collate, PaddedBatch};
use crate::data::dataset::GridSample;

// ─── GridBatch ────────────────────────────────────────────────────────────────
/// A batch of encoded texts ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct GridBatch<B: Backend> {
    /// Symbol IDs — shape: [batch_size, H_max, width]
    pub grids: Tensor<B, 3, Int>,

    /// Targets — shape: [batch_size], 0.0 = human, 1.0 = generated
    pub labels: Tensor<B, 1>,
}

impl<B: Backend> GridBatch<B> {
    /// Move a collated batch onto `device`.
    pub fn from_padded(batch: PaddedBatch, device: &B::Device) -> Self {
        let shape = batch.shape();
        let batch_size = batch.batch_size();
        let (ids, labels) = batch.into_parts();

        let ids: Vec<i64> = ids.into_iter().map(i64::from).collect();
        let grids = Tensor::<B, 3, Int>::from_data(TensorData::new(ids, shape), device);
        let labels = Tensor::<B, 1>::from_data(TensorData::new(labels, [batch_size]), device);

        Self { grids, labels }
    }
}

// ─── GridBatcher ──────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct GridBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> GridBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<GridSample, GridBatch<B>> for GridBatcher<B> {
    /// Pad to the batch's tallest grid and stack.
    ///
    /// # Panics
    /// Panics if the samples were encoded with different widths.
    /// Every sample in a dataset shares one GridConfig, so this only
    /// happens when datasets with different configurations are mixed.
    fn batch(&self, items: Vec<GridSample>) -> GridBatch<B> {
        let samples = items.into_iter().map(|s| (s.grid, s.label)).collect();
        let padded = collate(samples)
            .unwrap_or_else(|err| panic!("cannot assemble grid batch: {err}"));
        GridBatch::from_padded(padded, &self.device)
    }
}
