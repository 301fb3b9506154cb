// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads the latest checkpoint and scores single texts.
//
// The encoder is rebuilt from the GridConfig stored with the
// checkpoint, so a text is always laid out exactly as during
// training. A single grid is wrapped as a batch of one because
// the model only accepts batched input.

use anyhow::Result;
use burn::{prelude::*, tensor::activation::sigmoid};

use crate::data::batcher::GridBatch;
use crate::data::collator::PaddedBatch;
use crate::domain::grid::GridConfig;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::TextualCnn;

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer {
    model:  TextualCnn<InferBackend>,
    grid:   GridConfig,
    device: burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device    = burn::backend::wgpu::WgpuDevice::default();
        let cfg       = ckpt_manager.load_config()?;
        let model_cfg = cfg.model_config()?;
        let model: TextualCnn<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!(
            "Model loaded from checkpoint (grid {}x{})",
            model_cfg.grid.max_rows(), model_cfg.grid.width(),
        );
        Ok(Self { model, grid: model_cfg.grid, device })
    }

    /// Probability in [0, 1] that `text` is AI-generated.
    pub fn predict(&self, text: &str) -> Result<f32> {
        let grid  = self.grid.encode(text);
        let shape = grid.shape();
        let batch = GridBatch::<InferBackend>::from_padded(PaddedBatch::single(grid), &self.device);

        let logit = self.model.forward(batch.grids);
        let prob: f32 = sigmoid(logit).into_scalar().elem::<f32>();

        tracing::debug!("Grid {:?} → p(generated)={:.4}", shape, prob);
        Ok(prob)
    }
}
