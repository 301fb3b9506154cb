// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key Burn insight:
//   - Training uses an AutodiffBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on B::InnerBackend (Wgpu)
//   - Validation batcher must also use B::InnerBackend
//   - H_max differs from batch to batch; the model handles any height
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::sigmoid, backend::AutodiffBackend},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::GridBatcher, dataset::TextGridDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{bce_with_logits, TextualCnn, TextualCnnConfig};

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &TextualCnnConfig,
    train_dataset: TextGridDataset,
    val_dataset:   TextGridDataset,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, model_cfg, train_dataset, val_dataset, &ckpt_manager, device)?;
    Ok(())
}

/// Sums over one pass of a data loader.
/// Losses are weighted by batch size so the final batch,
/// which may be smaller, doesn't skew the average.
#[derive(Debug, Default, Clone, Copy)]
struct RunningTotals {
    loss_sum: f64,
    correct:  usize,
    samples:  usize,
}

impl RunningTotals {
    fn add_batch(&mut self, mean_loss: f64, batch_size: usize, correct: usize) {
        self.loss_sum += mean_loss * batch_size as f64;
        self.correct  += correct;
        self.samples  += batch_size;
    }

    fn mean_loss(&self) -> f64 {
        if self.samples > 0 { self.loss_sum / self.samples as f64 } else { f64::NAN }
    }

    fn accuracy(&self) -> f64 {
        if self.samples > 0 { self.correct as f64 / self.samples as f64 } else { 0.0 }
    }
}

/// Train for `cfg.epochs` epochs and return one metrics row per epoch.
fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &TextualCnnConfig,
    train_dataset: TextGridDataset,
    val_dataset:   TextGridDataset,
    ckpt_manager:  &CheckpointManager,
    device:        B::Device,
) -> Result<Vec<EpochMetrics>> {

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: TextualCnn<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: grid {}x{}, emb_dim={}, channels={:?}",
        model_cfg.grid.max_rows(), model_cfg.grid.width(),
        model_cfg.emb_dim, model_cfg.conv_channels,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().init();

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = GridBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = GridBatcher::<B::InnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut history = Vec::with_capacity(cfg.epochs);
    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train = RunningTotals::default();

        for batch in train_loader.iter() {
            let batch_size = batch.grids.dims()[0];
            let (loss, _) = model.forward_loss(batch.grids, batch.labels);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train.add_batch(loss_val, batch_size, 0);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → TextualCnn<B::InnerBackend>
        // dropout disabled, batch norm uses running statistics
        let model_valid = model.valid();
        let mut val = RunningTotals::default();

        for batch in val_loader.iter() {
            let batch_size = batch.grids.dims()[0];
            let logits = model_valid.forward(batch.grids);

            let batch_loss: f64 = bce_with_logits(logits.clone(), batch.labels.clone())
                .into_scalar().elem::<f64>();

            // Predicted generated ⇔ sigmoid(logit) >= 0.5
            let predicted = sigmoid(logits).greater_equal_elem(0.5);
            let actual    = batch.labels.greater_equal_elem(0.5);
            let hits: i64 = predicted.equal(actual).int().sum().into_scalar().elem::<i64>();

            val.add_batch(batch_loss, batch_size, hits as usize);
        }

        let row = EpochMetrics::new(epoch, train.mean_loss(), val.mean_loss(), val.accuracy());

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, row.train_loss, row.val_loss, row.val_accuracy * 100.0,
        );

        metrics.log(&row)?;
        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);

        if row.is_improvement(best_val_loss) {
            best_val_loss = row.val_loss;
            tracing::info!("Best validation loss so far: {:.4} (epoch {})", best_val_loss, epoch);
        }

        history.push(row);
    }

    tracing::info!("Training complete! Metrics in '{}'", metrics.csv_path().display());
    Ok(history)
}
