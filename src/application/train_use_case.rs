// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate grid dimensions   (Layer 3 - domain)
//   Step 2: Load the labelled CSV      (Layer 4 - data)
//   Step 3: Report corpus statistics   (Layer 4 - data)
//   Step 4: Stratified 80/20 split     (Layer 4 - data)
//   Step 5: Build grid datasets        (Layer 4 - data)
//   Step 6: Save config                (Layer 6 - infra)
//   Step 7: Run training loop          (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::TextGridDataset,
    loader::{CorpusStats, CsvTextLoader},
    splitter::split_stratified,
};
use crate::domain::grid::{GridConfig, DEFAULT_MAX_ROWS, DEFAULT_WIDTH};
use crate::domain::sample::Authorship;
use crate::domain::traits::TextSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::TextualCnnConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Saved next to the weights so
// inference rebuilds the same model and lays text out the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub csv_path:       String,
    pub checkpoint_dir: String,
    pub sample_limit:   Option<usize>,
    pub width:          usize,
    pub max_rows:       usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub emb_dim:        usize,
    pub conv_channels:  [usize; 3],
    pub hidden:         usize,
    pub dropout:        f64,
    pub val_fraction:   f64,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            csv_path:       "data/textual_cnn/training/AI_Human.csv".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            sample_limit:   Some(10_000),
            width:          DEFAULT_WIDTH,
            max_rows:       DEFAULT_MAX_ROWS,
            batch_size:     2,
            epochs:         10,
            lr:             1e-3,
            emb_dim:        32,
            conv_channels:  [64, 128, 256],
            hidden:         128,
            dropout:        0.5,
            val_fraction:   0.2,
            seed:           37,
        }
    }
}

impl TrainConfig {
    pub fn grid_config(&self) -> Result<GridConfig> {
        GridConfig::new(self.width, self.max_rows)
            .with_context(|| format!("Invalid grid {}x{}", self.max_rows, self.width))
    }

    /// Model hyperparameters, including the grid the model is trained on.
    pub fn model_config(&self) -> Result<TextualCnnConfig> {
        Ok(TextualCnnConfig::new(self.grid_config()?)
            .with_emb_dim(self.emb_dim)
            .with_conv_channels(self.conv_channels)
            .with_hidden(self.hidden)
            .with_dropout(self.dropout))
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.batch_size > 0, "batch_size must be at least 1");
        anyhow::ensure!(
            self.val_fraction > 0.0 && self.val_fraction < 1.0,
            "val_fraction must be between 0 and 1, got {}",
            self.val_fraction
        );
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Validate configuration ────────────────────────────────────
        cfg.validate()?;
        let grid      = cfg.grid_config()?;
        let model_cfg = cfg.model_config()?;

        // ── Step 2: Load the labelled corpus ──────────────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.csv_path);
        let mut loader = CsvTextLoader::new(&cfg.csv_path);
        if let Some(limit) = cfg.sample_limit {
            loader = loader.with_limit(limit);
        }
        let samples = loader.load_all()?;
        anyhow::ensure!(!samples.is_empty(), "No samples found in '{}'", cfg.csv_path);

        // ── Step 3: Corpus statistics ─────────────────────────────────────────
        let stats = CorpusStats::from_samples(&samples);
        println!(
            "\nNumber of generated samples: {} for {} samples ({} human)",
            stats.generated, stats.total, stats.human()
        );
        println!("Average length: {:.1} chars for {} samples", stats.mean_chars, stats.total);

        let truncated = samples
            .iter()
            .filter(|s| s.text.chars().count() > grid.max_chars())
            .count();
        tracing::info!(
            "{} of {} texts exceed the {}-char grid and will be truncated",
            truncated, stats.total, grid.max_chars()
        );

        // ── Step 4: Stratified train / validation split ───────────────────────
        let (train_samples, val_samples) = split_stratified(
            samples,
            1.0 - cfg.val_fraction,
            cfg.seed,
            |s| s.authorship() == Authorship::Generated,
        );
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );

        // ── Step 5: Build Burn datasets ───────────────────────────────────────
        // Texts are encoded into grids lazily, one per Dataset::get
        let train_dataset = TextGridDataset::new(train_samples, grid);
        let val_dataset   = TextGridDataset::new(val_samples, grid);

        // ── Step 6: Save config for inference ─────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, &model_cfg, train_dataset, val_dataset, ckpt_manager)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_carries_grid() {
        let cfg = TrainConfig { width: 32, max_rows: 8, emb_dim: 16, ..TrainConfig::default() };
        let model_cfg = cfg.model_config().unwrap();
        assert_eq!(model_cfg.grid, GridConfig::new(32, 8).unwrap());
        assert_eq!(model_cfg.emb_dim, 16);
        assert_eq!(model_cfg.conv_channels, [64, 128, 256]);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let cfg = TrainConfig { width: 0, ..TrainConfig::default() };
        assert!(cfg.grid_config().is_err());
        assert!(cfg.model_config().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let cfg = TrainConfig { val_fraction: 1.0, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_execute_fails_on_missing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            csv_path:       dir.path().join("missing.csv").display().to_string(),
            checkpoint_dir: dir.path().join("ckpt").display().to_string(),
            ..TrainConfig::default()
        };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
