// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:        the epoch number (1, 2, 3, ...)
//   - train_loss:   mean binary cross-entropy on the training set
//   - val_loss:     mean binary cross-entropy on the validation set
//   - val_accuracy: fraction of validation texts classified correctly
//                   (sigmoid(logit) >= 0.5 ⇒ generated)
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,val_loss,val_accuracy
//   1,0.512300,0.468100,0.781000
//   2,0.401200,0.389700,0.836000
//   ...
//
// How to read the metrics:
//   - If val_loss increases while train_loss decreases → overfitting
//   - A balanced corpus gives 50% accuracy for a coin flip; compare
//     against the majority-class share for a skewed one

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "epoch,train_loss,val_loss,val_accuracy";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean loss per training sample
    pub train_loss: f64,

    /// Mean loss per validation sample
    pub val_loss: f64,

    /// Range: [0.0, 1.0]
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_accuracy: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_accuracy }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Appends epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        // Appending across runs keeps the whole history in one file
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.val_accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.5, 0.4, 0.8);
        assert!(m.is_improvement(0.45));
        assert!(!m.is_improvement(0.3));
    }

    #[test]
    fn test_log_appends_rows_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.25, 0.75)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.4, 0.2, 0.8)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,0.500000,0.250000,0.750000");
        assert_eq!(lines.len(), 3);

        // Re-opening keeps the history and doesn't repeat the header
        let again = MetricsLogger::new(dir.path()).unwrap();
        again.log(&EpochMetrics::new(3, 0.3, 0.1, 0.9)).unwrap();
        let contents = fs::read_to_string(again.csv_path()).unwrap();
        assert_eq!(contents.lines().filter(|l| *l == HEADER).count(), 1);
    }
}
