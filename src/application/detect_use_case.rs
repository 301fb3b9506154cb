// ============================================================
// Layer 2 — Detect Use Case
// ============================================================
// Scores texts with a trained checkpoint:
//   1. Load the saved config and weights
//   2. Encode each text with the grid the model was trained on
//   3. Report p(generated) as a percentage
//
// Specimen files are scored independently; one unreadable file
// is reported and skipped, the rest are still scored.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::traits::AuthorshipClassifier;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct DetectUseCase {
    inferencer: Inferencer,
}

impl DetectUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir)?;
        let inferencer = Inferencer::from_checkpoint(&ckpt)?;
        Ok(Self { inferencer })
    }
}

impl AuthorshipClassifier for DetectUseCase {
    fn ai_probability(&self, text: &str) -> Result<f32> {
        self.inferencer.predict(text)
    }
}

/// Result of scoring one specimen file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileScore {
    /// File name without directories, for display
    pub name:       String,
    pub ai_percent: f32,
}

/// Score every file in `paths`, skipping the ones that cannot be read.
pub fn score_files<C: AuthorshipClassifier>(classifier: &C, paths: &[PathBuf]) -> Vec<FileScore> {
    let mut scores = Vec::with_capacity(paths.len());

    for path in paths {
        tracing::info!("Using file: '{}'", path.display());
        match score_file(classifier, path) {
            Ok(score) => scores.push(score),
            // Log and continue — one bad specimen shouldn't stop the rest
            Err(e) => tracing::error!("Skipping '{}': {:#}", path.display(), e),
        }
    }

    scores
}

fn score_file<C: AuthorshipClassifier>(classifier: &C, path: &Path) -> Result<FileScore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(FileScore { name, ai_percent: classifier.ai_percent(&text)? })
}
