// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so a new
// corpus format or a different classifier plugs in without
// touching the use cases.
//
//   - CsvTextLoader implements TextSource
//   - DetectUseCase implements AuthorshipClassifier

use anyhow::Result;
use crate::domain::sample::LabelledText;

// ─── TextSource ───────────────────────────────────────────────────────────────
/// Anything that yields labelled training texts.
pub trait TextSource {
    /// Load every available sample, in source order.
    fn load_all(&self) -> Result<Vec<LabelledText>>;
}

// ─── AuthorshipClassifier ─────────────────────────────────────────────────────
/// Anything that can score how likely a text is AI-generated.
pub trait AuthorshipClassifier {
    /// Probability in [0, 1] that `text` was generated.
    fn ai_probability(&self, text: &str) -> Result<f32>;

    /// Same score expressed as a percentage.
    fn ai_percent(&self, text: &str) -> Result<f32> {
        Ok(self.ai_probability(text)? * 100.0)
    }
}
