// ============================================================
// Layer 3 — Labelled Text Domain Type
// ============================================================
// One row of the training corpus: a piece of prose and whether
// it was generated by an AI model.
//
// The label is an f32 rather than a bool because the loss treats
// it as a probability target in [0, 1]. The source data only ever
// contains exact 0.0 and 1.0.

use serde::{Deserialize, Serialize};

/// Who wrote a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authorship {
    Human,
    Generated,
}

impl Authorship {
    /// Any non-zero label counts as generated.
    pub fn from_label(label: f32) -> Self {
        if label != 0.0 {
            Authorship::Generated
        } else {
            Authorship::Human
        }
    }
}

/// A text with its generated/human label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledText {
    pub text: String,
    pub label: f32,
}

impl LabelledText {
    pub fn new(text: impl Into<String>, label: f32) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    pub fn authorship(&self) -> Authorship {
        Authorship::from_label(self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_to_authorship() {
        assert_eq!(LabelledText::new("a", 0.0).authorship(), Authorship::Human);
        assert_eq!(LabelledText::new("a", 1.0).authorship(), Authorship::Generated);
        assert_eq!(LabelledText::new("a", 0.5).authorship(), Authorship::Generated);
    }
}
