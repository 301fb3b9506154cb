// ============================================================
// Layer 4 — CSV Corpus Loader
// ============================================================
// Reads the labelled corpus from a CSV file with the layout
//
//   text,generated
//   "First essay ...",0.0
//   "Second essay, with ""quotes""
//    and a line break",1.0
//
// Column 0 is the text, column 1 the label. Column names are
// not checked, only positions. Essays routinely contain commas,
// quotes and newlines, so the csv crate does the parsing.
//
// The full Kaggle corpus has ~500k rows; `limit` keeps a run to
// a manageable prefix.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use crate::domain::sample::{Authorship, LabelledText};
use crate::domain::traits::TextSource;

/// Loads (text, generated) rows from a CSV file.
/// Implements the TextSource trait from Layer 3.
pub struct CsvTextLoader {
    path:  PathBuf,
    limit: Option<usize>,
}

impl CsvTextLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), limit: None }
    }

    /// Stop after `limit` rows.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl TextSource for CsvTextLoader {
    fn load_all(&self) -> Result<Vec<LabelledText>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Cannot open CSV '{}'", self.path.display()))?;

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut samples = Vec::new();

        for (row, record) in reader.records().take(limit).enumerate() {
            // Header is line 1, first record line 2
            let line = row + 2;
            let record = record
                .with_context(|| format!("Malformed CSV record near line {line}"))?;

            let text = record
                .get(0)
                .ok_or_else(|| anyhow!("Line {line}: missing text column"))?;
            let raw_label = record
                .get(1)
                .ok_or_else(|| anyhow!("Line {line}: missing label column"))?;
            let label: f32 = raw_label
                .trim()
                .parse()
                .with_context(|| format!("Line {line}: label '{raw_label}' is not a number"))?;

            samples.push(LabelledText::new(text, label));
        }

        tracing::info!(
            "Loaded {} samples from '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(samples)
    }
}

// ─── Corpus statistics ────────────────────────────────────────────────────────
/// Summary printed before training so class balance and text length
/// are visible at a glance.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub total:      usize,
    pub generated:  usize,
    pub mean_chars: f64,
}

impl CorpusStats {
    pub fn from_samples(samples: &[LabelledText]) -> Self {
        let total = samples.len();
        let generated = samples
            .iter()
            .filter(|s| s.authorship() == Authorship::Generated)
            .count();
        let chars: usize = samples.iter().map(|s| s.text.chars().count()).sum();
        let mean_chars = if total > 0 { chars as f64 / total as f64 } else { 0.0 };

        Self { total, generated, mean_chars }
    }

    pub fn human(&self) -> usize {
        self.total - self.generated
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{contents}").expect("write csv");
        file
    }

    #[test]
    fn test_loads_quoted_multiline_text() {
        let file = write_csv(
            "text,generated\n\
             \"Plain essay.\",0.0\n\
             \"An essay, with \"\"quotes\"\"\nand a second line\",1.0\n",
        );

        let samples = CsvTextLoader::new(file.path()).load_all().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], LabelledText::new("Plain essay.", 0.0));
        assert_eq!(samples[1].text, "An essay, with \"quotes\"\nand a second line");
        assert_eq!(samples[1].label, 1.0);
    }

    #[test]
    fn test_limit_stops_early() {
        let file = write_csv("text,generated\na,0\nb,1\nc,0\nd,1\n");
        let samples = CsvTextLoader::new(file.path()).with_limit(3).load_all().unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].text, "c");
    }

    #[test]
    fn test_bad_label_names_the_line() {
        let file = write_csv("text,generated\na,0\nb,maybe\n");
        let err = CsvTextLoader::new(file.path()).load_all().unwrap_err();
        assert!(format!("{err}").contains("Line 3"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = CsvTextLoader::new("does/not/exist.csv");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_corpus_stats() {
        let samples = vec![
            LabelledText::new("abcd", 1.0),
            LabelledText::new("ab", 0.0),
            LabelledText::new("abcdef", 1.0),
        ];
        let stats = CorpusStats::from_samples(&samples);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.generated, 2);
        assert_eq!(stats.human(), 1);
        assert!((stats.mean_chars - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_corpus_stats() {
        let stats = CorpusStats::from_samples(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.mean_chars, 0.0);
    }
}
