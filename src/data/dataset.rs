use burn::data::dataset::Dataset;

use crate::domain::grid::{Grid, GridConfig};
use crate::domain::sample::LabelledText;

/// One encoded sample: the text's grid and its 0.0 / 1.0 target.
#[derive(Debug, Clone)]
pub struct GridSample {
    pub grid:  Grid,
    pub label: f32,
}

/// Labelled texts that are encoded into grids on access.
/// Encoding lazily keeps memory at one String per sample and lets
/// the DataLoader workers do the encoding in parallel.
pub struct TextGridDataset {
    samples: Vec<LabelledText>,
    grid:    GridConfig,
}

impl TextGridDataset {
    pub fn new(samples: Vec<LabelledText>, grid: GridConfig) -> Self {
        Self { samples, grid }
    }
}

impl Dataset<GridSample> for TextGridDataset {
    fn get(&self, index: usize) -> Option<GridSample> {
        self.samples.get(index).map(|s| GridSample {
            grid:  self.grid.encode(&s.text),
            label: s.label,
        })
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
