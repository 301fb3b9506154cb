// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV corpus to device-ready batches.
//
// The pipeline flows in this order:
//
//   AI_Human.csv
//       │
//       ▼
//   CsvTextLoader      → reads (text, generated) rows
//       │
//       ▼
//   split_stratified   → 80/20 train/validation, class-balanced
//       │
//       ▼
//   TextGridDataset    → encodes each text into a grid on access
//       │
//       ▼
//   GridBatcher        → collate: pad to the batch's tallest grid
//       │
//       ▼
//   DataLoader         → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the labelled corpus from CSV
pub mod loader;

/// Shuffles and splits data into train/validation sets
pub mod splitter;

/// Implements Burn's Dataset trait over labelled texts
pub mod dataset;

/// Pads variable-height grids into one rectangular batch
pub mod collator;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
