// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs — Saving and loading model weights
//                   Uses Burn's CompactRecorder to serialise
//                   model parameters to disk. Also saves/loads
//                   TrainConfig as JSON so inference can rebuild
//                   the model and the grid encoder.
//
//   metrics.rs    — Training metrics logging
//                   Appends epoch-level loss and accuracy to a
//                   CSV file for later analysis and plotting.
//
// Reference: Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
