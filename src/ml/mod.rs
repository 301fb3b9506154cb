// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model and training code that needs a Burn backend.
//
// What's in this layer:
//
//   model.rs      — TextualCnn
//                   • Character embedding (96 symbols)
//                   • Three 3x3 conv blocks with batch norm,
//                     two of them followed by 2x2 max pooling
//                   • Global average pooling
//                   • Two-layer classification head → one logit
//
//   trainer.rs    — The training loop
//                   Forward pass, BCE loss, backward pass,
//                   Adam step, validation, metrics and
//                   checkpoint saving per epoch
//
//   inferencer.rs — The inference engine
//                   Loads a checkpoint, encodes one text,
//                   returns p(generated)
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Character-grid CNN classifier
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and scores texts
pub mod inferencer;
