// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal
// (training or scoring texts).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - No direct file format handling (that's Layer 4 and 6)
//   - Only workflow coordination

// The training workflow
pub mod train_use_case;

// The scoring/inference workflow
pub mod detect_use_case;
