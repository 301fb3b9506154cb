// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define what the system works with:
// the character vocabulary, the text grid, labelled samples
// and the traits other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, functions and traits
//
// Everything here is deterministic and side-effect free, so it
// can be tested without a GPU and called from any thread.

/// The 96-symbol character alphabet
pub mod vocabulary;

/// Text → fixed-width, variable-height grid of symbol IDs
pub mod grid;

/// A text with its human/generated label
pub mod sample;

/// Core abstractions (traits) that other layers implement
pub mod traits;
