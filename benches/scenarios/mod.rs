//! Patch-level benchmarks.
//!
//! These drive the patches the way a host does: one `process_audio` call per
//! block, through `AudioBuffer`.

mod patches;

pub use patches::bench_patches;
