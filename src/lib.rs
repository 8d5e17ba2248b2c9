#[cfg(feature = "serde")]
pub mod config; // TOML patch configuration
pub mod dsp;
pub mod io;
pub mod patch; // Host-facing patch compositions

pub const MAX_BLOCK_SIZE: usize = 2048;
