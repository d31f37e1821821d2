//! Loading
//!
//! Runs a decoding pass in the background, reports progress while it runs
//! and publishes the finished World atomically.

pub mod decode;
pub mod progress;
pub mod service;
pub mod slot;

pub use decode::{decode_file, decode_reader};
pub use progress::{Phase, Progress, ProgressSnapshot, ProgressState};
pub use service::LegendsService;
pub use slot::WorldSlot;
