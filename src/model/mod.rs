//! World Graph
//!
//! The in-memory snapshot of one legends file and the builder that fills
//! it in a single forward pass.

pub mod builder;
pub mod world;

pub use builder::{LoadStats, WorldBuilder};
pub use world::{RecordRef, World};
