//! Legends Reader - streaming decoder for world legends exports
//!
//! A file is tokenized into raw elements, mapped onto typed records, and
//! collected into an id-indexed [`model::World`] that is published
//! atomically for the query layer.

pub mod core;
pub mod load;
pub mod model;
pub mod query;
pub mod schema;
pub mod tokenizer;

pub use crate::core::error::{LegendsError, Result};
pub use crate::core::types::{Kind, RecordId, Reference};
pub use load::{LegendsService, ProgressSnapshot};
pub use model::{LoadStats, RecordRef, World};
pub use query::Query;
