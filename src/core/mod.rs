pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Season, Timestamp};
pub use config::LoaderConfig;
pub use error::{LegendsError, Result};
pub use types::{Kind, RecordId, Reference};
