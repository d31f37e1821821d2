//! Schema Registry
//!
//! Maps raw elements onto typed records: a static table for top-level tags
//! and catalogs of sub-kinds for events and event collections.

pub mod catalog;
pub mod collections;
pub mod dispatch;
pub mod events;
pub mod fields;
pub mod records;

use crate::core::types::{Kind, RecordId, Reference};

pub use collections::{CollectionDetails, HistoricalEventCollection};
pub use dispatch::{DispatchedRecord, Dispatcher, TopLevelTag};
pub use events::{EventDetails, HistoricalEvent};
pub use fields::{Diagnostics, FieldReader, FromRaw, UnknownDetails};

/// Common view over every id-keyed record
pub trait Record {
    fn kind(&self) -> Kind;
    fn id(&self) -> RecordId;
    /// Display name as stored; may be empty
    fn name(&self) -> &str;
    /// Kind-specific grouping key (site type, race, event sub-kind, ...)
    fn type_name(&self) -> &str;
    /// Weak references this record declares, unset ids skipped
    fn references(&self) -> Vec<Reference>;
}

impl Record for HistoricalEvent {
    fn kind(&self) -> Kind {
        Kind::HistoricalEvent
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        ""
    }

    fn type_name(&self) -> &str {
        self.kind_name()
    }

    fn references(&self) -> Vec<Reference> {
        HistoricalEvent::references(self)
    }
}

impl Record for HistoricalEventCollection {
    fn kind(&self) -> Kind {
        Kind::HistoricalEventCollection
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.kind_name()
    }

    fn references(&self) -> Vec<Reference> {
        HistoricalEventCollection::references(self)
    }
}
