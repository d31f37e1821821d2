//! Typed layouts of the non-event record kinds

pub mod culture;
pub mod figures;
pub mod geography;

pub use culture::{ArtForm, ArtFormKind, Artifact, HistoricalEra, Item, WorkReference, WrittenContent};
pub use figures::{
    Entity, EntityLink, EntityPopulation, EntityPosition, EntityRelation, HfLink, HistoricalFigure,
    Identity, PositionAssignment, PositionLink, SiteLink, Skill,
};
pub use geography::{
    Landmass, MountainPeak, Region, River, Site, SiteProperty, Structure, UndergroundRegion,
    WorldConstruction,
};
