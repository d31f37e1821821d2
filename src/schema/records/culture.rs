//! Artifacts, written works, art forms and eras

use serde::{Deserialize, Serialize};

use crate::core::types::{collect_refs, Kind, RecordId, Reference};
use crate::schema::fields::{FieldReader, FromRaw};
use crate::schema::Record;

/// The physical object behind an artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name_string: String,
    pub page_number: i32,
    pub page_written_content_id: RecordId,
    pub writing_written_content_id: RecordId,
}

impl FromRaw for Item {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            name_string: reader.text("name_string"),
            page_number: reader.int("page_number"),
            page_written_content_id: reader.id_ref("page_written_content_id"),
            writing_written_content_id: reader.id_ref("writing_written_content_id"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: RecordId,
    pub name: String,
    pub item_type: String,
    pub item_subtype: String,
    pub mat: String,
    pub description: String,
    pub site_id: RecordId,
    pub structure_local_id: i32,
    pub subregion_id: RecordId,
    pub holder_hfid: RecordId,
    pub item: Option<Item>,
}

impl FromRaw for Artifact {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            item_type: reader.text("item_type"),
            item_subtype: reader.text("item_subtype"),
            mat: reader.text("mat"),
            description: reader.text("item_description"),
            site_id: reader.id_ref("site_id"),
            structure_local_id: reader.int("structure_local_id"),
            subregion_id: reader.id_ref("subregion_id"),
            holder_hfid: reader.id_ref("holder_hfid"),
            item: reader.nested("item", Item::from_raw).into_iter().next(),
        }
    }
}

impl Record for Artifact {
    fn kind(&self) -> Kind {
        Kind::Artifact
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.item_type
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::Site, &self.site_id);
        collect_refs(&mut out, Kind::Region, &self.subregion_id);
        collect_refs(&mut out, Kind::HistoricalFigure, &self.holder_hfid);
        if let Some(item) = &self.item {
            collect_refs(&mut out, Kind::WrittenContent, &item.page_written_content_id);
            collect_refs(&mut out, Kind::WrittenContent, &item.writing_written_content_id);
        }
        out
    }
}

/// A `<reference>` inside a written work: what the work is about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReference {
    pub reference_type: String,
    pub id: RecordId,
}

impl WorkReference {
    /// Kind the referenced id belongs to, when it names a record
    pub fn kind(&self) -> Option<Kind> {
        match self.reference_type.as_str() {
            "HISTORICAL_FIGURE" => Some(Kind::HistoricalFigure),
            "HISTORICAL_EVENT" => Some(Kind::HistoricalEvent),
            "ENTITY" => Some(Kind::Entity),
            "SITE" => Some(Kind::Site),
            "ARTIFACT" => Some(Kind::Artifact),
            "SUBREGION" => Some(Kind::Region),
            "WRITTEN_CONTENT" => Some(Kind::WrittenContent),
            "DANCE_FORM" => Some(Kind::DanceForm),
            "MUSICAL_FORM" => Some(Kind::MusicalForm),
            "POETIC_FORM" => Some(Kind::PoeticForm),
            _ => None,
        }
    }
}

impl FromRaw for WorkReference {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            reference_type: reader.text("type"),
            id: reader.id_ref("id"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenContent {
    pub id: RecordId,
    pub title: String,
    pub form: String,
    pub form_id: RecordId,
    pub author_hfid: RecordId,
    pub author_roll: i32,
    pub page_start: i32,
    pub page_end: i32,
    pub styles: Vec<String>,
    pub references: Vec<WorkReference>,
}

impl FromRaw for WrittenContent {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            title: reader.text("title"),
            form: reader.text_any(&["form", "type"]),
            form_id: reader.id_ref("form_id"),
            author_hfid: reader.id_ref("author_hfid"),
            author_roll: reader.int("author_roll"),
            page_start: reader.int("page_start"),
            page_end: reader.int("page_end"),
            styles: reader.texts("style"),
            references: reader.nested("reference", WorkReference::from_raw),
        }
    }
}

impl Record for WrittenContent {
    fn kind(&self) -> Kind {
        Kind::WrittenContent
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn type_name(&self) -> &str {
        &self.form
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::HistoricalFigure, &self.author_hfid);
        for r in &self.references {
            if let Some(kind) = r.kind() {
                collect_refs(&mut out, kind, &r.id);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtFormKind {
    #[default]
    Dance,
    Musical,
    Poetic,
}

impl ArtFormKind {
    pub fn kind(&self) -> Kind {
        match self {
            ArtFormKind::Dance => Kind::DanceForm,
            ArtFormKind::Musical => Kind::MusicalForm,
            ArtFormKind::Poetic => Kind::PoeticForm,
        }
    }

    pub fn from_kind(kind: Kind) -> Option<Self> {
        match kind {
            Kind::DanceForm => Some(ArtFormKind::Dance),
            Kind::MusicalForm => Some(ArtFormKind::Musical),
            Kind::PoeticForm => Some(ArtFormKind::Poetic),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArtFormKind::Dance => "dance",
            ArtFormKind::Musical => "music",
            ArtFormKind::Poetic => "poetry",
        }
    }
}

/// Dance, musical and poetic forms share one layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtForm {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub form_kind: ArtFormKind,
}

impl ArtForm {
    pub fn read(form_kind: ArtFormKind, reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            description: reader.text("description"),
            form_kind,
        }
    }
}

impl Record for ArtForm {
    fn kind(&self) -> Kind {
        self.form_kind.kind()
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.form_kind.label()
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A named age of the world; eras carry no id and are kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEra {
    pub name: String,
    pub start_year: i32,
}

impl FromRaw for HistoricalEra {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            name: reader.text("name"),
            start_year: reader.int("start_year"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::Diagnostics;
    use crate::tokenizer::RawElement;

    #[test]
    fn test_artifact_with_item() {
        let raw = RawElement::new("artifact")
            .with_field("id", "1")
            .with_field("name", "the gleaming edge")
            .with_field("item_type", "weapon")
            .with_field("holder_hfid", "7")
            .with_child(
                RawElement::new("item")
                    .with_field("name_string", "the gleaming edge")
                    .with_field("writing_written_content_id", "4"),
            );
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(&raw, &mut diag);
        let artifact = Artifact::from_raw(&mut reader);
        reader.finish();

        assert_eq!(artifact.type_name(), "weapon");
        assert_eq!(
            artifact.references(),
            vec![
                Reference::new(Kind::HistoricalFigure, 7),
                Reference::new(Kind::WrittenContent, 4)
            ]
        );
        assert_eq!(diag.unknown_fields, 0);
    }

    #[test]
    fn test_written_content_references() {
        let raw = RawElement::new("written_content")
            .with_field("id", "4")
            .with_field("title", "on the mining of ore")
            .with_field("type", "Manual")
            .with_field("author_hfid", "7")
            .with_child(
                RawElement::new("reference")
                    .with_field("type", "SITE")
                    .with_field("id", "12"),
            )
            .with_child(
                RawElement::new("reference")
                    .with_field("type", "VALUE_LEVEL")
                    .with_field("id", "3"),
            );
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(&raw, &mut diag);
        let work = WrittenContent::from_raw(&mut reader);

        assert_eq!(work.name(), "on the mining of ore");
        assert_eq!(work.type_name(), "Manual");
        assert_eq!(
            work.references(),
            vec![
                Reference::new(Kind::HistoricalFigure, 7),
                Reference::new(Kind::Site, 12)
            ]
        );
    }

    #[test]
    fn test_art_form_kinds() {
        for kind in [Kind::DanceForm, Kind::MusicalForm, Kind::PoeticForm] {
            assert_eq!(ArtFormKind::from_kind(kind).map(|k| k.kind()), Some(kind));
        }
        assert_eq!(ArtFormKind::from_kind(Kind::Site), None);
    }
}
