//! Declaration macro for the sub-kind catalogs of polymorphic records.
//!
//! Each entry names the variant, the `type` string that selects it in the
//! source, and its fields. A field is `name: Type`, optionally followed by
//! `= "source_name"` when the source name is not a valid identifier and by
//! `=> Kind` when the field holds ids of that kind.
//!
//! ```ignore
//! record_catalog! {
//!     pub enum EventDetails;
//!     HfDied = "hf died" {
//!         hfid: i32 => HistoricalFigure,
//!         cause: String,
//!     }
//! }
//! ```
//!
//! The macro emits one struct per variant, the details enum with an
//! `Unknown` arm, the `type` string dispatch and per-variant reference
//! listing.

/// Source name of a catalog field
macro_rules! xml_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $xml:literal) => {
        $xml
    };
}

/// Reference fields read through `RefValue`, everything else through
/// `FieldValue`
macro_rules! read_value {
    ($reader:expr, $ty:ty, $name:expr) => {
        <$ty as $crate::schema::fields::FieldValue>::read($reader, $name)
    };
    ($reader:expr, $ty:ty, $name:expr, $kind:ident) => {
        <$ty as $crate::schema::fields::RefValue>::read_ref($reader, $name)
    };
}

macro_rules! record_catalog {
    (
        $(#[$enum_meta:meta])*
        pub enum $details:ident;
        $(
            $(#[$meta:meta])*
            $variant:ident = $tag:literal {
                $( $field:ident : $ty:ty $(= $xml:literal)? $(=> $kind:ident)? ),* $(,)?
            }
        )*
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
            pub struct $variant {
                $( pub $field: $ty, )*
            }

            impl $variant {
                #[allow(unused_variables)]
                fn read(reader: &mut $crate::schema::fields::FieldReader<'_>) -> Self {
                    Self {
                        $(
                            $field: $crate::schema::catalog::read_value!(
                                reader,
                                $ty,
                                $crate::schema::catalog::xml_name!($field $(, $xml)?)
                                $(, $kind)?
                            ),
                        )*
                    }
                }

                #[allow(unused_variables)]
                fn collect_references(&self, out: &mut Vec<$crate::core::types::Reference>) {
                    $($(
                        $crate::core::types::collect_refs(
                            out,
                            $crate::core::types::Kind::$kind,
                            &self.$field,
                        );
                    )?)*
                }
            }
        )*

        $(#[$enum_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(tag = "type")]
        pub enum $details {
            $( $variant($variant), )*
            Unknown($crate::schema::fields::UnknownDetails),
        }

        impl $details {
            /// Every known sub-kind as (source `type` string, variant name)
            pub const CATALOG: &'static [(&'static str, &'static str)] = &[
                $( ($tag, stringify!($variant)), )*
            ];

            /// Select and read the variant named by `type_tag`
            pub fn read(type_tag: &str, reader: &mut $crate::schema::fields::FieldReader<'_>) -> Self {
                match type_tag {
                    $( $tag => $details::$variant($variant::read(reader)), )*
                    _ => $details::Unknown(
                        $crate::schema::fields::UnknownDetails::read(type_tag, reader),
                    ),
                }
            }

            /// Variant name (`HfDied`), or the raw `type` string when unknown
            pub fn kind_name(&self) -> &str {
                match self {
                    $( $details::$variant(_) => stringify!($variant), )*
                    $details::Unknown(u) => &u.type_tag,
                }
            }

            /// The `type` string as written in the source
            pub fn type_tag(&self) -> &str {
                match self {
                    $( $details::$variant(_) => $tag, )*
                    $details::Unknown(u) => &u.type_tag,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $details::Unknown(_))
            }

            /// Ids this payload declares as references, unset ids skipped
            pub fn references(&self) -> Vec<$crate::core::types::Reference> {
                let mut out = Vec::new();
                match self {
                    $( $details::$variant(d) => d.collect_references(&mut out), )*
                    $details::Unknown(_) => {}
                }
                out
            }
        }
    };
}

pub(crate) use read_value;
pub(crate) use record_catalog;
pub(crate) use xml_name;

#[cfg(test)]
mod tests {
    use crate::core::types::{Kind, Reference};
    use crate::schema::fields::{Diagnostics, FieldReader};
    use crate::tokenizer::RawElement;

    record_catalog! {
        pub enum TestDetails;
        Travel = "hf travel" {
            group_hfid: Vec<i32> => HistoricalFigure,
            site_id: i32 => Site,
            returned: bool = "return",
        }
        Quiet = "quiet" {}
    }

    fn read(raw: &RawElement) -> TestDetails {
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(raw, &mut diag);
        let tag = reader.text("type");
        TestDetails::read(&tag, &mut reader)
    }

    #[test]
    fn test_known_variant_with_renamed_field() {
        let raw = RawElement::new("historical_event")
            .with_field("type", "hf travel")
            .with_field("group_hfid", "1")
            .with_field("group_hfid", "2")
            .with_field("site_id", "-1")
            .with_field("return", "");
        let details = read(&raw);
        assert_eq!(details.kind_name(), "Travel");
        assert_eq!(details.type_tag(), "hf travel");
        match &details {
            TestDetails::Travel(t) => {
                assert!(t.returned);
                assert_eq!(t.site_id, -1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            details.references(),
            vec![
                Reference::new(Kind::HistoricalFigure, 1),
                Reference::new(Kind::HistoricalFigure, 2)
            ]
        );
    }

    #[test]
    fn test_absent_reference_is_unset() {
        let raw = RawElement::new("historical_event").with_field("type", "hf travel");
        match read(&raw) {
            TestDetails::Travel(t) => {
                assert_eq!(t.site_id, -1);
                assert!(t.group_hfid.is_empty());
                assert!(!t.returned);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_variant_keeps_raw_fields() {
        let raw = RawElement::new("historical_event")
            .with_field("type", "dragon sneezed")
            .with_field("dragon_id", "4");
        let details = read(&raw);
        assert!(!details.is_known());
        assert_eq!(details.kind_name(), "dragon sneezed");
        match details {
            TestDetails::Unknown(u) => assert_eq!(u.field("dragon_id"), Some("4")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_catalog_lists_entries() {
        assert_eq!(
            TestDetails::CATALOG,
            &[("hf travel", "Travel"), ("quiet", "Quiet")]
        );
    }
}
