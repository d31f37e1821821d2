//! Typed field access over raw elements
//!
//! Coercion rules:
//! - an absent scalar becomes the zero value of its type
//! - a present integer that does not parse is logged, counted and replaced
//!   by zero; the record still loads
//! - a flag is set when its element is present (unless it says `false`/`0`)
//! - an id that refers to another record reads as `-1` ("none") when absent,
//!   so that a missing link never points at record 0; a present but invalid
//!   id is coerced to zero like any other integer

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::tokenizer::RawElement;

/// Per-load counters and once-only reporting state
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub coercion_warnings: u64,
    pub unknown_fields: u64,
    report_unknown_fields: bool,
    reported: AHashSet<(String, String)>,
}

impl Diagnostics {
    pub fn new(report_unknown_fields: bool) -> Self {
        Self {
            report_unknown_fields,
            ..Default::default()
        }
    }

    fn coercion_failed(&mut self, record: &str, id: &str, field: &str, value: &str) {
        self.coercion_warnings += 1;
        tracing::warn!(
            record,
            id,
            field,
            value,
            "Invalid integer field, using 0"
        );
    }

    fn unknown_field(&mut self, record: &str, field: &str) {
        self.unknown_fields += 1;
        if !self.report_unknown_fields {
            return;
        }
        if self.reported.insert((record.to_string(), field.to_string())) {
            tracing::debug!(record, field, "Field not declared by schema");
        }
    }
}

/// Reads typed fields out of one element, remembering which ones were used
pub struct FieldReader<'a> {
    element: &'a RawElement,
    diagnostics: &'a mut Diagnostics,
    used: Vec<&'static str>,
}

impl<'a> FieldReader<'a> {
    pub fn new(element: &'a RawElement, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            element,
            diagnostics,
            used: Vec::new(),
        }
    }

    pub fn element(&self) -> &'a RawElement {
        self.element
    }

    fn mark(&mut self, name: &'static str) {
        if !self.is_used(name) {
            self.used.push(name);
        }
    }

    fn is_used(&self, name: &str) -> bool {
        self.used.iter().any(|u| *u == name)
    }

    fn parse_int(&mut self, name: &str, raw: &str, fallback: i32) -> i32 {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return fallback;
        }
        match trimmed.parse::<i32>() {
            Ok(v) => v,
            Err(_) => {
                let element = self.element;
                let id = element.field("id").unwrap_or("?");
                self.diagnostics
                    .coercion_failed(&element.tag, id, name, trimmed);
                fallback
            }
        }
    }

    pub fn int(&mut self, name: &'static str) -> i32 {
        self.mark(name);
        let element = self.element;
        match element.field(name) {
            Some(raw) => self.parse_int(name, raw, 0),
            None => 0,
        }
    }

    /// Id of another record; `-1` when absent, 0 when unparseable like
    /// any other integer
    pub fn id_ref(&mut self, name: &'static str) -> i32 {
        self.mark(name);
        let element = self.element;
        match element.field(name) {
            Some(raw) => self.parse_int(name, raw, 0),
            None => -1,
        }
    }

    /// First present field among `names`, for fields renamed between
    /// export flavours
    pub fn int_any(&mut self, names: &[&'static str]) -> i32 {
        for &name in names {
            self.mark(name);
        }
        match names.iter().find(|n| self.element.field(n).is_some()) {
            Some(&name) => self.int(name),
            None => 0,
        }
    }

    pub fn text(&mut self, name: &'static str) -> String {
        self.mark(name);
        self.element.field(name).unwrap_or_default().to_string()
    }

    pub fn text_any(&mut self, names: &[&'static str]) -> String {
        for &name in names {
            self.mark(name);
        }
        names
            .iter()
            .find_map(|n| self.element.field(n))
            .unwrap_or_default()
            .to_string()
    }

    pub fn flag(&mut self, name: &'static str) -> bool {
        self.mark(name);
        if self.element.child(name).is_some() {
            return true;
        }
        match self.element.field(name) {
            Some(v) => !matches!(v.trim(), "false" | "0"),
            None => false,
        }
    }

    pub fn ints(&mut self, name: &'static str) -> Vec<i32> {
        self.mark(name);
        let element = self.element;
        element
            .values(name)
            .map(|raw| self.parse_int(name, raw, 0))
            .collect()
    }

    pub fn texts(&mut self, name: &'static str) -> Vec<String> {
        self.mark(name);
        self.element.values(name).map(str::to_string).collect()
    }

    /// Build one value per nested child named `name`
    pub fn nested<T>(
        &mut self,
        name: &'static str,
        mut build: impl FnMut(&mut FieldReader<'_>) -> T,
    ) -> Vec<T> {
        self.mark(name);
        let element = self.element;
        let mut out = Vec::new();
        for child in element.children_named(name) {
            let mut reader = FieldReader::new(child, self.diagnostics);
            out.push(build(&mut reader));
            reader.finish();
        }
        out
    }

    /// Build values from the children of a wrapper element, e.g. the
    /// `<structure>` entries inside `<structures>`
    pub fn nested_in<T>(
        &mut self,
        wrapper: &'static str,
        name: &'static str,
        mut build: impl FnMut(&mut FieldReader<'_>) -> T,
    ) -> Vec<T> {
        self.mark(wrapper);
        let element = self.element;
        let mut out = Vec::new();
        for holder in element.children_named(wrapper) {
            let mut outer = FieldReader::new(holder, self.diagnostics);
            out.extend(outer.nested(name, &mut build));
            outer.finish();
        }
        out
    }

    /// Take every field and child not read so far
    pub fn remaining(&mut self) -> (Vec<(String, String)>, Vec<RawElement>) {
        let fields = self
            .element
            .fields
            .iter()
            .filter(|(n, _)| !self.is_used(n))
            .cloned()
            .collect();
        let children = self
            .element
            .children
            .iter()
            .filter(|c| !self.is_used(&c.tag))
            .cloned()
            .collect();
        self.used.push(REMAINING_MARKER);
        (fields, children)
    }

    /// Report fields present in the element that no accessor asked for
    pub fn finish(self) {
        if self.is_used(REMAINING_MARKER) {
            return;
        }
        let element = self.element;
        for name in element.member_names() {
            if !self.is_used(name) {
                self.diagnostics.unknown_field(&element.tag, name);
            }
        }
    }
}

/// Set once `remaining()` has claimed every leftover member
const REMAINING_MARKER: &str = "\0remaining";

/// Types that can be read from a named field with the coercion rules above
pub trait FieldValue: Sized {
    fn read(reader: &mut FieldReader<'_>, name: &'static str) -> Self;
}

impl FieldValue for i32 {
    fn read(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.int(name)
    }
}

impl FieldValue for String {
    fn read(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.text(name)
    }
}

impl FieldValue for bool {
    fn read(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.flag(name)
    }
}

impl FieldValue for Vec<i32> {
    fn read(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.ints(name)
    }
}

impl FieldValue for Vec<String> {
    fn read(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.texts(name)
    }
}

/// Reference fields: ids of other records, `-1` when missing
pub trait RefValue: Sized {
    fn read_ref(reader: &mut FieldReader<'_>, name: &'static str) -> Self;
}

impl RefValue for i32 {
    fn read_ref(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.id_ref(name)
    }
}

impl RefValue for Vec<i32> {
    fn read_ref(reader: &mut FieldReader<'_>, name: &'static str) -> Self {
        reader.ints(name)
    }
}

/// Records that can be built from a raw element
pub trait FromRaw: Sized {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self;
}

/// Fields of a sub-kind the catalog does not know, kept for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownDetails {
    pub type_tag: String,
    pub fields: Vec<(String, String)>,
    pub children: Vec<RawElement>,
}

impl UnknownDetails {
    pub fn read(type_tag: &str, reader: &mut FieldReader<'_>) -> Self {
        let (fields, children) = reader.remaining();
        Self {
            type_tag: type_tag.to_string(),
            fields,
            children,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
