//! Streaming record reader
//!
//! A legends export is one document root holding section wrappers
//! (`<sites>`, `<historical_events>`, ...) which in turn hold the records.
//! `ElementStream` walks the file once and yields each record as a
//! `RawElement` as soon as its closing tag is read, so memory stays bounded
//! by the read buffer plus a single record subtree.
//!
//! Depth 0 is the document root, depth 1 the sections, depth 2 the records.
//! A depth-1 element that holds only text (the world name in extended
//! exports) is yielded as a text-only record.

use std::io::BufRead;

use crate::core::error::{LegendsError, Result};
use crate::tokenizer::lexer::{bytes_to_string, decode_text, parse_markup, Markup};
use crate::tokenizer::{RawElement, SyntaxError, SyntaxErrorKind};

const RECORD_DEPTH: usize = 2;

/// Element under construction
struct OpenRecord {
    element: RawElement,
    text: String,
}

/// Section currently being read (depth 1)
#[derive(Default)]
struct OpenSection {
    text: String,
    has_children: bool,
}

/// Lazy sequence of top-level records read from `R`
pub struct ElementStream<R: BufRead> {
    reader: R,
    offset: u64,
    max_depth: usize,
    open_tags: Vec<String>,
    section: OpenSection,
    records: Vec<OpenRecord>,
    scratch: Vec<u8>,
    records_read: u64,
    finished: bool,
}

impl<R: BufRead> ElementStream<R> {
    pub fn new(reader: R, max_depth: usize) -> Self {
        Self {
            reader,
            offset: 0,
            max_depth,
            open_tags: Vec::new(),
            section: OpenSection::default(),
            records: Vec::new(),
            scratch: Vec::with_capacity(256),
            records_read: 0,
            finished: false,
        }
    }

    /// Bytes consumed from the source so far
    pub fn bytes_consumed(&self) -> u64 {
        self.offset
    }

    /// Number of records yielded so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn syntax(&self, offset: u64, kind: SyntaxErrorKind) -> LegendsError {
        LegendsError::Syntax(SyntaxError { offset, kind })
    }

    /// Read the next record, or `None` at the end of the document
    fn read_record(&mut self) -> Result<Option<RawElement>> {
        loop {
            // Text up to the next '<'
            self.scratch.clear();
            let text_start = self.offset;
            let n = self.reader.read_until(b'<', &mut self.scratch)?;
            self.offset += n as u64;

            let at_tag = self.scratch.last() == Some(&b'<');
            let text_len = if at_tag { n - 1 } else { n };
            if text_len > 0 {
                let raw = std::mem::take(&mut self.scratch);
                let result = self.push_text(&raw[..text_len], text_start);
                self.scratch = raw;
                result?;
            }

            if !at_tag {
                // End of input
                return match self.open_tags.last() {
                    Some(tag) => Err(self.syntax(
                        self.offset,
                        SyntaxErrorKind::UnexpectedEof(tag.clone()),
                    )),
                    None => Ok(None),
                };
            }

            let tag_start = self.offset - 1;
            if let Some(record) = self.read_markup(tag_start)? {
                return Ok(Some(record));
            }
            if self.finished {
                return Ok(None);
            }
        }
    }

    /// Append a text run to whatever element is open
    fn push_text(&mut self, raw: &[u8], offset: u64) -> Result<()> {
        let depth = self.open_tags.len();
        if depth <= 2 && raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(());
        }
        let text = decode_text(raw)
            .map_err(|msg| self.syntax(offset, SyntaxErrorKind::InvalidEscape(msg)))?;
        self.append_text(&text);
        Ok(())
    }

    /// `open_tags` already includes the element the text belongs to:
    /// 1 is the root, 2 a section, deeper a record
    fn append_text(&mut self, text: &str) {
        match self.open_tags.len() {
            0 | 1 => {}
            2 => self.section.text.push_str(text),
            _ => {
                if let Some(open) = self.records.last_mut() {
                    open.text.push_str(text);
                }
            }
        }
    }

    /// Read from just after '<' through the matching '>' and apply it
    fn read_markup(&mut self, start: u64) -> Result<Option<RawElement>> {
        self.scratch.clear();
        self.read_unit(start, "tag")?;

        if self.scratch.starts_with(b"!--") {
            while !self.scratch.ends_with(b"-->") {
                self.read_unit(start, "comment")?;
            }
            return Ok(None);
        }
        if self.scratch.starts_with(b"![CDATA[") {
            while !self.scratch.ends_with(b"]]>") {
                self.read_unit(start, "CDATA section")?;
            }
            let body = &self.scratch[8..self.scratch.len() - 3];
            let text = bytes_to_string(body);
            self.append_text(&text);
            return Ok(None);
        }
        if self.scratch.starts_with(b"?") {
            while !self.scratch.ends_with(b"?>") {
                self.read_unit(start, "processing instruction")?;
            }
            return Ok(None);
        }
        if self.scratch.starts_with(b"!") {
            // DOCTYPE and friends; internal subsets are not supported
            return Ok(None);
        }

        // Keep reading while a quoted attribute value hides the real '>'
        while has_open_quote(&self.scratch) {
            self.read_unit(start, "tag")?;
        }

        let body = &self.scratch[..self.scratch.len() - 1];
        let markup = parse_markup(body)
            .map_err(|msg| self.syntax(start, SyntaxErrorKind::MalformedTag(msg)))?;

        match markup {
            Markup::Start {
                name,
                attributes,
                self_closing,
            } => {
                self.open_element(start, name, attributes)?;
                if self_closing {
                    let name = self.open_tags.last().cloned().unwrap_or_default();
                    return self.close_element(start, name);
                }
                Ok(None)
            }
            Markup::End { name } => self.close_element(start, name),
        }
    }

    /// Append bytes up to and including the next '>' to the scratch buffer
    fn read_unit(&mut self, start: u64, what: &'static str) -> Result<()> {
        let n = self.reader.read_until(b'>', &mut self.scratch)?;
        self.offset += n as u64;
        if n == 0 || self.scratch.last() != Some(&b'>') {
            return Err(self.syntax(start, SyntaxErrorKind::Unterminated(what)));
        }
        Ok(())
    }

    fn open_element(
        &mut self,
        offset: u64,
        name: String,
        attributes: Vec<(String, String)>,
    ) -> Result<()> {
        let depth = self.open_tags.len();
        if depth >= self.max_depth {
            return Err(self.syntax(offset, SyntaxErrorKind::TooDeep(self.max_depth)));
        }
        match depth {
            0 => {}
            1 => self.section = OpenSection::default(),
            _ => {
                self.section.has_children = true;
                let mut element = RawElement::new(name.clone());
                element.fields = attributes;
                self.records.push(OpenRecord {
                    element,
                    text: String::new(),
                });
            }
        }
        self.open_tags.push(name);
        Ok(())
    }

    fn close_element(&mut self, offset: u64, name: String) -> Result<Option<RawElement>> {
        let expected = match self.open_tags.pop() {
            Some(tag) => tag,
            None => return Err(self.syntax(offset, SyntaxErrorKind::UnexpectedEndTag(name))),
        };
        if expected != name {
            return Err(self.syntax(
                offset,
                SyntaxErrorKind::MismatchedEndTag {
                    expected,
                    found: name,
                },
            ));
        }

        let depth = self.open_tags.len();
        match depth {
            0 => {
                self.finished = true;
                Ok(None)
            }
            1 => {
                let section = std::mem::take(&mut self.section);
                let text = section.text.trim();
                if section.has_children || text.is_empty() {
                    return Ok(None);
                }
                let mut element = RawElement::new(name);
                element.text = text.to_string();
                self.records_read += 1;
                Ok(Some(element))
            }
            _ => {
                let Some(open) = self.records.pop() else {
                    return Ok(None);
                };
                let mut element = open.element;
                element.text = open.text.trim().to_string();

                if depth == RECORD_DEPTH {
                    self.records_read += 1;
                    return Ok(Some(element));
                }

                if let Some(parent) = self.records.last_mut() {
                    if element.is_leaf() {
                        parent.element.fields.push((element.tag, element.text));
                    } else {
                        parent.element.children.push(element);
                    }
                }
                Ok(None)
            }
        }
    }
}

impl<R: BufRead> Iterator for ElementStream<R> {
    type Item = Result<RawElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// True when `buf` contains an unbalanced quote character
fn has_open_quote(buf: &[u8]) -> bool {
    let mut quote: Option<u8> = None;
    for &b in buf {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None => {}
        }
    }
    quote.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(xml: &str) -> ElementStream<&[u8]> {
        ElementStream::new(xml.as_bytes(), 16)
    }

    fn collect(xml: &str) -> Result<Vec<RawElement>> {
        stream(xml).collect()
    }

    #[test]
    fn test_records_and_fields() {
        let xml = r#"<?xml version="1.0" encoding='UTF-8'?>
<df_world>
<sites>
	<site>
		<id>12</id>
		<type>fortress</type>
		<name>stonehold</name>
		<structures>
			<structure><local_id>0</local_id><type>temple</type></structure>
		</structures>
	</site>
</sites>
<historical_events>
	<historical_event><id>1</id><type>hf died</type><hfid>7</hfid></historical_event>
</historical_events>
</df_world>"#;
        let records = collect(xml).unwrap();
        assert_eq!(records.len(), 2);

        let site = &records[0];
        assert_eq!(site.tag, "site");
        assert_eq!(site.field("id"), Some("12"));
        assert_eq!(site.field("name"), Some("stonehold"));
        let structures = site.child("structures").unwrap();
        let structure = structures.child("structure").unwrap();
        assert_eq!(structure.field("type"), Some("temple"));

        assert_eq!(records[1].field("type"), Some("hf died"));
    }

    #[test]
    fn test_world_name_is_text_record() {
        let xml = "<df_world><name>the world of x</name><altname>Urdim</altname><regions></regions></df_world>";
        let records = collect(xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tag, "name");
        assert_eq!(records[0].text, "the world of x");
        assert_eq!(records[1].text, "Urdim");
    }

    #[test]
    fn test_empty_and_self_closing_leaves_are_fields() {
        let xml = "<w><hfs><historical_figure><id>1</id><deity/><name></name></historical_figure></hfs></w>";
        let records = collect(xml).unwrap();
        assert_eq!(records[0].field("deity"), Some(""));
        assert_eq!(records[0].field("name"), Some(""));
    }

    #[test]
    fn test_comments_cdata_and_escapes() {
        let xml = "<w><!-- a > b --><s><r><n><![CDATA[a<b]]></n><m>x &amp; y</m></r></s></w>";
        let records = collect(xml).unwrap();
        assert_eq!(records[0].field("n"), Some("a<b"));
        assert_eq!(records[0].field("m"), Some("x & y"));
    }

    #[test]
    fn test_bytes_consumed_advances_per_record() {
        let xml = "<w><s><r><id>1</id></r><r><id>2</id></r></s></w>";
        let mut s = stream(xml);
        s.next().unwrap().unwrap();
        let after_first = s.bytes_consumed();
        s.next().unwrap().unwrap();
        let after_second = s.bytes_consumed();
        assert!(after_first > 0);
        assert!(after_second > after_first);
        assert!(s.next().is_none());
        assert!(s.bytes_consumed() <= xml.len() as u64);
        assert_eq!(s.records_read(), 2);
    }

    fn error_kind(xml: &str) -> SyntaxErrorKind {
        match collect(xml) {
            Err(LegendsError::Syntax(e)) => e.kind,
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_tag_is_fatal() {
        assert!(matches!(
            error_kind("<w><s><r><id>1</id"),
            SyntaxErrorKind::Unterminated(_)
        ));
    }

    #[test]
    fn test_truncated_file_is_fatal() {
        assert!(matches!(
            error_kind("<w><s><r><id>1</id>"),
            SyntaxErrorKind::UnexpectedEof(_)
        ));
    }

    #[test]
    fn test_invalid_escape_is_fatal() {
        assert!(matches!(
            error_kind("<w><s><r><n>fish & chips</n></r></s></w>"),
            SyntaxErrorKind::InvalidEscape(_)
        ));
    }

    #[test]
    fn test_mismatched_end_tag_is_fatal() {
        assert!(matches!(
            error_kind("<w><s><r><id>1</name></r></s></w>"),
            SyntaxErrorKind::MismatchedEndTag { .. }
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut s = ElementStream::new("<a><b><c><d><e/></d></c></b></a>".as_bytes(), 3);
        assert!(matches!(
            s.next(),
            Some(Err(LegendsError::Syntax(SyntaxError {
                kind: SyntaxErrorKind::TooDeep(3),
                ..
            })))
        ));
        assert!(s.next().is_none());
    }

    #[test]
    fn test_records_before_error_are_yielded() {
        let mut s = stream("<w><s><r><id>1</id></r><r><id>2</oops></r></s></w>");
        assert!(s.next().unwrap().is_ok());
        assert!(s.next().unwrap().is_err());
        assert!(s.next().is_none());
    }
}
