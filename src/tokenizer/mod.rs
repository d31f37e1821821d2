//! Record Tokenizer
//!
//! Turns the byte stream of a legends export into a lazy sequence of
//! `RawElement` records without applying any schema.

pub mod element;
pub mod lexer;
pub mod reader;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use crate::core::config::LoaderConfig;
use crate::core::error::Result;

pub use element::RawElement;
pub use reader::ElementStream;

/// Malformed low-level structure. Always aborts the load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte {offset})")]
pub struct SyntaxError {
    pub offset: u64,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("unterminated {0}")]
    Unterminated(&'static str),

    #[error("{0}")]
    MalformedTag(String),

    #[error("{0}")]
    InvalidEscape(String),

    #[error("expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("end tag </{0}> without matching start tag")]
    UnexpectedEndTag(String),

    #[error("input ends inside <{0}>")]
    UnexpectedEof(String),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Open a file for streaming; also returns its size for progress reporting
pub fn open_file(path: &Path, config: &LoaderConfig) -> Result<(ElementStream<BufReader<File>>, u64)> {
    let file = File::open(path)?;
    let total = file.metadata()?.len();
    let reader = BufReader::with_capacity(config.read_buffer_bytes, file);
    Ok((ElementStream::new(reader, config.max_depth), total))
}
