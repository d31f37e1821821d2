//! Markup grammar: tag bodies and entity references.
//!
//! The reader splits the byte stream into text runs and `<...>` units; this
//! module turns a single unit or text run into structured tokens.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_while, take_while_m_n};
use nom::character::complete::{char, digit1, hex_digit1, multispace0, multispace1};
use nom::combinator::{all_consuming, map_opt, opt, recognize, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, separated_pair, terminated};
use nom::{IResult, Parser};

/// A parsed tag body (the bytes between `<` and `>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}

fn name(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(pair(
        take_while_m_n(1, 1, is_name_start),
        take_while(is_name_char),
    ))
    .parse(input)
}

fn quoted(input: &[u8]) -> IResult<&[u8], &[u8]> {
    alt((
        delimited(char('"'), take_till(|b| b == b'"'), char('"')),
        delimited(char('\''), take_till(|b| b == b'\''), char('\'')),
    ))
    .parse(input)
}

fn attribute(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    preceded(
        multispace1,
        separated_pair(name, delimited(multispace0, char('='), multispace0), quoted),
    )
    .parse(input)
}

type StartTag<'a> = (&'a [u8], Vec<(&'a [u8], &'a [u8])>, Option<char>);

fn start_tag(input: &[u8]) -> IResult<&[u8], StartTag<'_>> {
    all_consuming((
        name,
        many0(attribute),
        preceded(multispace0, opt(char('/'))),
    ))
    .parse(input)
}

fn end_tag(input: &[u8]) -> IResult<&[u8], &[u8]> {
    all_consuming(preceded(char('/'), terminated(name, multispace0))).parse(input)
}

/// Parse a tag body such as `site`, `/site` or `deity/`.
///
/// Attribute values are entity-decoded. Returns a description of the
/// problem on failure; the caller attaches the byte offset.
pub fn parse_markup(body: &[u8]) -> Result<Markup, String> {
    if let Ok((_, tag_name)) = end_tag(body) {
        return Ok(Markup::End {
            name: bytes_to_string(tag_name),
        });
    }

    let (_, (tag_name, attrs, slash)) =
        start_tag(body).map_err(|_| format!("malformed tag <{}>", snippet(body)))?;

    let mut attributes = Vec::with_capacity(attrs.len());
    for (key, raw) in attrs {
        attributes.push((bytes_to_string(key), decode_text(raw)?));
    }

    Ok(Markup::Start {
        name: bytes_to_string(tag_name),
        attributes,
        self_closing: slash.is_some(),
    })
}

fn numeric_char(digits: &str, radix: u32) -> Option<char> {
    u32::from_str_radix(digits, radix).ok().and_then(char::from_u32)
}

fn entity(input: &str) -> IResult<&str, char> {
    delimited(
        char('&'),
        alt((
            value('&', tag("amp")),
            value('<', tag("lt")),
            value('>', tag("gt")),
            value('"', tag("quot")),
            value('\'', tag("apos")),
            map_opt(preceded(alt((tag("#x"), tag("#X"))), hex_digit1), |h| {
                numeric_char(h, 16)
            }),
            map_opt(preceded(char('#'), digit1), |d| numeric_char(d, 10)),
        )),
        char(';'),
    )
    .parse(input)
}

/// Decode a text run: bytes to string, then entity references.
///
/// An `&` that does not start a valid reference is an error.
pub fn decode_text(raw: &[u8]) -> Result<String, String> {
    let text = bytes_to_string(raw);
    if !text.contains('&') {
        return Ok(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        match entity(&rest[pos..]) {
            Ok((after, ch)) => {
                out.push(ch);
                rest = after;
            }
            Err(_) => {
                let end = rest[pos..]
                    .char_indices()
                    .nth(12)
                    .map(|(i, _)| pos + i)
                    .unwrap_or(rest.len());
                return Err(format!("invalid escape '{}'", &rest[pos..end]));
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// UTF-8 when valid, otherwise one char per byte (Latin-1) so that no
/// input byte is lost.
pub fn bytes_to_string(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

fn snippet(body: &[u8]) -> String {
    let end = body.len().min(40);
    bytes_to_string(&body[..end])
}
