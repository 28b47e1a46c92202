//! XML parser implementation
//!
//! Recursive-descent parser producing a [`Document`] tree. Comments, the
//! XML declaration, DOCTYPE and processing instructions are consumed and
//! dropped; CDATA sections are kept as distinct nodes so downstream
//! consumers can treat their content verbatim.

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::node::{Document, Element, Node};
use crate::xml::cursor::Cursor;

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new XML parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.cursor.len() > self.config.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::empty(),
            ));
        }

        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error_here("expected root element"));
        }
        let root = self.parse_element(0)?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(Error::at(
                ErrorKind::InvalidToken,
                self.cursor.position().offset,
                self.cursor.position().line,
                self.cursor.position().col,
            ));
        }

        Ok(Document { root })
    }

    fn parse_element(&mut self, depth: u16) -> Result<Element> {
        if self.config.max_depth > 0 && depth >= self.config.max_depth {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                Span::new(self.cursor.position(), self.cursor.position()),
            ));
        }

        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'/') {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(self.error_here("mismatched closing tag"));
                }
                self.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.peek_bytes(4) == Some(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.peek_bytes(9) == Some(b"<![CDATA[") {
                let cdata = self.parse_cdata()?;
                children.push(Node::Cdata(cdata));
                continue;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'?') {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'!') {
                return Err(self.error_here("unexpected markup declaration"));
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element(depth + 1)?;
                children.push(Node::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnterminatedMarkup,
                    Span::new(self.cursor.position(), self.cursor.position()),
                    "unterminated element".to_string(),
                ));
            }

            if let Some(text) = self.parse_text()? {
                children.push(Node::Text(text));
            }
        }

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.skip_whitespace();
            self.expect_byte(b'=')?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::new(
                    ErrorKind::DuplicateAttribute { name },
                    Span::new(self.cursor.position(), self.cursor.position()),
                ));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(Error::with_message(
            ErrorKind::UnterminatedMarkup,
            Span::new(self.cursor.position(), self.cursor.position()),
            "unterminated attribute value".to_string(),
        ))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        // Whitespace between elements is not character data
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_cdata(&mut self) -> Result<String> {
        // cursor at "<![CDATA["
        self.cursor.advance_by(9);
        let start = self.cursor.pos();
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(3) == Some(b"]]>") {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                return bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(Error::with_message(
            ErrorKind::UnterminatedMarkup,
            Span::new(self.cursor.position(), self.cursor.position()),
            "unterminated CDATA section".to_string(),
        ))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::at(
                ErrorKind::InvalidToken,
                start_pos.offset,
                start_pos.line,
                start_pos.col,
            ));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_string(raw)
    }

    /// Skip whitespace, comments, PIs, the XML declaration and DOCTYPE
    /// around the root element.
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();

            if self.cursor.peek_bytes(4) == Some(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'?') {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'!') {
                // DOCTYPE or other declaration
                self.cursor.advance_by(2);
                self.skip_until(b">")?;
                continue;
            }

            return Ok(());
        }
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::new(
            ErrorKind::UnterminatedMarkup,
            Span::new(self.cursor.position(), self.cursor.position()),
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            let found = match self.cursor.current() {
                Some(b) => format!("'{}'", char::from(b)),
                None => "end of input".to_string(),
            };
            Err(Error::with_message(
                ErrorKind::Expected {
                    expected: format!("'{}'", char::from(expected)),
                    found,
                },
                Span::new(self.cursor.position(), self.cursor.position()),
                format!("expected '{}'", char::from(expected)),
            ))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.cursor.current() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    fn error_here(&self, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::new(Pos::new(pos.offset, pos.line, pos.col), pos),
            message.to_string(),
        )
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::empty()))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidEntity,
                    Span::empty(),
                    format!("invalid xml entity: &{entity};"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
