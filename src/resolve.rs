//! Input resolution for the converter
//!
//! Conversion accepts either raw XML text or an already-parsed node tree.
//! Parsing text is delegated to a [`ParseXml`] capability so hosts can
//! inject their own provider; the converter never selects among parsers
//! itself. Pass-through input stays borrowed — resolution never copies a
//! caller's tree.

use std::borrow::Cow;

use crate::error::Result;
use crate::node::Node;
use crate::xml;

/// Conversion input: XML text, or a borrowed already-parsed node
#[derive(Clone, Copy, Debug)]
pub enum Source<'a> {
    Text(&'a str),
    Node(&'a Node),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a Node> for Source<'a> {
    fn from(node: &'a Node) -> Self {
        Self::Node(node)
    }
}

/// Capability to parse XML text into a node tree
///
/// Implementations must be synchronous. A provider that cannot service
/// requests reports [`ErrorKind::ParserUnavailable`](crate::ErrorKind).
pub trait ParseXml {
    fn parse_xml(&self, text: &str) -> Result<Node>;
}

/// Built-in parser provider backed by [`xml::Parser`]
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeParser {
    config: xml::Config,
}

impl NativeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with custom parser limits
    pub const fn with_config(config: xml::Config) -> Self {
        Self { config }
    }
}

impl ParseXml for NativeParser {
    fn parse_xml(&self, text: &str) -> Result<Node> {
        let mut parser = xml::Parser::with_config(text.as_bytes(), self.config);
        parser.parse().map(Node::Document)
    }
}

/// Resolve a conversion input to a node, parsing text through `provider`
pub fn resolve<'a>(source: Source<'a>, provider: &dyn ParseXml) -> Result<Cow<'a, Node>> {
    match source {
        Source::Text(text) => provider.parse_xml(text).map(Cow::Owned),
        Source::Node(node) => Ok(Cow::Borrowed(node)),
    }
}
