//! xmlmap - XML to JSON tree conversion
//!
//! Scans through the elements of an XML document and builds an equivalent
//! nested mapping: child elements nest, repeated sibling names collect into
//! arrays, text and CDATA content accumulates under a `"Text"` entry, and
//! attribute keys carry a `@` marker so they cannot collide with element
//! names (suppressible per call, at the caller's risk).
//!
//! # Quick Start
//!
//! ```
//! use xmlmap::convert;
//! # fn main() -> Result<(), xmlmap::Error> {
//! let value = convert(r#"<root a="1"><b>x</b><b>y</b></root>"#)?;
//! let attr = value
//!     .as_object()
//!     .and_then(|obj| obj.get("root"))
//!     .and_then(|v| v.as_object())
//!     .and_then(|obj| obj.get("@a"))
//!     .and_then(|v| v.as_string())
//!     .unwrap_or_default();
//! assert_eq!(attr, "1");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod node;
pub use node::{Document, Element, Node};

pub mod value;
pub use value::{Array, Object, Value};

pub mod xml;
pub use xml::{Config as XmlConfig, Parser as XmlParser};

pub mod resolve;
pub use resolve::{NativeParser, ParseXml, Source};

pub mod convert;
pub use convert::{
    convert, convert_with_options, ConvertOptions, Converter, ATTRIBUTE_MARKER, TEXT_KEY,
};

pub mod formatter;
pub use formatter::{to_json, to_json_pretty};

/// Parse XML text into a node tree with the built-in parser
pub fn parse_xml_str(s: &str) -> Result<Node> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse().map(Node::Document)
}

/// Parse XML text with custom parser limits
pub fn parse_xml_str_with_config(s: &str, config: XmlConfig) -> Result<Node> {
    let mut parser = XmlParser::with_config(s.as_bytes(), config);
    parser.parse().map(Node::Document)
}
