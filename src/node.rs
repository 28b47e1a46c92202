//! Parsed XML tree model
//!
//! The converter only reads these nodes; it never mutates them and never
//! takes ownership, so one parsed tree can back any number of conversions.

use indexmap::IndexMap;

/// A parsed XML document with a single root element
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// An XML element: name, attributes in declaration order, ordered children
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }
}

/// A node in a parsed XML tree
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Full document wrapping the root element
    Document(Document),
    /// Rootless collection of top-level nodes
    Fragment(Vec<Node>),
    Element(Element),
    /// Character data; entity references already decoded
    Text(String),
    /// CDATA section content, taken verbatim
    Cdata(String),
    /// Comments carry no data into a conversion
    Comment(String),
    ProcessingInstruction(String),
}

impl Node {
    /// Returns the element if this node is one, None otherwise
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns true for text and CDATA nodes
    pub fn is_character_data(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Cdata(_))
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}
