//! XML to JSON tree conversion
//!
//! The core walk over a parsed node: children in document order, text and
//! CDATA concatenated into one shared `"Text"` entry, repeated sibling
//! names promoted single → sequence on second occurrence, then attributes
//! keyed behind a `@` marker (suppressed in unsafe mode).

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result, Span};
use crate::node::{Element, Node};
use crate::resolve::{resolve, NativeParser, ParseXml, Source};
use crate::value::{Array, Object, Value};

/// Key under which text and CDATA content accumulates
pub const TEXT_KEY: &str = "Text";

/// Marker prepended to attribute keys outside unsafe mode
pub const ATTRIBUTE_MARKER: char = '@';

/// Per-call conversion options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Omit the `@` marker on attribute keys.
    ///
    /// Unsafe because attribute names may then collide with child element
    /// names; the attribute overwrites (attributes are applied after
    /// children). Last-write-wins is observable behavior, not a contract.
    pub unsafe_attributes: bool,
    /// Maximum element nesting depth accepted (0 means unlimited)
    pub max_depth: u16,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            unsafe_attributes: false,
            max_depth: 128,
        }
    }
}

impl ConvertOptions {
    /// Options with the `@` marker suppressed
    pub fn unsafe_mode() -> Self {
        Self {
            unsafe_attributes: true,
            ..Self::default()
        }
    }
}

/// XML to JSON tree converter
///
/// Holds the parsing capability and per-call options; carries no state
/// between calls, so one converter may serve any number of conversions.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter<P = NativeParser> {
    provider: P,
    options: ConvertOptions,
}

impl Converter<NativeParser> {
    /// Converter with the built-in parser and default options
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ParseXml> Converter<P> {
    /// Converter with an injected parsing capability
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            options: ConvertOptions::default(),
        }
    }

    /// Replace the conversion options
    pub fn options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Convert XML text or a parsed node into a JSON tree
    ///
    /// The output is a single-entry object keyed by the root element name,
    /// except for bare text/CDATA input which yields a plain string.
    #[instrument(skip_all)]
    pub fn convert<'a>(&self, input: impl Into<Source<'a>>) -> Result<Value> {
        let source = input.into();
        let node = resolve(source, &self.provider)?;
        self.convert_node(&node)
    }

    fn convert_node(&self, node: &Node) -> Result<Value> {
        if let Some(value) = char_data(node) {
            return Ok(value);
        }

        // Effective root: documents yield their root element, fragments
        // their first child, elements themselves.
        let root: &Element = match node {
            Node::Document(doc) => &doc.root,
            Node::Fragment(children) => {
                let head = children.first().ok_or_else(input_error)?;
                if let Some(value) = char_data(head) {
                    return Ok(value);
                }
                head.as_element().ok_or_else(input_error)?
            }
            Node::Element(el) => el,
            _ => return Err(input_error()),
        };
        debug!(root = %root.name, "converting element tree");

        let mut buffer = Object::new();
        self.process(root, &mut buffer, 0)?;

        let mut out = Object::with_capacity(1);
        out.insert(root.name.clone(), Value::Object(buffer));
        Ok(Value::Object(out))
    }

    /// Recursive node processor filling `buffer` with the JSON equivalent
    /// of `element`'s children and attributes.
    fn process(&self, element: &Element, buffer: &mut Object, depth: u16) -> Result<()> {
        let max = self.options.max_depth;
        if max > 0 && depth >= max {
            return Err(Error::new(ErrorKind::MaxDepthExceeded { max }, Span::empty()));
        }

        for child in &element.children {
            match child {
                Node::Text(value) => append_text(buffer, value.trim()),
                Node::Cdata(value) => append_text(buffer, value),
                Node::Element(child) => {
                    // The subtree is completed before it is attached; the
                    // merge decision depends only on earlier same-named
                    // siblings already in the buffer.
                    let mut subtree = Object::new();
                    self.process(child, &mut subtree, depth + 1)?;
                    attach(buffer, &child.name, Value::Object(subtree));
                }
                // Comments, processing instructions and stray
                // document/fragment nodes produce no keys.
                _ => {}
            }
        }

        for (name, value) in element.attributes.iter().rev() {
            let name = name.trim();
            let key = if self.options.unsafe_attributes {
                name.to_string()
            } else {
                format!("{ATTRIBUTE_MARKER}{name}")
            };
            // Plain insert: a colliding key is overwritten, attributes last.
            buffer.insert(key, Value::String(value.clone()));
        }

        Ok(())
    }
}

/// Convert with the built-in parser and default options
pub fn convert<'a>(input: impl Into<Source<'a>>) -> Result<Value> {
    Converter::new().convert(input)
}

/// Convert with the built-in parser and the given options
pub fn convert_with_options<'a>(
    input: impl Into<Source<'a>>,
    options: ConvertOptions,
) -> Result<Value> {
    Converter::new().options(options).convert(input)
}

/// Bare text and CDATA input short-circuits to a plain string: text
/// trimmed, CDATA verbatim.
fn char_data(node: &Node) -> Option<Value> {
    match node {
        Node::Text(value) => Some(Value::String(value.trim().to_string())),
        Node::Cdata(value) => Some(Value::String(value.clone())),
        _ => None,
    }
}

fn input_error() -> Error {
    Error::new(ErrorKind::Input, Span::empty())
}

/// Concatenate a piece of character data into the shared accumulator,
/// creating it if absent. No separator between pieces.
fn append_text(buffer: &mut Object, piece: &str) {
    if !buffer.contains_key(TEXT_KEY) {
        buffer.insert(TEXT_KEY, piece);
        return;
    }
    let Some(existing) = buffer.get_mut(TEXT_KEY) else {
        return;
    };
    if let Value::String(text) = existing {
        text.push_str(piece);
    } else {
        // An element literally named "Text" held the key; character data
        // reclaims it.
        *existing = Value::String(piece.to_string());
    }
}

/// Attach a converted child under its name: first occurrence stays a
/// single object, the second promotes to a sequence, later ones append.
fn attach(buffer: &mut Object, name: &str, subtree: Value) {
    if !buffer.contains_key(name) {
        buffer.insert(name.to_string(), subtree);
        return;
    }
    let Some(existing) = buffer.get_mut(name) else {
        return;
    };
    if let Value::Array(seq) = existing {
        seq.push(subtree);
    } else {
        let first = std::mem::take(existing);
        *existing = Value::Array(Array::from(vec![first, subtree]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Document;

    fn obj(value: &Value) -> &Object {
        match value.as_object() {
            Some(obj) => obj,
            None => panic!("expected object, got {value:?}"),
        }
    }

    #[test]
    fn test_empty_root() {
        let out = convert("<root/>").unwrap();
        let root = obj(&out);
        assert_eq!(root.len(), 1);
        assert_eq!(obj(&root["root"]).len(), 0);
    }

    #[test]
    fn test_single_attribute() {
        let out = convert(r#"<root a="v"/>"#).unwrap();
        assert_eq!(obj(&out)["root"], Value::Object([("@a".to_string(), Value::from("v"))].into_iter().collect()));
    }

    #[test]
    fn test_unsafe_attribute() {
        let out = convert_with_options(r#"<root a="v"/>"#, ConvertOptions::unsafe_mode()).unwrap();
        let root = obj(&obj(&out)["root"]);
        assert_eq!(root.get("a"), Some(&Value::from("v")));
        assert_eq!(root.get("@a"), None);
    }

    #[test]
    fn test_single_child_stays_object() {
        let out = convert("<root><x/></root>").unwrap();
        assert!(obj(&out)["root"].as_object().and_then(|r| r.get("x")).is_some_and(Value::is_object));
    }

    #[test]
    fn test_repeated_children_become_sequence() {
        let out = convert("<root><x/><x/></root>").unwrap();
        let root = obj(&obj(&out)["root"]);
        let seq = root["x"].as_array().expect("sequence");
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_third_sibling_appends() {
        let out = convert("<root><x>1</x><x>2</x><x>3</x></root>").unwrap();
        let root = obj(&obj(&out)["root"]);
        let seq = root["x"].as_array().expect("sequence");
        assert_eq!(seq.len(), 3);
        assert_eq!(obj(&seq[2]).get(TEXT_KEY), Some(&Value::from("3")));
    }

    #[test]
    fn test_text_is_trimmed() {
        let out = convert("<root>  hi  </root>").unwrap();
        assert_eq!(obj(&obj(&out)["root"]).get(TEXT_KEY), Some(&Value::from("hi")));
    }

    #[test]
    fn test_cdata_is_verbatim() {
        let out = convert("<root><![CDATA[  hi  ]]></root>").unwrap();
        assert_eq!(obj(&obj(&out)["root"]).get(TEXT_KEY), Some(&Value::from("  hi  ")));
    }

    #[test]
    fn test_text_and_cdata_interleave() {
        let out = convert("<root>a<![CDATA[ b ]]>c</root>").unwrap();
        assert_eq!(obj(&obj(&out)["root"]).get(TEXT_KEY), Some(&Value::from("a b c")));
    }

    #[test]
    fn test_attributes_follow_children_reverse_order() {
        let out = convert(r#"<root a="1" b="2"><c/></root>"#).unwrap();
        let root = obj(&obj(&out)["root"]);
        let keys: Vec<_> = root.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["c", "@b", "@a"]);
    }

    #[test]
    fn test_unsafe_collision_last_write_wins() {
        let out = convert_with_options(
            r#"<root><a>kept?</a></root>"#,
            ConvertOptions::unsafe_mode(),
        )
        .unwrap();
        // no attribute here, element survives
        assert!(obj(&obj(&out)["root"])["a"].is_object());

        let out = convert_with_options(
            r#"<root a="attr"><a>elem</a></root>"#,
            ConvertOptions::unsafe_mode(),
        )
        .unwrap();
        assert_eq!(obj(&obj(&out)["root"])["a"], Value::from("attr"));
    }

    #[test]
    fn test_bare_text_node_short_circuits() {
        let node = Node::Text("  hi  ".to_string());
        let out = convert(&node).unwrap();
        assert_eq!(out, Value::from("hi"));
    }

    #[test]
    fn test_bare_cdata_node_short_circuits() {
        let node = Node::Cdata("  hi  ".to_string());
        let out = convert(&node).unwrap();
        assert_eq!(out, Value::from("  hi  "));
    }

    #[test]
    fn test_comment_children_ignored() {
        let mut el = Element::new("root");
        el.children.push(Node::Comment("note".to_string()));
        el.children.push(Node::ProcessingInstruction("xml-stylesheet".to_string()));
        let node = Node::Element(el);
        let out = convert(&node).unwrap();
        assert_eq!(obj(&obj(&out)["root"]).len(), 0);
    }

    #[test]
    fn test_fragment_resolves_to_first_child() {
        let node = Node::Fragment(vec![
            Node::Element(Element::new("first")),
            Node::Element(Element::new("second")),
        ]);
        let out = convert(&node).unwrap();
        assert!(obj(&out).contains_key("first"));
        assert!(!obj(&out).contains_key("second"));
    }

    #[test]
    fn test_empty_fragment_is_input_error() {
        let node = Node::Fragment(Vec::new());
        let err = convert(&node).err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::Input);
    }

    #[test]
    fn test_document_node_input() {
        let doc = Document {
            root: Element::new("root"),
        };
        let node = Node::Document(doc);
        let out = convert(&node).unwrap();
        assert!(obj(&out).contains_key("root"));
    }

    #[test]
    fn test_depth_guard_on_hand_built_tree() {
        let mut el = Element::new("n0");
        for i in 1..10 {
            let mut parent = Element::new(format!("n{i}"));
            parent.children.push(Node::Element(el));
            el = parent;
        }
        let node = Node::Element(el);
        let options = ConvertOptions {
            max_depth: 4,
            ..ConvertOptions::default()
        };
        let err = Converter::new().options(options).convert(&node).err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 4 });
    }

    #[test]
    fn test_injected_provider_errors_propagate_unchanged() {
        struct Unavailable;

        impl ParseXml for Unavailable {
            fn parse_xml(&self, _text: &str) -> Result<Node> {
                Err(Error::new(ErrorKind::ParserUnavailable, Span::empty()))
            }
        }

        let converter = Converter::with_provider(Unavailable);
        let err = converter.convert("<a/>").err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::ParserUnavailable);

        // Node input never touches the provider
        let node = Node::Element(Element::new("a"));
        assert!(converter.convert(&node).is_ok());
    }

    #[test]
    fn test_malformed_text_propagates() {
        let err = convert("<root><unclosed></root>").err().unwrap();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_whitespace_attribute_names_trimmed() {
        let mut el = Element::new("root");
        el.attributes.insert(" padded ".to_string(), "v".to_string());
        let node = Node::Element(el);
        let out = convert(&node).unwrap();
        assert_eq!(obj(&obj(&out)["root"]).get("@padded"), Some(&Value::from("v")));
    }

    #[test]
    fn test_hand_built_whitespace_text_yields_empty_entry() {
        let mut el = Element::new("root");
        el.children.push(Node::Text("   ".to_string()));
        let node = Node::Element(el);
        let out = convert(&node).unwrap();
        assert_eq!(obj(&obj(&out)["root"]).get(TEXT_KEY), Some(&Value::from("")));
    }
}
