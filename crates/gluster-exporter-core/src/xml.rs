//! Conversion of `gluster --xml` output into a generic JSON document.
//!
//! The mapping follows the usual XML-to-JSON conventions:
//! - an element becomes an object keyed by its children's names
//! - an element without children or attributes becomes its text
//! - attributes are stored under `-name` keys
//! - text of an element that also has children is stored under `#content`
//! - repeated sibling elements become an array
//!
//! The document returned by [`normalize`] is an object with a single key,
//! the name of the root element (`cliOutput` for everything gluster prints).

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

/// Key under which mixed-content text is stored.
pub const CONTENT_KEY: &str = "#content";

/// Error type for malformed or unexpected command output.
#[derive(Debug)]
pub enum DecodeError {
    /// The command produced no output at all.
    Empty,
    /// The output is not valid UTF-8.
    Utf8(std::str::Utf8Error),
    /// The output is not well-formed XML.
    Xml(quick_xml::Error),
    /// The output contains no root element.
    NoRoot,
    /// A required element is missing.
    MissingElement(&'static str),
    /// The document does not have the expected shape.
    Schema(serde_json::Error),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "empty output"),
            DecodeError::Utf8(e) => write!(f, "output is not UTF-8: {}", e),
            DecodeError::Xml(e) => write!(f, "malformed XML: {}", e),
            DecodeError::NoRoot => write!(f, "no root element in output"),
            DecodeError::MissingElement(name) => write!(f, "missing element <{}>", name),
            DecodeError::Schema(e) => write!(f, "unexpected document shape: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<quick_xml::Error> for DecodeError {
    fn from(e: quick_xml::Error) -> Self {
        DecodeError::Xml(e)
    }
}

impl From<quick_xml::events::attributes::AttrError> for DecodeError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        DecodeError::Xml(e.into())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Schema(e)
    }
}

/// An element under construction.
struct Element {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Element {
    fn root() -> Self {
        Self {
            name: String::new(),
            fields: Map::new(),
            text: String::new(),
        }
    }

    fn open(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let mut element = Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            fields: Map::new(),
            text: String::new(),
        };
        for attr in start.attributes() {
            let attr = attr?;
            let key = format!("-{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value()?.into_owned();
            insert_field(&mut element.fields, key, Value::String(value));
        }
        Ok(element)
    }

    fn into_value(mut self) -> Value {
        if self.fields.is_empty() {
            return Value::String(self.text);
        }
        if !self.text.is_empty() {
            self.fields
                .insert(CONTENT_KEY.to_string(), Value::String(self.text));
        }
        Value::Object(self.fields)
    }
}

/// Adds `value` under `key`, turning repeated keys into an array.
fn insert_field(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

/// Converts XML output into a generic document.
pub fn normalize(output: &[u8]) -> Result<Value, DecodeError> {
    let text = std::str::from_utf8(output).map_err(DecodeError::Utf8)?;
    if text.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Element::root()];
    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                attach(&mut stack, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(DecodeError::NoRoot)?;
                attach(&mut stack, element)?;
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(DecodeError::Xml(quick_xml::Error::Syntax(
            quick_xml::errors::SyntaxError::UnclosedTag,
        )));
    }
    let root = stack.pop().ok_or(DecodeError::NoRoot)?;
    if root.fields.is_empty() {
        return Err(DecodeError::NoRoot);
    }
    Ok(Value::Object(root.fields))
}

fn attach(stack: &mut [Element], element: Element) -> Result<(), DecodeError> {
    let parent = stack.last_mut().ok_or(DecodeError::NoRoot)?;
    let name = element.name.clone();
    insert_field(&mut parent.fields, name, element.into_value());
    Ok(())
}

/// Strips exactly one wrapper level, returning the only child value.
///
/// `gluster volume list` output is decoded relative to its root element
/// rather than by the root's name.
pub fn strip_root(doc: Value) -> Result<Value, DecodeError> {
    match doc {
        Value::Object(map) => map
            .into_iter()
            .next()
            .map(|(_, child)| child)
            .ok_or(DecodeError::NoRoot),
        _ => Err(DecodeError::NoRoot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_nested_elements() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <volList>
    <count>2</count>
    <volume>gv0</volume>
    <volume>gv1</volume>
  </volList>
</cliOutput>"#;

        let doc = normalize(xml).unwrap();
        assert_eq!(
            doc,
            json!({
                "cliOutput": {
                    "opRet": "0",
                    "opErrno": "0",
                    "opErrstr": "",
                    "volList": {
                        "count": "2",
                        "volume": ["gv0", "gv1"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_normalize_attributes_and_mixed_content() {
        let xml = br#"<bricks><brick uuid="abc-1">node1:/data/b1<name>node1:/data/b1</name><isArbiter>0</isArbiter></brick></bricks>"#;

        let doc = normalize(xml).unwrap();
        assert_eq!(
            doc,
            json!({
                "bricks": {
                    "brick": {
                        "-uuid": "abc-1",
                        "#content": "node1:/data/b1",
                        "name": "node1:/data/b1",
                        "isArbiter": "0"
                    }
                }
            })
        );
    }

    #[test]
    fn test_normalize_unescapes_text() {
        let doc = normalize(b"<a><b>x &amp; y</b></a>").unwrap();
        assert_eq!(doc, json!({"a": {"b": "x & y"}}));
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(matches!(normalize(b""), Err(DecodeError::Empty)));
        assert!(matches!(normalize(b"  \n"), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_normalize_plain_text_error() {
        // What gluster prints when glusterd is down.
        let out = b"Connection failed. Please check if gluster daemon is operational.\n";
        assert!(matches!(normalize(out), Err(DecodeError::NoRoot)));
    }

    #[test]
    fn test_normalize_malformed_xml() {
        assert!(normalize(b"<a><b></a>").is_err());
        assert!(normalize(b"<a><b>").is_err());
    }

    #[test]
    fn test_strip_root() {
        let doc = json!({"cliOutput": {"opRet": "0"}});
        assert_eq!(strip_root(doc).unwrap(), json!({"opRet": "0"}));

        assert!(strip_root(json!({})).is_err());
        assert!(strip_root(json!("text")).is_err());
    }
}
