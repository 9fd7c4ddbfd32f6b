//! XML codec: element-per-field documents.
//!
//! The document root is an element named after the record shape (`Root`
//! for dictionary contracts). Scalar fields render as text elements,
//! nested objects as nested elements, lists as repeated `<Item>` children,
//! and `Null` fields are omitted. Decoding parses into an owned element
//! tree, then binds it to the contract shape: typed fields run their text
//! through the value converter; untyped elements decode as strings, nested
//! objects, or arrays (repeated same-named children).

use expando_shape::convert::value_kind;
use expando_shape::{convert, ConvertError, FieldType, Shape};
use serde_json::{Map, Value};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::{CodecError, TextCodec, TextFormat};

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("no root element")]
    NoRoot,
    #[error("truncated document: unclosed element")]
    Truncated,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl XmlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl TextCodec for XmlCodec {
    fn id(&self) -> &'static str {
        "xml"
    }

    fn format(&self) -> TextFormat {
        TextFormat::Xml
    }

    fn encode(&self, value: &Value, shape: &Shape) -> Result<String, CodecError> {
        tracing::trace!(codec = "xml", "encoding document");
        let mut out = String::new();
        write_element(&mut out, shape.root_name(), value);
        Ok(out)
    }

    fn decode(&self, text: &str, shape: &Shape) -> Result<Value, CodecError> {
        tracing::trace!(codec = "xml", shape = shape.kind(), "decoding document");
        let root = parse_tree(text)?;
        let bound = bind_element(&root, &shape.field_type())?;
        match bound {
            Value::Object(_) => Ok(bound),
            other => Err(ConvertError::NotAnObject {
                found: value_kind(&other),
            }
            .into()),
        }
    }
}

// ── Element tree ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct XmlNode {
    tag: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(tag: String) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

/// Parse an XML string into an owned element tree. Attributes, comments,
/// processing instructions, and the XML declaration are ignored.
fn parse_tree(text: &str) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                stack.push(XmlNode::named(tag));
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let node = XmlNode::named(tag);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if let Some(node) = stack.last_mut() {
                        if !node.text.is_empty() {
                            node.text.push(' ');
                        }
                        node.text.push_str(trimmed);
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                if let Some(node) = stack.last_mut() {
                    if !node.text.is_empty() {
                        node.text.push(' ');
                    }
                    node.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    return Err(XmlError::Truncated);
                }
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(XmlError::Parse(e)),
        }
    }

    root.ok_or(XmlError::NoRoot)
}

// ── Shape-guided binding ──────────────────────────────────────────────────

fn bind_element(node: &XmlNode, ty: &FieldType) -> Result<Value, CodecError> {
    match ty {
        FieldType::Record(rec) => {
            let mut out = Map::new();
            for (key, def) in &rec.fields {
                let val = match node.child(key) {
                    Some(child) => bind_element(child, &def.ty)?,
                    None => Value::Null,
                };
                out.insert(key.clone(), val);
            }
            Ok(Value::Object(out))
        }
        FieldType::List(et) => {
            let mut out = Vec::with_capacity(node.children.len());
            for child in &node.children {
                out.push(bind_element(child, et)?);
            }
            Ok(Value::Array(out))
        }
        FieldType::Map(vt) => {
            if node.children.is_empty() && !node.text.is_empty() {
                return Err(ConvertError::NotAnObject { found: "string" }.into());
            }
            Ok(Value::Object(group_children(node, vt)?))
        }
        FieldType::Any => {
            if !node.children.is_empty() {
                Ok(Value::Object(group_children(node, &FieldType::Any)?))
            } else {
                Ok(Value::String(node.text.clone()))
            }
        }
        scalar => {
            if !node.children.is_empty() {
                return Err(ConvertError::Incompatible {
                    from: "object",
                    to: scalar.kind(),
                }
                .into());
            }
            if node.text.is_empty() {
                return Ok(Value::Null);
            }
            Ok(convert(Value::String(node.text.clone()), scalar)?)
        }
    }
}

/// Children keyed by tag; a tag occurring more than once becomes an array.
fn group_children(node: &XmlNode, vt: &FieldType) -> Result<Map<String, Value>, CodecError> {
    let mut out = Map::new();
    for child in &node.children {
        let val = bind_element(child, vt)?;
        match out.entry(child.tag.clone()) {
            serde_json::map::Entry::Vacant(slot) => {
                slot.insert(val);
            }
            serde_json::map::Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if let Value::Array(arr) = existing {
                    arr.push(val);
                } else {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, val]);
                }
            }
        }
    }
    Ok(out)
}

// ── Rendering ─────────────────────────────────────────────────────────────

fn write_element(out: &mut String, tag: &str, value: &Value) {
    match value {
        Value::Null => write_empty(out, tag),
        Value::Object(body) => {
            let live: Vec<_> = body.iter().filter(|(_, v)| !v.is_null()).collect();
            if live.is_empty() {
                write_empty(out, tag);
            } else {
                out.push('<');
                out.push_str(tag);
                out.push('>');
                for (key, val) in live {
                    write_element(out, key, val);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
        Value::Array(items) => {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            for item in items {
                write_element(out, "Item", item);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Value::String(s) if s.is_empty() => write_empty(out, tag),
        Value::String(s) => write_text(out, tag, &xml_escape(s)),
        Value::Number(n) => write_text(out, tag, &n.to_string()),
        Value::Bool(b) => write_text(out, tag, if *b { "true" } else { "false" }),
    }
}

fn write_empty(out: &mut String, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push_str("/>");
}

fn write_text(out: &mut String, tag: &str, text: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Escape special XML characters in text content.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expando_shape::ShapeBuilder;
    use serde_json::json;

    fn card_shape() -> Shape {
        let b = ShapeBuilder::new();
        let info = b.record("Info", [("CreatorId", b.int())]);
        b.record_shape(
            "Card",
            [
                ("Name", b.str()),
                ("Count", b.int()),
                ("Info", b.nested(info)),
                ("Tags", b.list(b.str())),
            ],
        )
    }

    // -- Encode --

    #[test]
    fn encode_record_document() {
        let codec = XmlCodec::new();
        let doc = json!({
            "Name": "A",
            "Count": 3,
            "Info": {"CreatorId": 5},
            "Tags": ["x", "y"],
        });
        let text = codec.encode(&doc, &card_shape()).unwrap();
        assert_eq!(
            text,
            "<Card><Name>A</Name><Count>3</Count>\
             <Info><CreatorId>5</CreatorId></Info>\
             <Tags><Item>x</Item><Item>y</Item></Tags></Card>"
        );
    }

    #[test]
    fn encode_omits_null_fields() {
        let codec = XmlCodec::new();
        let doc = json!({"Name": "A", "Count": null});
        let text = codec.encode(&doc, &Shape::Open).unwrap();
        assert_eq!(text, "<Root><Name>A</Name></Root>");
    }

    #[test]
    fn encode_escapes_text() {
        let codec = XmlCodec::new();
        let doc = json!({"Name": "a<b&c"});
        let text = codec.encode(&doc, &Shape::Open).unwrap();
        assert_eq!(text, "<Root><Name>a&lt;b&amp;c</Name></Root>");
    }

    #[test]
    fn encode_empty_document_is_self_closing() {
        let codec = XmlCodec::new();
        let text = codec.encode(&json!({}), &Shape::Open).unwrap();
        assert_eq!(text, "<Root/>");
    }

    // -- Decode --

    #[test]
    fn decode_typed_document_parses_scalars() {
        let codec = XmlCodec::new();
        let text = "<Card><Name>A</Name><Count>3</Count>\
                    <Info><CreatorId>5</CreatorId></Info>\
                    <Tags><Item>x</Item><Item>y</Item></Tags></Card>";
        let doc = codec.decode(text, &card_shape()).unwrap();
        assert_eq!(
            doc,
            json!({
                "Name": "A",
                "Count": 3,
                "Info": {"CreatorId": 5},
                "Tags": ["x", "y"],
            })
        );
    }

    #[test]
    fn decode_missing_fields_default_to_null() {
        let codec = XmlCodec::new();
        let doc = codec.decode("<Card><Name>A</Name></Card>", &card_shape()).unwrap();
        assert_eq!(doc["Name"], json!("A"));
        assert!(doc["Count"].is_null());
        assert!(doc["Tags"].is_null());
    }

    #[test]
    fn decode_open_document_maps_leaves_to_strings() {
        let codec = XmlCodec::new();
        let doc = codec
            .decode(
                "<Root><Name>A</Name><Nest><Name>B</Name></Nest></Root>",
                &Shape::Open,
            )
            .unwrap();
        assert_eq!(doc, json!({"Name": "A", "Nest": {"Name": "B"}}));
    }

    #[test]
    fn decode_repeated_children_group_into_arrays() {
        let codec = XmlCodec::new();
        let doc = codec
            .decode("<Root><Tag>a</Tag><Tag>b</Tag></Root>", &Shape::Open)
            .unwrap();
        assert_eq!(doc, json!({"Tag": ["a", "b"]}));
    }

    #[test]
    fn decode_unescapes_text() {
        let codec = XmlCodec::new();
        let doc = codec
            .decode("<Root><Name>a&lt;b&amp;c</Name></Root>", &Shape::Open)
            .unwrap();
        assert_eq!(doc, json!({"Name": "a<b&c"}));
    }

    #[test]
    fn decode_malformed_text_is_parse_error() {
        let codec = XmlCodec::new();
        let err = codec.decode("<Root><Name>", &Shape::Open).unwrap_err();
        assert!(matches!(err, CodecError::Xml(_)));
    }

    #[test]
    fn decode_typed_garbage_scalar_is_bind_error() {
        let codec = XmlCodec::new();
        let err = codec
            .decode("<Card><Count>seven</Count></Card>", &card_shape())
            .unwrap_err();
        assert!(matches!(err, CodecError::Bind(_)));
    }
}
