//! ExpandoObject behavior matrix: lazy materialization, dual-mode member
//! resolution, and textual-form freshness.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use expando_core::{
    CodecError, Codecs, ExpandoObject, Shape, ShapeBuilder, ShapeRegistry, TextCodec, TextFormat,
};
use serde_json::{json, Value};

fn link_shape() -> Shape {
    let b = ShapeBuilder::new();
    let info = b.record("Info", [("CreatorId", b.int())]);
    b.record_shape(
        "Link",
        [
            ("Name", b.str()),
            ("Description", b.str()),
            ("Info", b.nested(info)),
        ],
    )
}

fn json_codec() -> Arc<dyn TextCodec> {
    Codecs::new().get(TextFormat::Json)
}

fn xml_codec() -> Arc<dyn TextCodec> {
    Codecs::new().get(TextFormat::Xml)
}

/// Counts decode calls so tests can observe materialization frequency.
struct CountingCodec {
    inner: Arc<dyn TextCodec>,
    decodes: AtomicUsize,
}

impl CountingCodec {
    fn new(inner: Arc<dyn TextCodec>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            decodes: AtomicUsize::new(0),
        })
    }

    fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl TextCodec for CountingCodec {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    fn format(&self) -> TextFormat {
        self.inner.format()
    }

    fn encode(&self, value: &Value, shape: &Shape) -> Result<String, CodecError> {
        self.inner.encode(value, shape)
    }

    fn decode(&self, text: &str, shape: &Shape) -> Result<Value, CodecError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        self.inner.decode(text, shape)
    }
}

// -- Lazy materialization --

#[test]
fn repeated_gets_decode_exactly_once() {
    let counting = CountingCodec::new(json_codec());
    let mut obj = ExpandoObject::from_text(
        r#"{"Name":"A","Description":"d","Info":null}"#,
        link_shape(),
        counting.clone(),
    );
    assert_eq!(counting.decode_count(), 0);
    let first = obj.get("Name").unwrap();
    let second = obj.get("Name").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(json!("A")));
    assert_eq!(counting.decode_count(), 1);
}

#[test]
fn set_before_get_also_materializes_first() {
    let counting = CountingCodec::new(json_codec());
    let mut obj = ExpandoObject::from_text(
        r#"{"Name":"A","Description":"d","Info":null}"#,
        link_shape(),
        counting.clone(),
    );
    obj.set("Name", json!("B")).unwrap();
    assert_eq!(counting.decode_count(), 1);
    // The decoded document survives alongside the mutation.
    assert_eq!(obj.get("Description").unwrap(), Some(json!("d")));
    assert_eq!(obj.get("Name").unwrap(), Some(json!("B")));
    assert_eq!(counting.decode_count(), 1);
}

#[test]
fn reassignment_invalidates_stale_decode() {
    let counting = CountingCodec::new(json_codec());
    let mut obj = ExpandoObject::from_text(r#"{"x":1}"#, Shape::Open, counting.clone());
    assert_eq!(obj.get("x").unwrap(), Some(json!(1)));
    obj.assign_text(r#"{"x":2}"#);
    assert!(!obj.is_materialized());
    assert_eq!(obj.get("x").unwrap(), Some(json!(2)));
    assert_eq!(counting.decode_count(), 2);
}

#[test]
fn reassignment_discards_in_memory_mutations() {
    let mut obj = ExpandoObject::from_text(r#"{"x":1}"#, Shape::Open, json_codec());
    obj.set("x", json!(99)).unwrap();
    obj.assign_text(r#"{"x":2}"#);
    assert_eq!(obj.get("x").unwrap(), Some(json!(2)));
}

#[test]
fn to_text_materializes_before_encoding() {
    let mut obj = ExpandoObject::from_text(
        r#"{ "Name" : "A", "Description": null, "Info": null }"#,
        link_shape(),
        json_codec(),
    );
    // Re-encoded from the decoded backing, not echoed from the blob.
    assert_eq!(
        obj.to_text().unwrap(),
        r#"{"Name":"A","Description":null,"Info":null}"#
    );
}

// -- Member resolution --

#[test]
fn set_then_get_declared_property() {
    let mut obj = ExpandoObject::new(link_shape(), json_codec());
    assert_eq!(obj.set("Name", json!("HelloWorld")).unwrap(), true);
    assert_eq!(obj.get("Name").unwrap(), Some(json!("HelloWorld")));
}

#[test]
fn declared_property_converts_on_write() {
    let b = ShapeBuilder::new();
    let shape = b.record_shape("Counted", [("Count", b.int())]);
    let mut obj = ExpandoObject::new(shape, json_codec());
    obj.set("Count", json!("41")).unwrap();
    assert_eq!(obj.get("Count").unwrap(), Some(json!(41)));
    // Conversion failure is an error and leaves the member unchanged.
    assert!(obj.set("Count", json!("nope")).is_err());
    assert_eq!(obj.get("Count").unwrap(), Some(json!(41)));
}

#[test]
fn dictionary_fallback_set_then_get() {
    for shape in [Shape::Open, Shape::Ref("Unregistered".into())] {
        let mut obj = ExpandoObject::new(shape, json_codec());
        assert_eq!(obj.set("anyKey", json!("v")).unwrap(), true);
        assert_eq!(obj.get("anyKey").unwrap(), Some(json!("v")));
    }
}

#[test]
fn silent_ignore_on_strict_shape() {
    let mut obj = ExpandoObject::new(link_shape(), json_codec());
    assert_eq!(obj.set("unknownField", json!(1)).unwrap(), false);
    assert_eq!(obj.get("unknownField").unwrap(), None);
}

#[test]
fn declared_but_unset_member_reads_null() {
    let mut obj = ExpandoObject::new(link_shape(), json_codec());
    assert_eq!(obj.get("Description").unwrap(), Some(Value::Null));
}

#[test]
fn registry_resolved_ref_behaves_as_record() {
    let b = ShapeBuilder::new();
    let registry = ShapeRegistry::new();
    registry
        .register(b.record("Link", [("Name", b.str())]))
        .unwrap();
    let shape = registry.resolve_shape(b.shape_ref("Link"));
    let mut obj = ExpandoObject::new(shape, json_codec());
    assert_eq!(obj.set("Name", json!("A")).unwrap(), true);
    assert_eq!(obj.set("Other", json!(1)).unwrap(), false);
}

// -- Round trips through the object --

#[test]
fn mutate_then_round_trip_typed() {
    let mut obj = ExpandoObject::from_text(
        r#"{"Name":"A","Description":"d","Info":{"CreatorId":5}}"#,
        link_shape(),
        json_codec(),
    );
    obj.set("Name", json!("HelloWorld")).unwrap();
    let text = obj.to_text().unwrap();

    let mut back = ExpandoObject::from_text(text, link_shape(), json_codec());
    assert_eq!(back.get("Name").unwrap(), Some(json!("HelloWorld")));
    assert_eq!(back.get_path(&["Info", "CreatorId"]).unwrap(), Some(json!(5)));
}

#[test]
fn nested_round_trip_preserves_inner_fields() {
    let mut outer = ExpandoObject::new(Shape::Open, json_codec());
    outer.set("Name", json!("A")).unwrap();
    outer.set("Nested", json!({"Name": "B"})).unwrap();
    let text = outer.to_text().unwrap();

    let mut back = ExpandoObject::from_text(text, Shape::Open, json_codec());
    assert_eq!(back.get_path(&["Nested", "Name"]).unwrap(), Some(json!("B")));
}

#[test]
fn nested_object_value_embeds_as_document() {
    let b = ShapeBuilder::new();
    let mut inner = ExpandoObject::new(Shape::Open, json_codec());
    inner.set("Name", json!("B")).unwrap();

    let mut outer = ExpandoObject::new(Shape::Open, json_codec());
    outer.set("Name", json!("A")).unwrap();
    outer.set("Nest", inner.to_value().unwrap()).unwrap();
    assert_eq!(
        outer.to_text().unwrap(),
        r#"{"Name":"A","Nest":{"Name":"B"}}"#
    );

    // A typed nested record converts member-by-member on the way in.
    let shape = b.record_shape(
        "Outer",
        [("Nest", b.nested(b.record("Inner", [("Count", b.int())])))],
    );
    let mut typed = ExpandoObject::new(shape, json_codec());
    typed.set("Nest", json!({"Count": "3"})).unwrap();
    assert_eq!(typed.get_path(&["Nest", "Count"]).unwrap(), Some(json!(3)));
}

#[test]
fn xml_object_round_trip() {
    let mut obj = ExpandoObject::new(link_shape(), xml_codec());
    obj.set("Name", json!("A")).unwrap();
    obj.set("Info", json!({"CreatorId": 5})).unwrap();
    let text = obj.to_text().unwrap();
    assert_eq!(
        text,
        "<Link><Name>A</Name><Info><CreatorId>5</CreatorId></Info></Link>"
    );

    let mut back = ExpandoObject::from_text(text, link_shape(), xml_codec());
    assert_eq!(back.get("Name").unwrap(), Some(json!("A")));
    assert_eq!(back.get_path(&["Info", "CreatorId"]).unwrap(), Some(json!(5)));
}

// -- Failure surfaces --

#[test]
fn malformed_text_errors_on_every_access_until_corrected() {
    let mut obj = ExpandoObject::from_text("<Link><Name>", link_shape(), xml_codec());
    assert!(obj.get("Name").is_err());
    assert!(obj.set("Name", json!("A")).is_err());
    assert!(obj.to_text().is_err());
    obj.assign_text("<Link><Name>A</Name></Link>");
    assert_eq!(obj.get("Name").unwrap(), Some(json!("A")));
}

#[test]
fn scalar_document_is_a_decode_error() {
    let mut obj = ExpandoObject::from_text("42", Shape::Open, json_codec());
    assert!(obj.get("x").is_err());
}
