use pretty_assertions::assert_eq;
use scada_console::codec::{parse, serialize};
use scada_console::model::{
    FieldPath, PointField, PointGroup, SubField, SubKind, TemplateDocument, is_valid_document,
};
use scada_console::mutation::{create_template, set_field};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// Already in canonical form: typed members first, unmodelled members after them.
const CANONICAL: &str = r#"{
  "PT_KV": {
    "Analog": {
      "Name": "PT_KV",
      "UnitOfMeasure": "kV",
      "AnalogValue": {
        "Name": "PT_KV_V",
        "Archive": "A1",
        "Scale": 1.5
      },
      "Limits": [
        1,
        2
      ]
    },
    "Comment": null
  },
  "BRK_1": {
    "Breaker": {
      "Name": "BRK_1",
      "DMSFlag": "1"
    }
  },
  "RESERVED": {}
}"#;

#[test]
fn canonical_text_is_reproduced_byte_for_byte() -> Result<()> {
    let doc = parse(CANONICAL)?;
    assert_eq!(serialize(&doc), CANONICAL);
    Ok(())
}

#[test]
fn unmodelled_members_survive_a_round_trip() -> Result<()> {
    let doc = parse(CANONICAL)?;
    let record = doc.get("PT_KV").ok_or("PT_KV missing")?;

    assert!(record.extra.contains_key("Comment"));
    let analog = record.analog.as_ref().ok_or("analog missing")?;
    assert_eq!(analog.extra["Limits"], serde_json::json!([1, 2]));
    let point = analog.analog_value.as_ref().ok_or("point missing")?;
    assert_eq!(point.extra["Scale"], serde_json::json!(1.5));

    assert!(is_valid_document(&doc));
    assert_eq!(parse(&serialize(&doc))?, doc);
    Ok(())
}

#[test]
fn formatting_does_not_affect_the_document() -> Result<()> {
    let compact = concat!(
        r#"{"BRK_1":{"Breaker":{"DMSFlag":"1","Name":"BRK_1"}},"RESERVED":{},"#,
        r#""PT_KV":{"Comment":null,"Analog":{"Limits":[1,2],"#,
        r#""AnalogValue":{"Scale":1.5,"Archive":"A1","Name":"PT_KV_V"},"#,
        r#""UnitOfMeasure":"kV","Name":"PT_KV"}}}"#,
    );
    assert_eq!(parse(compact)?, parse(CANONICAL)?);
    Ok(())
}

#[test]
fn serialized_text_keeps_key_order() -> Result<()> {
    let doc = parse(r#"{ "Z": {}, "A": {}, "M": {} }"#)?;
    let keys: Vec<&str> = doc.keys().collect();
    assert_eq!(keys, vec!["Z", "A", "M"]);
    assert_eq!(serialize(&doc), "{\n  \"Z\": {},\n  \"A\": {},\n  \"M\": {}\n}");
    Ok(())
}

#[test]
fn typed_values_are_read_through_field_paths() -> Result<()> {
    let doc = parse(CANONICAL)?;
    let record = doc.get("PT_KV").ok_or("PT_KV missing")?;
    assert_eq!(
        record.value(SubKind::Analog, FieldPath::Field(SubField::UnitOfMeasure)),
        Some("kV")
    );
    assert_eq!(
        record.value(
            SubKind::Analog,
            FieldPath::Point(PointGroup::AnalogValue, PointField::Archive)
        ),
        Some("A1")
    );
    assert_eq!(
        record.value(
            SubKind::Analog,
            FieldPath::Point(PointGroup::AnalogInfo, PointField::Name)
        ),
        None
    );
    Ok(())
}

/// Every editable path of `kind`, plain fields first, then each point group's fields.
fn paths_of(kind: SubKind) -> Vec<FieldPath> {
    SubField::for_kind(kind)
        .map(FieldPath::Field)
        .chain(PointGroup::for_kind(kind).flat_map(|group| {
            group
                .fields()
                .iter()
                .map(move |&field| FieldPath::Point(group, field))
        }))
        .collect()
}

fn distinct_value(key: &str, path: FieldPath) -> String {
    match path {
        FieldPath::Field(field) => format!("{key}.{}", field.wire_name()),
        FieldPath::Point(group, field) => {
            format!("{key}.{}.{}", group.wire_name(), field.wire_name())
        }
    }
}

#[test]
fn every_typed_field_survives_a_round_trip() -> Result<()> {
    let mut doc = TemplateDocument::new();
    for kind in SubKind::ALL {
        let key = format!("ALL_{}", kind.as_str());
        doc = create_template(&doc, &key, Some(kind))?;
        for path in paths_of(kind) {
            doc = set_field(&doc, &key, kind, path, distinct_value(&key, path))?;
        }
    }

    let text = serialize(&doc);
    let reparsed = parse(&text)?;
    assert_eq!(reparsed, doc);
    assert!(is_valid_document(&reparsed));

    for kind in SubKind::ALL {
        let key = format!("ALL_{}", kind.as_str());
        let record = reparsed.get(&key).ok_or("template missing")?;
        assert_eq!(record.active_kinds(), vec![kind]);
        for path in paths_of(kind) {
            let expected = distinct_value(&key, path);
            assert_eq!(record.value(kind, path), Some(expected.as_str()), "{path}");
            assert!(text.contains(&format!("\"{expected}\"")), "{path} not written");
        }
    }
    Ok(())
}
