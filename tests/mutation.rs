use pretty_assertions::assert_eq;
use scada_console::EditorError;
use scada_console::codec::{parse, serialize};
use scada_console::model::{FieldPath, PointField, PointGroup, SubField, SubKind, TemplateDocument};
use scada_console::mutation::{
    clone_template, create_template, delete_template, set_field, set_slot_active,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn create_edit_activate_delete_scenario() -> Result<()> {
    let doc = TemplateDocument::new();
    assert_eq!(serialize(&doc), "{}");

    let doc = create_template(&doc, "PT_KV", None)?;
    let doc = set_field(
        &doc,
        "PT_KV",
        SubKind::Analog,
        FieldPath::Field(SubField::UnitOfMeasure),
        "kV",
    )?;
    let doc = set_slot_active(&doc, "PT_KV", SubKind::Discrete, true)?;
    assert_eq!(
        serialize(&doc),
        r#"{
  "PT_KV": {
    "Analog": {
      "Name": "PT_KV",
      "UnitOfMeasure": "kV"
    },
    "Discrete": {
      "Name": "PT_KV"
    }
  }
}"#
    );

    let doc = delete_template(&doc, "PT_KV")?;
    assert_eq!(serialize(&doc), "{}");
    Ok(())
}

#[test]
fn nested_point_is_created_on_first_write() -> Result<()> {
    let doc = create_template(&TemplateDocument::new(), "D1", Some(SubKind::Discrete))?;
    let path = FieldPath::Point(PointGroup::DiscreteInfo, PointField::Value);
    let doc = set_field(&doc, "D1", SubKind::Discrete, path, "OPEN")?;

    assert_eq!(
        serialize(&doc),
        r#"{
  "D1": {
    "Discrete": {
      "Name": "D1",
      "DiscreteInfo": {
        "Value": "OPEN"
      }
    }
  }
}"#
    );
    Ok(())
}

#[test]
fn clones_are_independent_of_their_source() -> Result<()> {
    let doc = create_template(&TemplateDocument::new(), "PT_KV", None)?;
    let doc = clone_template(&doc, "PT_KV")?;
    assert_eq!(doc.get("PT_KV"), doc.get("PT_KV_COPY"));

    let name = FieldPath::Field(SubField::Name);
    let doc = set_field(&doc, "PT_KV_COPY", SubKind::Analog, name, "changed")?;
    let source = doc.get("PT_KV").ok_or("source missing")?;
    let copy = doc.get("PT_KV_COPY").ok_or("copy missing")?;
    assert_eq!(source.value(SubKind::Analog, name), Some("PT_KV"));
    assert_eq!(copy.value(SubKind::Analog, name), Some("changed"));
    Ok(())
}

#[test]
fn cloning_again_overwrites_the_previous_copy() -> Result<()> {
    let doc = create_template(&TemplateDocument::new(), "A", None)?;
    let doc = clone_template(&doc, "A")?;
    let doc = set_field(
        &doc,
        "A",
        SubKind::Analog,
        FieldPath::Field(SubField::Phases),
        "ABC",
    )?;
    let doc = clone_template(&doc, "A")?;

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.get("A"), doc.get("A_COPY"));
    Ok(())
}

#[test]
fn create_rejects_every_existing_key() -> Result<()> {
    let doc = parse(r#"{ "A": {}, "B": { "Breaker": { "Name": "B" } }, "C_COPY": {} }"#)?;
    for key in doc.keys() {
        assert_eq!(
            create_template(&doc, key, Some(SubKind::Breaker)).unwrap_err(),
            EditorError::DuplicateKey(key.to_string())
        );
    }
    Ok(())
}

#[test]
fn deactivation_leaves_no_residue() -> Result<()> {
    let original = parse(r#"{ "PT": { "Analog": { "Name": "PT" } } }"#)?;

    let doc = set_slot_active(&original, "PT", SubKind::Breaker, true)?;
    let doc = set_field(
        &doc,
        "PT",
        SubKind::Breaker,
        FieldPath::Field(SubField::DmsFlag),
        "1",
    )?;
    let doc = set_slot_active(&doc, "PT", SubKind::Breaker, false)?;

    assert_eq!(doc, original);
    assert_eq!(serialize(&doc), serialize(&original));
    Ok(())
}

#[test]
fn activating_an_active_slot_keeps_its_fields() -> Result<()> {
    let doc = parse(r#"{ "PT": { "Analog": { "Name": "custom", "Phases": "ABC" } } }"#)?;
    assert_eq!(set_slot_active(&doc, "PT", SubKind::Analog, true)?, doc);
    Ok(())
}

#[test]
fn edits_on_missing_templates_are_not_found() {
    let doc = TemplateDocument::new();
    let errors = [
        clone_template(&doc, "X").unwrap_err(),
        delete_template(&doc, "X").unwrap_err(),
        set_slot_active(&doc, "X", SubKind::Analog, true).unwrap_err(),
        set_field(&doc, "X", SubKind::Analog, FieldPath::Field(SubField::Name), "v").unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err, EditorError::TemplateNotFound("X".to_string()));
    }
}
