use pretty_assertions::assert_eq;
use scada_console::codec::parse;
use scada_console::model::{FieldPath, SubField, SubKind};
use scada_console::{EditorAction, EditorError, EditorMode, TemplateEditor, filter_keys};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const LIBRARY: &str = r#"{
  "PT_KV": {
    "Analog": {
      "Name": "PT_KV"
    }
  },
  "brk_feeder": {
    "Breaker": {
      "Name": "brk_feeder"
    }
  },
  "DI_DOOR": {}
}"#;

fn create(key: &str) -> EditorAction {
    EditorAction::Create {
        key: key.to_string(),
        slot: None,
    }
}

#[test]
fn filtered_keys_are_case_insensitive_and_sorted() -> Result<()> {
    let mut editor = TemplateEditor::load(LIBRARY);
    assert_eq!(editor.filtered_keys(), vec!["DI_DOOR", "PT_KV", "brk_feeder"]);

    editor.apply(EditorAction::Search("K".to_string()))?;
    assert_eq!(editor.filtered_keys(), vec!["PT_KV", "brk_feeder"]);

    editor.apply(EditorAction::Search("door".to_string()))?;
    assert_eq!(editor.filtered_keys(), vec!["DI_DOOR"]);

    let doc = parse(LIBRARY)?;
    for term in ["", "k", "BRK", "_", "missing"] {
        let expected: Vec<String> = {
            let mut keys: Vec<String> = doc
                .keys()
                .filter(|k| k.to_lowercase().contains(&term.to_lowercase()))
                .map(str::to_string)
                .collect();
            keys.sort();
            keys
        };
        assert_eq!(filter_keys(&doc, term), expected, "term {term:?}");
    }
    Ok(())
}

#[test]
fn broken_text_keeps_last_valid_document() -> Result<()> {
    let mut editor = TemplateEditor::load(LIBRARY);
    let valid = editor.document().clone();

    editor.apply(EditorAction::SetMode(EditorMode::Raw))?;
    let broken = LIBRARY.replacen("\"PT_KV\": {", "\"PT_KV\" {", 1);
    editor.apply(EditorAction::ReplaceText(broken.clone()))?;

    assert_eq!(editor.raw_text(), broken);
    assert_eq!(editor.document(), &valid);
    assert!(editor.parse_error().is_some());

    let err = editor.apply(create("NEW")).unwrap_err();
    assert!(matches!(err, EditorError::Parse(_)));
    assert_eq!(editor.raw_text(), broken, "refused edit must not touch the text");

    let err = editor
        .apply(EditorAction::SetMode(EditorMode::Form))
        .unwrap_err();
    assert!(matches!(err, EditorError::Parse(_)));
    assert_eq!(editor.mode(), EditorMode::Raw);

    editor.apply(EditorAction::ReplaceText(LIBRARY.to_string()))?;
    assert!(editor.parse_error().is_none());
    editor.apply(EditorAction::SetMode(EditorMode::Form))?;
    editor.apply(create("NEW"))?;
    assert!(editor.document().contains_key("NEW"));
    Ok(())
}

#[test]
fn loading_unparsable_text_opens_raw_mode() {
    let editor = TemplateEditor::load("{ not json");
    assert_eq!(editor.mode(), EditorMode::Raw);
    assert!(editor.document().is_empty());
    assert!(!editor.structured_editing_available());
}

#[test]
fn selection_follows_the_document() -> Result<()> {
    let mut editor = TemplateEditor::load(LIBRARY);

    editor.apply(EditorAction::Select(Some("PT_KV".to_string())))?;
    assert_eq!(
        editor
            .selected_record()
            .and_then(|r| r.value(SubKind::Analog, FieldPath::Field(SubField::Name))),
        Some("PT_KV")
    );

    editor.apply(EditorAction::Clone {
        key: "PT_KV".to_string(),
    })?;
    assert_eq!(editor.selected_key(), Some("PT_KV_COPY"));
    assert!(editor.clone_would_overwrite("PT_KV"));

    editor.apply(EditorAction::Delete {
        key: "PT_KV_COPY".to_string(),
    })?;
    assert_eq!(editor.selected_key(), None);

    editor.apply(create("FRESH"))?;
    assert_eq!(editor.selected_key(), Some("FRESH"));

    // A raw edit that drops the selected key clears the selection too.
    editor.apply(EditorAction::SetMode(EditorMode::Raw))?;
    editor.apply(EditorAction::ReplaceText("{}".to_string()))?;
    assert_eq!(editor.selected_key(), None);
    Ok(())
}

#[test]
fn structured_edits_rewrite_the_raw_text() -> Result<()> {
    let mut editor = TemplateEditor::default();
    editor.apply(create("PT_KV"))?;
    editor.apply(EditorAction::SetField {
        key: "PT_KV".to_string(),
        kind: SubKind::Analog,
        path: FieldPath::Field(SubField::UnitOfMeasure),
        value: "kV".to_string(),
    })?;

    let expected = r#"{
  "PT_KV": {
    "Analog": {
      "Name": "PT_KV",
      "UnitOfMeasure": "kV"
    }
  }
}"#;
    assert_eq!(editor.raw_text(), expected);
    assert!(editor.is_dirty());
    Ok(())
}

#[test]
fn stale_edits_report_not_found_and_change_nothing() -> Result<()> {
    let mut editor = TemplateEditor::load(LIBRARY);
    let before = editor.raw_text().to_string();

    let err = editor
        .apply(EditorAction::SetSlotActive {
            key: "GONE".to_string(),
            kind: SubKind::Discrete,
            active: true,
        })
        .unwrap_err();
    assert!(err.is_not_found());

    let err = editor
        .apply(EditorAction::SetField {
            key: "DI_DOOR".to_string(),
            kind: SubKind::Discrete,
            path: FieldPath::Field(SubField::Name),
            value: "x".to_string(),
        })
        .unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(editor.raw_text(), before);
    assert!(!editor.can_undo());
    Ok(())
}

#[test]
fn undo_and_redo_walk_the_text_history() -> Result<()> {
    let mut editor = TemplateEditor::default();
    editor.apply(create("A"))?;
    editor.apply(create("B"))?;

    assert!(editor.undo());
    assert!(!editor.document().contains_key("B"));
    assert!(editor.undo());
    assert!(editor.document().is_empty());
    assert!(!editor.undo());

    assert!(editor.redo());
    assert!(editor.document().contains_key("A"));

    // A new edit drops the redo branch.
    editor.apply(create("C"))?;
    assert!(!editor.can_redo());
    Ok(())
}

#[test]
fn import_and_export_go_through_the_raw_text() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("library.json");
    std::fs::write(&source, LIBRARY)?;

    let mut editor = TemplateEditor::default();
    editor.import_path(&source)?;
    assert_eq!(editor.raw_text(), LIBRARY);
    assert_eq!(editor.document().len(), 3);

    assert!(editor.undo(), "an import is one undo step");
    assert_eq!(editor.raw_text(), "{}");
    assert!(editor.redo());

    let target = dir.path().join("out.json");
    editor.export_path(&target)?;
    assert_eq!(std::fs::read_to_string(&target)?, LIBRARY);

    assert!(editor.import_path(&dir.path().join("missing.json")).is_err());
    Ok(())
}
