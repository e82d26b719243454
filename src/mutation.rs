//! Pure edits over a template document.
//!
//! Every operation borrows the input and returns a fresh document, so the caller's
//! copy is never touched and nothing is shared between the two.

use crate::model::{FieldPath, SubKind, TemplateDocument, TemplateRecord};
use crate::{EditorError, statics};

/// Key a clone of `source` is written to.
pub fn clone_key(source: &str) -> String {
    format!("{source}{}", statics::COPY_SUFFIX)
}

/// Insert `key` with one active slot (`Analog` unless told otherwise) named after the key.
pub fn create_template(
    doc: &TemplateDocument,
    key: &str,
    initial_slot: Option<SubKind>,
) -> Result<TemplateDocument, EditorError> {
    if key.is_empty() {
        return Err(EditorError::EmptyKey);
    }
    if doc.contains_key(key) {
        return Err(EditorError::DuplicateKey(key.to_string()));
    }

    let mut next = doc.clone();
    let kind = initial_slot.unwrap_or(SubKind::Analog);
    next.insert(key, TemplateRecord::with_slot(kind, key));
    Ok(next)
}

/// Copy `source` to `source_COPY`. An existing clone under that name is replaced.
pub fn clone_template(
    doc: &TemplateDocument,
    source: &str,
) -> Result<TemplateDocument, EditorError> {
    let record = doc
        .get(source)
        .ok_or_else(|| EditorError::TemplateNotFound(source.to_string()))?
        .clone();

    let mut next = doc.clone();
    next.insert(clone_key(source), record);
    Ok(next)
}

pub fn delete_template(doc: &TemplateDocument, key: &str) -> Result<TemplateDocument, EditorError> {
    let mut next = doc.clone();
    next.remove(key)
        .ok_or_else(|| EditorError::TemplateNotFound(key.to_string()))?;
    Ok(next)
}

/// Move a record to a new key, keeping its place in the document.
pub fn rename_template(
    doc: &TemplateDocument,
    from: &str,
    to: &str,
) -> Result<TemplateDocument, EditorError> {
    if !doc.contains_key(from) {
        return Err(EditorError::TemplateNotFound(from.to_string()));
    }
    if to.is_empty() {
        return Err(EditorError::EmptyKey);
    }
    if from == to {
        return Ok(doc.clone());
    }
    if doc.contains_key(to) {
        return Err(EditorError::DuplicateKey(to.to_string()));
    }

    let mut next = doc.clone();
    next.rekey(from, to);
    Ok(next)
}

/// Activating adds `{ Name: key }` unless the slot is already there; deactivating drops the
/// slot with all of its fields.
pub fn set_slot_active(
    doc: &TemplateDocument,
    key: &str,
    kind: SubKind,
    active: bool,
) -> Result<TemplateDocument, EditorError> {
    let mut next = doc.clone();
    let record = next
        .get_mut(key)
        .ok_or_else(|| EditorError::TemplateNotFound(key.to_string()))?;
    if active {
        record.activate(kind, key);
    } else {
        record.deactivate(kind);
    }
    Ok(next)
}

pub fn set_field(
    doc: &TemplateDocument,
    key: &str,
    kind: SubKind,
    path: FieldPath,
    value: impl Into<String>,
) -> Result<TemplateDocument, EditorError> {
    let path = path.check(kind)?;

    let mut next = doc.clone();
    let slot = next
        .get_mut(key)
        .ok_or_else(|| EditorError::TemplateNotFound(key.to_string()))?
        .slot_mut(kind)
        .ok_or_else(|| EditorError::SlotNotFound {
            key: key.to_string(),
            kind,
        })?;
    let entry = slot.entry_mut(path).ok_or_else(|| EditorError::UnknownField {
        kind,
        field: path.to_string(),
    })?;
    *entry = Some(value.into());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PointField, PointGroup, SubField};

    fn doc_with(key: &str) -> TemplateDocument {
        create_template(&TemplateDocument::new(), key, None).unwrap()
    }

    #[test]
    fn create_rejects_empty_key() {
        assert_eq!(
            create_template(&TemplateDocument::new(), "", None).unwrap_err(),
            EditorError::EmptyKey
        );
    }

    #[test]
    fn create_with_explicit_slot() {
        let doc =
            create_template(&TemplateDocument::new(), "BRK_1", Some(SubKind::Breaker)).unwrap();
        let record = doc.get("BRK_1").unwrap();
        assert_eq!(record.active_kinds(), vec![SubKind::Breaker]);
        assert_eq!(
            record.value(SubKind::Breaker, FieldPath::Field(SubField::Name)),
            Some("BRK_1")
        );
    }

    #[test]
    fn input_document_is_never_modified() {
        let doc = doc_with("A");
        let before = doc.clone();

        let _ = set_field(
            &doc,
            "A",
            SubKind::Analog,
            FieldPath::Field(SubField::UnitOfMeasure),
            "kV",
        );
        let _ = set_slot_active(&doc, "A", SubKind::Analog, false);
        let _ = delete_template(&doc, "A");
        let _ = rename_template(&doc, "A", "B");

        assert_eq!(doc, before);
    }

    #[test]
    fn rename_checks_both_ends() {
        let doc = create_template(&doc_with("A"), "B", None).unwrap();
        assert_eq!(
            rename_template(&doc, "A", "B").unwrap_err(),
            EditorError::DuplicateKey("B".to_string())
        );
        assert_eq!(
            rename_template(&doc, "X", "Y").unwrap_err(),
            EditorError::TemplateNotFound("X".to_string())
        );
        assert_eq!(rename_template(&doc, "A", "").unwrap_err(), EditorError::EmptyKey);
        assert_eq!(rename_template(&doc, "A", "A").unwrap(), doc);

        let renamed = rename_template(&doc, "A", "C").unwrap();
        assert_eq!(renamed.keys().collect::<Vec<_>>(), vec!["C", "B"]);
    }

    #[test]
    fn set_field_reports_missing_slot() {
        let doc = doc_with("A");
        let err = set_field(&doc, "A", SubKind::Discrete, FieldPath::Field(SubField::Name), "x")
            .unwrap_err();
        assert_eq!(
            err,
            EditorError::SlotNotFound {
                key: "A".to_string(),
                kind: SubKind::Discrete
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn set_field_rejects_paths_of_other_kinds() {
        let doc = doc_with("A");
        let path = FieldPath::Point(PointGroup::DiscreteValue, PointField::InfoName);
        let err = set_field(&doc, "A", SubKind::Analog, path, "x").unwrap_err();
        assert_eq!(
            err,
            EditorError::UnknownField {
                kind: SubKind::Analog,
                field: "DiscreteValue.InfoName".to_string()
            }
        );
    }

    #[test]
    fn clone_key_appends_suffix() {
        assert_eq!(clone_key("PT_KV"), "PT_KV_COPY");
    }
}
