use crate::model::{FieldPath, SubKind, TemplateDocument, TemplateRecord};
use crate::{BackendError, EditorError, codec, mutation};
use anyhow::Context;
use log::{debug, error, info, warn};
use std::{fs, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Form,
    Raw,
}

/// Everything the user can do to the template editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Raw-mode edit: the whole text is replaced.
    ReplaceText(String),
    SetMode(EditorMode),
    Select(Option<String>),
    Search(String),
    Create {
        key: String,
        slot: Option<SubKind>,
    },
    Clone {
        key: String,
    },
    Delete {
        key: String,
    },
    Rename {
        from: String,
        to: String,
    },
    SetSlotActive {
        key: String,
        kind: SubKind,
        active: bool,
    },
    SetField {
        key: String,
        kind: SubKind,
        path: FieldPath,
        value: String,
    },
}

impl EditorAction {
    fn is_structured(&self) -> bool {
        matches!(
            self,
            EditorAction::Create { .. }
                | EditorAction::Clone { .. }
                | EditorAction::Delete { .. }
                | EditorAction::Rename { .. }
                | EditorAction::SetSlotActive { .. }
                | EditorAction::SetField { .. }
        )
    }
}

/// Keys of `doc` containing `term` (case-insensitive), sorted ascending.
pub fn filter_keys(doc: &TemplateDocument, term: &str) -> Vec<String> {
    let needle = term.to_lowercase();
    let mut keys: Vec<String> = doc
        .keys()
        .filter(|k| k.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect();
    keys.sort();
    keys
}

/// Run of edits that currently share one undo step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum UndoGroup {
    #[default]
    Closed,
    RawText,
    Field {
        key: String,
        kind: SubKind,
        path: FieldPath,
    },
}

/// Template editor state. The raw text is the only source of truth; the document is
/// re-derived whenever the text changes, and is the last valid parse while the text is broken.
#[derive(Debug, Clone)]
pub struct TemplateEditor {
    raw_text: String,
    document: TemplateDocument,
    parse_error: Option<String>,
    mode: EditorMode,
    selected_key: Option<String>,
    search_term: String,
    // Text last loaded from, or accepted by, the backend.
    saved_text: String,
    saving: bool,
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    // Consecutive raw edits, or consecutive writes to one form field, share one undo step.
    undo_group: UndoGroup,
}

impl Default for TemplateEditor {
    fn default() -> Self {
        Self::load(&codec::serialize(&TemplateDocument::new()))
    }
}

impl TemplateEditor {
    /// Start a session from text fetched from the backend. Unparsable text opens in raw mode.
    pub fn load(text: &str) -> Self {
        let mut editor = Self {
            raw_text: String::new(),
            document: TemplateDocument::new(),
            parse_error: None,
            mode: EditorMode::Form,
            selected_key: None,
            search_term: String::new(),
            saved_text: text.to_string(),
            saving: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_group: UndoGroup::Closed,
        };
        editor.set_text(text.to_string());
        editor
    }

    /// Replace the session with freshly loaded text, keeping the search term.
    ///
    /// Refused while a save is pending: its outcome belongs to the current session.
    pub fn reload(&mut self, text: &str) -> Result<(), EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        let search_term = std::mem::take(&mut self.search_term);
        *self = Self::load(text);
        self.search_term = search_term;
        Ok(())
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The current document, or the last valid one while the text does not parse.
    pub fn document(&self) -> &TemplateDocument {
        &self.document
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    pub fn structured_editing_available(&self) -> bool {
        self.parse_error.is_none()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_key.as_deref()
    }

    pub fn selected_record(&self) -> Option<&TemplateRecord> {
        self.document.get(self.selected_key.as_deref()?)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filtered_keys(&self) -> Vec<String> {
        filter_keys(&self.document, &self.search_term)
    }

    pub fn is_dirty(&self) -> bool {
        self.raw_text != self.saved_text
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// True when cloning `key` would replace an existing template.
    pub fn clone_would_overwrite(&self, key: &str) -> bool {
        self.document.contains_key(&mutation::clone_key(key))
    }

    pub fn apply(&mut self, action: EditorAction) -> Result<(), EditorError> {
        debug!("editor action: {action:?}");

        if action.is_structured() {
            if let Some(message) = self.parse_error.clone() {
                self.mode = EditorMode::Raw;
                return Err(EditorError::Parse(message));
            }
        }

        let result = self.reduce(action);
        if let Err(e) = &result
            && e.is_not_found()
        {
            warn!("ignored stale edit: {e}");
        }
        result
    }

    fn reduce(&mut self, action: EditorAction) -> Result<(), EditorError> {
        match action {
            EditorAction::ReplaceText(text) => {
                if text != self.raw_text {
                    if self.undo_group != UndoGroup::RawText {
                        self.push_undo();
                    }
                    self.redo_stack.clear();
                    self.set_text(text);
                    self.undo_group = UndoGroup::RawText;
                }
                Ok(())
            }
            EditorAction::SetMode(EditorMode::Form) => {
                if let Some(message) = self.parse_error.clone() {
                    self.mode = EditorMode::Raw;
                    return Err(EditorError::Parse(message));
                }
                self.mode = EditorMode::Form;
                self.undo_group = UndoGroup::Closed;
                Ok(())
            }
            EditorAction::SetMode(EditorMode::Raw) => {
                self.mode = EditorMode::Raw;
                self.undo_group = UndoGroup::Closed;
                Ok(())
            }
            EditorAction::Select(None) => {
                self.selected_key = None;
                self.undo_group = UndoGroup::Closed;
                Ok(())
            }
            EditorAction::Select(Some(key)) => {
                if !self.document.contains_key(&key) {
                    return Err(EditorError::TemplateNotFound(key));
                }
                self.selected_key = Some(key);
                self.undo_group = UndoGroup::Closed;
                Ok(())
            }
            EditorAction::Search(term) => {
                self.search_term = term;
                Ok(())
            }
            EditorAction::Create { key, slot } => {
                let next = mutation::create_template(&self.document, &key, slot)?;
                self.commit(next);
                self.selected_key = Some(key);
                Ok(())
            }
            EditorAction::Clone { key } => {
                let next = mutation::clone_template(&self.document, &key)?;
                self.commit(next);
                self.selected_key = Some(mutation::clone_key(&key));
                Ok(())
            }
            EditorAction::Delete { key } => {
                let next = mutation::delete_template(&self.document, &key)?;
                self.commit(next);
                Ok(())
            }
            EditorAction::Rename { from, to } => {
                let next = mutation::rename_template(&self.document, &from, &to)?;
                let was_selected = self.selected_key.as_deref() == Some(from.as_str());
                self.commit(next);
                if was_selected {
                    self.selected_key = Some(to);
                }
                Ok(())
            }
            EditorAction::SetSlotActive { key, kind, active } => {
                let next = mutation::set_slot_active(&self.document, &key, kind, active)?;
                self.commit(next);
                Ok(())
            }
            EditorAction::SetField {
                key,
                kind,
                path,
                value,
            } => {
                let next = mutation::set_field(&self.document, &key, kind, path, value)?;
                self.commit_grouped(next, UndoGroup::Field { key, kind, path });
                Ok(())
            }
        }
    }

    /// Write a mutated document back through the text as its own undo step.
    fn commit(&mut self, next: TemplateDocument) {
        self.commit_grouped(next, UndoGroup::Closed);
    }

    /// Write a mutated document back through the text. The edit joins the previous undo
    /// step when both belong to the same open `group`.
    fn commit_grouped(&mut self, next: TemplateDocument, group: UndoGroup) {
        let text = codec::serialize(&next);
        if text == self.raw_text {
            return;
        }
        if group == UndoGroup::Closed || group != self.undo_group {
            self.push_undo();
        }
        self.redo_stack.clear();
        self.undo_group = group;
        self.set_text(text);
    }

    fn set_text(&mut self, text: String) {
        self.raw_text = text;
        match codec::parse(&self.raw_text) {
            Ok(doc) => {
                self.document = doc;
                self.parse_error = None;
            }
            Err(EditorError::Parse(message)) => {
                self.parse_error = Some(message);
                self.mode = EditorMode::Raw;
            }
            Err(other) => {
                self.parse_error = Some(other.to_string());
                self.mode = EditorMode::Raw;
            }
        }
        self.reconcile_selection();
    }

    fn reconcile_selection(&mut self) {
        if let Some(key) = &self.selected_key
            && !self.document.contains_key(key)
        {
            self.selected_key = None;
        }
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(self.raw_text.clone());
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(text) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::take(&mut self.raw_text);
        self.redo_stack.push(current);
        self.undo_group = UndoGroup::Closed;
        self.set_text(text);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(text) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::take(&mut self.raw_text);
        self.undo_stack.push(current);
        self.undo_group = UndoGroup::Closed;
        self.set_text(text);
        true
    }

    /// Mark a save as pending and hand back the text to submit.
    pub fn begin_save(&mut self) -> Result<String, EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        if let Some(message) = &self.parse_error {
            return Err(EditorError::Parse(message.clone()));
        }
        self.saving = true;
        Ok(self.raw_text.clone())
    }

    /// Settle a pending save. Edits made since `begin_save` stay dirty; a failed save
    /// leaves everything as it was so the user can retry.
    pub fn finish_save(
        &mut self,
        submitted: String,
        result: Result<(), BackendError>,
    ) -> Result<(), EditorError> {
        self.saving = false;
        match result {
            Ok(()) => {
                info!("templates saved ({} bytes)", submitted.len());
                self.saved_text = submitted;
                Ok(())
            }
            Err(e @ BackendError::Transport { .. }) => {
                error!("saving templates failed: {e}");
                Err(EditorError::Backend(e))
            }
            Err(e) => {
                warn!("saving templates failed: {e}");
                Err(EditorError::Backend(e))
            }
        }
    }

    /// Replace the raw text with the contents of a local file (one undo step).
    pub fn import_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        self.undo_group = UndoGroup::Closed;
        self.apply(EditorAction::ReplaceText(text))?;
        self.undo_group = UndoGroup::Closed;
        info!("imported templates from {}", path.display());
        Ok(())
    }

    pub fn export_path(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.raw_text.as_bytes()).with_context(|| format!("writing {path:?}"))?;
        info!("exported templates to {}", path.display());
        Ok(())
    }
}
