use crate::model::SubKind;

/// Failures reported by the template editor core.
///
/// None of these are fatal: the editor keeps its last valid state and the
/// shell decides how to surface the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("template text is not valid JSON: {0}")]
    Parse(String),
    #[error("template key must not be empty")]
    EmptyKey,
    #[error("template '{0}' already exists")]
    DuplicateKey(String),
    #[error("template '{0}' not found")]
    TemplateNotFound(String),
    #[error("template '{key}' has no {kind} definition")]
    SlotNotFound { key: String, kind: SubKind },
    #[error("{kind} definitions have no field '{field}'")]
    UnknownField { kind: SubKind, field: String },
    #[error("unknown definition kind '{0}'")]
    UnknownKind(String),
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl EditorError {
    /// True for the key/slot lookups that went stale (e.g. a UI row that was just deleted).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EditorError::TemplateNotFound(_) | EditorError::SlotNotFound { .. }
        )
    }
}

/// Failures talking to the configuration backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("{path}: {message}")]
    Io { path: String, message: String },
}
