//! Core library for the SCADA template console.
//! Models the signal-template document, keeps its raw JSON text and the structured form
//! view in sync, and talks to the configuration backend that stores it.

mod backend;
pub mod codec;
mod config;
mod editor;
mod error;
mod gui;
pub mod model;
pub mod mutation;
pub mod statics;
pub mod stats;

pub use backend::{FileBackend, HttpBackend, TemplateBackend};
pub use config::ConsoleConfig;
pub use editor::{EditorAction, EditorMode, TemplateEditor, filter_keys};
pub use error::{BackendError, EditorError};
pub use gui::run_gui;
