use crate::backend::TemplateBackend;
use crate::config::ConsoleConfig;
use crate::editor::{EditorAction, EditorMode, TemplateEditor};
use crate::model::{FieldPath, PointGroup, SubField, SubKind, TemplateRecord};
use crate::stats::{StatsReport, TemplateStats};
use crate::{BackendError, EditorError, codec, mutation, statics};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Instant;

pub fn run_gui(config: ConsoleConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let backend = config.backend()?;
            info!("using template backend {}", backend.describe());
            let mut app = ConsoleApp::new(config, backend);
            app.start_load(&cc.egui_ctx);
            app.start_stats(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum View {
    #[default]
    Dashboard,
    Templates,
}

/// Results sent back from worker threads.
enum JobResult {
    Loaded(Result<String, BackendError>),
    Saved {
        submitted: String,
        result: Result<(), BackendError>,
    },
    Stats(Result<StatsReport, BackendError>),
}

/// Actions that wait for the user to confirm them.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingConfirm {
    Delete(String),
    OverwriteClone(String),
    DiscardReload,
}

impl PendingConfirm {
    fn message(&self) -> String {
        match self {
            PendingConfirm::Delete(key) => format!("{} ({key})", statics::EN_CONFIRM_DELETE),
            PendingConfirm::OverwriteClone(key) => format!(
                "{} ({})",
                statics::EN_CONFIRM_OVERWRITE_CLONE,
                mutation::clone_key(key)
            ),
            PendingConfirm::DiscardReload => statics::EN_CONFIRM_DISCARD.to_string(),
        }
    }
}

/// What the templates view asked for during one frame.
enum Request {
    Action(EditorAction),
    Clone(String),
    Delete(String),
}

struct ConsoleApp {
    config: ConsoleConfig,
    backend: Arc<dyn TemplateBackend>,
    jobs_tx: mpsc::Sender<JobResult>,
    jobs_rx: mpsc::Receiver<JobResult>,
    view: View,
    // None until the first load succeeds.
    editor: Option<TemplateEditor>,
    loading: bool,
    connected: Option<bool>,
    stats: Option<StatsReport>,
    stats_pending: bool,
    last_stats_request: Option<Instant>,
    new_key: String,
    rename_to: String,
    confirm: Option<PendingConfirm>,
    dialog_dir: Option<PathBuf>,
    status: String,
    last_error: Option<String>,
}

impl ConsoleApp {
    fn new(config: ConsoleConfig, backend: Arc<dyn TemplateBackend>) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel();
        Self {
            config,
            backend,
            jobs_tx,
            jobs_rx,
            view: View::default(),
            editor: None,
            loading: false,
            connected: None,
            stats: None,
            stats_pending: false,
            last_stats_request: None,
            new_key: String::new(),
            rename_to: String::new(),
            confirm: None,
            dialog_dir: None,
            status: String::new(),
            last_error: None,
        }
    }

    fn spawn_job<F>(&self, ctx: &egui::Context, job: F)
    where
        F: FnOnce(&dyn TemplateBackend) -> JobResult + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.jobs_tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = job(backend.as_ref());
            if tx.send(result).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn is_saving(&self) -> bool {
        self.editor.as_ref().is_some_and(TemplateEditor::is_saving)
    }

    fn start_load(&mut self, ctx: &egui::Context) {
        // A reload while a deploy is in flight would lose track of what was deployed.
        if self.loading || self.is_saving() {
            return;
        }
        self.loading = true;
        self.spawn_job(ctx, |backend| JobResult::Loaded(backend.fetch_raw()));
    }

    fn start_stats(&mut self, ctx: &egui::Context) {
        if self.stats_pending {
            return;
        }
        self.stats_pending = true;
        self.last_stats_request = Some(Instant::now());
        self.spawn_job(ctx, |backend| JobResult::Stats(backend.fetch_stats()));
    }

    fn start_save(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match editor.begin_save() {
            Ok(submitted) => {
                info!("deploying templates to {}", self.backend.describe());
                self.spawn_job(ctx, move |backend| {
                    let result = backend.save_raw(&submitted);
                    JobResult::Saved { submitted, result }
                });
            }
            Err(e) => {
                self.last_error = Some(format!("{} ({e})", statics::EN_ERR_SAVE_FORMAT));
            }
        }
    }

    fn poll_jobs(&mut self, ctx: &egui::Context) {
        while let Ok(job) = self.jobs_rx.try_recv() {
            match job {
                JobResult::Loaded(Ok(text)) => {
                    self.loading = false;
                    self.connected = Some(true);
                    let reloaded = match self.editor.as_mut() {
                        Some(editor) => editor.reload(&text),
                        None => {
                            self.editor = Some(TemplateEditor::load(&text));
                            Ok(())
                        }
                    };
                    match reloaded {
                        Ok(()) => {
                            self.rename_to.clear();
                            self.status = format!("Loaded {}", self.backend.describe());
                        }
                        Err(e) => {
                            warn!("dropped reloaded templates: {e}");
                            self.last_error = Some(format!("{} ({e})", statics::EN_ERR_RELOAD));
                        }
                    }
                }
                JobResult::Loaded(Err(e)) => {
                    self.loading = false;
                    self.connected = Some(false);
                    self.last_error = Some(format!("Failed to load: {e}"));
                }
                JobResult::Saved { submitted, result } => {
                    let Some(editor) = self.editor.as_mut() else {
                        continue;
                    };
                    match editor.finish_save(submitted, result) {
                        Ok(()) => {
                            self.connected = Some(true);
                            self.status = statics::EN_SAVED_OK.to_string();
                            self.last_error = None;
                            self.start_stats(ctx);
                        }
                        Err(e) => {
                            if matches!(e, EditorError::Backend(BackendError::Transport { .. })) {
                                self.connected = Some(false);
                            }
                            self.last_error =
                                Some(format!("{} ({e})", statics::EN_ERR_SAVE_FORMAT));
                        }
                    }
                }
                JobResult::Stats(Ok(report)) => {
                    self.stats_pending = false;
                    self.connected = Some(true);
                    self.stats = Some(report);
                }
                JobResult::Stats(Err(e)) => {
                    self.stats_pending = false;
                    self.connected = Some(false);
                    warn!("refreshing template stats failed: {e}");
                }
            }
        }
    }

    /// Returns whether the action was applied.
    fn apply(&mut self, action: EditorAction) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        match editor.apply(action) {
            Ok(()) => true,
            // Stale row from the previous frame; already logged.
            Err(e) if e.is_not_found() => false,
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn request_clone(&mut self, key: String) {
        let overwrite = self
            .editor
            .as_ref()
            .is_some_and(|e| e.clone_would_overwrite(&key));
        if overwrite {
            self.confirm = Some(PendingConfirm::OverwriteClone(key));
        } else {
            self.apply(EditorAction::Clone { key });
        }
    }

    fn request_reload(&mut self, ctx: &egui::Context) {
        if self.is_saving() {
            return;
        }
        if self.editor.as_ref().is_some_and(TemplateEditor::is_dirty) {
            self.confirm = Some(PendingConfirm::DiscardReload);
        } else {
            self.start_load(ctx);
        }
    }

    fn undo(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.undo();
        }
    }

    fn redo(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.redo();
        }
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new().add_filter(statics::EN_FILE_FILTER, &["json"]);
        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }
        dlg
    }

    fn import_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match editor.import_path(&path) {
            Ok(()) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("Imported {}", path.display());
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(format!("Failed to import: {e:#}"));
            }
        }
    }

    fn export_file(&mut self) {
        let Some(path) = self.file_dialog().set_file_name("templates.json").save_file() else {
            return;
        };
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        if let Err(e) = editor.export_path(&path) {
            self.last_error = Some(format!("Failed to export: {e:#}"));
        } else {
            self.dialog_dir = path.parent().map(PathBuf::from);
            self.status = format!("Exported {}", path.display());
            self.last_error = None;
        }
    }

    /// One row of the element list. Templates with no definitions are drawn dimmed.
    fn element_row(
        ui: &mut egui::Ui,
        selected: bool,
        key: &str,
        inactive: bool,
        row_h: f32,
    ) -> egui::Response {
        let w = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(w, row_h), egui::Sense::click());
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

        let visuals = ui.style().interact_selectable(&response, selected);
        if ui.is_rect_visible(rect) {
            ui.painter()
                .rect_filled(rect, visuals.corner_radius, visuals.bg_fill);
            let color = if inactive && !selected {
                ui.visuals().weak_text_color()
            } else {
                visuals.text_color()
            };
            let font_id = egui::TextStyle::Button.resolve(ui.style());
            ui.painter().text(
                rect.left_center() + egui::vec2(6.0, 0.0),
                egui::Align2::LEFT_CENTER,
                key,
                font_id,
                color,
            );
        }

        response
    }

    fn field_row(
        ui: &mut egui::Ui,
        key: &str,
        record: &TemplateRecord,
        kind: SubKind,
        path: FieldPath,
        label: &str,
        requests: &mut Vec<Request>,
    ) {
        ui.label(label);
        let mut value = record.value(kind, path).unwrap_or_default().to_string();
        if ui.text_edit_singleline(&mut value).changed() {
            requests.push(Request::Action(EditorAction::SetField {
                key: key.to_string(),
                kind,
                path,
                value,
            }));
        }
        ui.end_row();
    }

    fn render_slot_editor(
        ui: &mut egui::Ui,
        key: &str,
        record: &TemplateRecord,
        kind: SubKind,
        requests: &mut Vec<Request>,
    ) {
        egui::CollapsingHeader::new(kind.as_str())
            .id_salt(("slot", kind.as_str()))
            .default_open(true)
            .show(ui, |ui| {
                egui::Grid::new(("slot_grid", kind.as_str()))
                    .num_columns(2)
                    .show(ui, |ui| {
                        for field in SubField::for_kind(kind) {
                            Self::field_row(
                                ui,
                                key,
                                record,
                                kind,
                                FieldPath::Field(field),
                                field.label(),
                                requests,
                            );
                        }
                    });

                for group in PointGroup::for_kind(kind) {
                    ui.add_space(6.0);
                    ui.strong(group.label());
                    egui::Grid::new(("point_grid", group.wire_name()))
                        .num_columns(2)
                        .show(ui, |ui| {
                            for &field in group.fields() {
                                Self::field_row(
                                    ui,
                                    key,
                                    record,
                                    kind,
                                    FieldPath::Point(group, field),
                                    field.label(),
                                    requests,
                                );
                            }
                        });
                }
            });
    }

    fn render_form(
        ui: &mut egui::Ui,
        editor: &TemplateEditor,
        rename_to: &mut String,
        requests: &mut Vec<Request>,
    ) {
        let (Some(key), Some(record)) = (editor.selected_key(), editor.selected_record()) else {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading(statics::EN_EMPTY_STATE_HEADING);
                ui.label(statics::EN_EMPTY_STATE_HINT);
            });
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(key);
            if record.is_inactive() {
                ui.colored_label(egui::Color32::GRAY, statics::EN_BADGE_INACTIVE);
            } else {
                ui.colored_label(egui::Color32::GREEN, statics::EN_BADGE_ACTIVE);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(statics::EN_BTN_DELETE).clicked() {
                    requests.push(Request::Delete(key.to_string()));
                }
                if ui.button(statics::EN_BTN_CLONE).clicked() {
                    requests.push(Request::Clone(key.to_string()));
                }
            });
        });
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(rename_to)
                    .hint_text(key)
                    .desired_width(200.0),
            );
            let target = rename_to.trim();
            if ui
                .add_enabled(
                    !target.is_empty() && target != key,
                    egui::Button::new(statics::EN_BTN_RENAME),
                )
                .clicked()
            {
                requests.push(Request::Action(EditorAction::Rename {
                    from: key.to_string(),
                    to: target.to_string(),
                }));
            }
        });
        ui.separator();

        ui.columns(2, |cols| {
            egui::ScrollArea::vertical()
                .id_salt("form_scroll")
                .auto_shrink([false, false])
                .show(&mut cols[0], |ui| {
                    ui.strong(statics::EN_LABEL_CONFIGURATION);
                    ui.horizontal(|ui| {
                        for kind in SubKind::ALL {
                            let mut active = record.is_active(kind);
                            if ui.checkbox(&mut active, kind.as_str()).changed() {
                                requests.push(Request::Action(EditorAction::SetSlotActive {
                                    key: key.to_string(),
                                    kind,
                                    active,
                                }));
                            }
                        }
                    });
                    ui.separator();
                    for kind in record.active_kinds() {
                        Self::render_slot_editor(ui, key, record, kind, requests);
                    }
                });

            cols[1].strong(statics::EN_HEADING_SNIPPET);
            let snippet = codec::record_snippet(record);
            egui::ScrollArea::vertical()
                .id_salt("snippet_scroll")
                .auto_shrink([false, false])
                .show(&mut cols[1], |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut snippet.as_str())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY),
                    );
                });
        });
    }

    fn render_templates(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.editor.as_ref() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.label(statics::EN_LOADING);
            });
            return;
        };

        let keys = editor.filtered_keys();
        let structured = editor.structured_editing_available();
        let mut requests = Vec::new();

        egui::SidePanel::left("elements_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_ELEMENTS);
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label(statics::EN_LABEL_SEARCH);
                    let mut term = editor.search_term().to_string();
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut term)
                            .hint_text(statics::EN_HINT_SEARCH)
                            .desired_width(160.0),
                    );
                    if resp.changed() {
                        requests.push(Request::Action(EditorAction::Search(term)));
                    }
                    if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                        requests.push(Request::Action(EditorAction::Search(String::new())));
                    }
                });
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.new_key)
                            .hint_text(statics::EN_HINT_NEW_KEY)
                            .desired_width(180.0),
                    );
                    let key = self.new_key.trim();
                    if ui
                        .add_enabled(
                            structured && !key.is_empty(),
                            egui::Button::new(statics::EN_BTN_ADD),
                        )
                        .clicked()
                    {
                        requests.push(Request::Action(EditorAction::Create {
                            key: key.to_string(),
                            slot: None,
                        }));
                    }
                });
                ui.separator();

                let row_h = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
                ui.push_id("elements_scroll", |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for key in &keys {
                                let selected = editor.selected_key() == Some(key.as_str());
                                let inactive = editor
                                    .document()
                                    .get(key)
                                    .is_some_and(TemplateRecord::is_inactive);
                                if Self::element_row(ui, selected, key, inactive, row_h).clicked() {
                                    requests.push(Request::Action(EditorAction::Select(Some(
                                        key.clone(),
                                    ))));
                                }
                            }
                        });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(statics::EN_HEADING_TEMPLATES);
                ui.separator();
                let mut mode = editor.mode();
                ui.selectable_value(&mut mode, EditorMode::Form, statics::EN_MODE_FORM);
                ui.selectable_value(&mut mode, EditorMode::Raw, statics::EN_MODE_RAW);
                if mode != editor.mode() {
                    requests.push(Request::Action(EditorAction::SetMode(mode)));
                }
            });
            if let Some(err) = editor.parse_error() {
                ui.colored_label(
                    egui::Color32::RED,
                    format!("{}: {err}", statics::EN_BADGE_UNPARSABLE),
                );
            }
            ui.separator();

            match editor.mode() {
                EditorMode::Raw => {
                    let mut text = editor.raw_text().to_string();
                    egui::ScrollArea::vertical()
                        .id_salt("raw_scroll")
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            let resp = ui.add(
                                egui::TextEdit::multiline(&mut text)
                                    .font(egui::TextStyle::Monospace)
                                    .code_editor()
                                    .desired_rows(30)
                                    .desired_width(f32::INFINITY),
                            );
                            if resp.changed() {
                                requests.push(Request::Action(EditorAction::ReplaceText(
                                    text.clone(),
                                )));
                            }
                        });
                }
                EditorMode::Form => {
                    Self::render_form(ui, editor, &mut self.rename_to, &mut requests);
                }
            }
        });

        for request in requests {
            match request {
                Request::Action(action) => {
                    let clears_new_key = matches!(action, EditorAction::Create { .. });
                    let clears_rename = matches!(
                        action,
                        EditorAction::Rename { .. } | EditorAction::Select(_)
                    );
                    if self.apply(action) {
                        if clears_new_key {
                            self.new_key.clear();
                        }
                        if clears_rename {
                            self.rename_to.clear();
                        }
                    }
                }
                Request::Clone(key) => self.request_clone(key),
                Request::Delete(key) => self.confirm = Some(PendingConfirm::Delete(key)),
            }
        }
    }

    fn render_dashboard(&mut self, ctx: &egui::Context) {
        let mut refresh = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(statics::EN_HEADING_OVERVIEW);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    refresh = ui
                        .add_enabled(
                            !self.stats_pending,
                            egui::Button::new(statics::EN_BTN_REFRESH),
                        )
                        .clicked();
                });
            });
            ui.separator();

            let Some(report) = &self.stats else {
                ui.label(statics::EN_LOADING);
                return;
            };

            egui::Grid::new("stats_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (label, count) in stat_rows(&report.stats) {
                        ui.label(label);
                        ui.strong(count.to_string());
                        ui.end_row();
                    }
                });

            ui.add_space(12.0);
            ui.heading(statics::EN_HEADING_HEALTH);
            ui.separator();
            if report.warnings.is_empty() {
                ui.colored_label(egui::Color32::GREEN, statics::EN_HEALTH_OK);
                return;
            }

            let row_h = ui.text_style_height(&egui::TextStyle::Body) + 6.0;
            ui.push_id("warnings_table", |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::initial(40.0).resizable(false))
                    .column(Column::remainder())
                    .body(|#[allow(unused_mut)] mut body| {
                        body.rows(
                            row_h,
                            report.warnings.len(),
                            |#[allow(unused_mut)] mut row| {
                                let i = row.index();
                                row.col(|ui| {
                                    ui.label(format!("{}", i + 1));
                                });
                                row.col(|ui| {
                                    ui.colored_label(
                                        egui::Color32::YELLOW,
                                        report.warnings[i].as_str(),
                                    );
                                });
                            },
                        );
                    });
            });
        });

        if refresh {
            self.start_stats(ctx);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let mut view = self.view;
        let (mut undo, mut redo, mut import, mut export, mut reload, mut deploy) =
            (false, false, false, false, false, false);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong(statics::EN_APP_TITLE);
                ui.separator();
                ui.selectable_value(&mut view, View::Dashboard, statics::EN_NAV_DASHBOARD);
                ui.selectable_value(&mut view, View::Templates, statics::EN_NAV_TEMPLATES);

                let editor = self.editor.as_ref();
                let has_editor = editor.is_some();
                let saving = editor.is_some_and(TemplateEditor::is_saving);
                let can_deploy =
                    editor.is_some_and(|e| !e.is_saving() && e.structured_editing_available());

                ui.separator();
                undo = ui
                    .add_enabled(
                        editor.is_some_and(TemplateEditor::can_undo),
                        egui::Button::new(statics::EN_BTN_UNDO),
                    )
                    .clicked();
                redo = ui
                    .add_enabled(
                        editor.is_some_and(TemplateEditor::can_redo),
                        egui::Button::new(statics::EN_BTN_REDO),
                    )
                    .clicked();

                ui.separator();
                import = ui
                    .add_enabled(has_editor, egui::Button::new(statics::EN_BTN_IMPORT))
                    .clicked();
                export = ui
                    .add_enabled(has_editor, egui::Button::new(statics::EN_BTN_EXPORT))
                    .clicked();

                ui.separator();
                reload = ui
                    .add_enabled(
                        !self.loading && !saving,
                        egui::Button::new(statics::EN_BTN_RELOAD),
                    )
                    .clicked();
                let deploy_label = if saving {
                    statics::EN_BTN_DEPLOYING
                } else {
                    statics::EN_BTN_DEPLOY
                };
                deploy = ui
                    .add_enabled(can_deploy, egui::Button::new(deploy_label))
                    .clicked();

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.connected {
                        Some(true) => {
                            ui.colored_label(egui::Color32::GREEN, statics::EN_BADGE_CONNECTED)
                        }
                        Some(false) => {
                            ui.colored_label(egui::Color32::RED, statics::EN_BADGE_DISCONNECTED)
                        }
                        None => ui.label(statics::EN_LOADING),
                    };
                });
            });
        });

        self.view = view;
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
        if import {
            self.import_file();
        }
        if export {
            self.export_file();
        }
        if reload {
            self.request_reload(ctx);
        }
        if deploy {
            self.start_save(ctx);
        }
    }

    fn render_confirm(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.confirm.clone() else {
            return;
        };

        let mut decision = None;
        egui::Window::new(statics::EN_WINDOW_CONFIRM)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(confirm.message());
                ui.horizontal(|ui| {
                    if ui.button(statics::EN_BTN_CONFIRM).clicked() {
                        decision = Some(true);
                    }
                    if ui.button(statics::EN_BTN_CANCEL).clicked() {
                        decision = Some(false);
                    }
                });
            });

        let Some(accepted) = decision else {
            return;
        };
        self.confirm = None;
        if !accepted {
            return;
        }
        match confirm {
            PendingConfirm::Delete(key) => {
                self.apply(EditorAction::Delete { key });
            }
            PendingConfirm::OverwriteClone(key) => {
                self.apply(EditorAction::Clone { key });
            }
            PendingConfirm::DiscardReload => self.start_load(ctx),
        }
    }
}

/// Dashboard rows, in display order.
fn stat_rows(stats: &TemplateStats) -> [(&'static str, usize); 4] {
    [
        (statics::EN_STAT_TOTAL, stats.total),
        (statics::EN_STAT_ANALOG, stats.analog),
        (statics::EN_STAT_DISCRETE, stats.discrete),
        (statics::EN_STAT_BREAKER, stats.breaker),
    ]
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs(ctx);

        let refresh = self.config.stats_refresh();
        if self
            .last_stats_request
            .is_none_or(|at| at.elapsed() >= refresh)
        {
            self.start_stats(ctx);
        }
        ctx.request_repaint_after(refresh);

        // Consumed up front so the text editors don't run their own undo on top of ours.
        let mut do_undo = false;
        let mut do_redo = false;
        ctx.input_mut(|i| {
            let ctrl_shift = egui::Modifiers {
                shift: true,
                ..egui::Modifiers::CTRL
            };
            if i.consume_key(ctrl_shift, egui::Key::Z) {
                do_redo = true;
            }
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::Y) {
                do_redo = true;
            }
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::Z) {
                do_undo = true;
            }
        });
        if do_undo {
            self.undo();
        }
        if do_redo {
            self.redo();
        }

        self.render_top_bar(ctx);

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, err);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.last_error = None;
                        }
                    });
                });
            });
        }

        self.render_confirm(ctx);

        egui::TopBottomPanel::bottom("bottom_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.backend.describe());
                if let Some(editor) = &self.editor {
                    ui.separator();
                    ui.label(format!("templates: {}", editor.document().len()));
                    if editor.is_dirty() {
                        ui.separator();
                        ui.colored_label(egui::Color32::YELLOW, statics::EN_BADGE_DIRTY);
                    }
                }
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        match self.view {
            View::Dashboard => self.render_dashboard(ctx),
            View::Templates => self.render_templates(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PendingConfirm, stat_rows};
    use crate::stats::TemplateStats;

    #[test]
    fn stat_rows_follow_dashboard_order() {
        let stats = TemplateStats {
            total: 4,
            analog: 1,
            discrete: 2,
            breaker: 3,
        };
        let counts: Vec<usize> = stat_rows(&stats).iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, vec![4, 1, 2, 3]);
    }

    #[test]
    fn overwrite_prompt_names_the_clone() {
        let message = PendingConfirm::OverwriteClone("PT_KV".to_string()).message();
        assert!(message.ends_with("(PT_KV_COPY)"));
        let message = PendingConfirm::Delete("BRK".to_string()).message();
        assert!(message.contains("BRK"));
    }
}
