/// Main application state and eframe::App implementation
///
/// Ties together the session state, the GUI widgets and the click log.
/// All data mutation happens here, driven by the action enums the widget
/// modules return.

use std::path::PathBuf;

use eframe::egui;

use crate::data::session::SessionState;
use crate::gui::grid_view::{self, GridViewAction, GridViewState};
use crate::gui::log_panel;
use crate::gui::selection_view::{self, SelectionViewAction, SelectionViewState};
use crate::gui::toolbar::{self, ToolbarAction};

/// The main application
pub struct ScanApp {
    /// All non-widget state: grid, channel, selection, click log
    session: SessionState,

    /// GUI sub-states
    grid_view_state: GridViewState,
    selection_view_state: SelectionViewState,

    /// Status messages
    status_message: String,
    show_about: bool,

    /// Dropped files buffer
    dropped_files: Vec<PathBuf>,
}

impl ScanApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // More breathing room in panels
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        cc.egui_ctx.set_style(style);

        Self {
            session: SessionState::new(),
            grid_view_state: GridViewState::default(),
            selection_view_state: SelectionViewState::default(),
            status_message: "Ready — open a scan CSV to begin".to_string(),
            show_about: false,
            dropped_files: Vec::new(),
        }
    }

    fn load_path(&mut self, path: PathBuf) {
        match self.session.load_file(&path) {
            Ok(()) => {
                self.status_message = format!("Loaded: {}", path.display());
            }
            Err(e) => {
                self.status_message = format!("Error loading {}: {}", path.display(), e);
                log::error!("Load error: {}", e);
            }
        }
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::None => {}
            ToolbarAction::OpenFile => {
                if let Some(path) = toolbar::open_csv_dialog() {
                    self.load_path(path);
                }
            }
            ToolbarAction::ExportClicksCsv => {
                if self.session.clicks().is_empty() {
                    self.status_message = "No clicks recorded yet".to_string();
                } else if let Some(path) = toolbar::save_csv_dialog() {
                    match self.session.clicks().save_csv(&path) {
                        Ok(()) => {
                            self.status_message = format!("Click log saved: {}", path.display());
                        }
                        Err(e) => {
                            self.status_message = format!("Export failed: {}", e);
                            log::warn!("Click log export failed: {}", e);
                        }
                    }
                }
            }
            ToolbarAction::ExportClicksJson => {
                if self.session.clicks().is_empty() {
                    self.status_message = "No clicks recorded yet".to_string();
                } else if let Some(path) = toolbar::save_json_dialog() {
                    match self.session.clicks().save_json(&path) {
                        Ok(()) => {
                            self.status_message = format!("Click log saved: {}", path.display());
                        }
                        Err(e) => {
                            self.status_message = format!("Export failed: {}", e);
                            log::warn!("Click log export failed: {}", e);
                        }
                    }
                }
            }
            ToolbarAction::ShowAbout => self.show_about = true,
        }
    }
}

impl eframe::App for ScanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                for file in &i.raw.dropped_files {
                    if let Some(path) = &file.path {
                        self.dropped_files.push(path.clone());
                    }
                }
            }
        });

        // Process dropped files
        if let Some(path) = self.dropped_files.pop() {
            self.load_path(path);
        }

        // ── Toolbar ──
        let toolbar_action = toolbar::show_toolbar(ctx);
        self.handle_toolbar_action(toolbar_action);

        // ── Status Bar ──
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status_message).size(11.5));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.session.has_grid() {
                        ui.label(
                            egui::RichText::new(format!("Channel: {}", self.session.channel()))
                                .size(11.5),
                        );
                    }
                });
            });
        });

        // ── Selection sub-view + click log ──
        let inspect_action = egui::TopBottomPanel::bottom("inspect_panel")
            .resizable(true)
            .default_height(280.0)
            .show(ctx, |ui| {
                let mut action = SelectionViewAction::None;
                ui.columns(2, |columns| {
                    action = selection_view::show_selection_view(
                        &mut columns[0],
                        &self.session,
                        &mut self.selection_view_state,
                    );
                    log_panel::show_log_panel(&mut columns[1], self.session.clicks());
                });
                action
            })
            .inner;
        if let SelectionViewAction::Clicked(pos) = inspect_action {
            if let Some(rec) = self.session.record_click(pos) {
                self.status_message =
                    format!("Logged X: {}, Y: {}, Value: {}", rec.x, rec.y, rec.value);
            }
        }

        // ── Main scan view ──
        let grid_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                grid_view::show_grid_view(ui, &self.session, &mut self.grid_view_state)
            })
            .inner;
        match grid_action {
            GridViewAction::None => {}
            GridViewAction::ChannelSelected(channel) => {
                self.session.set_channel(channel);
                self.status_message = format!("Channel: {}", channel);
            }
            GridViewAction::SelectionMade(rect) => {
                self.session.set_selection(rect);
                self.status_message = format!(
                    "Selected ({}, {})-({}, {}) — {}x{} cells",
                    rect.x1(),
                    rect.y1(),
                    rect.x2(),
                    rect.y2(),
                    rect.width(),
                    rect.height()
                );
            }
        }

        // ── About Dialog ──
        if self.show_about {
            egui::Window::new("About")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("🔬 Scan Analyser");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(10.0);
                    ui.label("Built with Rust + egui");
                    ui.add_space(10.0);
                    ui.label("Features:");
                    ui.label("• Phase / Magnitude channel display");
                    ui.label("• Drag-select with local contrast stretch");
                    ui.label("• Per-pixel click logging against raw values");
                    ui.label("• CSV / JSON click-log export");
                });
        }

        // Handle keyboard shortcuts
        ctx.input(|i| {
            if (i.modifiers.ctrl || i.modifiers.command) && i.key_pressed(egui::Key::O) {
                if let Some(path) = toolbar::open_csv_dialog() {
                    self.dropped_files.push(path);
                }
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        match self.session.export_clicks_on_exit() {
            Ok(Some(path)) => log::info!("Click log written: {}", path.display()),
            Ok(None) => log::info!("Nothing to export on exit"),
            Err(e) => log::warn!(
                "Click log export failed: {} ({} records lost)",
                e,
                self.session.clicks().len()
            ),
        }
    }
}
