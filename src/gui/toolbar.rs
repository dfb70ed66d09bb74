/// Toolbar — top menu bar with file operations and export actions

use std::path::PathBuf;

/// Actions that can be triggered from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    OpenFile,
    ExportClicksCsv,
    ExportClicksJson,
    ShowAbout,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(ctx: &egui::Context) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            // File menu
            ui.menu_button("📁 File", |ui| {
                if ui.button("📂 Open CSV…").clicked() {
                    action = ToolbarAction::OpenFile;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("💾 Export Clicks (CSV)…").clicked() {
                    action = ToolbarAction::ExportClicksCsv;
                    ui.close_menu();
                }
                if ui.button("💾 Export Clicks (JSON)…").clicked() {
                    action = ToolbarAction::ExportClicksJson;
                    ui.close_menu();
                }
            });

            // Help menu
            ui.menu_button("❓ Help", |ui| {
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("Scan Analyser")
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Show file-open dialog for scan CSV files
pub fn open_csv_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Scan CSV")
        .add_filter("CSV Files", &["csv"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Show save dialog for click-log CSV export
pub fn save_csv_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Click Log")
        .add_filter("CSV (comma-separated)", &["csv"])
        .save_file()
}

/// Show save dialog for click-log JSON export
pub fn save_json_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Click Log")
        .add_filter("JSON", &["json"])
        .save_file()
}
