/// Click-history panel — scrollable mirror of the session's click log

use crate::log::click_log::ClickLog;

pub fn show_log_panel(ui: &mut egui::Ui, log: &ClickLog) {
    ui.horizontal(|ui| {
        ui.heading("Click Log");
        ui.label(format!("({} records)", log.len()));
    });
    ui.separator();

    if log.is_empty() {
        ui.label("Click pixels in the selection view to record them.");
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("click_log_scroll")
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::monospace(12.0));
            for rec in log.entries() {
                ui.label(format!("X: {}, Y: {}, Value: {}", rec.x, rec.y, rec.value));
            }
        });
}
