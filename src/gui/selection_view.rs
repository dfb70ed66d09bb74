/// Selection sub-view — the re-normalized crop, magnified, click-to-log

use crate::data::selection::CELL_SIZE;
use crate::data::session::SessionState;

/// State for the selection sub-view
#[derive(Default)]
pub struct SelectionViewState {
    texture: Option<egui::TextureHandle>,
    texture_revision: Option<u64>,
}

/// Events the sub-view reports back to the app
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionViewAction {
    None,
    /// Left click at a view-local pointer position
    Clicked((f32, f32)),
}

/// Show the selected sub-region. Returns a click action for the app to
/// translate into a logged record.
pub fn show_selection_view(
    ui: &mut egui::Ui,
    session: &SessionState,
    state: &mut SelectionViewState,
) -> SelectionViewAction {
    let mut action = SelectionViewAction::None;

    let Some(sub) = session.subgrid() else {
        ui.centered_and_justified(|ui| {
            ui.label("Drag a rectangle on the scan to inspect a region");
        });
        return action;
    };

    if state.texture_revision != Some(session.selection_revision()) {
        let img = egui::ColorImage::from_gray([sub.cols(), sub.rows()], sub.pixels());
        state.texture = Some(ui.ctx().load_texture(
            "selection_image",
            img,
            egui::TextureOptions::NEAREST,
        ));
        state.texture_revision = Some(session.selection_revision());
    }
    let Some(texture) = state.texture.clone() else {
        return action;
    };

    let image_size = egui::vec2(
        (sub.cols() * CELL_SIZE) as f32,
        (sub.rows() * CELL_SIZE) as f32,
    );

    egui::ScrollArea::both()
        .id_salt("selection_scroll")
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(image_size, egui::Sense::click());
            let canvas = response.rect;

            painter.image(
                texture.id(),
                canvas,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    action =
                        SelectionViewAction::Clicked((pos.x - canvas.left(), pos.y - canvas.top()));
                }
            }
        });

    action
}
