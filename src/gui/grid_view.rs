/// Main scan view — magnified grayscale image with drag-to-select
///
/// The normalized grid is uploaded once per revision as a NEAREST-filtered
/// texture and drawn at CELL_SIZE× magnification, so one texel covers one
/// cell block and the floor-division pointer mapping lines up exactly.

use crate::data::grid::Channel;
use crate::data::selection::{DragState, SelectionRect, CELL_SIZE};
use crate::data::session::SessionState;

/// State for the main grid view
#[derive(Default)]
pub struct GridViewState {
    texture: Option<egui::TextureHandle>,
    texture_revision: Option<u64>,
    drag: DragState,
    /// Last coordinate/value readout; kept when the pointer leaves the image
    readout: String,
}

/// Events the view reports back to the app
#[derive(Debug, Clone, PartialEq)]
pub enum GridViewAction {
    None,
    ChannelSelected(Channel),
    SelectionMade(SelectionRect),
}

/// Show the scan image with channel selector, selection overlay and
/// coordinate readout. Returns any action for the app to apply.
pub fn show_grid_view(
    ui: &mut egui::Ui,
    session: &SessionState,
    state: &mut GridViewState,
) -> GridViewAction {
    let mut action = GridViewAction::None;

    // Channel selector (mutually exclusive, Phase default)
    ui.horizontal(|ui| {
        let mut channel = session.channel();
        let mut changed = false;
        changed |= ui
            .radio_value(&mut channel, Channel::Phase, "Phase")
            .clicked();
        changed |= ui
            .radio_value(&mut channel, Channel::Magnitude, "Magnitude")
            .clicked();
        if changed && channel != session.channel() {
            action = GridViewAction::ChannelSelected(channel);
        }
        if let Some(path) = session.source_path() {
            ui.separator();
            ui.label(path.display().to_string());
        }
    });

    let Some(gray) = session.normalized() else {
        ui.centered_and_justified(|ui| {
            ui.heading("No scan loaded — open a CSV file to begin");
        });
        return action;
    };

    // Re-upload the texture when the underlying image changed
    if state.texture_revision != Some(session.image_revision()) {
        let img = egui::ColorImage::from_gray([gray.cols(), gray.rows()], gray.pixels());
        state.texture = Some(ui.ctx().load_texture(
            "scan_image",
            img,
            egui::TextureOptions::NEAREST,
        ));
        state.texture_revision = Some(session.image_revision());
    }
    let Some(texture) = state.texture.clone() else {
        return action;
    };

    let (cols, rows) = (gray.cols(), gray.rows());
    let image_size = egui::vec2((cols * CELL_SIZE) as f32, (rows * CELL_SIZE) as f32);

    egui::ScrollArea::both()
        .id_salt("grid_scroll")
        .max_height(ui.available_height() - 24.0)
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(image_size, egui::Sense::click_and_drag());
            let canvas = response.rect;

            painter.image(
                texture.id(),
                canvas,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            let to_local = |pos: egui::Pos2| (pos.x - canvas.left(), pos.y - canvas.top());

            // Drag gesture -> selection state machine
            if let Some(pos) = response.interact_pointer_pos() {
                let local = to_local(pos);
                if response.drag_started() {
                    state.drag.press(local);
                } else if response.dragged() {
                    state.drag.motion(local);
                }
                if response.drag_stopped() {
                    if let Some(rect) = state.drag.release(local, cols, rows) {
                        action = GridViewAction::SelectionMade(rect);
                    }
                }
            } else if response.drag_stopped() {
                // Pointer position unavailable at release; fall back to the
                // last motion position tracked by the gesture itself.
                if let Some((_, current)) = state.drag.pointer_rect() {
                    if let Some(rect) = state.drag.release(current, cols, rows) {
                        action = GridViewAction::SelectionMade(rect);
                    }
                }
            }

            let sel_stroke = egui::Stroke::new(2.0, egui::Color32::RED);

            // Live drag rectangle
            if let Some(((x1, y1), (x2, y2))) = state.drag.pointer_rect() {
                let live = egui::Rect::from_two_pos(
                    canvas.min + egui::vec2(x1, y1),
                    canvas.min + egui::vec2(x2, y2),
                );
                painter.rect_stroke(live, 0.0, sel_stroke, egui::epaint::StrokeKind::Outside);
            } else if let Some(rect) = session.selection() {
                // Committed selection, snapped to cell boundaries
                let committed = egui::Rect::from_min_max(
                    canvas.min
                        + egui::vec2(
                            (rect.x1() * CELL_SIZE) as f32,
                            (rect.y1() * CELL_SIZE) as f32,
                        ),
                    canvas.min
                        + egui::vec2(
                            ((rect.x2() + 1) * CELL_SIZE) as f32,
                            ((rect.y2() + 1) * CELL_SIZE) as f32,
                        ),
                );
                painter.rect_stroke(committed, 0.0, sel_stroke, egui::epaint::StrokeKind::Outside);
            }

            // Coordinate/value readout follows the pointer
            if let Some(pos) = response.hover_pos() {
                if let Some(((cx, cy), value)) = session.hover_value(to_local(pos)) {
                    state.readout = format!("Coordinates: ({}, {}), Value: {}", cx, cy, value);
                }
            }
        });

    if state.readout.is_empty() {
        ui.label("Coordinates: (x, y), Value: value");
    } else {
        ui.label(&state.readout);
    }

    action
}
