/// Pointer-to-cell mapping and rectangle selection
///
/// The scan is displayed magnified by a fixed factor, so a pointer pixel in
/// view-local coordinates maps to a grid cell by floor division. Selection is
/// an explicit two-state machine driven by press/motion/release rather than
/// logic buried in event callbacks, which keeps it testable without a UI.

/// Display magnification: one grid cell covers CELL_SIZE × CELL_SIZE pixels.
pub const CELL_SIZE: usize = 10;

/// Map a view-local pointer position to a grid cell, or `None` when the
/// pointer is outside the `cols` × `rows` image.
pub fn pointer_to_cell(pos: (f32, f32), cols: usize, rows: usize) -> Option<(usize, usize)> {
    let (px, py) = pos;
    if px < 0.0 || py < 0.0 {
        return None;
    }
    let cx = (px / CELL_SIZE as f32) as usize;
    let cy = (py / CELL_SIZE as f32) as usize;
    if cx < cols && cy < rows {
        Some((cx, cy))
    } else {
        None
    }
}

/// Map a pointer position to the nearest in-bounds cell. Used for drag
/// endpoints, which may leave the image mid-gesture.
fn clamp_to_cell(pos: (f32, f32), cols: usize, rows: usize) -> (usize, usize) {
    let cx = (pos.0.max(0.0) / CELL_SIZE as f32) as usize;
    let cy = (pos.1.max(0.0) / CELL_SIZE as f32) as usize;
    (cx.min(cols - 1), cy.min(rows - 1))
}

/// An inclusive, ordered, non-degenerate cell rectangle.
/// Invariant: `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    x1: usize,
    y1: usize,
    x2: usize,
    y2: usize,
}

impl SelectionRect {
    /// Build from two corner cells in any order. A rectangle that collapses
    /// to zero width or height is no selection at all.
    pub fn from_cells(a: (usize, usize), b: (usize, usize)) -> Option<Self> {
        let (x1, x2) = (a.0.min(b.0), a.0.max(b.0));
        let (y1, y2) = (a.1.min(b.1), a.1.max(b.1));
        if x1 == x2 || y1 == y2 {
            return None;
        }
        Some(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> usize {
        self.x1
    }

    pub fn y1(&self) -> usize {
        self.y1
    }

    pub fn x2(&self) -> usize {
        self.x2
    }

    pub fn y2(&self) -> usize {
        self.y2
    }

    /// Top-left corner: the offset added to sub-region-local cells to get
    /// absolute grid coordinates.
    pub fn origin(&self) -> (usize, usize) {
        (self.x1, self.y1)
    }

    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> usize {
        self.y2 - self.y1 + 1
    }
}

/// Rectangle-drag gesture state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        origin: (f32, f32),
        current: (f32, f32),
    },
}

impl Default for DragState {
    fn default() -> Self {
        DragState::Idle
    }
}

impl DragState {
    /// Pointer pressed: start a fresh gesture, discarding any stale one.
    pub fn press(&mut self, pos: (f32, f32)) {
        *self = DragState::Dragging {
            origin: pos,
            current: pos,
        };
    }

    /// Pointer moved while held.
    pub fn motion(&mut self, pos: (f32, f32)) {
        if let DragState::Dragging { current, .. } = self {
            *current = pos;
        }
    }

    /// Pointer released: finish the gesture and convert it to a cell
    /// rectangle. Endpoints are clamped into the grid, ordered, and a drag
    /// that collapses to a single cell row or column yields `None`.
    pub fn release(&mut self, pos: (f32, f32), cols: usize, rows: usize) -> Option<SelectionRect> {
        let DragState::Dragging { origin, .. } = *self else {
            return None;
        };
        *self = DragState::Idle;
        let a = clamp_to_cell(origin, cols, rows);
        let b = clamp_to_cell(pos, cols, rows);
        SelectionRect::from_cells(a, b)
    }

    /// The in-progress pointer rectangle, for painting the live drag.
    pub fn pointer_rect(&self) -> Option<((f32, f32), (f32, f32))> {
        match *self {
            DragState::Dragging { origin, current } => Some((origin, current)),
            DragState::Idle => None,
        }
    }
}
