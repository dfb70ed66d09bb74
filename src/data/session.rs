/// Session state — all application data outside the widgets
///
/// The GUI layer owns exactly one `SessionState` and drives it through the
/// operations below; none of them touch egui, so the whole load → select →
/// click → export flow is exercised by plain unit tests.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::grid::{Channel, ParseError, ScanGrid};
use crate::data::normalize::{ChannelGrid, GrayGrid};
use crate::data::selection::{pointer_to_cell, SelectionRect};
use crate::log::click_log::{ClickLog, ClickRecord};

/// Why a scan file could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub struct SessionState {
    source_path: Option<PathBuf>,
    grid: Option<ScanGrid>,
    channel: Channel,
    raw: Option<ChannelGrid>,
    normalized: Option<GrayGrid>,
    selection: Option<SelectionRect>,
    subgrid: Option<GrayGrid>,
    clicks: ClickLog,
    /// Bumped whenever the full image changes (load, channel toggle) so the
    /// view knows to rebuild its texture.
    image_revision: u64,
    /// Same, for the sub-region view.
    selection_revision: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            source_path: None,
            grid: None,
            channel: Channel::default(),
            raw: None,
            normalized: None,
            selection: None,
            subgrid: None,
            clicks: ClickLog::new(),
            image_revision: 0,
            selection_revision: 0,
        }
    }

    /// Load a scan CSV from disk. On failure the previous grid, selection
    /// and click log are left exactly as they were.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let text = std::fs::read_to_string(path)?;
        self.load_text(&text, path)?;
        Ok(())
    }

    /// Install a new grid parsed from `text`. Replaces the previous grid
    /// entirely and discards the selection, which belonged to the old grid.
    pub fn load_text(&mut self, text: &str, path: &Path) -> Result<(), ParseError> {
        let grid = ScanGrid::parse(text)?;
        log::info!(
            "Loaded {}: {} rows x {} cols",
            path.display(),
            grid.rows(),
            grid.cols()
        );
        let raw = grid.channel_grid(self.channel);
        self.normalized = Some(raw.normalized());
        self.raw = Some(raw);
        self.grid = Some(grid);
        self.source_path = Some(path.to_path_buf());
        self.clicks.set_source(&path.display().to_string());
        self.selection = None;
        self.subgrid = None;
        self.image_revision += 1;
        self.selection_revision += 1;
        Ok(())
    }

    /// Switch the displayed channel, re-deriving the raw and normalized
    /// grids immediately. The selection rectangle stays valid (the grid
    /// shape is unchanged); its sub-view is recomputed to match.
    pub fn set_channel(&mut self, channel: Channel) {
        if channel == self.channel {
            return;
        }
        self.channel = channel;
        if let Some(grid) = &self.grid {
            let raw = grid.channel_grid(channel);
            self.normalized = Some(raw.normalized());
            self.raw = Some(raw);
            self.image_revision += 1;
            if let Some(rect) = self.selection {
                self.subgrid = self.normalized.as_ref().map(|n| n.region(&rect));
                self.selection_revision += 1;
            }
        }
    }

    /// Commit a completed drag gesture's rectangle.
    pub fn set_selection(&mut self, rect: SelectionRect) {
        let Some(normalized) = &self.normalized else {
            return;
        };
        self.subgrid = Some(normalized.region(&rect));
        self.selection = Some(rect);
        self.selection_revision += 1;
    }

    /// Raw channel value under a pointer position in the main view, for the
    /// coordinate readout. Out-of-bounds positions yield `None`.
    pub fn hover_value(&self, pos: (f32, f32)) -> Option<((usize, usize), f64)> {
        let raw = self.raw.as_ref()?;
        let (cx, cy) = pointer_to_cell(pos, raw.cols(), raw.rows())?;
        Some(((cx, cy), raw.value(cx, cy)))
    }

    /// Record a click inside the sub-region view. The pointer is mapped to a
    /// sub-region-local cell, translated to absolute grid coordinates, and
    /// the value is taken from the raw channel grid — never the normalized
    /// display data. No active selection, or a click past the sub-region's
    /// edge, records nothing.
    pub fn record_click(&mut self, pos: (f32, f32)) -> Option<&ClickRecord> {
        let rect = self.selection?;
        let raw = self.raw.as_ref()?;
        let (lx, ly) = pointer_to_cell(pos, rect.width(), rect.height())?;
        let (ox, oy) = rect.origin();
        let (ax, ay) = (ox + lx, oy + ly);
        let value = raw.value(ax, ay);
        Some(self.clicks.add_entry(ax, ay, value))
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn has_grid(&self) -> bool {
        self.grid.is_some()
    }

    pub fn normalized(&self) -> Option<&GrayGrid> {
        self.normalized.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectionRect> {
        self.selection.as_ref()
    }

    pub fn subgrid(&self) -> Option<&GrayGrid> {
        self.subgrid.as_ref()
    }

    pub fn clicks(&self) -> &ClickLog {
        &self.clicks
    }

    pub fn image_revision(&self) -> u64 {
        self.image_revision
    }

    pub fn selection_revision(&self) -> u64 {
        self.selection_revision
    }

    /// Shutdown export: write the click log next to the working directory if
    /// there is anything to write. Returns the written path, `None` when no
    /// file was loaded or no clicks were recorded.
    pub fn export_clicks_on_exit(&self) -> std::io::Result<Option<PathBuf>> {
        if self.clicks.is_empty() {
            return Ok(None);
        }
        let Some(source) = &self.source_path else {
            return Ok(None);
        };
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scan".to_string());
        let path = self.clicks.export_csv_auto(&stem)?;
        Ok(Some(path))
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "(0,0),(10,10)\n(20,20),(30,30)";

    fn loaded_session() -> SessionState {
        let mut s = SessionState::new();
        s.load_text(SAMPLE, Path::new("sample.csv")).unwrap();
        s
    }

    #[test]
    fn test_load_installs_grid_and_normalization() {
        let s = loaded_session();
        assert!(s.has_grid());
        let norm = s.normalized().unwrap();
        assert_eq!(norm.pixels(), &[0, 85, 170, 255]);
    }

    #[test]
    fn test_failed_load_keeps_previous_grid() {
        let mut s = loaded_session();
        let rev = s.image_revision();
        assert!(s.load_text("(1,2),(3", Path::new("bad.csv")).is_err());
        assert_eq!(s.normalized().unwrap().pixels(), &[0, 85, 170, 255]);
        assert_eq!(s.source_path(), Some(Path::new("sample.csv")));
        assert_eq!(s.image_revision(), rev);
    }

    #[test]
    fn test_channel_toggle_recomputes() {
        let mut s = SessionState::new();
        s.load_text("(0,5),(10,5)\n(20,5),(30,5)", Path::new("t.csv"))
            .unwrap();
        let rev = s.image_revision();
        s.set_channel(Channel::Magnitude);
        // Magnitude channel is constant, so the zero-fallback applies.
        assert_eq!(s.normalized().unwrap().pixels(), &[0, 0, 0, 0]);
        assert_eq!(s.image_revision(), rev + 1);
        // Toggling to the already-selected channel is a no-op.
        s.set_channel(Channel::Magnitude);
        assert_eq!(s.image_revision(), rev + 1);
    }

    #[test]
    fn test_hover_readout() {
        let s = loaded_session();
        assert_eq!(s.hover_value((15.0, 15.0)), Some(((1, 1), 30.0)));
        assert_eq!(s.hover_value((25.0, 5.0)), None);
    }

    #[test]
    fn test_click_records_raw_value() {
        let mut s = loaded_session();
        let rect = SelectionRect::from_cells((0, 0), (1, 1)).unwrap();
        s.set_selection(rect);
        // Pointer (15, 15) in the sub-view is local cell (1, 1), absolute
        // (1, 1) — raw phase value 30, not the normalized 255.
        let rec = s.record_click((15.0, 15.0)).unwrap();
        assert_eq!((rec.x, rec.y, rec.value), (1, 1, 30.0));
        assert_eq!(s.clicks().len(), 1);
    }

    #[test]
    fn test_click_without_selection_is_noop() {
        let mut s = loaded_session();
        assert!(s.record_click((5.0, 5.0)).is_none());
        assert_eq!(s.clicks().len(), 0);
    }

    #[test]
    fn test_click_outside_subregion_is_noop() {
        let mut s = SessionState::new();
        s.load_text("(1,0),(2,0),(3,0)\n(4,0),(5,0),(6,0)\n(7,0),(8,0),(9,0)", Path::new("t.csv"))
            .unwrap();
        s.set_selection(SelectionRect::from_cells((0, 0), (1, 1)).unwrap());
        // Sub-view is 2x2 cells = 20x20 pixels; (25, 5) is past its edge.
        assert!(s.record_click((25.0, 5.0)).is_none());
        assert_eq!(s.clicks().len(), 0);
    }

    #[test]
    fn test_selection_offset_applied_to_clicks() {
        let mut s = SessionState::new();
        s.load_text("(1,0),(2,0),(3,0)\n(4,0),(5,0),(6,0)\n(7,0),(8,0),(9,0)", Path::new("t.csv"))
            .unwrap();
        s.set_selection(SelectionRect::from_cells((1, 1), (2, 2)).unwrap());
        let rec = s.record_click((5.0, 15.0)).unwrap();
        // Local (0, 1) plus origin (1, 1) -> absolute (1, 2), value 8.
        assert_eq!((rec.x, rec.y, rec.value), (1, 2, 8.0));
    }

    #[test]
    fn test_load_clears_selection() {
        let mut s = loaded_session();
        s.set_selection(SelectionRect::from_cells((0, 0), (1, 1)).unwrap());
        s.load_text(SAMPLE, Path::new("again.csv")).unwrap();
        assert!(s.selection().is_none());
        assert!(s.subgrid().is_none());
    }

    #[test]
    fn test_exit_export_skips_empty_log() {
        let s = loaded_session();
        assert_eq!(s.export_clicks_on_exit().unwrap(), None);
    }
}
