/// Min-max normalization for 8-bit grayscale display
///
/// The full image and any selected sub-region share one normalization rule:
/// `trunc((v - min) / (max - min) * 255)`, with a constant grid (max == min)
/// mapping every cell to 0 instead of dividing by zero. The sub-region is
/// re-normalized independently of the full image so a crop spanning a narrow
/// value range still shows contrast.

use crate::data::grid::Channel;
use crate::data::selection::SelectionRect;

/// One scalar channel of the scan as a flat f64 grid, row-major.
/// This is the data clicks are recorded against; display normalization
/// never feeds back into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGrid {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
    channel: Channel,
}

impl ChannelGrid {
    pub(crate) fn new(values: Vec<f64>, rows: usize, cols: usize, channel: Channel) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        Self {
            values,
            rows,
            cols,
            channel,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.cols + x]
    }

    /// Normalize to [0, 255] for grayscale display.
    pub fn normalized(&self) -> GrayGrid {
        GrayGrid {
            pixels: normalize_to_u8(&self.values),
            rows: self.rows,
            cols: self.cols,
        }
    }
}

/// Normalized 8-bit grid ready for texture upload.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayGrid {
    pixels: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl GrayGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.cols + x]
    }

    /// Extract the inclusive sub-matrix covered by `rect` and re-normalize it
    /// to its own [0, 255] range (local contrast stretch).
    ///
    /// `rect` must lie within the grid; selection construction guarantees
    /// that for rectangles produced from this grid's dimensions.
    pub fn region(&self, rect: &SelectionRect) -> GrayGrid {
        let mut values = Vec::with_capacity(rect.width() * rect.height());
        for y in rect.y1()..=rect.y2() {
            for x in rect.x1()..=rect.x2() {
                values.push(f64::from(self.get(x, y)));
            }
        }
        GrayGrid {
            pixels: normalize_to_u8(&values),
            rows: rect.height(),
            cols: rect.width(),
        }
    }
}

/// The shared min-max rule. Constant input maps to all zeros.
fn normalize_to_u8(values: &[f64]) -> Vec<u8> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&v| ((v - min) / (max - min) * 255.0) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::grid::ScanGrid;

    fn gray(values: &[f64], rows: usize, cols: usize) -> GrayGrid {
        ChannelGrid::new(values.to_vec(), rows, cols, Channel::Phase).normalized()
    }

    #[test]
    fn test_normalize_two_by_two() {
        let g = gray(&[0.0, 10.0, 20.0, 30.0], 2, 2);
        assert_eq!(g.pixels(), &[0, 85, 170, 255]);
    }

    #[test]
    fn test_normalize_is_monotonic() {
        let values = [3.0, -1.5, 12.0, 7.25, 0.0, 12.0];
        let g = gray(&values, 2, 3);
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                if a <= b {
                    assert!(g.pixels()[i] <= g.pixels()[j]);
                }
            }
        }
    }

    #[test]
    fn test_normalize_hits_full_range() {
        let g = gray(&[5.0, 2.0, 9.0, 4.0], 2, 2);
        assert_eq!(*g.pixels().iter().min().unwrap(), 0);
        assert_eq!(*g.pixels().iter().max().unwrap(), 255);
    }

    #[test]
    fn test_constant_grid_falls_back_to_zero() {
        let g = gray(&[7.0, 7.0, 7.0, 7.0], 2, 2);
        assert_eq!(g.pixels(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_region_renormalizes_independently() {
        // Full grid spans 0..=90; the 2x2 crop spans 40..=90 and must be
        // stretched back to the full 8-bit range on its own.
        let values = [0.0, 40.0, 50.0, 60.0, 70.0, 80.0, 85.0, 88.0, 90.0];
        let g = gray(&values, 3, 3);
        let rect = SelectionRect::from_cells((1, 1), (2, 2)).unwrap();
        let sub = g.region(&rect);
        assert_eq!(sub.rows(), 2);
        assert_eq!(sub.cols(), 2);
        assert_eq!(*sub.pixels().iter().min().unwrap(), 0);
        assert_eq!(*sub.pixels().iter().max().unwrap(), 255);
    }

    #[test]
    fn test_constant_region_falls_back_to_zero() {
        let values = [1.0, 5.0, 5.0, 2.0, 5.0, 5.0, 3.0, 4.0, 9.0];
        let g = gray(&values, 3, 3);
        let rect = SelectionRect::from_cells((1, 0), (2, 1)).unwrap();
        let sub = g.region(&rect);
        assert_eq!(sub.pixels(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_end_to_end_phase_channel() {
        let grid = ScanGrid::parse("(0,0),(10,10)\n(20,20),(30,30)").unwrap();
        let raw = grid.channel_grid(Channel::Phase);
        assert_eq!(raw.values(), &[0.0, 10.0, 20.0, 30.0]);
        let norm = raw.normalized();
        assert_eq!(norm.get(0, 0), 0);
        assert_eq!(norm.get(1, 0), 85);
        assert_eq!(norm.get(0, 1), 170);
        assert_eq!(norm.get(1, 1), 255);
    }
}
