/// CSV scan grid parser
///
/// Input files carry one scan row per line, each cell a parenthesized or bare
/// numeric pair: `(1.0,2.0),(3.0,4.0)`. Parentheses and quotes are cosmetic
/// and stripped before tokenizing; the remaining comma-separated tokens are
/// consumed pairwise as (phase, magnitude).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::normalize::ChannelGrid;

/// One complex measurement, stored as the two scalars the scanner emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPair {
    pub phase: f64,
    pub magnitude: f64,
}

/// Which scalar of each measurement is displayed and analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    Phase,
    Magnitude,
}

impl Channel {
    fn select(self, pair: ScanPair) -> f64 {
        match self {
            Channel::Phase => pair.phase,
            Channel::Magnitude => pair.magnitude,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Phase => write!(f, "Phase"),
            Channel::Magnitude => write!(f, "Magnitude"),
        }
    }
}

/// Why a scan CSV could not be parsed
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("file contains no data rows")]
    Empty,
    #[error("line {line}: {count} values; values must come in (phase, magnitude) pairs")]
    OddTokenCount { line: usize, count: usize },
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: {found} pairs, expected {expected} (ragged grid)")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Full parsed scan: rows × cols of (phase, magnitude) pairs, row-major.
/// Invariant: `rows >= 1`, `cols >= 1`, `pairs.len() == rows * cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanGrid {
    pairs: Vec<ScanPair>,
    rows: usize,
    cols: usize,
}

impl ScanGrid {
    /// Parse raw CSV text into a rectangular grid.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let cleaned = text.replace(['(', ')', '"'], "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut pairs = Vec::new();
        let mut cols = 0usize;
        let mut rows = 0usize;

        for (idx, line) in cleaned.lines().enumerate() {
            let lineno = idx + 1;
            let mut values = Vec::new();
            for token in line.split(',') {
                let token = token.trim();
                let v: f64 = token.parse().map_err(|_| ParseError::InvalidNumber {
                    line: lineno,
                    token: token.to_string(),
                })?;
                values.push(v);
            }
            if values.len() % 2 != 0 {
                return Err(ParseError::OddTokenCount {
                    line: lineno,
                    count: values.len(),
                });
            }
            let row_cols = values.len() / 2;
            if rows == 0 {
                cols = row_cols;
            } else if row_cols != cols {
                return Err(ParseError::RaggedRow {
                    line: lineno,
                    expected: cols,
                    found: row_cols,
                });
            }
            pairs.extend(values.chunks_exact(2).map(|c| ScanPair {
                phase: c[0],
                magnitude: c[1],
            }));
            rows += 1;
        }

        Ok(Self { pairs, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell lookup. Callers are expected to stay in bounds.
    pub fn get(&self, x: usize, y: usize) -> ScanPair {
        self.pairs[y * self.cols + x]
    }

    /// Extract one scalar channel as a flat f64 grid.
    pub fn channel_grid(&self, channel: Channel) -> ChannelGrid {
        let values = self.pairs.iter().map(|&p| channel.select(p)).collect();
        ChannelGrid::new(values, self.rows, self.cols, channel)
    }

    /// Re-serialize the pairs in the input format (used by round-trip tests
    /// and available for a future save path).
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                if x > 0 {
                    out.push(',');
                }
                let p = self.get(x, y);
                out.push_str(&format!("({},{})", p.phase, p.magnitude));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_grid() {
        let grid = ScanGrid::parse("(0,0),(10,10)\n(20,20),(30,30)").unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.get(1, 0), ScanPair { phase: 10.0, magnitude: 10.0 });
        assert_eq!(grid.get(1, 1).phase, 30.0);
    }

    #[test]
    fn test_parse_strips_quotes_and_spaces() {
        let grid = ScanGrid::parse("\"(1.5, 2.5)\", (3.0,4.0)\n").unwrap();
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.get(0, 0), ScanPair { phase: 1.5, magnitude: 2.5 });
    }

    #[test]
    fn test_parse_bare_pairs() {
        let grid = ScanGrid::parse("1,2,3,4\n5,6,7,8").unwrap();
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.get(1, 1), ScanPair { phase: 7.0, magnitude: 8.0 });
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert_eq!(ScanGrid::parse(""), Err(ParseError::Empty));
        assert_eq!(ScanGrid::parse("   \n  "), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_odd_token_count() {
        assert_eq!(
            ScanGrid::parse("(1,2),(3,4)\n5,6,7"),
            Err(ParseError::OddTokenCount { line: 2, count: 3 })
        );
    }

    #[test]
    fn test_parse_non_numeric_token() {
        let err = ScanGrid::parse("(1,abc)").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 1,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_ragged_grid() {
        assert_eq!(
            ScanGrid::parse("(1,2),(3,4)\n(5,6)"),
            Err(ParseError::RaggedRow {
                line: 2,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_channel_extraction() {
        let grid = ScanGrid::parse("(0,1),(10,11)\n(20,21),(30,31)").unwrap();
        let phase = grid.channel_grid(Channel::Phase);
        let mag = grid.channel_grid(Channel::Magnitude);
        assert_eq!(phase.values(), &[0.0, 10.0, 20.0, 30.0]);
        assert_eq!(mag.values(), &[1.0, 11.0, 21.0, 31.0]);
    }

    #[test]
    fn test_roundtrip_through_serialization() {
        let grid = ScanGrid::parse("(0.25,-3.5),(1e3,0.1)\n(-0.0625,7),(2,9.75)").unwrap();
        let reparsed = ScanGrid::parse(&grid.to_csv()).unwrap();
        assert_eq!(grid, reparsed);
    }
}
