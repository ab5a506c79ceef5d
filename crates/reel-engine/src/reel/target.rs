// reel/target.rs
//
// Stop targets and forward-closest resolution.
//
// A target names a strip index or a symbol, optionally pinned to a visible row.
// Resolution turns it into one virtual position ahead of the reel in its
// direction of travel; anything unresolvable becomes the nearest symbol
// boundary ahead, resolved through the same path as an explicit index on the
// top row.

use serde::{Deserialize, Serialize};

use super::motion::{Reel, Rotation};

/// Visible row of a three-row reel window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Row {
    Top,
    Middle,
    Bottom,
}

impl Row {
    /// Enumeration order, which is also the tie-break order when a row is free.
    pub const ALL: [Row; 3] = [Row::Top, Row::Middle, Row::Bottom];

    /// Index offset from the symbol sitting at the reel's top edge.
    pub fn offset(self) -> usize {
        match self {
            Row::Top => 0,
            Row::Middle => 1,
            Row::Bottom => 2,
        }
    }

    pub fn from_offset(offset: usize) -> Option<Row> {
        Row::ALL.get(offset).copied()
    }
}

/// Where one reel should come to rest.
///
/// `symbol_index` and `symbol` are mutually exclusive; a target with neither
/// is treated as no target at all. Deserializes from the JS-style shape
/// `{ "reel": 0, "symbolIndex": 19, "position": "bottom" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTarget {
    pub reel: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, rename = "position", skip_serializing_if = "Option::is_none")]
    pub row: Option<Row>,
}

/// What a target asks for, once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind<'a> {
    Index(usize),
    Symbol(&'a str),
}

impl StopTarget {
    pub fn index(reel: usize, symbol_index: usize, row: Option<Row>) -> Self {
        Self {
            reel,
            symbol_index: Some(symbol_index),
            symbol: None,
            row,
        }
    }

    pub fn symbol(reel: usize, symbol: impl Into<String>, row: Option<Row>) -> Self {
        Self {
            reel,
            symbol_index: None,
            symbol: Some(symbol.into()),
            row,
        }
    }

    /// The requested kind. An explicit index wins if both fields are set.
    pub fn kind(&self) -> Option<TargetKind<'_>> {
        match (self.symbol_index, self.symbol.as_deref()) {
            (Some(index), other) => {
                if other.is_some() {
                    log::warn!(
                        "reel {}: target has both symbolIndex and symbol, using index {}",
                        self.reel,
                        index
                    );
                }
                Some(TargetKind::Index(index))
            }
            (None, Some(symbol)) => Some(TargetKind::Symbol(symbol)),
            (None, None) => None,
        }
    }
}

/// A resolved stop position.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Virtual position the reel will come to rest at.
    pub target_y: f64,
    /// Strip index that will sit on the top row.
    pub top_index: usize,
    /// Row the requested symbol lands on.
    pub row: Row,
    /// Travel distance in the direction of rotation (always >= 0).
    pub distance: f64,
    /// Whether the travel wraps the displayed offset around the strip seam.
    pub crosses_seam: bool,
    /// Whether the request could not be honoured and the boundary stop was used.
    pub fallback: bool,
}

impl Resolution {
    fn beats(&self, other: &Resolution, prefer_no_seam: bool) -> bool {
        if prefer_no_seam && self.crosses_seam != other.crosses_seam {
            return !self.crosses_seam;
        }
        self.distance < other.distance
    }
}

/// Map a virtual position into the displayed range [-total_height, 0).
pub fn normalize_offset(y: f64, total_height: f64) -> f64 {
    (((y % total_height) + total_height) % total_height) - total_height
}

impl Reel {
    /// Resolve a stop request against the current position.
    ///
    /// Never fails: unknown symbols, out-of-range indices and empty targets all
    /// resolve to the nearest symbol boundary ahead.
    pub fn resolve_target(&self, target: Option<&StopTarget>) -> Resolution {
        if let Some(resolution) =
            target.and_then(|t| self.resolve_request(t.kind(), t.row))
        {
            return resolution;
        }
        self.resolve_boundary()
    }

    /// Project a base position into the direction of travel so it lies within
    /// one full cycle ahead of the current position (the current position
    /// itself counts as ahead).
    pub fn forward_project(&self, base_y: f64) -> f64 {
        let total = self.total_height();
        let current = self.position();
        match self.rotation() {
            Rotation::Reverse => {
                let mut y = base_y + ((current - base_y) / total).ceil() * total;
                if y < current {
                    y += total;
                }
                if y >= current + total {
                    y -= total;
                }
                y
            }
            Rotation::Normal => {
                let mut y = base_y + ((current - base_y) / total).floor() * total;
                if y > current {
                    y -= total;
                }
                if y <= current - total {
                    y += total;
                }
                y
            }
        }
    }

    fn resolve_request(&self, kind: Option<TargetKind<'_>>, row: Option<Row>) -> Option<Resolution> {
        let count = self.symbol_count();
        let candidates: Vec<usize> = match kind? {
            TargetKind::Index(index) if index < count => vec![index],
            TargetKind::Index(index) => {
                log::warn!("symbol index {index} out of range for a {count}-symbol reel");
                return None;
            }
            TargetKind::Symbol(symbol) => {
                let found: Vec<usize> = self
                    .strip()
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.as_str() == symbol)
                    .map(|(i, _)| i)
                    .collect();
                if found.is_empty() {
                    log::debug!("symbol '{symbol}' not on reel, stopping at nearest boundary");
                    return None;
                }
                found
            }
        };

        let rows = match row {
            Some(row) => vec![row],
            None => Row::ALL.to_vec(),
        };
        let prefer_no_seam = row.is_none();

        let mut best: Option<Resolution> = None;
        for &row in &rows {
            for &index in &candidates {
                let candidate = self.candidate(index, row);
                if best.as_ref().map_or(true, |b| candidate.beats(b, prefer_no_seam)) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Nearest symbol boundary ahead, resolved as an explicit top-row index.
    fn resolve_boundary(&self) -> Resolution {
        let h = self.symbol_height();
        let current = self.position();
        let boundary = match self.rotation() {
            Rotation::Reverse => (current / h).ceil() * h,
            Rotation::Normal => (current / h).floor() * h,
        };
        let top_index = ((-boundary / h).round() as i64).rem_euclid(self.symbol_count() as i64) as usize;

        let mut resolution = self
            .resolve_request(Some(TargetKind::Index(top_index)), Some(Row::Top))
            .unwrap_or_else(|| self.candidate(top_index, Row::Top));
        resolution.fallback = true;
        resolution
    }

    fn candidate(&self, index: usize, row: Row) -> Resolution {
        let count = self.symbol_count() as i64;
        let top_index = (index as i64 - row.offset() as i64).rem_euclid(count) as usize;
        let base_y = -(top_index as f64) * self.symbol_height();
        let target_y = self.forward_project(base_y);
        let current = self.position();
        let total = self.total_height();
        Resolution {
            target_y,
            top_index,
            row,
            distance: (target_y - current).abs(),
            crosses_seam: (current / total).floor() != (target_y / total).floor(),
            fallback: false,
        }
    }
}
