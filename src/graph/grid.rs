//! Uniform grid over body positions for fixed-range neighbour queries.

use std::collections::HashMap;

/// Buckets points into square cells of side `cell`.
///
/// Two points closer than `cell` always share a cell or sit in adjacent
/// ones, so a range query only visits the 3×3 block around a point.
pub(crate) struct NeighbourGrid {
	cell: f64,
	cells: HashMap<(i64, i64), Vec<usize>>,
}

impl NeighbourGrid {
	/// Indexes `points` by position. `cell` must be positive.
	pub(crate) fn new(cell: f64, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
		let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
		for (i, (x, y)) in points.into_iter().enumerate() {
			cells.entry(key(cell, x, y)).or_default().push(i);
		}
		Self { cell, cells }
	}

	/// Indices of every point in the block around `(x, y)`, each once.
	pub(crate) fn around(&self, x: f64, y: f64) -> Vec<usize> {
		let (cx, cy) = key(self.cell, x, y);
		let mut seen: Vec<(i64, i64)> = Vec::with_capacity(9);
		let mut out = Vec::new();
		for dx in -1..=1 {
			for dy in -1..=1 {
				// Saturated keys repeat at the edges of the i64 range.
				let k = (cx.saturating_add(dx), cy.saturating_add(dy));
				if seen.contains(&k) {
					continue;
				}
				seen.push(k);
				if let Some(bucket) = self.cells.get(&k) {
					out.extend_from_slice(bucket);
				}
			}
		}
		out
	}
}

// Float-to-int casts saturate, so huge or non-finite coordinates land in edge cells.
fn key(cell: f64, x: f64, y: f64) -> (i64, i64) {
	((x / cell).floor() as i64, (y / cell).floor() as i64)
}
