//! Exact k-nearest-neighbor search under cosine distance.
//!
//! Rows are L2-normalized once at build time, so each query is a single
//! pass of dot products over the matrix. Cosine distance ignores magnitude:
//! two profiles with the same proportions are at distance zero regardless
//! of overall intensity.

use serde::Serialize;
use std::cmp::Ordering;

use sonance_core::{Catalog, FeatureVector, FEATURE_COUNT};

/// Distance assigned whenever either side has a zero norm. Equal to the
/// distance between orthogonal vectors.
pub const ZERO_NORM_DISTANCE: f64 = 1.0;

/// A catalog position and its distance from the query vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f64,
}

impl Neighbor {
    fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

#[derive(Debug, Clone)]
pub struct FeatureIndex {
    /// Unit-length rows; `None` for rows with zero norm.
    rows: Vec<Option<[f64; FEATURE_COUNT]>>,
}

impl FeatureIndex {
    /// Build over the catalog's feature matrix. Row `i` of the index is
    /// catalog position `i`.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let index = Self::from_matrix(catalog.feature_matrix());
        log::info!("Feature index built over {} tracks", index.len());
        index
    }

    #[must_use]
    pub fn from_matrix(matrix: &[[f64; FEATURE_COUNT]]) -> Self {
        Self {
            rows: matrix.iter().map(unit).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `k` positions nearest to `vector`, ascending by distance.
    ///
    /// Ties are broken by position. No position is excluded, so a query
    /// built from a catalog row will normally return that row first.
    #[must_use]
    pub fn query(&self, vector: &[f64; FEATURE_COUNT], k: usize) -> Vec<Neighbor> {
        let k = k.min(self.rows.len());
        if k == 0 {
            return Vec::new();
        }

        let query = unit(vector);
        let mut neighbors: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: cosine_distance(query.as_ref(), row.as_ref()),
            })
            .collect();

        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, Neighbor::cmp_by_distance);
            neighbors.truncate(k);
        }
        neighbors.sort_unstable_by(Neighbor::cmp_by_distance);
        neighbors
    }
}

fn unit(vector: &[f64; FEATURE_COUNT]) -> Option<[f64; FEATURE_COUNT]> {
    let norm = FeatureVector::from_array(*vector).norm();
    if !norm.is_finite() || norm == 0.0 {
        return None;
    }
    Some(vector.map(|v| v / norm))
}

fn cosine_distance(
    a: Option<&[f64; FEATURE_COUNT]>,
    b: Option<&[f64; FEATURE_COUNT]>,
) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
            (1.0 - dot).clamp(0.0, 2.0)
        }
        _ => ZERO_NORM_DISTANCE,
    }
}
