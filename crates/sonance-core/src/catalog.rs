//! The deduplicated, immutable track catalog.
//!
//! A [`Catalog`] owns the canonical tracks in their stable order together
//! with an index-aligned feature matrix: row `i` of the matrix is always the
//! feature vector of track `i`. Both are fixed at construction and never
//! re-sorted afterwards.

use serde::Serialize;

use crate::dedup::deduplicate;
use crate::error::{Error, Result};
use crate::model::{RawTrackRow, Track, FEATURE_COUNT};

/// Counters describing what happened to ingested rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_ingested: usize,
    /// Missing title, artist, or any feature.
    pub rows_incomplete: usize,
    /// All-zero feature vectors, which have no cosine direction.
    pub rows_zero_vector: usize,
    /// Collapsed into another row with the same identity.
    pub rows_duplicate: usize,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tracks: Vec<Track>,
    features: Vec<[f64; FEATURE_COUNT]>,
    stats: LoadStats,
}

impl Catalog {
    /// Build a catalog from raw storage rows.
    ///
    /// Drops incomplete rows and all-zero feature vectors, collapses
    /// duplicates, sorts by [`crate::TrackIdentity`], and materializes the feature
    /// matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCatalog`] if no row survives filtering.
    pub fn build<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawTrackRow>,
    {
        let mut stats = LoadStats::default();
        let mut tracks = Vec::new();

        for row in rows {
            stats.rows_ingested += 1;
            match Track::try_from(row) {
                Ok(track) => tracks.push(track),
                Err(e) => {
                    log::debug!("Dropping row: {}", e);
                    stats.rows_incomplete += 1;
                }
            }
        }

        Self::assemble(tracks, stats)
    }

    /// Build a catalog from already typed tracks.
    ///
    /// Applies the same zero-vector filter, deduplication, and ordering as
    /// [`Catalog::build`].
    pub fn from_tracks(tracks: Vec<Track>) -> Result<Self> {
        let stats = LoadStats {
            rows_ingested: tracks.len(),
            ..LoadStats::default()
        };
        Self::assemble(tracks, stats)
    }

    fn assemble(tracks: Vec<Track>, mut stats: LoadStats) -> Result<Self> {
        let before = tracks.len();
        let tracks: Vec<Track> = tracks
            .into_iter()
            .filter(|t| !t.features.is_zero())
            .collect();
        stats.rows_zero_vector = before - tracks.len();
        if stats.rows_zero_vector > 0 {
            log::warn!(
                "Dropped {} tracks with all-zero feature vectors",
                stats.rows_zero_vector
            );
        }
        if stats.rows_incomplete > 0 {
            log::warn!(
                "Dropped {} rows with missing title, artist, or features",
                stats.rows_incomplete
            );
        }

        let before = tracks.len();
        let mut tracks = deduplicate(tracks);
        stats.rows_duplicate = before - tracks.len();

        if tracks.is_empty() {
            return Err(Error::EmptyCatalog {
                rows_ingested: stats.rows_ingested,
            });
        }

        tracks.sort_by(|a, b| a.identity().cmp(&b.identity()));
        let features = tracks.iter().map(|t| t.features.to_array()).collect();

        log::info!(
            "Catalog built: {} tracks from {} rows ({} duplicates collapsed)",
            tracks.len(),
            stats.rows_ingested,
            stats.rows_duplicate
        );

        Ok(Self {
            tracks,
            features,
            stats,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always `false` for a successfully built catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks in catalog order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Track> {
        self.tracks.get(position)
    }

    /// Feature row for the track at `position`.
    #[must_use]
    pub fn feature_row(&self, position: usize) -> Option<&[f64; FEATURE_COUNT]> {
        self.features.get(position)
    }

    /// The full feature matrix, aligned with [`Catalog::tracks`].
    #[must_use]
    pub fn feature_matrix(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.features
    }

    /// Distinct known release years, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.tracks.iter().filter_map(|t| t.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    #[must_use]
    pub const fn stats(&self) -> LoadStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureVector;
    use std::collections::HashSet;

    fn features(energy: f64, valence: f64) -> FeatureVector {
        FeatureVector::from_array([0.5, energy, -7.0, 0.05, 0.2, 0.0, 0.1, valence])
    }

    fn sample_rows() -> Vec<RawTrackRow> {
        vec![
            Track::new("T2", "Dusk", "Bex", features(0.4, 0.2)).with_year(1999).into(),
            Track::new("T1", "Sunrise", "Aria", features(0.5, 0.7)).into(),
            Track::new("T1", "Sunrise", "Aria", features(0.9, 0.7)).with_year(2004).into(),
            Track::new("T1", "Sunrise", "Aria", features(0.3, 0.7)).into(),
            RawTrackRow {
                valence: None,
                ..Track::new("T3", "Broken", "Cyd", features(0.5, 0.5)).into()
            },
            Track::new("T4", "Silence", "Dee", FeatureVector::default()).into(),
        ]
    }

    #[test]
    fn test_build_filters_and_deduplicates() {
        let catalog = Catalog::build(sample_rows()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.stats(),
            LoadStats {
                rows_ingested: 6,
                rows_incomplete: 1,
                rows_zero_vector: 1,
                rows_duplicate: 2,
            }
        );

        let sunrise = &catalog.tracks()[0];
        assert_eq!(sunrise.track_id, "T1");
        assert_eq!(sunrise.energy(), 0.9);
        assert_eq!(sunrise.year, Some(2004));
    }

    #[test]
    fn test_tracks_are_sorted_by_identity() {
        let catalog = Catalog::build(sample_rows()).unwrap();
        let ids: Vec<_> = catalog.tracks().iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);

        assert!(catalog
            .tracks()
            .windows(2)
            .all(|w| w[0].identity() < w[1].identity()));
    }

    #[test]
    fn test_identities_are_unique() {
        let catalog = Catalog::build(sample_rows()).unwrap();
        let identities: HashSet<_> = catalog.tracks().iter().map(Track::identity).collect();
        assert_eq!(identities.len(), catalog.len());
    }

    #[test]
    fn test_feature_rows_are_aligned() {
        let catalog = Catalog::build(sample_rows()).unwrap();
        assert_eq!(catalog.feature_matrix().len(), catalog.len());

        for (i, track) in catalog.tracks().iter().enumerate() {
            assert_eq!(catalog.feature_row(i), Some(&track.features.to_array()));
        }

        // Rebuilding from shuffled input yields the same alignment.
        let mut reversed = sample_rows();
        reversed.reverse();
        let rebuilt = Catalog::build(reversed).unwrap();
        assert_eq!(rebuilt.feature_matrix(), catalog.feature_matrix());
    }

    #[test]
    fn test_empty_input_is_an_initialization_error() {
        let err = Catalog::build(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyCatalog { rows_ingested: 0 }));
    }

    #[test]
    fn test_all_rows_filtered_is_an_initialization_error() {
        let rows = vec![RawTrackRow {
            track_id: "T9".to_string(),
            ..RawTrackRow::default()
        }];
        let err = Catalog::build(rows).unwrap_err();
        assert!(matches!(err, Error::EmptyCatalog { rows_ingested: 1 }));
    }

    #[test]
    fn test_years() {
        let catalog = Catalog::build(sample_rows()).unwrap();
        assert_eq!(catalog.years(), vec![1999, 2004]);
    }

    #[test]
    fn test_from_tracks() {
        let catalog = Catalog::from_tracks(vec![
            Track::new("B", "Two", "X", features(0.2, 0.2)),
            Track::new("A", "One", "X", features(0.2, 0.2)),
        ])
        .unwrap();
        assert_eq!(catalog.get(0).map(|t| t.track_id.as_str()), Some("A"));
        assert_eq!(catalog.stats().rows_ingested, 2);
    }
}
