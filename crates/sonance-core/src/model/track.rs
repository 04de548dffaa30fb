use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::features::FeatureVector;

/// The key that decides whether two rows describe the same track.
///
/// Field order defines the catalog's total order: by id, then title, then
/// artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackIdentity<'a> {
    pub track_id: &'a str,
    pub track_name: &'a str,
    pub artist_name: &'a str,
}

/// Ordering key for collapsing duplicate rows.
///
/// Popularity (0-100) and energy (0-1) are on different scales, so they are
/// never compared with each other: a row with measured popularity always
/// outranks a row without it.
#[derive(Debug, Clone, Copy)]
pub enum RankKey {
    Energy(f64),
    Popularity(f64),
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Popularity(a), Self::Popularity(b)) | (Self::Energy(a), Self::Energy(b)) => {
                a.total_cmp(b)
            }
            (Self::Popularity(_), Self::Energy(_)) => Ordering::Greater,
            (Self::Energy(_), Self::Popularity(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for RankKey {}

/// A canonical catalog track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque identifier from the storage layer. Not unique on its own:
    /// the same id may appear under several titles or artists.
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,

    #[serde(flatten)]
    pub features: FeatureVector,

    /// Tempo in BPM. Informational only, never part of the feature vector.
    pub tempo: Option<f64>,

    /// Release year, when the source knows it.
    pub year: Option<i32>,

    /// Measured popularity, when the source provides one.
    pub popularity: Option<f64>,
}

impl Track {
    #[must_use]
    pub fn new(
        track_id: impl Into<String>,
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        features: FeatureVector,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            features,
            tempo: None,
            year: None,
            popularity: None,
        }
    }

    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub const fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    #[must_use]
    pub const fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = Some(tempo);
        self
    }

    #[must_use]
    pub fn identity(&self) -> TrackIdentity<'_> {
        TrackIdentity {
            track_id: &self.track_id,
            track_name: &self.track_name,
            artist_name: &self.artist_name,
        }
    }

    #[must_use]
    pub const fn energy(&self) -> f64 {
        self.features.energy
    }

    /// Ranking signal used only when collapsing duplicate rows.
    ///
    /// Measured popularity when the source provided it, otherwise energy;
    /// see [`RankKey`] for how the two kinds compare. Query-time ordering
    /// uses [`Track::energy`] directly and never this key.
    #[must_use]
    pub fn popularity_rank_key(&self) -> RankKey {
        self.popularity
            .map_or(RankKey::Energy(self.features.energy), RankKey::Popularity)
    }
}
