use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of audio features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 8;

/// One named dimension of a track's audio profile.
///
/// The declaration order is the fixed order of the feature vector and of
/// every row in the catalog's feature matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Danceability,
    Energy,
    /// Loudness in dB. Unlike the other features it is not normalized and
    /// is typically negative.
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
}

impl Feature {
    /// All features, in vector order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::Danceability,
        Self::Energy,
        Self::Loudness,
        Self::Speechiness,
        Self::Acousticness,
        Self::Instrumentalness,
        Self::Liveness,
        Self::Valence,
    ];

    /// Position of this feature within a feature vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column name used by the storage layer and in serialized output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Danceability => "danceability",
            Self::Energy => "energy",
            Self::Loudness => "loudness",
            Self::Speechiness => "speechiness",
            Self::Acousticness => "acousticness",
            Self::Instrumentalness => "instrumentalness",
            Self::Liveness => "liveness",
            Self::Valence => "valence",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fixed 8-dimensional audio profile of a track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    pub danceability: f64,
    pub energy: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
}

impl FeatureVector {
    /// Build a vector from values in [`Feature::ALL`] order.
    #[must_use]
    pub const fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [danceability, energy, loudness, speechiness, acousticness, instrumentalness, liveness, valence] =
            values;
        Self {
            danceability,
            energy,
            loudness,
            speechiness,
            acousticness,
            instrumentalness,
            liveness,
            valence,
        }
    }

    /// The values in [`Feature::ALL`] order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.danceability,
            self.energy,
            self.loudness,
            self.speechiness,
            self.acousticness,
            self.instrumentalness,
            self.liveness,
            self.valence,
        ]
    }

    #[must_use]
    pub const fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Danceability => self.danceability,
            Feature::Energy => self.energy,
            Feature::Loudness => self.loudness,
            Feature::Speechiness => self.speechiness,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Liveness => self.liveness,
            Feature::Valence => self.valence,
        }
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.to_array().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Whether every component is exactly zero. Such a vector has no
    /// direction, so its cosine similarity to anything is undefined.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.to_array().iter().all(|v| *v == 0.0)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_index_matches_all_order() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_array_round_trip_preserves_order() {
        let values = [0.1, 0.2, -5.0, 0.4, 0.5, 0.6, 0.7, 0.8];
        let vector = FeatureVector::from_array(values);
        assert_eq!(vector.to_array(), values);
        assert_eq!(vector.get(Feature::Loudness), -5.0);
        assert_eq!(vector.get(Feature::Valence), 0.8);
    }

    #[test]
    fn test_get_agrees_with_array_index() {
        let vector = FeatureVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let array = vector.to_array();
        for feature in Feature::ALL {
            assert_eq!(vector.get(feature), array[feature.index()]);
        }
    }

    #[test]
    fn test_zero_and_norm() {
        assert!(FeatureVector::default().is_zero());
        assert_eq!(FeatureVector::default().norm(), 0.0);

        let vector = FeatureVector::from_array([3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(!vector.is_zero());
        assert!((vector.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_finite() {
        let mut vector = FeatureVector::default();
        assert!(vector.is_finite());
        vector.loudness = f64::NAN;
        assert!(!vector.is_finite());
    }

    #[test]
    fn test_feature_display() {
        assert_eq!(Feature::Instrumentalness.to_string(), "instrumentalness");
    }
}
