//! Fixed mood profiles expressed as inclusive feature ranges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use sonance_core::{Feature, Track};

use crate::error::QueryError;

/// An inclusive `[min, max]` bound on one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRange {
    pub feature: Feature,
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    #[must_use]
    pub const fn new(feature: Feature, min: f64, max: f64) -> Self {
        Self { feature, min, max }
    }

    #[must_use]
    pub fn contains(&self, track: &Track) -> bool {
        let value = track.features.get(self.feature);
        value >= self.min && value <= self.max
    }
}

const PARTY: &[FeatureRange] = &[
    FeatureRange::new(Feature::Energy, 0.8, 1.0),
    FeatureRange::new(Feature::Valence, 0.7, 1.0),
];

const CHILL: &[FeatureRange] = &[
    FeatureRange::new(Feature::Energy, 0.0, 0.4),
    FeatureRange::new(Feature::Acousticness, 0.7, 1.0),
];

const SAD: &[FeatureRange] = &[
    FeatureRange::new(Feature::Valence, 0.0, 0.3),
    FeatureRange::new(Feature::Energy, 0.0, 0.5),
];

const FOCUS: &[FeatureRange] = &[
    FeatureRange::new(Feature::Instrumentalness, 0.7, 1.0),
    FeatureRange::new(Feature::Speechiness, 0.0, 0.1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Party,
    Chill,
    Sad,
    Focus,
}

impl Mood {
    pub const ALL: [Self; 4] = [Self::Party, Self::Chill, Self::Sad, Self::Focus];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Party => "party",
            Self::Chill => "chill",
            Self::Sad => "sad",
            Self::Focus => "focus",
        }
    }

    /// The ranges a track must satisfy, all of them, to fit this mood.
    #[must_use]
    pub const fn ranges(self) -> &'static [FeatureRange] {
        match self {
            Self::Party => PARTY,
            Self::Chill => CHILL,
            Self::Sad => SAD,
            Self::Focus => FOCUS,
        }
    }

    #[must_use]
    pub fn matches(self, track: &Track) -> bool {
        self.ranges().iter().all(|range| range.contains(track))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mood {
    type Err = QueryError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.name().eq_ignore_ascii_case(label))
            .ok_or_else(|| QueryError::InvalidMood {
                label: s.to_string(),
            })
    }
}
