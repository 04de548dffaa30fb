use crate::error::{Error, Result};
use crate::model::features::FeatureVector;
use crate::model::track::Track;

/// One joined row as delivered by the storage layer.
///
/// Every column besides `track_id` may be missing. Rows are validated once,
/// when the catalog is built, by converting them into [`Track`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrackRow {
    pub track_id: String,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub loudness: Option<f64>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub year: Option<i32>,
    pub popularity: Option<f64>,
}

impl RawTrackRow {
    fn features(&self) -> Option<FeatureVector> {
        let features = FeatureVector {
            danceability: self.danceability?,
            energy: self.energy?,
            loudness: self.loudness?,
            speechiness: self.speechiness?,
            acousticness: self.acousticness?,
            instrumentalness: self.instrumentalness?,
            liveness: self.liveness?,
            valence: self.valence?,
        };
        features.is_finite().then_some(features)
    }
}

impl TryFrom<RawTrackRow> for Track {
    type Error = Error;

    fn try_from(row: RawTrackRow) -> Result<Self> {
        let features = row.features().ok_or_else(|| {
            Error::InvalidData(format!("track {} has incomplete features", row.track_id))
        })?;
        let track_name = row
            .track_name
            .ok_or_else(|| Error::InvalidData(format!("track {} has no title", row.track_id)))?;
        let artist_name = row
            .artist_name
            .ok_or_else(|| Error::InvalidData(format!("track {} has no artist", row.track_id)))?;

        Ok(Self {
            track_id: row.track_id,
            track_name,
            artist_name,
            features,
            tempo: row.tempo.filter(|v| v.is_finite()),
            year: row.year,
            popularity: row.popularity.filter(|v| v.is_finite()),
        })
    }
}

impl From<Track> for RawTrackRow {
    fn from(track: Track) -> Self {
        let f = track.features;
        Self {
            track_id: track.track_id,
            track_name: Some(track.track_name),
            artist_name: Some(track.artist_name),
            danceability: Some(f.danceability),
            energy: Some(f.energy),
            loudness: Some(f.loudness),
            speechiness: Some(f.speechiness),
            acousticness: Some(f.acousticness),
            instrumentalness: Some(f.instrumentalness),
            liveness: Some(f.liveness),
            valence: Some(f.valence),
            tempo: track.tempo,
            year: track.year,
            popularity: track.popularity,
        }
    }
}
