pub mod features;
pub mod raw;
pub mod track;

pub use features::{Feature, FeatureVector, FEATURE_COUNT};
pub use raw::RawTrackRow;
pub use track::{RankKey, Track, TrackIdentity};
