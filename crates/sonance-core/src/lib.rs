//! Core domain model for sonance.
//!
//! This crate defines the track model and its fixed-order audio feature
//! vector, the deduplication policy, the immutable in-memory catalog the
//! query engine reads from, and the SQLite row source the catalog is
//! loaded from.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod dedup;
pub mod error;
pub mod model;
pub mod schema;

pub use catalog::{Catalog, LoadStats};
pub use dedup::{deduplicate, deduplicate_by, DedupKey};
pub use error::{Error, Result};
pub use model::{
    Feature, FeatureVector, RankKey, RawTrackRow, Track, TrackIdentity, FEATURE_COUNT,
};
