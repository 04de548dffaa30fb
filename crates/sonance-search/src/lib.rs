//! Similarity search and query engine for sonance.
//!
//! Builds a cosine-distance nearest-neighbor index over the catalog's
//! feature matrix and answers the five query kinds (recommend, mood,
//! compare, time machine, artist lookup) as pure reads over an immutable
//! catalog.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod engine;
pub mod error;
pub mod index;
pub mod mood;
pub mod resolve;

pub use engine::{ArtistSongs, EngineOptions, QueryEngine, Recommendation, Similar};
pub use error::{QueryError, QueryResult};
pub use index::{FeatureIndex, Neighbor};
pub use mood::{FeatureRange, Mood};
pub use resolve::{Field, NameResolver};
