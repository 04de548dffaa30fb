//! The five query operations over an immutable catalog.
//!
//! A [`QueryEngine`] owns the catalog, its feature index, and the folded
//! name tables. Every operation takes `&self` and returns borrowed tracks,
//! so an engine can be shared across threads without locking.

use rand::Rng;
use serde::Serialize;
use std::borrow::Borrow;

use sonance_core::{deduplicate, deduplicate_by, Catalog, DedupKey, RawTrackRow, Track};

use crate::error::{QueryError, QueryResult};
use crate::index::FeatureIndex;
use crate::mood::Mood;
use crate::resolve::{Field, NameResolver};

/// Result-size limits for the query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum similar tracks returned by [`QueryEngine::recommend`].
    pub recommend_limit: usize,
    /// Maximum tracks sampled by [`QueryEngine::mood_playlist`].
    pub mood_sample_size: usize,
    /// Maximum tracks returned by [`QueryEngine::time_machine`].
    pub time_machine_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            recommend_limit: 10,
            mood_sample_size: 20,
            time_machine_limit: 20,
        }
    }
}

/// A recommended track and its cosine distance from the input track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Similar<'a> {
    #[serde(flatten)]
    pub track: &'a Track,
    pub distance: f64,
}

impl Borrow<Track> for Similar<'_> {
    fn borrow(&self) -> &Track {
        self.track
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    /// The canonical track the query resolved to.
    pub input: &'a Track,
    /// Nearest tracks, ascending by distance, never including `input`.
    pub recommendations: Vec<Similar<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistSongs<'a> {
    /// The artist name as spelled in the catalog.
    pub artist: &'a str,
    /// Unique recordings, most energetic first.
    pub songs: Vec<&'a Track>,
}

#[derive(Debug)]
pub struct QueryEngine {
    catalog: Catalog,
    index: FeatureIndex,
    resolver: NameResolver,
    options: EngineOptions,
}

impl QueryEngine {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_options(catalog, EngineOptions::default())
    }

    #[must_use]
    pub fn with_options(catalog: Catalog, options: EngineOptions) -> Self {
        let index = FeatureIndex::build(&catalog);
        let resolver = NameResolver::new(&catalog);
        Self {
            catalog,
            index,
            resolver,
            options,
        }
    }

    /// Build the catalog from raw storage rows and index it.
    ///
    /// # Errors
    ///
    /// Returns [`sonance_core::Error::EmptyCatalog`] if no row survives
    /// load-time filtering.
    pub fn initialize<I>(rows: I, options: EngineOptions) -> sonance_core::Result<Self>
    where
        I: IntoIterator<Item = RawTrackRow>,
    {
        Ok(Self::with_options(Catalog::build(rows)?, options))
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn options(&self) -> EngineOptions {
        self.options
    }

    fn track(&self, position: usize) -> &Track {
        &self.catalog.tracks()[position]
    }

    /// Tracks most similar to the one named `track_name`.
    pub fn recommend(&self, track_name: &str) -> QueryResult<Recommendation<'_>> {
        let query = required(track_name, Field::TrackName)?;
        let position = self
            .resolver
            .resolve(&self.catalog, query, Field::TrackName)
            .ok_or_else(|| not_found("track", query))?;
        let input = self.track(position);

        let Some(vector) = self.catalog.feature_row(position) else {
            return Err(not_found("track", query));
        };
        let limit = self.options.recommend_limit;

        let neighbors: Vec<Similar<'_>> = self
            .index
            .query(vector, limit.saturating_add(1))
            .into_iter()
            .filter(|n| n.position != position)
            .map(|n| Similar {
                track: self.track(n.position),
                distance: n.distance,
            })
            .collect();

        let mut recommendations = deduplicate(neighbors);
        recommendations.truncate(limit);

        log::debug!(
            "Recommending {} tracks for {:?} by {:?}",
            recommendations.len(),
            input.track_name,
            input.artist_name
        );

        Ok(Recommendation {
            input,
            recommendations,
        })
    }

    /// A random sample of tracks fitting `mood`, drawn with the calling
    /// thread's RNG.
    pub fn mood_playlist(&self, mood: &str) -> QueryResult<Vec<&Track>> {
        self.mood_playlist_with_rng(mood, &mut rand::rng())
    }

    /// Like [`QueryEngine::mood_playlist`], sampling from `rng`.
    ///
    /// A recognized mood with no matching tracks yields an empty list, not
    /// an error.
    pub fn mood_playlist_with_rng<R>(&self, mood: &str, rng: &mut R) -> QueryResult<Vec<&Track>>
    where
        R: Rng + ?Sized,
    {
        let mood: Mood = mood.parse()?;

        let matching: Vec<&Track> = self
            .catalog
            .tracks()
            .iter()
            .filter(|t| mood.matches(t))
            .collect();
        let unique = deduplicate(matching);

        let amount = self.options.mood_sample_size.min(unique.len());
        let sample: Vec<&Track> = rand::seq::index::sample(rng, unique.len(), amount)
            .into_iter()
            .map(|i| unique[i])
            .collect();

        log::debug!(
            "Mood {}: sampled {} of {} matching tracks",
            mood,
            sample.len(),
            unique.len()
        );
        Ok(sample)
    }

    /// The most energetic substring match for each name.
    pub fn compare(&self, track_name_a: &str, track_name_b: &str) -> QueryResult<(&Track, &Track)> {
        let a = self.most_energetic_match(track_name_a)?;
        let b = self.most_energetic_match(track_name_b)?;
        Ok((a, b))
    }

    fn most_energetic_match(&self, track_name: &str) -> QueryResult<&Track> {
        let query = required(track_name, Field::TrackName)?;
        self.resolver
            .most_energetic(&self.catalog, query, Field::TrackName)
            .map(|pos| self.track(pos))
            .ok_or_else(|| not_found("track", query))
    }

    /// The most energetic tracks released in `year`.
    pub fn time_machine(&self, year: i32) -> QueryResult<Vec<&Track>> {
        let yearly: Vec<&Track> = self
            .catalog
            .tracks()
            .iter()
            .filter(|t| t.year == Some(year))
            .collect();
        if yearly.is_empty() {
            return Err(not_found("year", &year.to_string()));
        }

        let mut unique = deduplicate(yearly);
        sort_by_energy_desc(&mut unique);
        unique.truncate(self.options.time_machine_limit);
        Ok(unique)
    }

    /// Every unique recording by the artist matching `artist_name`.
    ///
    /// Exact (case-insensitive) name matches take precedence over substring
    /// matches. The first match in catalog order fixes the artist; only that
    /// artist's rows are returned.
    pub fn artist_songs(&self, artist_name: &str) -> QueryResult<ArtistSongs<'_>> {
        let query = required(artist_name, Field::ArtistName)?;
        let pool = self.resolver.exact_or_partial(query, Field::ArtistName);
        let Some(&first) = pool.first() else {
            return Err(not_found("artist", query));
        };

        let artist = self.track(first).artist_name.as_str();
        let folded = artist.to_lowercase();
        let rows: Vec<&Track> = pool
            .into_iter()
            .map(|pos| self.track(pos))
            .filter(|t| t.artist_name.to_lowercase() == folded)
            .collect();

        let mut songs = deduplicate_by(rows, DedupKey::Recording);
        sort_by_energy_desc(&mut songs);

        Ok(ArtistSongs { artist, songs })
    }
}

fn required(value: &str, field: Field) -> QueryResult<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QueryError::EmptyQuery {
            field: field.name(),
        });
    }
    Ok(trimmed)
}

fn not_found(entity: &'static str, query: &str) -> QueryError {
    QueryError::NotFound {
        entity,
        query: query.to_string(),
    }
}

/// Stable, so equal energies keep catalog order.
fn sort_by_energy_desc(tracks: &mut [&Track]) {
    tracks.sort_by(|a, b| b.energy().total_cmp(&a.energy()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sonance_core::FeatureVector;
    use std::collections::HashSet;

    fn features(
        danceability: f64,
        energy: f64,
        acousticness: f64,
        instrumentalness: f64,
        speechiness: f64,
        valence: f64,
    ) -> FeatureVector {
        FeatureVector {
            danceability,
            energy,
            loudness: -8.0,
            speechiness,
            acousticness,
            instrumentalness,
            liveness: 0.1,
            valence,
        }
    }

    fn party(id: &str, name: &str, artist: &str, energy: f64) -> Track {
        Track::new(id, name, artist, features(0.8, energy, 0.1, 0.0, 0.05, 0.9))
    }

    fn engine() -> QueryEngine {
        let tracks = vec![
            Track::new("T1", "Sunrise", "Aria", features(0.6, 0.5, 0.2, 0.1, 0.05, 0.6)),
            Track::new("T1", "Sunrise", "Aria", features(0.6, 0.9, 0.2, 0.1, 0.05, 0.6))
                .with_year(2004),
            Track::new("T1", "Sunrise", "Aria", features(0.6, 0.3, 0.2, 0.1, 0.05, 0.6)),
            party("T2", "Fiesta", "Bex", 0.85).with_year(2004),
            party("T3", "Carnival", "Bex", 0.95).with_year(2004),
            Track::new("T4", "Rainfall", "Cyd", features(0.2, 0.2, 0.9, 0.3, 0.03, 0.2))
                .with_year(1999),
            Track::new("T5", "Study Loop", "Dee", features(0.4, 0.3, 0.5, 0.9, 0.02, 0.5)),
            Track::new("T6", "Sunrise Remix", "Aria", features(0.7, 0.7, 0.2, 0.1, 0.05, 0.7))
                .with_year(2004),
        ];
        QueryEngine::new(Catalog::from_tracks(tracks).unwrap())
    }

    #[test]
    fn test_recommend_resolves_canonical_track() {
        let engine = engine();
        let rec = engine.recommend("sunrise").unwrap();

        assert_eq!(rec.input.track_id, "T1");
        assert_eq!(rec.input.energy(), 0.9);
    }

    #[test]
    fn test_recommend_excludes_input_and_is_unique() {
        let engine = engine();
        let rec = engine.recommend("Sunrise").unwrap();

        assert!(rec
            .recommendations
            .iter()
            .all(|s| s.track.identity() != rec.input.identity()));

        let identities: HashSet<_> = rec
            .recommendations
            .iter()
            .map(|s| s.track.identity())
            .collect();
        assert_eq!(identities.len(), rec.recommendations.len());

        // Small catalog: everything except the input itself.
        assert_eq!(rec.recommendations.len(), engine.catalog().len() - 1);
        assert!(rec
            .recommendations
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_recommend_respects_limit() {
        let tracks: Vec<Track> = (0..30)
            .map(|i| {
                let energy = 0.1 + f64::from(i) * 0.02;
                party(&format!("T{i:02}"), &format!("Song {i}"), "Band", energy)
            })
            .collect();
        let engine = QueryEngine::new(Catalog::from_tracks(tracks).unwrap());

        let rec = engine.recommend("Song 7").unwrap();
        assert_eq!(rec.recommendations.len(), 10);
    }

    #[test]
    fn test_recommend_unbounded_limit_returns_whole_catalog() {
        let tracks = engine().catalog().tracks().to_vec();
        let options = EngineOptions {
            recommend_limit: usize::MAX,
            ..EngineOptions::default()
        };
        let engine = QueryEngine::with_options(Catalog::from_tracks(tracks).unwrap(), options);

        let rec = engine.recommend("sunrise").unwrap();
        assert_eq!(rec.recommendations.len(), engine.catalog().len() - 1);
    }

    #[test]
    fn test_recommend_errors() {
        let engine = engine();
        assert!(engine.recommend("nope").unwrap_err().is_not_found());
        assert!(matches!(
            engine.recommend("   ").unwrap_err(),
            QueryError::EmptyQuery { field: "track_name" }
        ));
    }

    #[test]
    fn test_mood_range_containment() {
        let engine = engine();
        let playlist = engine.mood_playlist("party").unwrap();

        let ids: HashSet<_> = playlist.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["T2", "T3"]));
        for track in &playlist {
            for range in Mood::Party.ranges() {
                assert!(range.contains(track));
            }
        }
    }

    #[test]
    fn test_mood_sample_bound() {
        let tracks: Vec<Track> = (0..40)
            .map(|i| party(&format!("P{i:02}"), &format!("Party {i}"), "Band", 0.9))
            .collect();
        let engine = QueryEngine::new(Catalog::from_tracks(tracks).unwrap());

        let playlist = engine.mood_playlist("party").unwrap();
        assert_eq!(playlist.len(), 20);
        let identities: HashSet<_> = playlist.iter().map(|t| t.identity()).collect();
        assert_eq!(identities.len(), 20);
    }

    #[test]
    fn test_mood_single_match_is_not_an_error() {
        let engine = engine();
        let playlist = engine.mood_playlist("focus").unwrap();
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0].track_id, "T5");
    }

    #[test]
    fn test_mood_with_no_matches_is_empty_success() {
        let tracks = vec![party("T2", "Fiesta", "Bex", 0.85)];
        let party_only = QueryEngine::new(Catalog::from_tracks(tracks).unwrap());

        assert!(party_only.mood_playlist("sad").unwrap().is_empty());
        assert!(party_only.mood_playlist("chill").unwrap().is_empty());
        assert_eq!(engine().mood_playlist("sad").unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_mood() {
        let engine = engine();
        let err = engine.mood_playlist("angry").unwrap_err();
        assert!(matches!(err, QueryError::InvalidMood { .. }));
    }

    #[test]
    fn test_mood_seeded_sample_is_deterministic() {
        let tracks: Vec<Track> = (0..40)
            .map(|i| party(&format!("P{i:02}"), &format!("Party {i}"), "Band", 0.9))
            .collect();
        let engine = QueryEngine::new(Catalog::from_tracks(tracks).unwrap());

        let first = engine
            .mood_playlist_with_rng("party", &mut StdRng::seed_from_u64(7))
            .unwrap();
        let second = engine
            .mood_playlist_with_rng("party", &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compare_uses_most_energetic_match() {
        let engine = engine();
        let (a, b) = engine.compare("sunrise", "rain").unwrap();

        // "sunrise" also matches "Sunrise Remix" (0.7), but the canonical
        // Sunrise row has 0.9.
        assert_eq!(a.track_id, "T1");
        assert_eq!(a.energy(), 0.9);
        assert_eq!(b.track_id, "T4");
    }

    #[test]
    fn test_compare_requires_both() {
        let engine = engine();
        assert!(engine.compare("sunrise", "missing").unwrap_err().is_not_found());
        assert!(engine.compare("missing", "sunrise").unwrap_err().is_not_found());
    }

    #[test]
    fn test_time_machine_ranking() {
        let engine = engine();
        let tracks = engine.time_machine(2004).unwrap();

        let ids: Vec<_> = tracks.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["T3", "T1", "T2", "T6"]);
        assert!(tracks.iter().all(|t| t.year == Some(2004)));
    }

    #[test]
    fn test_time_machine_cap() {
        let tracks: Vec<Track> = (0..30)
            .map(|i| {
                party(&format!("Y{i:02}"), &format!("Hit {i}"), "Band", 0.5).with_year(1980)
            })
            .collect();
        let engine = QueryEngine::new(Catalog::from_tracks(tracks).unwrap());
        assert_eq!(engine.time_machine(1980).unwrap().len(), 20);
    }

    #[test]
    fn test_time_machine_empty_year_is_not_found() {
        let engine = engine();
        assert!(engine.time_machine(1975).unwrap_err().is_not_found());
    }

    #[test]
    fn test_artist_songs_sorted_by_energy() {
        let engine = engine();
        let result = engine.artist_songs("bex").unwrap();

        assert_eq!(result.artist, "Bex");
        let ids: Vec<_> = result.songs.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["T3", "T2"]);
    }

    #[test]
    fn test_artist_exact_match_wins_over_partial() {
        let tracks = vec![
            party("A1", "One", "Aria", 0.8),
            party("A2", "Two", "Arianna", 0.9),
            party("A3", "Three", "aria", 0.85),
        ];
        let engine = QueryEngine::new(Catalog::from_tracks(tracks).unwrap());

        let result = engine.artist_songs("ARIA").unwrap();
        assert_eq!(result.artist, "Aria");
        let ids: Vec<_> = result.songs.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["A3", "A1"]);

        let partial = engine.artist_songs("anna").unwrap();
        assert_eq!(partial.artist, "Arianna");
        assert_eq!(partial.songs.len(), 1);
    }

    #[test]
    fn test_artist_not_found() {
        let engine = engine();
        assert!(engine.artist_songs("Nobody").unwrap_err().is_not_found());
        assert!(engine.artist_songs("").unwrap_err().is_caller_error());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = engine();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..25 {
                        let playlist = engine.mood_playlist("party").unwrap();
                        assert_eq!(playlist.len(), 2);
                        assert!(engine.recommend("sunrise").is_ok());
                    }
                });
            }
        });
    }
}
