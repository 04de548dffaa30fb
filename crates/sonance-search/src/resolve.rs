//! Matching user-typed titles and artist names to catalog rows.
//!
//! Matching is a case-insensitive contiguous substring test against one
//! field. Candidates are always reported in catalog order, which is the
//! identity order fixed when the catalog was built. Picking one canonical
//! track out of several candidates orders them by title and artist instead.

use std::collections::BTreeMap;

use sonance_core::Catalog;

/// The track field a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TrackName,
    ArtistName,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TrackName => "track_name",
            Self::ArtistName => "artist_name",
        }
    }
}

/// Case-folded copies of the searchable fields, aligned with catalog
/// positions.
#[derive(Debug, Clone)]
pub struct NameResolver {
    track_names: Vec<String>,
    artist_names: Vec<String>,
}

impl NameResolver {
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let (track_names, artist_names) = catalog
            .tracks()
            .iter()
            .map(|t| (fold(&t.track_name), fold(&t.artist_name)))
            .unzip();
        Self {
            track_names,
            artist_names,
        }
    }

    fn folded(&self, field: Field) -> &[String] {
        match field {
            Field::TrackName => &self.track_names,
            Field::ArtistName => &self.artist_names,
        }
    }

    /// Positions whose `field` contains `query`, ignoring case.
    #[must_use]
    pub fn candidates(&self, query: &str, field: Field) -> Vec<usize> {
        let needle = fold(query);
        self.folded(field)
            .iter()
            .enumerate()
            .filter(|(_, value)| value.contains(&needle))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Positions whose `field` equals `query` ignoring case, or, when there
    /// are none, the substring candidates.
    #[must_use]
    pub fn exact_or_partial(&self, query: &str, field: Field) -> Vec<usize> {
        let needle = fold(query);
        let exact: Vec<usize> = self
            .folded(field)
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == needle)
            .map(|(pos, _)| pos)
            .collect();

        if exact.is_empty() {
            self.candidates(query, field)
        } else {
            exact
        }
    }

    /// The single canonical match for `query`.
    ///
    /// Candidates are grouped by `(track_name, artist_name)` and each group
    /// is represented by its most energetic row. The group whose pair sorts
    /// lowest (plain string order, title first) wins.
    ///
    /// `catalog` must be the one this resolver was built from.
    #[must_use]
    pub(crate) fn resolve(&self, catalog: &Catalog, query: &str, field: Field) -> Option<usize> {
        let candidates = self.candidates(query, field);
        log::debug!(
            "{:?} matched {} rows on {}",
            query,
            candidates.len(),
            field.name()
        );

        let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for &pos in &candidates {
            let track = &catalog.tracks()[pos];
            let pair = (track.track_name.as_str(), track.artist_name.as_str());
            groups
                .entry(pair)
                .and_modify(|best| {
                    if track.energy() > catalog.tracks()[*best].energy() {
                        *best = pos;
                    }
                })
                .or_insert(pos);
        }

        groups.into_values().next()
    }

    /// The most energetic row among all substring matches, with no grouping.
    /// Ties keep the earliest row.
    #[must_use]
    pub(crate) fn most_energetic(
        &self,
        catalog: &Catalog,
        query: &str,
        field: Field,
    ) -> Option<usize> {
        most_energetic_of(catalog, self.candidates(query, field))
    }
}

fn most_energetic_of(catalog: &Catalog, positions: Vec<usize>) -> Option<usize> {
    positions.into_iter().reduce(|best, pos| {
        if catalog.tracks()[pos].energy() > catalog.tracks()[best].energy() {
            pos
        } else {
            best
        }
    })
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}
