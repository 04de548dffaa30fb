//! Collapsing rows that describe the same track.
//!
//! One policy serves both catalog construction (raw joined rows) and result
//! assembly (neighbor lists, mood matches, year filters): among rows sharing
//! a key, the one with the highest [`Track::popularity_rank_key`] survives,
//! and on a tie the earliest row wins. Survivors keep their input order, so
//! the policy is idempotent.

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::Track;

/// Which fields decide that two rows are the same track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    /// `(track_id, track_name, artist_name)`.
    #[default]
    Identity,
    /// `(track_id, track_name)`, for lists already scoped to one artist.
    Recording,
}

impl DedupKey {
    fn of(self, track: &Track) -> (&str, &str, Option<&str>) {
        match self {
            Self::Identity => (&track.track_id, &track.track_name, Some(&track.artist_name)),
            Self::Recording => (&track.track_id, &track.track_name, None),
        }
    }
}

/// Keep one row per [`DedupKey::Identity`].
pub fn deduplicate<T: Borrow<Track>>(rows: Vec<T>) -> Vec<T> {
    deduplicate_by(rows, DedupKey::Identity)
}

/// Keep one row per `key`.
pub fn deduplicate_by<T: Borrow<Track>>(rows: Vec<T>, key: DedupKey) -> Vec<T> {
    let keep = {
        let mut winners: HashMap<(&str, &str, Option<&str>), usize> =
            HashMap::with_capacity(rows.len());

        for (pos, row) in rows.iter().enumerate() {
            let track: &Track = row.borrow();
            match winners.entry(key.of(track)) {
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
                Entry::Occupied(mut slot) => {
                    let current: &Track = rows[*slot.get()].borrow();
                    if track.popularity_rank_key() > current.popularity_rank_key() {
                        slot.insert(pos);
                    }
                }
            }
        }

        let mut keep = vec![false; rows.len()];
        for pos in winners.into_values() {
            keep[pos] = true;
        }
        keep
    };

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}
