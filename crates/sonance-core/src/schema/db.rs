use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;
use crate::model::{FeatureVector, RawTrackRow, Track};

use super::migrations::MIGRATIONS;

/// Joins every track with its features, popularity facts, artist, and date.
///
/// One output row per popularity fact; ordered by identity and then by
/// popularity so the best-ranked variant of a track comes first.
const LOAD_ROWS_SQL: &str = "
    SELECT t.track_id, t.track_name, a.artist_name,
           f.danceability, f.energy, f.loudness, f.speechiness,
           f.acousticness, f.instrumentalness, f.liveness, f.valence, f.tempo,
           tm.full_date, p.popularity
    FROM dim_track t
    JOIN fact_music_features f ON t.track_id = f.track_id
    JOIN fact_track_popularity p ON t.track_id = p.track_id
    JOIN dim_artist a ON p.artist_id = a.artist_id
    JOIN dim_time tm ON p.time_id = tm.time_id
    ORDER BY t.track_id, t.track_name, a.artist_name, p.popularity DESC";

/// A database connection exposing the star schema the catalog loads from.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Catalog loading
impl Database {
    /// Load every joined track row, unvalidated.
    pub fn load_raw_rows(&self) -> Result<Vec<RawTrackRow>> {
        let mut stmt = self.conn.prepare(LOAD_ROWS_SQL)?;
        let rows = stmt
            .query_map([], row_to_raw)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::info!("Loaded {} joined rows from storage", rows.len());
        Ok(rows)
    }
}

fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawTrackRow> {
    let full_date: Option<String> = row.get(12)?;

    Ok(RawTrackRow {
        track_id: row.get(0)?,
        track_name: row.get(1)?,
        artist_name: row.get(2)?,
        danceability: row.get(3)?,
        energy: row.get(4)?,
        loudness: row.get(5)?,
        speechiness: row.get(6)?,
        acousticness: row.get(7)?,
        instrumentalness: row.get(8)?,
        liveness: row.get(9)?,
        valence: row.get(10)?,
        tempo: row.get(11)?,
        year: full_date.as_deref().and_then(year_of),
        popularity: row.get(13)?,
    })
}

/// Release year of a `YYYY-MM-DD` (optionally with time) date string.
fn year_of(full_date: &str) -> Option<i32> {
    let s = full_date.trim();
    let year = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.year())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|d| d.year()));

    match year {
        Ok(year) => Some(year),
        Err(e) => {
            log::debug!("Unparseable date {:?}: {}", full_date, e);
            None
        }
    }
}

// Row insertion
impl Database {
    pub fn insert_artist(&self, artist_id: &str, artist_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO dim_artist (artist_id, artist_name) VALUES (?1, ?2)",
            rusqlite::params![artist_id, artist_name],
        )?;
        Ok(())
    }

    pub fn insert_track(&self, track_id: &str, track_name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO dim_track (track_id, track_name) VALUES (?1, ?2)",
            rusqlite::params![track_id, track_name],
        )?;
        Ok(())
    }

    pub fn insert_time(&self, time_id: i64, full_date: NaiveDate) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO dim_time (time_id, full_date) VALUES (?1, ?2)",
            rusqlite::params![time_id, full_date.format("%Y-%m-%d").to_string()],
        )?;
        Ok(())
    }

    pub fn insert_features(
        &self,
        track_id: &str,
        features: &FeatureVector,
        tempo: Option<f64>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO fact_music_features (
                track_id, danceability, energy, loudness, speechiness,
                acousticness, instrumentalness, liveness, valence, tempo
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                track_id,
                features.danceability,
                features.energy,
                features.loudness,
                features.speechiness,
                features.acousticness,
                features.instrumentalness,
                features.liveness,
                features.valence,
                tempo,
            ],
        )?;
        Ok(())
    }

    pub fn insert_popularity(
        &self,
        track_id: &str,
        artist_id: &str,
        time_id: i64,
        popularity: Option<f64>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO fact_track_popularity (track_id, artist_id, time_id, popularity)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![track_id, artist_id, time_id, popularity],
        )?;
        Ok(())
    }

    /// Insert a fully described track, creating its artist and date rows as
    /// needed.
    ///
    /// The artist name doubles as its id, and a known year is stored as
    /// January 1st of that year. Tracks without a year cannot be expressed
    /// as a date and share time id 0, whose date is NULL.
    pub fn insert_catalog_track(&self, track: &Track) -> Result<()> {
        self.insert_artist(&track.artist_name, &track.artist_name)?;
        self.insert_track(&track.track_id, &track.track_name)?;
        self.insert_features(&track.track_id, &track.features, track.tempo)?;

        let time_id = match track.year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)) {
            Some(date) => {
                let time_id = i64::from(date.year());
                self.insert_time(time_id, date)?;
                time_id
            }
            None => {
                self.conn.execute(
                    "INSERT OR IGNORE INTO dim_time (time_id, full_date) VALUES (0, NULL)",
                    [],
                )?;
                0
            }
        };

        self.insert_popularity(
            &track.track_id,
            &track.artist_name,
            time_id,
            track.popularity,
        )
    }
}
