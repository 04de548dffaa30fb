/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Artists
CREATE TABLE IF NOT EXISTS dim_artist (
    artist_id TEXT PRIMARY KEY,
    artist_name TEXT
);

-- Tracks (titles only; performers come through popularity facts)
CREATE TABLE IF NOT EXISTS dim_track (
    track_id TEXT PRIMARY KEY,
    track_name TEXT
);

-- Calendar dates that popularity measurements refer to
CREATE TABLE IF NOT EXISTS dim_time (
    time_id INTEGER PRIMARY KEY,
    full_date TEXT
);

-- Audio features (nullable: incomplete rows are dropped at catalog build)
CREATE TABLE IF NOT EXISTS fact_music_features (
    track_id TEXT NOT NULL REFERENCES dim_track(track_id),
    danceability REAL,
    energy REAL,
    loudness REAL,
    speechiness REAL,
    acousticness REAL,
    instrumentalness REAL,
    liveness REAL,
    valence REAL,
    tempo REAL
);

CREATE INDEX IF NOT EXISTS idx_features_track_id ON fact_music_features(track_id);

-- Popularity measurements linking a track to an artist at a point in time
CREATE TABLE IF NOT EXISTS fact_track_popularity (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    track_id TEXT NOT NULL REFERENCES dim_track(track_id),
    artist_id TEXT NOT NULL REFERENCES dim_artist(artist_id),
    time_id INTEGER NOT NULL REFERENCES dim_time(time_id),
    popularity REAL
);

CREATE INDEX IF NOT EXISTS idx_popularity_track_id ON fact_track_popularity(track_id);
CREATE INDEX IF NOT EXISTS idx_popularity_artist_id ON fact_track_popularity(artist_id);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "star_schema",
    sql: MIGRATION_001,
}];
