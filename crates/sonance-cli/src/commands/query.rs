use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sonance_core::{Feature, Track};
use sonance_search::QueryEngine;

use super::{print_json, Format};

pub fn run_recommend(engine: &QueryEngine, track: &str, format: Format) -> Result<()> {
    let rec = engine.recommend(track)?;

    if format == Format::Json {
        return print_json(&rec);
    }

    println!("\n🎧 Tracks like {}\n", describe(rec.input));
    if rec.recommendations.is_empty() {
        println!("  No similar tracks in the catalog.");
    }
    for (i, similar) in rec.recommendations.iter().enumerate() {
        println!(
            "  {:>2}. {}  (distance {:.4})",
            i + 1,
            describe(similar.track),
            similar.distance
        );
    }
    Ok(())
}

pub fn run_mood(engine: &QueryEngine, mood: &str, seed: Option<u64>, format: Format) -> Result<()> {
    let playlist = match seed {
        Some(seed) => engine.mood_playlist_with_rng(mood, &mut StdRng::seed_from_u64(seed))?,
        None => engine.mood_playlist(mood)?,
    };

    if format == Format::Json {
        return print_json(&playlist);
    }

    println!("\n🎶 {} playlist\n", mood.trim().to_lowercase());
    if playlist.is_empty() {
        println!("  No tracks fit this mood.");
    }
    print_numbered(&playlist);
    Ok(())
}

pub fn run_compare(engine: &QueryEngine, first: &str, second: &str, format: Format) -> Result<()> {
    let (a, b) = engine.compare(first, second)?;

    if format == Format::Json {
        return print_json(&[a, b]);
    }

    println!("\n⚖️  {}\n   vs {}\n", describe(a), describe(b));
    println!("  {:<18} {:>10} {:>10}", "", "first", "second");
    for feature in Feature::ALL {
        println!(
            "  {:<18} {:>10.3} {:>10.3}",
            feature.name(),
            a.features.get(feature),
            b.features.get(feature)
        );
    }
    println!(
        "  {:<18} {:>10} {:>10}",
        "popularity",
        optional(a.popularity),
        optional(b.popularity)
    );
    Ok(())
}

pub fn run_time_machine(engine: &QueryEngine, year: i32, format: Format) -> Result<()> {
    let tracks = engine.time_machine(year)?;

    if format == Format::Json {
        return print_json(&tracks);
    }

    println!("\n⏳ Most energetic tracks of {year}\n");
    print_numbered(&tracks);
    Ok(())
}

pub fn run_artist(engine: &QueryEngine, name: &str, format: Format) -> Result<()> {
    let artist = engine.artist_songs(name)?;

    if format == Format::Json {
        return print_json(&artist);
    }

    println!("\n🎤 {} ({} tracks)\n", artist.artist, artist.songs.len());
    for (i, track) in artist.songs.iter().enumerate() {
        println!(
            "  {:>2}. {}  (energy {:.3})",
            i + 1,
            track.track_name,
            track.energy()
        );
    }
    Ok(())
}

fn print_numbered(tracks: &[&Track]) {
    for (i, track) in tracks.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, describe(track));
    }
}

fn describe(track: &Track) -> String {
    match track.year {
        Some(year) => format!("{} by {} ({year})", track.track_name, track.artist_name),
        None => format!("{} by {}", track.track_name, track.artist_name),
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{v:.1}"))
}
