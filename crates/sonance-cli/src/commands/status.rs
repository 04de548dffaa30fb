use anyhow::Result;
use serde_json::json;

use super::{load_engine, print_json, Format};
use crate::config::Config;

pub fn show_status(config: &Config, format: Format) -> Result<()> {
    let engine = load_engine(config)?;
    let catalog = engine.catalog();
    let stats = catalog.stats();
    let years = catalog.years();

    if format == Format::Json {
        return print_json(&json!({
            "database": config.database_path,
            "tracks": catalog.len(),
            "rows_ingested": stats.rows_ingested,
            "rows_incomplete": stats.rows_incomplete,
            "rows_zero_vector": stats.rows_zero_vector,
            "rows_duplicate": stats.rows_duplicate,
            "first_year": years.first(),
            "last_year": years.last(),
        }));
    }

    println!("\n📊 Sonance Status\n");
    println!("  Database: {}", config.database_path.display());
    println!("  Tracks: {}", catalog.len());
    println!("  Rows read: {}", stats.rows_ingested);
    println!("    incomplete: {}", stats.rows_incomplete);
    println!("    all-zero features: {}", stats.rows_zero_vector);
    println!("    duplicates collapsed: {}", stats.rows_duplicate);

    match (years.first(), years.last()) {
        (Some(first), Some(last)) => {
            println!("  Years: {first}-{last} ({} distinct)", years.len());
        }
        _ => println!("  Years: none recorded"),
    }

    Ok(())
}
