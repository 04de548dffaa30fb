pub mod config;
pub mod query;
pub mod status;

use anyhow::{Context, Result};
use serde::Serialize;
use sonance_core::schema::Database;
use sonance_search::QueryEngine;

use crate::config::Config;

pub use query::{run_artist, run_compare, run_mood, run_recommend, run_time_machine};
pub use status::show_status;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Open the configured database and build a query engine from it.
pub fn load_engine(config: &Config) -> Result<QueryEngine> {
    let db = Database::open(&config.database_path).with_context(|| {
        format!("Failed to open database at {}", config.database_path.display())
    })?;
    let rows = db.load_raw_rows().context("Failed to read track rows")?;
    log::debug!(
        "Read {} rows from {}",
        rows.len(),
        config.database_path.display()
    );

    QueryEngine::initialize(rows, config.engine.options()).with_context(|| {
        format!(
            "Failed to build catalog from {}",
            config.database_path.display()
        )
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}
