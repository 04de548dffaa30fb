use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Nothing survived load-time filtering; the catalog cannot serve queries.
    #[error("catalog is empty after loading {rows_ingested} rows")]
    EmptyCatalog { rows_ingested: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
