//! SQLite storage the catalog is loaded from.

pub mod db;
pub mod migrations;

pub use db::Database;
