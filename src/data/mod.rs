//! Data access: SQLite storage, CSV ingestion, name normalization

pub mod csv_import;
pub mod database;
pub mod team_map;

pub use csv_import::{read_schedule_csv, read_season_csv, RawGame, RawMatchup};
pub use database::{Database, DatabaseStats};
pub use team_map::TeamNameMap;
