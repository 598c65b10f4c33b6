//! Leak-free feature engineering
//!
//! Converts an ordered game log into model-ready feature tables. Every
//! value in a row is a function of games strictly before the row's date.

pub mod builder;
pub mod rating;
pub mod rolling;
pub mod state;

pub use builder::{
    build_matchup_table, build_training_table, FeatureEngine, FeatureTable, TrainingTable,
};
pub use rating::EloConfig;
pub use rolling::WindowSummary;
pub use state::{TeamState, TeamStateStore};
