//! Prediction drivers

pub mod inference;

pub use inference::{format_prediction, SpreadPredictor};
