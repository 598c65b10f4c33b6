//! Model training

pub mod metrics;
pub mod trainer;

pub use metrics::{mean_absolute_error, root_mean_squared_error, ValidationReport};
pub use trainer::{SpreadTrainer, TrainedSpreadModel};
