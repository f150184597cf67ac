pub mod config;
pub mod constants;
pub mod engine;

pub use config::{BikeVariant, ScoringConfig};
pub use engine::{calculate_score, Direction, FactorContribution, ScoreResult, Sentinel};
