pub mod config;
pub mod console;
pub mod data_retrieval;
pub mod edge;
pub mod engine;
pub mod error;
pub mod http_cache;
pub mod http_client;
pub mod injuries;
pub mod metrics;
pub mod predict;
pub mod table;
pub mod weather;

pub use engine::{Matchup, Prediction, predict};
pub use error::EngineError;
