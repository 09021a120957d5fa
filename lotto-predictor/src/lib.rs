pub mod artifact;
pub mod config;
pub mod context;
pub mod dream;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod models;
pub mod predictor;
pub mod report;
pub mod sampler;

pub use context::PredictorContext;
pub use dream::analyze_dream;
pub use error::{PredictError, Result};
pub use predictor::Predictor;
