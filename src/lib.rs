//! Water rocket motor simulation: thrust curves, impulse classes, and RASP export.
//!
//! The member crates are re-exported here alongside the evaluation pipeline
//! and the overlay [`store::CurveCollection`].

pub mod pipeline;
pub mod store;

pub use warms_config as config;
pub use warms_core as core;
pub use warms_export as export;
pub use warms_impulse as impulse;
pub use warms_thrust as thrust;

pub use pipeline::{Evaluation, EvaluationError, evaluate};
pub use store::CurveCollection;
