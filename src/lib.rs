//! Engine library for a public-sector procurement marketplace: the status
//! transition tables, score aggregation, and panel consensus rules that
//! govern opportunities and proposals across the Code With Us, Sprint
//! With Us, and Team With Us competition mechanisms.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::EngineError;
