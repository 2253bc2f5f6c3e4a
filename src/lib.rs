// src/lib.rs
pub mod cadence;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod table;

pub use error::AnalysisError;
