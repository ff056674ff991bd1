//! Samples strings from a text corpus that satisfy named complexity
//! policies, writing one artifact per policy.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod job;
pub mod output;
pub mod pipeline;

pub use error::{Result, SampleError};
