//! Core - error types and logging shared by every layer of the engine

pub mod error;
pub mod logging;
