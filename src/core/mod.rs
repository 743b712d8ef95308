//! Core types and constants for the overlay engine

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
