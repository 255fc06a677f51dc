//! # prosperez-core
//!
//! Core types, traits, configuration, and error handling for the Prosperez bot.

pub mod config;
pub mod error;
pub mod heap;
pub mod message;
pub mod traits;

pub use config::shellexpand;
