//! Village league tennis lineup builder: candidate generation, interactive
//! assignment and exhaustive lineup search, plus the CSV, CLI and web
//! collaborators around them.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod lineup;
pub mod parser;
pub mod web;

pub use error::{LineupError, Result};
