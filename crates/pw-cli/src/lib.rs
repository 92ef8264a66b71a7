//! Pathway CLI library.
//!
//! This crate provides the CLI interface for the pathway network builder:
//! input loading and cleaning, the command surface, and CSV output.

mod cli;
pub mod commands;
mod config;
pub mod dataset;
pub mod output;

pub use cli::{BatchArgs, BuildArgs, Cli, Commands};
pub use config::Config;
