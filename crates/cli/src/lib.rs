//! `spacekeeper-cli` library crate.
//!
//! Argument parsing, configuration and the run driver behind the `cleanup`
//! binary. The binary entrypoint lives in `main.rs`.

pub mod app;
pub mod cli;
pub mod config;
