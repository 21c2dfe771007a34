// src/config/mod.rs

//! Configuration loading and validation for vigil.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk or from a string (`loader.rs`).
//! - Validate task definitions before anything runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, RuntimeSection, TaskConfig, TaskKindConfig, WatchSection};
pub use validate::validate_config;
