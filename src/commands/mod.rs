//! CLI command implementations.
//!
//! Each submodule covers one area of the API and prints its results to stdout.
//! Commands take the client (and the runtime when they read files or prompt)
//! so they can be driven by mocks in tests.

pub mod auth;
pub mod config;
pub mod expense;
pub mod map;
mod paths;
pub mod plan;
pub mod voice;

pub use config::{CliClient, Config, DEFAULT_API_URL};
pub use paths::default_config_dir;
