//! Process launcher for the mongo-orchestration server
//!
//! This crate spawns and controls the external `mongo-orchestration`
//! executable: it renders startup options into its CLI flags, runs the
//! `start`/`stop`/`restart` subcommands, and maps spawn and exit failures
//! into typed errors.

#![warn(missing_docs)]

pub mod error;
pub mod launcher;
pub mod options;

pub use error::{Error, Result};
pub use launcher::{DEFAULT_PROGRAM, ServerCommand, ServerLauncher};
pub use options::{DEFAULT_BIND, DEFAULT_PORT, Options};
