//! Client for the mongo-orchestration server
//!
//! This crate talks to a running [mongo-orchestration] server over its
//! REST API and controls its process lifecycle through the companion
//! `orchestration-launcher` crate. Two pieces cooperate:
//!
//! - the [`Conductor`], which owns one server target and serializes all
//!   lifecycle commands and API requests into a single submission order,
//!   so a request issued right after `start()` cannot race ahead of the
//!   startup command;
//! - the [`Crud`] resource tree, stateless `{base_url, transport}`
//!   handles that compose URLs for servers, replica sets, members,
//!   sharded clusters, shards and routers, and delegate each request to
//!   an injected [`Transport`].
//!
//! The default transport performs real HTTP with `reqwest`; tests inject
//! recording doubles instead.
//!
//! ```no_run
//! use orchestration_client::{Conductor, Options};
//! use serde_json::json;
//!
//! # async fn example() -> orchestration_client::Result<()> {
//! let conductor = Conductor::new(Options::default());
//! conductor.start().await?;
//! let status = conductor
//!     .crud()
//!     .upsert_server("s1", json!({"name": "mongod"}))
//!     .await?;
//! conductor.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [mongo-orchestration]: https://github.com/10gen/mongo-orchestration

#![warn(missing_docs)]

pub mod conductor;
pub mod crud;
pub mod error;
pub mod queue;
pub mod transport;

pub use conductor::{Conductor, ConductorBuilder};
pub use crud::{
    Crud, MemberHandle, ReplicaSetHandle, ResourceHandle, RouterHandle, ServerHandle,
    ShardHandle, ShardedClusterHandle,
};
pub use error::{Error, Result};
pub use queue::CommandQueue;
pub use transport::{HttpTransport, Method, QueuedTransport, Transport};

// Re-export the launcher types embedders need to configure a conductor.
pub use orchestration_launcher::{
    Error as LauncherError, Options, ServerCommand, ServerLauncher,
};
