//! The conductor: serialized lifecycle and request control
//!
//! A [`Conductor`] owns one logical orchestration server target
//! (host:port). Lifecycle commands (`start`/`stop`/`restart`) and every
//! request issued through [`crud`](Conductor::crud) funnel through one
//! [`CommandQueue`], so a request submitted right after `start()` cannot
//! race ahead of the startup command.

use std::sync::Arc;
use tracing::info;

use orchestration_launcher::{Options, ServerCommand, ServerLauncher};

use crate::crud::Crud;
use crate::error::{Error, Result};
use crate::queue::CommandQueue;
use crate::transport::{HttpTransport, QueuedTransport, Transport};

fn address_for(options: &Options) -> String {
    format!("{}:{}", options.bind(), options.port())
}

fn base_url_for(options: &Options) -> String {
    format!("http://{}/v1", address_for(options))
}

/// Serialized controller for one orchestration server target
///
/// Construction takes an immutable [`Options`] snapshot; the accessors
/// (`port`, `binding`, `address`, `base_url`) derive from that snapshot
/// and never change. Lifecycle calls and CRUD requests execute in strict
/// submission order, one at a time; an error in one queued operation is
/// delivered to its own caller and never blocks the operations behind it.
pub struct Conductor {
    options: Options,
    launcher: ServerLauncher,
    queue: Arc<CommandQueue>,
    crud: Crud,
}

impl Conductor {
    /// Create a conductor with the default launcher and HTTP transport
    pub fn new(options: Options) -> Self {
        Self::builder().with_options(options).build()
    }

    /// Start building a conductor with substituted collaborators
    pub fn builder() -> ConductorBuilder {
        ConductorBuilder::new()
    }

    /// The port the orchestration server listens on
    pub fn port(&self) -> u16 {
        self.options.port()
    }

    /// The address the orchestration server binds to
    pub fn binding(&self) -> &str {
        self.options.bind()
    }

    /// `{binding}:{port}`
    pub fn address(&self) -> String {
        address_for(&self.options)
    }

    /// The API root, `http://{binding}:{port}/v1`
    pub fn base_url(&self) -> String {
        base_url_for(&self.options)
    }

    /// The resource-addressing client for this conductor's server
    ///
    /// Rooted at [`base_url`](Conductor::base_url); every request it
    /// issues shares the conductor's command queue.
    pub fn crud(&self) -> &Crud {
        &self.crud
    }

    /// Submit an operation behind everything already queued
    ///
    /// The operation's queue position is claimed at call time. Its body
    /// runs only after every earlier lifecycle command and request has
    /// settled, and its result or error goes to this caller alone.
    pub fn run<F, Fut, T>(&self, op: F) -> impl Future<Output = T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.queue.run(op)
    }

    /// Claim the next queue slot for one lifecycle command
    ///
    /// The slot is claimed before this returns, so the command's place in
    /// the submission order is fixed even if the returned future is
    /// polled late.
    fn enqueue(
        &self,
        command: ServerCommand,
        options: Options,
    ) -> impl Future<Output = orchestration_launcher::Result<()>> {
        let launcher = self.launcher.clone();
        self.queue
            .run(move || async move { launcher.run(command, &options).await })
    }

    /// Enqueue a server start with the construction-time options
    pub fn start(&self) -> impl Future<Output = Result<()>> {
        self.start_with(Options::default())
    }

    /// Enqueue a server start with overrides merged over the snapshot
    pub fn start_with(&self, overrides: Options) -> impl Future<Output = Result<()>> {
        let entry = self.enqueue(ServerCommand::Start, self.options.merged(&overrides));
        let address = self.address();
        async move {
            entry.await.map_err(Error::Startup)?;
            info!("Orchestration server started at {}", address);
            Ok(())
        }
    }

    /// Enqueue a server stop with the construction-time options
    pub fn stop(&self) -> impl Future<Output = Result<()>> {
        self.stop_with(Options::default())
    }

    /// Enqueue a server stop with overrides merged over the snapshot
    pub fn stop_with(&self, overrides: Options) -> impl Future<Output = Result<()>> {
        let entry = self.enqueue(ServerCommand::Stop, self.options.merged(&overrides));
        let address = self.address();
        async move {
            entry.await.map_err(Error::Shutdown)?;
            info!("Orchestration server stopped at {}", address);
            Ok(())
        }
    }

    /// Enqueue a server restart with the construction-time options
    pub fn restart(&self) -> impl Future<Output = Result<()>> {
        self.restart_with(Options::default())
    }

    /// Enqueue a server restart with overrides merged over the snapshot
    pub fn restart_with(&self, overrides: Options) -> impl Future<Output = Result<()>> {
        let entry = self.enqueue(ServerCommand::Restart, self.options.merged(&overrides));
        let address = self.address();
        async move {
            entry.await.map_err(Error::Restart)?;
            info!("Orchestration server restarted at {}", address);
            Ok(())
        }
    }
}

/// Builder for [`Conductor`] instances
///
/// Defaults to [`HttpTransport`] and the `mongo-orchestration` executable
/// on `PATH`; tests substitute a recording transport and a stub program.
pub struct ConductorBuilder {
    options: Options,
    transport: Option<Arc<dyn Transport>>,
    launcher: Option<ServerLauncher>,
}

impl ConductorBuilder {
    /// Create a builder with default options and collaborators
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            transport: None,
            launcher: None,
        }
    }

    /// Set the startup options snapshot
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Substitute the transport used for API requests
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Substitute the launcher used for lifecycle commands
    pub fn with_launcher(mut self, launcher: ServerLauncher) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Build the conductor
    pub fn build(self) -> Conductor {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));
        let launcher = self.launcher.unwrap_or_default();
        let queue = Arc::new(CommandQueue::new());

        let crud = Crud::new(
            base_url_for(&self.options),
            Arc::new(QueuedTransport::new(Arc::clone(&queue), transport)),
        );

        Conductor {
            options: self.options,
            launcher,
            queue,
            crud,
        }
    }
}

impl Default for ConductorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_with_defaults() {
        let conductor = Conductor::new(Options::default());
        assert_eq!(conductor.binding(), "127.0.0.1");
        assert_eq!(conductor.port(), 8888);
        assert_eq!(conductor.address(), "127.0.0.1:8888");
        assert_eq!(conductor.base_url(), "http://127.0.0.1:8888/v1");
    }

    #[test]
    fn test_accessors_follow_the_options_snapshot() {
        let conductor = Conductor::new(Options {
            bind: Some("0.0.0.0".to_string()),
            port: Some(9000),
            ..Options::default()
        });
        assert_eq!(conductor.address(), "0.0.0.0:9000");
        assert_eq!(conductor.base_url(), "http://0.0.0.0:9000/v1");
    }

    #[test]
    fn test_crud_is_rooted_at_the_base_url() {
        let conductor = Conductor::new(Options {
            port: Some(9000),
            ..Options::default()
        });
        assert_eq!(conductor.crud().base_url(), conductor.base_url());
    }
}
