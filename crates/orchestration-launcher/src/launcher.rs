//! Spawning and controlling the orchestration server process

use async_process::{Command, Stdio};
use std::ffi::{OsStr, OsString};
use std::fmt;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::options::Options;

/// Name of the executable installed by the orchestration server package
pub const DEFAULT_PROGRAM: &str = "mongo-orchestration";

/// Control subcommand understood by the server executable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCommand {
    /// Launch the server
    Start,
    /// Stop a running server
    Stop,
    /// Stop and relaunch the server
    Restart,
}

impl ServerCommand {
    /// The positional argument the server CLI expects
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerCommand::Start => "start",
            ServerCommand::Stop => "stop",
            ServerCommand::Restart => "restart",
        }
    }
}

impl fmt::Display for ServerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Launcher for the orchestration server process
///
/// Runs the server executable's `start`/`stop`/`restart` subcommands with
/// the flags rendered from [`Options`]. The server daemonizes itself on a
/// successful `start`, so every subcommand is expected to exit promptly:
/// a clean exit resolves the call and anything else maps to an [`Error`].
#[derive(Debug, Clone)]
pub struct ServerLauncher {
    /// The server executable to run
    program: OsString,
}

impl ServerLauncher {
    /// Create a launcher for the `mongo-orchestration` executable on `PATH`
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
        }
    }

    /// Create a launcher for a specific server executable
    ///
    /// Used when the server lives in a virtualenv, or by tests pointing the
    /// launcher at a stub script.
    pub fn with_program<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
        }
    }

    /// The program this launcher runs
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Run the `start` subcommand and wait for it to exit
    pub async fn start(&self, options: &Options) -> Result<()> {
        self.run(ServerCommand::Start, options).await
    }

    /// Run the `stop` subcommand and wait for it to exit
    pub async fn stop(&self, options: &Options) -> Result<()> {
        self.run(ServerCommand::Stop, options).await
    }

    /// Run the `restart` subcommand and wait for it to exit
    pub async fn restart(&self, options: &Options) -> Result<()> {
        self.run(ServerCommand::Restart, options).await
    }

    /// Run one server subcommand and wait for it to exit
    pub async fn run(&self, command: ServerCommand, options: &Options) -> Result<()> {
        let args = options.to_args();
        let command_line = self.command_line(command, &args);
        debug!("Running: {}", command_line);

        let mut cmd = Command::new(&self.program);
        cmd.arg(command.as_str());
        cmd.args(&args);

        // The server forks on a successful start; null stdio keeps the
        // forked child from holding our pipes open.
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        let status = child.status().await?;

        if !status.success() {
            return Err(Error::non_zero_exit(command_line, status.code()));
        }

        info!("Server command completed: {} {}", self.program.to_string_lossy(), command);
        Ok(())
    }

    /// The full command line, for logs and error messages
    fn command_line(&self, command: ServerCommand, args: &[OsString]) -> String {
        let mut line = format!("{} {}", self.program.to_string_lossy(), command);
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::command_not_found(self.program.to_string_lossy())
        } else {
            Error::spawn_failed(format!(
                "Failed to spawn {}: {}",
                self.program.to_string_lossy(),
                source
            ))
        }
    }
}

impl Default for ServerLauncher {
    fn default() -> Self {
        Self::new()
    }
}
