//! Startup options for the orchestration server

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Bind address used when none is configured
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 8888;

/// Startup options for the orchestration server
///
/// Each field maps to one CLI flag of the server executable. Unset fields
/// are omitted from the rendered command line, except `bind` and `port`
/// which always render with their defaults applied so the client side
/// knows exactly where the server will listen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Path to the server releases config file (`--config`)
    pub config: Option<PathBuf>,
    /// Default release environment from the config file (`--env`)
    pub env: Option<String>,
    /// Address the server binds to (`--bind`, default `127.0.0.1`)
    pub bind: Option<String>,
    /// Port the server listens on (`--port`, default `8888`)
    pub port: Option<u16>,
    /// Path the server writes its pidfile to (`--pidfile`)
    pub pidfile: Option<PathBuf>,
    /// WSGI server implementation, `cherrypy` or `wsgiref` (`--server`)
    pub server: Option<String>,
    /// Enable majority read concern on launched deployments
    /// (`--enable-majority-read-concern`)
    pub enable_majority_read_concern: bool,
    /// Keep the server in the foreground (`--no-fork`)
    pub no_fork: bool,
    /// Socket timeout for connections to managed deployments, in
    /// milliseconds (`--socket-timeout-ms`)
    pub socket_timeout_ms: Option<u64>,
}

impl Options {
    /// The bind address with the default applied
    pub fn bind(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    /// The port with the default applied
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Merge `overrides` over `self`, field by field
    ///
    /// Set fields in `overrides` win; everything else keeps the base value.
    /// Neither input is modified.
    pub fn merged(&self, overrides: &Options) -> Options {
        Options {
            config: overrides.config.clone().or_else(|| self.config.clone()),
            env: overrides.env.clone().or_else(|| self.env.clone()),
            bind: overrides.bind.clone().or_else(|| self.bind.clone()),
            port: overrides.port.or(self.port),
            pidfile: overrides.pidfile.clone().or_else(|| self.pidfile.clone()),
            server: overrides.server.clone().or_else(|| self.server.clone()),
            enable_majority_read_concern: overrides.enable_majority_read_concern
                || self.enable_majority_read_concern,
            no_fork: overrides.no_fork || self.no_fork,
            socket_timeout_ms: overrides.socket_timeout_ms.or(self.socket_timeout_ms),
        }
    }

    /// Render the flags for the server command line
    ///
    /// Value flags render as two arguments (`--flag value`). `--bind` and
    /// `--port` are always emitted with the defaults applied; every other
    /// flag is emitted only when its field is set.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        if let Some(config) = &self.config {
            args.push("--config".into());
            args.push(config.clone().into());
        }
        if let Some(env) = &self.env {
            args.push("--env".into());
            args.push(env.clone().into());
        }
        args.push("--bind".into());
        args.push(self.bind().into());
        args.push("--port".into());
        args.push(self.port().to_string().into());
        if let Some(pidfile) = &self.pidfile {
            args.push("--pidfile".into());
            args.push(pidfile.clone().into());
        }
        if let Some(server) = &self.server {
            args.push("--server".into());
            args.push(server.clone().into());
        }
        if self.enable_majority_read_concern {
            args.push("--enable-majority-read-concern".into());
        }
        if self.no_fork {
            args.push("--no-fork".into());
        }
        if let Some(timeout) = self.socket_timeout_ms {
            args.push("--socket-timeout-ms".into());
            args.push(timeout.to_string().into());
        }

        args
    }
}
