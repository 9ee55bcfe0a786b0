//! The `ServerConfig` record and its resolution rules.
//!
//! Values come from three layers, highest precedence first: explicit CLI
//! flags, the project config file, built-in defaults. The defaults are the
//! Tauri template's: frontend on port 1420, strict port (the native shell
//! expects the dev URL it was given, so silent port fallback would break it),
//! and the native-shell directory excluded from watching.

use crate::error::Error;
use crate::server::watch::WatchExclusions;
use serde::Serialize;

/// Default dev-server port.
pub const DEFAULT_PORT: u16 = 1420;

/// Default host to bind to.
pub const DEFAULT_HOST: &str = "localhost";

/// Directories excluded from file-change observation by default.
pub const DEFAULT_WATCH_IGNORED: &[&str] = &["**/src-tauri/**"];

/// Resolved server configuration, read-only after [`ServerConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Fail startup instead of falling back to another port.
    pub strict_port: bool,
    /// Host to bind to.
    pub host: String,
    /// Open browser automatically.
    pub open: bool,
    /// File-watching options.
    pub watch: WatchConfig,
}

/// File-watching section of the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchConfig {
    /// Glob patterns excluded from change observation. Order-preserving,
    /// duplicate-free.
    pub ignored: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            strict_port: true,
            host: DEFAULT_HOST.to_string(),
            open: false,
            watch: WatchConfig {
                ignored: DEFAULT_WATCH_IGNORED
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            },
        }
    }
}

/// Partial server configuration as loaded from a config file.
///
/// Every field is optional; absent fields fall through to CLI flags or
/// built-in defaults during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileServerConfig {
    /// `server.port`
    pub port: Option<u16>,
    /// `server.strictPort`
    pub strict_port: Option<bool>,
    /// `server.host`
    pub host: Option<String>,
    /// `server.open`
    pub open: Option<bool>,
    /// `server.watch.ignored`. `Some(vec![])` is an explicit empty set and
    /// suppresses the default exclusions.
    pub watch_ignored: Option<Vec<String>>,
}

/// Explicit CLI overrides. Only flags the user actually passed are `Some`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub strict_port: Option<bool>,
    pub host: Option<String>,
}

impl ServerConfig {
    /// Resolve the final configuration from an optional file config and CLI
    /// overrides.
    ///
    /// Validates the port range and compiles the exclusion patterns so a
    /// bad config fails here, at startup, rather than at first use.
    pub fn resolve(
        file: Option<&FileServerConfig>,
        overrides: &Overrides,
    ) -> Result<Self, Error> {
        let defaults = Self::default();

        let port = overrides
            .port
            .or_else(|| file.and_then(|f| f.port))
            .unwrap_or(defaults.port);
        if port == 0 {
            return Err(Error::InvalidPort {
                port: u32::from(port),
            });
        }

        let strict_port = overrides
            .strict_port
            .or_else(|| file.and_then(|f| f.strict_port))
            .unwrap_or(defaults.strict_port);

        let host = overrides
            .host
            .clone()
            .or_else(|| file.and_then(|f| f.host.clone()))
            .unwrap_or(defaults.host);

        let open = file.and_then(|f| f.open).unwrap_or(defaults.open);

        let ignored = match file.and_then(|f| f.watch_ignored.clone()) {
            Some(patterns) => dedup_preserving_order(patterns),
            None => defaults.watch.ignored,
        };

        let resolved = Self {
            port,
            strict_port,
            host,
            open,
            watch: WatchConfig { ignored },
        };

        // Surface invalid glob patterns as a configuration error.
        resolved.exclusions()?;

        Ok(resolved)
    }

    /// Compile the watch-exclusion patterns into a matchable predicate.
    pub fn exclusions(&self) -> Result<WatchExclusions, Error> {
        WatchExclusions::compile(&self.watch.ignored)
    }
}

/// Drop duplicate patterns, keeping the first occurrence of each.
fn dedup_preserving_order(patterns: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    patterns
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
