//! Dev-server configuration: the `server` record a Vite-style host tool
//! consumes at startup.
//!
//! The pipeline is discovery → parse → resolve → consume:
//!
//! ```text
//! vite.config.js  ──parse──▶  FileServerConfig (partial)
//!                                   │
//! CLI flags       ──────────▶  resolve (flags > file > defaults)
//!                                   │
//!                                   ▼
//!                             ServerConfig (final, read-only)
//!                              ├─ bind()        strict-port listener
//!                              └─ exclusions()  watch-ignore predicate
//! ```
//!
//! The resolved record is constructed once and never mutated; everything a
//! host startup routine needs is derived from it.

pub mod config;
pub mod loader;
pub mod port;
pub mod watch;

pub use config::{FileServerConfig, Overrides, ServerConfig, WatchConfig};
pub use loader::{find_config_file, load_config};
pub use port::bind;
pub use watch::WatchExclusions;
