//! `slipway config` command implementation.
//!
//! Resolves the effective server configuration (CLI flags over config file
//! over built-in defaults) and prints it, human-readable or as a single
//! stable JSON object.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use slipway_core::server::config::{Overrides, ServerConfig};
use slipway_core::server::load_config;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Schema version of the `--json` output. Bump on breaking shape changes.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Config command action.
#[derive(Debug, Clone)]
pub struct ConfigAction {
    /// Working directory (project root).
    pub cwd: PathBuf,
    /// Explicit config file path (overrides auto-discovery).
    pub config: Option<PathBuf>,
    /// Explicit CLI overrides.
    pub overrides: Overrides,
}

/// Stable JSON output for `slipway config --json`.
#[derive(Serialize)]
struct ConfigReport {
    config_schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    server: ServerConfig,
}

/// Run the config command.
///
/// When `json` is true, outputs a single JSON object to stdout. Otherwise,
/// outputs human-readable formatted text.
pub fn run(action: &ConfigAction, json: bool) -> Result<()> {
    let (config_file, resolved) = resolve(action)?;

    let report = ConfigReport {
        config_schema_version: CONFIG_SCHEMA_VERSION,
        config_file: config_file.map(|p| display_relative(&p, &action.cwd)),
        server: resolved,
    };

    if json {
        print_json(&report)
    } else {
        print_human(&report)
    }
}

/// Load the config file (if any) and resolve the final record.
pub fn resolve(action: &ConfigAction) -> Result<(Option<PathBuf>, ServerConfig)> {
    let loaded = load_config(&action.cwd, action.config.as_deref()).into_diagnostic()?;

    let (config_file, file_config) = match loaded {
        Some((path, file_config)) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            (Some(path), Some(file_config))
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            (None, None)
        }
    };

    let resolved =
        ServerConfig::resolve(file_config.as_ref(), &action.overrides).into_diagnostic()?;

    Ok((config_file, resolved))
}

fn print_json(report: &ConfigReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_human(report: &ConfigReport) -> Result<()> {
    let mut out = io::stdout().lock();
    let server = &report.server;

    w(&mut out, "\x1b[1m## Server\x1b[0m\n")?;
    w(
        &mut out,
        &format!(
            "  Port:           {} {}\n",
            server.port,
            if server.strict_port {
                "(strict)"
            } else {
                "(fallback allowed)"
            }
        ),
    )?;
    w(&mut out, &format!("  Host:           {}\n", server.host))?;
    w(
        &mut out,
        &format!(
            "  Open browser:   {}\n",
            if server.open { "yes" } else { "no" }
        ),
    )?;
    w(
        &mut out,
        &format!(
            "  Config file:    {}\n",
            report.config_file.as_deref().unwrap_or("(defaults)")
        ),
    )?;
    w(&mut out, "\n")?;

    w(&mut out, "\x1b[1m## Watch exclusions\x1b[0m\n")?;
    if server.watch.ignored.is_empty() {
        w(&mut out, "  (none)\n")?;
    } else {
        for pattern in &server.watch.ignored {
            w(&mut out, &format!("  - {pattern}\n"))?;
        }
    }

    Ok(())
}

fn w(out: &mut impl Write, s: &str) -> Result<()> {
    out.write_all(s.as_bytes()).into_diagnostic()
}

/// Show the config path relative to the project root when possible.
fn display_relative(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd).unwrap_or(path).display().to_string()
}
