//! `slipway check` command implementation.
//!
//! Doctor-style startup validation: resolve the configuration, compile the
//! exclusion globs, and probe the port under the strict-port policy. Exits
//! non-zero when startup would fail.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use slipway_core::server::config::{Overrides, ServerConfig};
use slipway_core::server::{bind, WatchExclusions};
use std::io::{self, Write};
use std::path::PathBuf;

use super::config::{resolve, ConfigAction};

/// Check command action.
#[derive(Debug, Clone)]
pub struct CheckAction {
    /// Working directory (project root).
    pub cwd: PathBuf,
    /// Explicit config file path (overrides auto-discovery).
    pub config: Option<PathBuf>,
    /// Explicit CLI overrides.
    pub overrides: Overrides,
}

/// Stable JSON output for `slipway check --json`.
#[derive(Serialize)]
struct CheckReport {
    ok: bool,
    port: u16,
    strict_port: bool,
    host: String,
    /// Port the probe actually bound; equals `port` unless fallback kicked in.
    #[serde(skip_serializing_if = "Option::is_none")]
    bound_port: Option<u16>,
    exclusion_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the check command.
pub fn run(action: &CheckAction, json: bool) -> Result<()> {
    let config_action = ConfigAction {
        cwd: action.cwd.clone(),
        config: action.config.clone(),
        overrides: action.overrides.clone(),
    };
    let (_, resolved) = resolve(&config_action)?;

    // Globs were validated during resolution; compile the predicate that a
    // host watcher would consult.
    let exclusions = resolved.exclusions().into_diagnostic()?;

    let report = probe(&resolved, &exclusions);

    if json {
        let text = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{text}");
    } else {
        print_human(&report)?;
    }

    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Bind-and-release probe of the configured port.
fn probe(config: &ServerConfig, exclusions: &WatchExclusions) -> CheckReport {
    tracing::debug!(port = config.port, strict = config.strict_port, "probing port");

    let mut report = CheckReport {
        ok: true,
        port: config.port,
        strict_port: config.strict_port,
        host: config.host.clone(),
        bound_port: None,
        exclusion_patterns: exclusions.patterns().to_vec(),
        error: None,
    };

    match bind(config) {
        Ok(listener) => {
            report.bound_port = listener.local_addr().ok().map(|a| a.port());
        }
        Err(e) => {
            report.ok = false;
            report.error = Some(e.to_string());
        }
    }

    report
}

fn print_human(report: &CheckReport) -> Result<()> {
    let mut out = io::stdout().lock();

    w(&mut out, "\x1b[1m## Startup check\x1b[0m\n")?;
    w(
        &mut out,
        &format!(
            "  Port:           {} {}\n",
            report.port,
            if report.strict_port {
                "(strict)"
            } else {
                "(fallback allowed)"
            }
        ),
    )?;
    w(&mut out, &format!("  Host:           {}\n", report.host))?;
    match (report.bound_port, &report.error) {
        (Some(bound), _) if bound == report.port => {
            w(&mut out, "  Bind:           \x1b[32m✓\x1b[0m exact port\n")?;
        }
        (Some(bound), _) => {
            w(
                &mut out,
                &format!("  Bind:           \x1b[33m→\x1b[0m fell back to {bound}\n"),
            )?;
        }
        (None, Some(error)) => {
            w(&mut out, &format!("  Bind:           \x1b[31m✗\x1b[0m {error}\n"))?;
        }
        (None, None) => {}
    }
    w(
        &mut out,
        &format!(
            "  Watch excludes: {} pattern{}\n",
            report.exclusion_patterns.len(),
            if report.exclusion_patterns.len() == 1 {
                ""
            } else {
                "s"
            }
        ),
    )?;

    Ok(())
}

fn w(out: &mut impl Write, s: &str) -> Result<()> {
    out.write_all(s.as_bytes()).into_diagnostic()
}
