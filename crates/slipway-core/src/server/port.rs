//! Strict-port binding policy.
//!
//! With `strictPort` set, an occupied port fails startup outright — no retry,
//! no fallback. Without it, the next free port is taken from a bounded
//! forward scan, Vite-style.

use crate::error::Error;
use crate::server::config::ServerConfig;
use std::io::ErrorKind;
use std::net::TcpListener;

/// How many ports past the configured one a non-strict bind will try.
const PORT_SCAN_LIMIT: u16 = 16;

/// Bind a listener according to the strict-port policy.
///
/// The port actually bound is observable through the listener's local
/// address; under `strict_port` it is always the configured port.
pub fn bind(config: &ServerConfig) -> Result<TcpListener, Error> {
    let host = bind_host(&config.host);

    match try_bind(host, config.port) {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            if config.strict_port {
                return Err(Error::PortUnavailable {
                    port: config.port,
                    host: host.to_string(),
                });
            }
            scan_forward(host, config.port)
        }
        Err(e) => Err(Error::Bind {
            addr: format!("{host}:{}", config.port),
            source: e,
        }),
    }
}

/// Try ports after the configured one until something binds.
fn scan_forward(host: &str, start: u16) -> Result<TcpListener, Error> {
    let end = start.saturating_add(PORT_SCAN_LIMIT);
    for port in start.saturating_add(1)..=end {
        match try_bind(host, port) {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {}
            Err(e) => {
                return Err(Error::Bind {
                    addr: format!("{host}:{port}"),
                    source: e,
                })
            }
        }
    }
    Err(Error::PortScanExhausted {
        start,
        end,
        host: host.to_string(),
    })
}

fn try_bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port))
}

/// `localhost` resolution can differ between IPv4 and IPv6 stacks; pin it to
/// the loopback address the dev URL uses.
fn bind_host(host: &str) -> &str {
    if host == "localhost" {
        "127.0.0.1"
    } else {
        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::{Overrides, ServerConfig};
    use serial_test::serial;

    /// Grab a port that is free right now.
    fn free_port() -> u16 {
        TcpListener::bind(("127.0.0.1", 0))
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    fn config_on(port: u16, strict: bool) -> ServerConfig {
        let overrides = Overrides {
            port: Some(port),
            strict_port: Some(strict),
            host: None,
        };
        ServerConfig::resolve(None, &overrides).unwrap()
    }

    #[test]
    #[serial]
    fn test_free_port_binds_exactly() {
        let port = free_port();
        let listener = bind(&config_on(port, true)).unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[test]
    #[serial]
    fn test_strict_port_fails_when_taken() {
        let holder = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = holder.local_addr().unwrap().port();

        let err = bind(&config_on(port, true)).unwrap_err();
        match err {
            Error::PortUnavailable { port: p, .. } => assert_eq!(p, port),
            other => panic!("expected PortUnavailable, got {other}"),
        }
    }

    #[test]
    #[serial]
    fn test_non_strict_falls_forward_when_taken() {
        let holder = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = holder.local_addr().unwrap().port();

        let listener = bind(&config_on(port, false)).unwrap();
        let bound = listener.local_addr().unwrap().port();
        assert_ne!(bound, port);
        assert!(bound > port && bound <= port + PORT_SCAN_LIMIT);
    }
}
