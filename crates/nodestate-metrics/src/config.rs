//! Address parsing for the exporter's command-line flags.

use std::fmt;
use std::net::Ipv6Addr;

use http::Uri;

use crate::error::{ExporterError, ExporterResult};

pub const DEFAULT_RPC_ADDRESS: &str = "http://127.0.0.1:3032";
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9090";

/// Parse the upstream RPC address. Only absolute `http://` URIs are accepted.
pub fn parse_rpc_address(s: &str) -> ExporterResult<Uri> {
    let uri: Uri = s
        .trim()
        .parse()
        .map_err(|e| ExporterError::Config(format!("invalid RPC address {s:?}: {e}")))?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(ExporterError::Config(format!(
                "unsupported RPC scheme {other:?} in {s:?}, expected http"
            )));
        }
        None => {
            return Err(ExporterError::Config(format!(
                "RPC address {s:?} must be absolute, e.g. {DEFAULT_RPC_ADDRESS}"
            )));
        }
    }

    if uri.host().is_none() {
        return Err(ExporterError::Config(format!("RPC address {s:?} has no host")));
    }

    Ok(uri)
}

/// Where the metrics server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddr {
    /// `:PORT` or a bare `PORT`: every interface, IPv6 and IPv4.
    AllInterfaces(u16),
    /// `HOST:PORT`. The host is an IP literal or a name resolved at bind time.
    Host(String, u16),
}

impl ListenAddr {
    pub fn port(&self) -> u16 {
        match self {
            Self::AllInterfaces(port) | Self::Host(_, port) => *port,
        }
    }
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllInterfaces(port) => write!(f, ":{port}"),
            Self::Host(host, port) if host.contains(':') => write!(f, "[{host}]:{port}"),
            Self::Host(host, port) => write!(f, "{host}:{port}"),
        }
    }
}

/// Parse the metrics listen address.
///
/// Accepts `:PORT` (all interfaces), `HOST:PORT`, `[IPV6]:PORT`, or a bare
/// `PORT`.
pub fn parse_listen_addr(s: &str) -> ExporterResult<ListenAddr> {
    let s = s.trim();
    let port_only = s.strip_prefix(':').unwrap_or(s);

    if let Ok(port) = port_only.parse::<u16>() {
        return Ok(ListenAddr::AllInterfaces(port));
    }

    let invalid =
        |reason: &str| ExporterError::Config(format!("invalid listen address {s:?}: {reason}"));

    let (host, port) = s.rsplit_once(':').ok_or_else(|| invalid("expected HOST:PORT"))?;
    let port = port.parse::<u16>().map_err(|e| invalid(&e.to_string()))?;
    let host = match host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        Some(v6) if v6.parse::<Ipv6Addr>().is_ok() => v6,
        Some(_) => return Err(invalid("malformed IPv6 host")),
        None if host.contains(':') => {
            return Err(invalid("IPv6 hosts must be written as [ADDR]:PORT"));
        }
        None => host,
    };

    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(invalid("missing or malformed host"));
    }

    Ok(ListenAddr::Host(host.to_string(), port))
}
