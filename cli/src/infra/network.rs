//! Network infrastructure — implements `PortProbe` using `spawn_blocking`.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::PortProbe;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Probes ports by trying to bind them on all interfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpPortProbe;

impl PortProbe for TcpPortProbe {
    async fn is_port_bound(&self, port: u16) -> Result<bool> {
        tokio::task::spawn_blocking(move || probe_port(port))
            .await
            .context("port probe task panicked")?
    }
}

/// A port is bound when binding it fails with `AddrInUse`. Privileged ports
/// that cannot be bound by this user fall back to a loopback connect.
fn probe_port(port: u16) -> Result<bool> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    match TcpListener::bind(addr) {
        Ok(_listener) => Ok(false),
        Err(e) if e.kind() == ErrorKind::AddrInUse => Ok(true),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            let loopback = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
            Ok(TcpStream::connect_timeout(&loopback, CONNECT_TIMEOUT).is_ok())
        }
        Err(e) => Err(e).with_context(|| format!("probing port {port}")),
    }
}
