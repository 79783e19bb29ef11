// src/exec/port.rs

//! Waiting for a TCP port to be released before relaunching a server.
//!
//! A restarted server often binds the same port as the instance that was
//! just stopped; launching before the old socket is gone fails with
//! "address in use".

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

use crate::types::PortWait;

/// Port assumed when none can be found in the command line.
pub const DEFAULT_PORT: u16 = 8080;

/// Upper bound on how long a launch waits for the port.
pub const PORT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

const PORT_POLL_INTERVAL: Duration = Duration::from_millis(100);

static PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:PORT=|--port[= ]|-p\s+|:)(\d{2,5})\b").expect("valid port regex")
});

/// Guess the port a command will listen on, e.g. `PORT=3000 ./srv`,
/// `serve --port 9000`, `-p 8000` or `:8080`.
pub fn detect_port(cmd_line: &str) -> Option<u16> {
    PORT_RE
        .captures_iter(cmd_line)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u16>().ok())
        .find(|port| *port != 0)
}

/// Resolve the configured port wait into a concrete port.
pub fn resolve_port(wait: PortWait, cmd_line: &str) -> u16 {
    match wait {
        PortWait::Port(port) => port,
        PortWait::Auto => detect_port(cmd_line).unwrap_or(DEFAULT_PORT),
    }
}

/// Poll `127.0.0.1:port` until nothing accepts connections or `limit`
/// elapses. Returns `true` if the port is free.
pub async fn wait_for_port_release(port: u16, limit: Duration) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let deadline = Instant::now() + limit;

    loop {
        let in_use = matches!(
            timeout(PORT_POLL_INTERVAL, TcpStream::connect(addr)).await,
            Ok(Ok(_))
        );
        if !in_use {
            debug!(port, "port is free");
            return true;
        }
        if Instant::now() >= deadline {
            warn!(port, "port might still be in use");
            return false;
        }
        sleep(PORT_POLL_INTERVAL).await;
    }
}
