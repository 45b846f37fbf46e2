//! Transport layer for the resolver.
//!
//! Receives DNS queries from clients over UDP and exchanges datagrams
//! with upstream servers on a cache miss.

pub mod udp;
pub mod upstream;

use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Error;
use crate::resolver::Resolution;

/// Logger for per-request events.
pub struct QueryLogger {
    verbose: bool,
}

impl QueryLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn resolved(&self, resolution: &Resolution, elapsed: Duration, client: SocketAddr) {
        if !self.verbose {
            return;
        }
        let status = resolution.status().as_str();
        info!(
            %client,
            domain = %resolution.domains(),
            total_ms = elapsed.as_secs_f64() * 1000.0,
            "{status}"
        );
    }

    /// Requests that could not be answered at all are always logged.
    pub fn rejected(&self, error: &Error, client: SocketAddr) {
        warn!(%client, %error, "dropping request");
    }
}
