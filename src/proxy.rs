//! Resolver orchestration.
//!
//! Wires the cache, resolver and transport together and runs the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::DnsCache;
use crate::error::Result;
use crate::resolver::Resolver;
use crate::stats::Stats;
use crate::transport::udp::UdpTransport;
use crate::transport::upstream::UdpUpstream;

const STATS_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the resolver.
pub struct ProxyConfig {
    /// Local address to bind (e.g., 127.0.0.1:8053)
    pub bind_addr: SocketAddr,
    /// Upstream DNS servers (races all, uses first response)
    pub upstreams: Vec<SocketAddr>,
    /// Longest wait for an upstream reply before the question is given up
    pub upstream_timeout: Duration,
    /// Log every request (domain, outcome, timing)
    pub verbose: bool,
}

/// Run the resolver with the given configuration. Runs indefinitely.
pub async fn run(config: ProxyConfig) -> Result<()> {
    let cache = Arc::new(DnsCache::new());
    let upstream = UdpUpstream::new(config.upstreams.clone(), config.upstream_timeout);
    let resolver = Arc::new(Resolver::new(cache, upstream));
    let stats = Arc::new(Stats::new());

    let udp = UdpTransport::bind(config.bind_addr).await?;
    let local_addr = udp.local_addr()?;

    let upstream_strs: Vec<_> = config.upstreams.iter().map(|a| a.to_string()).collect();
    info!(bind_address = %local_addr, "DNS resolver listening");
    info!(
        upstreams = %upstream_strs.join(", "),
        timeout_ms = config.upstream_timeout.as_millis() as u64,
        "Racing upstreams"
    );

    udp.start(resolver.clone(), stats.clone(), config.verbose);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATS_INTERVAL);
        interval.tick().await; // Skip first immediate tick
        loop {
            interval.tick().await;
            let snapshot = stats.snapshot_and_reset();
            info!(
                uptime_secs = snapshot.uptime_secs,
                cache = resolver.cache_len(),
                requests = snapshot.requests,
                forwarded = snapshot.forwarded,
                cached = snapshot.cached,
                failed = snapshot.failed,
                avg_response_ms = snapshot.avg_response_ms,
                "stats"
            );
        }
    });

    std::future::pending::<()>().await;

    Ok(())
}
