//! UDP transport for DNS queries.
//!
//! Every datagram received on the listening socket is resolved on its own
//! task, so a slow upstream lookup never stalls the receive loop.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::UdpSocket;
use tracing::warn;

use crate::dns::{HEADER_LEN, MAX_DNS_PACKET_SIZE};
use crate::resolver::{Resolver, Status, Upstream};
use crate::stats::Stats;

use super::QueryLogger;

/// UDP transport for the resolver.
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
}

impl UdpTransport {
    /// Bind the listening socket.
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);

        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Start the receive loop on a background task.
    pub fn start<U>(self, resolver: Arc<Resolver<U>>, stats: Arc<Stats>, verbose: bool)
    where
        U: Upstream + Send + Sync + 'static,
    {
        let logger = Arc::new(QueryLogger::new(verbose));
        tokio::spawn(run(self.socket, resolver, stats, logger));
    }
}

/// Receive loop. Errors on one datagram never end the loop.
async fn run<U>(
    socket: Arc<UdpSocket>,
    resolver: Arc<Resolver<U>>,
    stats: Arc<Stats>,
    logger: Arc<QueryLogger>,
) where
    U: Upstream + Send + Sync + 'static,
{
    let mut buf = [0u8; MAX_DNS_PACKET_SIZE];

    loop {
        let (len, src) = match socket.recv_from(&mut buf).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "UDP recv error");
                continue;
            }
        };

        if len < HEADER_LEN {
            continue;
        }

        tokio::spawn(handle(
            socket.clone(),
            resolver.clone(),
            stats.clone(),
            logger.clone(),
            buf[..len].to_vec(),
            src,
        ));
    }
}

async fn handle<U>(
    socket: Arc<UdpSocket>,
    resolver: Arc<Resolver<U>>,
    stats: Arc<Stats>,
    logger: Arc<QueryLogger>,
    datagram: Vec<u8>,
    src: SocketAddr,
) where
    U: Upstream + Send + Sync + 'static,
{
    let start_time = Instant::now();

    let resolution = match resolver.resolve(&datagram).await {
        Ok(r) => r,
        Err(e) => {
            logger.rejected(&e, src);
            stats.record_failed(start_time.elapsed());
            return;
        }
    };

    if let Err(e) = socket.send_to(&resolution.response, src).await {
        warn!(client = %src, error = %e, "UDP response error");
    }

    let elapsed = start_time.elapsed();
    match resolution.status() {
        Status::Cached => stats.record_cached(elapsed),
        Status::Forwarded => stats.record_forwarded(elapsed),
        Status::Failed | Status::Empty => stats.record_failed(elapsed),
    }
    logger.resolved(&resolution, elapsed, src);
}
