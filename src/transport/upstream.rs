//! UDP client for the upstream resolvers.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use futures::future::select_ok;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::dns::{HEADER_LEN, MAX_DNS_PACKET_SIZE};
use crate::error::{Error, Result};
use crate::resolver::Upstream;

/// Forwards raw queries to one or more upstream servers.
///
/// Every exchange sends the query to all upstreams at once and takes the
/// first reply carrying the query's id. The whole exchange is bounded by
/// `timeout`.
pub struct UdpUpstream {
    upstreams: Vec<SocketAddr>,
    timeout: Duration,
}

impl UdpUpstream {
    pub fn new(upstreams: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { upstreams, timeout }
    }
}

impl Upstream for UdpUpstream {
    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>> {
        if self.upstreams.is_empty() {
            return Err(Error::NoUpstreams);
        }

        let attempts = self
            .upstreams
            .iter()
            .map(|&addr| Box::pin(query_one(addr, query)));

        match tokio::time::timeout(self.timeout, select_ok(attempts)).await {
            Ok(Ok((reply, _))) => Ok(reply),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::UpstreamTimeout(self.timeout)),
        }
    }
}

/// One round trip on a fresh ephemeral socket, so concurrent exchanges
/// never see each other's replies.
async fn query_one(addr: SocketAddr, query: &[u8]) -> Result<Vec<u8>> {
    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;
    socket.send(query).await?;

    let mut buf = vec![0u8; MAX_DNS_PACKET_SIZE];
    loop {
        let len = socket.recv(&mut buf).await?;
        if len >= HEADER_LEN && buf.get(..2) == query.get(..2) {
            buf.truncate(len);
            return Ok(buf);
        }
        debug!(upstream = %addr, len, "ignoring datagram that does not match the query");
    }
}
