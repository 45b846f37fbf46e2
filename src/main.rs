use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use waypoint::proxy::{self, ProxyConfig};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Caching DNS forwarding resolver", long_about = None)]
struct Args {
    /// Local port to listen on
    #[arg(short, long, default_value = "8053")]
    port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Upstream DNS server (host:port), repeat to race several
    #[arg(short, long, default_value = "8.8.8.8:53")]
    upstream: Vec<SocketAddr>,

    /// Milliseconds to wait for an upstream reply
    #[arg(short, long, default_value = "2000")]
    timeout_ms: u64,

    /// Log every request
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = ProxyConfig {
        bind_addr: SocketAddr::new(args.bind, args.port),
        upstreams: args.upstream,
        upstream_timeout: Duration::from_millis(args.timeout_ms),
        verbose: args.verbose,
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(proxy::run(config))?;
    Ok(())
}
