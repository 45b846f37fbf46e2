//! Waypoint - a caching DNS forwarding resolver.
//!
//! Answers queries from an in-memory cache when a live record exists and
//! forwards them upstream otherwise, caching the first answer of each reply.

pub mod cache;
pub mod dns;
pub mod error;
pub mod proxy;
pub mod resolver;
pub mod stats;
pub mod transport;

pub use error::{Error, Result};
