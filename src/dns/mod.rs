//! DNS wire format (RFC 1035 section 4): header, questions, resource
//! records and compressed domain names.

pub mod bytes;
pub mod header;
pub mod message;
pub mod name;
pub mod question;
pub mod record;

pub use header::{Header, RESPONSE_FLAGS};
pub use message::Message;
pub use name::{DomainName, MAX_POINTER_HOPS, NameTable};
pub use question::Question;
pub use record::Record;

pub const HEADER_LEN: usize = 12;

/// Receive buffer size for a single datagram.
pub const MAX_DNS_PACKET_SIZE: usize = 4096;

pub const TYPE_A: u16 = 1;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_AAAA: u16 = 28;

pub const CLASS_IN: u16 = 1;
