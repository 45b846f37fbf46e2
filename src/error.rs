//! Error type shared by the codec, the resolver and the transports.

use std::io;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("datagram truncated: needed {needed} bytes at offset {offset}, {len} available")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("compression pointer chain longer than {0} hops")]
    PointerLoop(usize),

    #[error("label at offset {0} is not ASCII")]
    InvalidLabel(usize),

    #[error("label `{0}` exceeds 63 bytes")]
    LabelTooLong(String),

    #[error("record data of {0} bytes exceeds the 16-bit length field")]
    RdataTooLong(usize),

    #[error("section holds {0} entries, more than a 16-bit count can carry")]
    TooManyRecords(usize),

    #[error("no reply from upstream within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("no upstream servers configured")]
    NoUpstreams,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
