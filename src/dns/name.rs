//! Domain names as label sequences, with RFC 1035 message compression.

use std::fmt;

use rustc_hash::FxHashMap;

use super::bytes::{Cursor, write_be};
use crate::error::{Error, Result};

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 16;

const MAX_LABEL_LEN: usize = 63;
const POINTER_TAG: u8 = 0xC0;
/// Pointers carry 14 bits of offset.
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// An ordered sequence of labels, e.g. `["example", "com"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainName(Vec<String>);

impl DomainName {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a name at the cursor, following compression pointers.
    ///
    /// On return the cursor sits just past the name as it appears at the
    /// original position: after the terminating zero, or after the first
    /// pointer if one was taken.
    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let mut labels = Vec::new();
        let mut reader = cursor.clone();
        let mut resume = None;
        let mut hops = 0;

        loop {
            let offset = reader.position();
            let len = reader.read_u8()?;

            if len & POINTER_TAG == POINTER_TAG {
                let low = reader.read_u8()?;
                let target = (usize::from(len & !POINTER_TAG) << 8) | usize::from(low);

                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(Error::PointerLoop(MAX_POINTER_HOPS));
                }
                if resume.is_none() {
                    resume = Some(reader.clone());
                }
                reader = reader.at(target)?;
                continue;
            }

            if len == 0 {
                break;
            }
            if usize::from(len) > MAX_LABEL_LEN {
                return Err(Error::InvalidLabel(offset));
            }

            let label = reader.read_bytes(usize::from(len))?;
            if !label.is_ascii() {
                return Err(Error::InvalidLabel(offset));
            }
            labels.push(label.iter().map(|&b| char::from(b)).collect());
        }

        *cursor = resume.unwrap_or(reader);
        Ok(Self(labels))
    }

    /// Append the name to `out`, emitting a pointer if the same name was
    /// already written into this message.
    pub fn encode(&self, out: &mut Vec<u8>, table: &mut NameTable) -> Result<()> {
        if let Some(label) = self.0.iter().find(|l| l.len() > MAX_LABEL_LEN) {
            return Err(Error::LabelTooLong(label.clone()));
        }

        if self.is_root() {
            out.push(0);
            return Ok(());
        }

        if let Some(&offset) = table.offsets.get(self) {
            let pointer = (u32::from(POINTER_TAG) << 8) | u32::from(offset);
            out.extend_from_slice(&write_be(2, pointer));
            return Ok(());
        }

        if out.len() <= MAX_POINTER_OFFSET {
            table.offsets.insert(self.clone(), out.len() as u16);
        }
        for label in &self.0 {
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.push(0);
        Ok(())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for DomainName {
    fn from(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// Offsets of names already written into the message being encoded,
/// keyed by label sequence.
///
/// Scoped to a single message: each `Message::to_bytes` call starts empty.
#[derive(Debug, Default)]
pub struct NameTable {
    offsets: FxHashMap<DomainName, u16>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }
}
