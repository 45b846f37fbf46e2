//! Question section entries.

use super::bytes::{Cursor, write_be};
use super::name::{DomainName, NameTable};
use crate::error::Result;

/// A single (name, type, class) lookup. Doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: DomainName,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: impl Into<DomainName>, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass,
        }
    }

    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            name: DomainName::decode(cursor)?,
            qtype: cursor.read_u16()?,
            qclass: cursor.read_u16()?,
        })
    }

    pub fn encode(&self, out: &mut Vec<u8>, table: &mut NameTable) -> Result<()> {
        self.name.encode(out, table)?;
        out.extend_from_slice(&write_be(2, u32::from(self.qtype)));
        out.extend_from_slice(&write_be(2, u32::from(self.qclass)));
        Ok(())
    }
}
