//! The fixed 12-byte message header.

use super::bytes::{Cursor, read_bit, write_be};
use crate::error::{Error, Result};

/// Flags word of every response this resolver synthesizes:
/// qr=1, opcode=0, aa=0, tc=0, rd=1, ra=1, z=0, rcode=0.
pub const RESPONSE_FLAGS: u16 = 0x8180;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    /// `false` for a query, `true` for a response.
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    /// Reserved, zero in valid traffic.
    pub z: u8,
    pub rcode: u8,
    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

impl Header {
    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let id = cursor.read_u16()?;

        let b3 = cursor.read_u8()?;
        let b4 = cursor.read_u8()?;

        Ok(Self {
            id,
            qr: read_bit(b3, 0) == 1,
            opcode: (b3 >> 3) & 0x0F,
            aa: read_bit(b3, 5) == 1,
            tc: read_bit(b3, 6) == 1,
            rd: read_bit(b3, 7) == 1,
            ra: read_bit(b4, 0) == 1,
            z: (b4 >> 4) & 0x07,
            rcode: b4 & 0x0F,
            qd_count: cursor.read_u16()?,
            an_count: cursor.read_u16()?,
            ns_count: cursor.read_u16()?,
            ar_count: cursor.read_u16()?,
        })
    }

    /// Header for a synthesized response to `request`.
    ///
    /// Only the id is taken from the request; the counts are the lengths
    /// of the response's question, answer, authority and additional
    /// sections, in that order.
    pub fn response_to(request: &Header, sections: [usize; 4]) -> Result<Self> {
        Self {
            id: request.id,
            qr: true,
            opcode: 0,
            aa: false,
            tc: false,
            rd: true,
            ra: true,
            z: 0,
            rcode: 0,
            ..Self::default()
        }
        .with_counts(sections)
    }

    /// The same header with its four counts replaced by `sections`.
    pub fn with_counts(self, sections: [usize; 4]) -> Result<Self> {
        let [qd_count, an_count, ns_count, ar_count] = sections.map(count);

        Ok(Self {
            qd_count: qd_count?,
            an_count: an_count?,
            ns_count: ns_count?,
            ar_count: ar_count?,
            ..self
        })
    }

    /// Pack the second 16-bit word of the header, field by field.
    pub fn flags(&self) -> u16 {
        (u16::from(self.qr) << 15)
            | (u16::from(self.opcode & 0x0F) << 11)
            | (u16::from(self.aa) << 10)
            | (u16::from(self.tc) << 9)
            | (u16::from(self.rd) << 8)
            | (u16::from(self.ra) << 7)
            | (u16::from(self.z & 0x07) << 4)
            | u16::from(self.rcode & 0x0F)
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        for word in [
            self.id,
            self.flags(),
            self.qd_count,
            self.an_count,
            self.ns_count,
            self.ar_count,
        ] {
            out.extend_from_slice(&write_be(2, u32::from(word)));
        }
    }
}

fn count(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::TooManyRecords(len))
}
