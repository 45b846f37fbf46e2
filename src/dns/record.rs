//! Resource records.

use std::time::Duration;

use tokio::time::Instant;

use super::bytes::{Cursor, write_be};
use super::name::{DomainName, NameTable};
use crate::error::{Error, Result};

/// A resource record plus the instant it stops being valid.
///
/// `expires_at` is not part of the wire format. It is fixed when the
/// record is decoded (decode time + ttl) and the ttl is never counted down.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: DomainName,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
    pub expires_at: Instant,
}

impl Record {
    pub fn new(
        name: impl Into<DomainName>,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdata: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            rtype,
            rclass,
            ttl,
            rdata,
            expires_at: expiry(Instant::now(), ttl),
        }
    }

    pub fn decode(cursor: &mut Cursor<'_>, now: Instant) -> Result<Self> {
        let name = DomainName::decode(cursor)?;
        let rtype = cursor.read_u16()?;
        let rclass = cursor.read_u16()?;
        let ttl = cursor.read_u32()?;
        let rdlength = cursor.read_u16()?;
        let rdata = cursor.read_bytes(usize::from(rdlength))?.to_vec();

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
            expires_at: expiry(now, ttl),
        })
    }

    /// Write the record; the length field is always `rdata.len()`.
    pub fn encode(&self, out: &mut Vec<u8>, table: &mut NameTable) -> Result<()> {
        let rdlength =
            u16::try_from(self.rdata.len()).map_err(|_| Error::RdataTooLong(self.rdata.len()))?;

        self.name.encode(out, table)?;
        out.extend_from_slice(&write_be(2, u32::from(self.rtype)));
        out.extend_from_slice(&write_be(2, u32::from(self.rclass)));
        out.extend_from_slice(&write_be(4, self.ttl));
        out.extend_from_slice(&write_be(2, u32::from(rdlength)));
        out.extend_from_slice(&self.rdata);
        Ok(())
    }

    /// Whether the record may still be served at `now`.
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.rtype == other.rtype
            && self.rclass == other.rclass
            && self.ttl == other.ttl
            && self.rdata == other.rdata
    }
}

impl Eq for Record {}

fn expiry(now: Instant, ttl: u32) -> Instant {
    now + Duration::from_secs(u64::from(ttl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{CLASS_IN, TYPE_A};

    const A_RECORD: &[u8] = b"\x07example\x03com\x00\x00\x01\x00\x01\x00\x00\x01\x2c\x00\x04\x5d\xb8\xd8\x22";

    #[test]
    fn decode_a_record() {
        let now = Instant::now();
        let mut cursor = Cursor::new(A_RECORD);

        let record = Record::decode(&mut cursor, now).unwrap();

        assert_eq!(record.name.to_string(), "example.com");
        assert_eq!(record.rtype, TYPE_A);
        assert_eq!(record.rclass, CLASS_IN);
        assert_eq!(record.ttl, 300);
        assert_eq!(record.rdata, [93, 184, 216, 34]);
        assert_eq!(record.expires_at, now + Duration::from_secs(300));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn decode_short_rdata_fails() {
        let truncated = &A_RECORD[..A_RECORD.len() - 1];

        let err = Record::decode(&mut Cursor::new(truncated), Instant::now()).unwrap_err();

        assert!(matches!(err, Error::Truncated { needed: 4, .. }));
    }

    #[test]
    fn encode_recomputes_rdlength() {
        let record = Record::new("example.com", TYPE_A, CLASS_IN, 300, vec![10, 0, 0, 1, 9]);
        let mut out = Vec::new();

        record.encode(&mut out, &mut NameTable::new()).unwrap();

        let tail = &out[out.len() - 7..];
        assert_eq!(tail, [0x00, 0x05, 10, 0, 0, 1, 9]);
    }

    #[test]
    fn zero_ttl_is_never_live() {
        let now = Instant::now();
        let record = Record::decode(
            &mut Cursor::new(b"\x00\x00\x01\x00\x01\x00\x00\x00\x00\x00\x00"),
            now,
        )
        .unwrap();

        assert!(record.name.is_root());
        assert!(!record.is_live(now));
    }

    #[test]
    fn equality_ignores_expiry() {
        let now = Instant::now();
        let a = Record::decode(&mut Cursor::new(A_RECORD), now).unwrap();
        let b = Record::decode(&mut Cursor::new(A_RECORD), now + Duration::from_secs(60)).unwrap();

        assert_ne!(a.expires_at, b.expires_at);
        assert_eq!(a, b);
    }
}
