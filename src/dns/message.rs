//! Whole DNS messages: header plus the four sections.

use tokio::time::Instant;

use super::bytes::Cursor;
use super::header::Header;
use super::name::NameTable;
use super::question::Question;
use super::record::Record;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
    /// The datagram this message was decoded from. `None` when synthesized.
    raw: Option<Vec<u8>>,
}

impl Message {
    /// A synthesized message with all four sections given.
    pub fn new(
        header: Header,
        questions: Vec<Question>,
        answers: Vec<Record>,
        authority: Vec<Record>,
        additional: Vec<Record>,
    ) -> Self {
        Self {
            header,
            questions,
            answers,
            authority,
            additional,
            raw: None,
        }
    }

    /// A synthesized message carrying only questions.
    pub fn query(header: Header, questions: Vec<Question>) -> Self {
        Self::new(header, questions, Vec::new(), Vec::new(), Vec::new())
    }

    /// Decode a datagram. Record expiry is measured from now.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_at(bytes, Instant::now())
    }

    pub fn decode_at(bytes: &[u8], now: Instant) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let header = Header::decode(&mut cursor)?;

        let questions = (0..header.qd_count)
            .map(|_| Question::decode(&mut cursor))
            .collect::<Result<Vec<_>>>()?;
        let mut records = |count: u16| {
            (0..count)
                .map(|_| Record::decode(&mut cursor, now))
                .collect::<Result<Vec<_>>>()
        };
        let answers = records(header.an_count)?;
        let authority = records(header.ns_count)?;
        let additional = records(header.ar_count)?;

        Ok(Self {
            header,
            questions,
            answers,
            authority,
            additional,
            raw: Some(bytes.to_vec()),
        })
    }

    /// Response to `request` carrying `answers`.
    ///
    /// Questions, authority and additional records are copied from the
    /// request; the header is rebuilt with counts matching the sections.
    pub fn response(request: &Message, answers: Vec<Record>) -> Result<Self> {
        let header = Header::response_to(
            &request.header,
            [
                request.questions.len(),
                answers.len(),
                request.authority.len(),
                request.additional.len(),
            ],
        )?;

        Ok(Self {
            header,
            questions: request.questions.clone(),
            answers,
            authority: request.authority.clone(),
            additional: request.additional.clone(),
            raw: None,
        })
    }

    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Encode to wire format with name compression.
    ///
    /// Section counts written are the actual section lengths.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let header = self.header.clone().with_counts([
            self.questions.len(),
            self.answers.len(),
            self.authority.len(),
            self.additional.len(),
        ])?;

        let mut out = Vec::with_capacity(512);
        let mut table = NameTable::new();

        header.encode(&mut out);
        for question in &self.questions {
            question.encode(&mut out, &mut table)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
        {
            record.encode(&mut out, &mut table)?;
        }

        Ok(out)
    }
}
