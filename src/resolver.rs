//! DNS query resolution logic.
//!
//! Handles the per-request pipeline:
//! 1. Decode the client datagram
//! 2. Answer each question from the cache, or forward the request upstream
//! 3. Build and encode the response
//!
//! Transports handle the actual I/O, the resolver handles decisions.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::DnsCache;
use crate::dns::{Message, Question, Record};
use crate::error::Result;

/// Where upstream round trips go.
pub trait Upstream {
    /// Send `query` to the upstream resolver and wait for its reply.
    fn exchange(&self, query: &[u8]) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// How a single question was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Served from the cache.
    Cached,
    /// Forwarded upstream; the first answer was cached and returned.
    Forwarded,
    /// Forwarded upstream, which returned no answers.
    Unanswered,
    /// The upstream round trip failed or its reply did not decode.
    Failed,
}

#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub question: Question,
    pub outcome: Outcome,
}

/// The encoded response plus what happened to each question.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub response: Vec<u8>,
    pub outcomes: Vec<QuestionOutcome>,
}

/// How a whole request was handled, for logging and stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Cached,
    Forwarded,
    Failed,
    /// The request carried no questions.
    Empty,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Cached => "CACHED",
            Status::Forwarded => "FORWARDED",
            Status::Failed => "FAILED",
            Status::Empty => "EMPTY",
        }
    }
}

impl Resolution {
    /// True when there was at least one question and none needed the upstream.
    pub fn is_cached(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.outcome == Outcome::Cached)
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.outcome == Outcome::Failed)
    }

    pub fn status(&self) -> Status {
        if self.outcomes.is_empty() {
            Status::Empty
        } else if self.has_failures() {
            Status::Failed
        } else if self.is_cached() {
            Status::Cached
        } else {
            Status::Forwarded
        }
    }

    /// Names asked about, for logging.
    pub fn domains(&self) -> String {
        let names: Vec<_> = self
            .outcomes
            .iter()
            .map(|o| o.question.name.to_string())
            .collect();
        names.join(",")
    }
}

/// Resolver owns the answer cache and the upstream used on a miss.
///
/// Shared between transport tasks; the cache is the only mutable state.
pub struct Resolver<U> {
    cache: Arc<DnsCache>,
    upstream: U,
}

impl<U: Upstream> Resolver<U> {
    pub fn new(cache: Arc<DnsCache>, upstream: U) -> Self {
        Self { cache, upstream }
    }

    /// Resolve one client datagram into response bytes.
    ///
    /// Questions are handled in order, one upstream round trip per cache
    /// miss. Fails only if the datagram itself cannot be decoded or the
    /// response cannot be encoded; upstream trouble leaves the affected
    /// question unanswered.
    pub async fn resolve(&self, datagram: &[u8]) -> Result<Resolution> {
        let request = Message::decode(datagram)?;
        let mut answers = Vec::with_capacity(request.questions.len());
        let mut outcomes = Vec::with_capacity(request.questions.len());

        for question in &request.questions {
            let outcome = match self.cache.get(question) {
                Some(record) => {
                    answers.push(record);
                    Outcome::Cached
                }
                None => match self.forward(&request).await {
                    Ok(Some(record)) => {
                        self.cache.put(question.clone(), record.clone());
                        answers.push(record);
                        Outcome::Forwarded
                    }
                    Ok(None) => Outcome::Unanswered,
                    Err(e) => {
                        warn!(name = %question.name, qtype = question.qtype, error = %e, "upstream lookup failed");
                        Outcome::Failed
                    }
                },
            };
            debug!(name = %question.name, qtype = question.qtype, ?outcome, "question resolved");

            outcomes.push(QuestionOutcome {
                question: question.clone(),
                outcome,
            });
        }

        let response = Message::response(&request, answers)?.to_bytes()?;

        Ok(Resolution { response, outcomes })
    }

    /// One upstream round trip; yields the first answer of the reply.
    ///
    /// The client's datagram goes upstream byte for byte. A request built
    /// in memory is encoded first.
    async fn forward(&self, request: &Message) -> Result<Option<Record>> {
        let query = match request.raw() {
            Some(raw) => Cow::Borrowed(raw),
            None => Cow::Owned(request.to_bytes()?),
        };
        let reply = self.upstream.exchange(&query).await?;
        let reply = Message::decode(&reply)?;

        Ok(reply.answers.into_iter().next())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
