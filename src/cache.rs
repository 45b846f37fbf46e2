//! Answer cache with TTL-based expiration.

use rustc_hash::FxHashMap;
use std::sync::RwLock;
use tokio::time::Instant;

use crate::dns::{Question, Record};

/// Maps a question to the record that answered it.
///
/// Entries leave the cache only when a lookup finds them expired or a
/// later insert for the same question replaces them. There is no size bound.
pub struct DnsCache {
    entries: RwLock<FxHashMap<Question, Record>>,
}

impl DnsCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Look up a live record, evicting the entry if it has expired.
    pub fn get(&self, question: &Question) -> Option<Record> {
        let now = Instant::now();

        {
            let Ok(entries) = self.entries.read() else {
                return None;
            };
            match entries.get(question) {
                Some(record) if record.is_live(now) => return Some(record.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let Ok(mut entries) = self.entries.write() else {
            return None;
        };
        // Another task may have refreshed the entry between the two locks.
        match entries.get(question) {
            Some(record) if record.is_live(now) => Some(record.clone()),
            Some(_) => {
                entries.remove(question);
                tracing::trace!(name = %question.name, qtype = question.qtype, "evicted expired entry");
                None
            }
            None => None,
        }
    }

    /// Store `record` as the answer for `question`, replacing any entry.
    pub fn put(&self, question: Question, record: Record) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        entries.insert(question, record);
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new()
    }
}
