//! End-to-end resolution against a scripted upstream, on a paused clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use waypoint::cache::DnsCache;
use waypoint::dns::{CLASS_IN, Header, Message, Question, Record, TYPE_A};
use waypoint::resolver::{Outcome, Resolver, Upstream};
use waypoint::{Error, Result};

/// Round-trip time of the fake upstream, on the paused clock.
const UPSTREAM_LATENCY: Duration = Duration::from_millis(10);

/// Answers every exchange with the next canned reply, echoing the query id.
#[derive(Clone, Default)]
struct FakeUpstream {
    replies: Arc<Mutex<VecDeque<Vec<Record>>>>,
    forwarded: Arc<AtomicUsize>,
}

impl FakeUpstream {
    fn push(&self, answers: Vec<Record>) {
        self.replies.lock().unwrap().push_back(answers);
    }

    fn forwarded(&self) -> usize {
        self.forwarded.load(Ordering::SeqCst)
    }
}

impl Upstream for FakeUpstream {
    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>> {
        self.forwarded.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(UPSTREAM_LATENCY).await;
        let request = Message::decode(query)?;
        let answers = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(Error::UpstreamTimeout(Duration::from_secs(2)))?;
        Message::response(&request, answers)?.to_bytes()
    }
}

fn example_a() -> Question {
    Question::new("example.com", TYPE_A, CLASS_IN)
}

fn example_record() -> Record {
    Record::new("example.com", TYPE_A, CLASS_IN, 300, vec![93, 184, 216, 34])
}

fn client_query(id: u16) -> Vec<u8> {
    Message::query(
        Header {
            id,
            rd: true,
            ..Header::default()
        },
        vec![example_a()],
    )
    .to_bytes()
    .unwrap()
}

fn setup() -> (Resolver<FakeUpstream>, FakeUpstream, Arc<DnsCache>) {
    let upstream = FakeUpstream::default();
    let cache = Arc::new(DnsCache::new());
    let resolver = Resolver::new(cache.clone(), upstream.clone());
    (resolver, upstream, cache)
}

#[tokio::test(start_paused = true)]
async fn miss_is_forwarded_then_served_from_cache() {
    let (resolver, upstream, _cache) = setup();
    upstream.push(vec![example_record()]);

    let first = resolver.resolve(&client_query(0x0101)).await.unwrap();
    let response = Message::decode(&first.response).unwrap();

    assert_eq!(upstream.forwarded(), 1);
    assert_eq!(first.outcomes[0].outcome, Outcome::Forwarded);
    assert_eq!(response.header.id, 0x0101);
    assert!(response.header.qr);
    assert_eq!(response.questions, [example_a()]);
    assert_eq!(response.answers, [example_record()]);

    tokio::time::advance(Duration::from_secs(299)).await;

    let second = resolver.resolve(&client_query(0x0202)).await.unwrap();
    let response = Message::decode(&second.response).unwrap();

    assert_eq!(upstream.forwarded(), 1);
    assert!(second.is_cached());
    assert_eq!(response.header.id, 0x0202);
    assert_eq!(response.answers, [example_record()]);
}

#[tokio::test(start_paused = true)]
async fn expired_entry_is_evicted_and_forwarded_again() {
    let (resolver, upstream, cache) = setup();
    upstream.push(vec![example_record()]);
    upstream.push(vec![example_record()]);

    resolver.resolve(&client_query(1)).await.unwrap();
    tokio::time::advance(Duration::from_secs(301)).await;

    assert!(cache.get(&example_a()).is_none());
    assert!(cache.is_empty());

    let again = resolver.resolve(&client_query(2)).await.unwrap();

    assert_eq!(upstream.forwarded(), 2);
    assert_eq!(again.outcomes[0].outcome, Outcome::Forwarded);
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_upstream_reply_caches_nothing() {
    let (resolver, upstream, cache) = setup();
    upstream.push(Vec::new());

    let resolution = resolver.resolve(&client_query(7)).await.unwrap();
    let response = Message::decode(&resolution.response).unwrap();

    assert_eq!(resolution.outcomes[0].outcome, Outcome::Unanswered);
    assert!(response.answers.is_empty());
    assert_eq!(response.header.an_count, 0);
    assert_eq!(response.header.qd_count, 1);
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_ttl_answer_is_returned_but_not_reused() {
    let (resolver, upstream, _cache) = setup();
    let fleeting = Record::new("example.com", TYPE_A, CLASS_IN, 0, vec![10, 0, 0, 1]);
    upstream.push(vec![fleeting.clone()]);
    upstream.push(vec![fleeting.clone()]);

    let first = resolver.resolve(&client_query(1)).await.unwrap();
    let second = resolver.resolve(&client_query(2)).await.unwrap();

    assert_eq!(upstream.forwarded(), 2);
    assert_eq!(
        Message::decode(&first.response).unwrap().answers,
        [fleeting.clone()]
    );
    assert_eq!(second.outcomes[0].outcome, Outcome::Forwarded);
}

#[tokio::test(start_paused = true)]
async fn concurrent_misses_are_each_forwarded_then_shared() {
    let (resolver, upstream, cache) = setup();
    upstream.push(vec![example_record()]);
    upstream.push(vec![example_record()]);
    let resolver = Arc::new(resolver);

    // Both tasks miss before either reply lands; misses are not coalesced.
    let tasks: Vec<_> = (0..2u16)
        .map(|id| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve(&client_query(id)).await })
        })
        .collect();
    for task in futures::future::join_all(tasks).await {
        let resolution = task.unwrap().unwrap();
        assert_eq!(resolution.outcomes[0].outcome, Outcome::Forwarded);
        assert_eq!(
            Message::decode(&resolution.response).unwrap().answers,
            [example_record()]
        );
    }

    assert_eq!(upstream.forwarded(), 2);
    assert_eq!(cache.len(), 1);

    let later = resolver.resolve(&client_query(3)).await.unwrap();

    assert!(later.is_cached());
    assert_eq!(upstream.forwarded(), 2);
}
