//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds a full [`AppContext`] from
//! in-process fakes: a table-driven resolver and prober, a counting lookup,
//! an in-memory history, and a [`RecordingTransport`] that keeps every
//! outbound message in order.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use cinemabot::bot::{IncomingMessage, Transport};
use cinemabot::config::Config;
use cinemabot::context::AppContext;
use cinemabot::history::MemoryHistory;
use cinemabot::lookup::{LookupOutcome, LookupQuery, MovieLookup};
use cinemabot::metadata::{MetadataRecord, TitleResolver};
use cinemabot::probe::{WatchCandidate, WatchProber};
use cinemabot_common::{ChatId, MessageId, UserId};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Resolver answering from a `(title, native script)` table.
#[derive(Default)]
pub struct FakeResolver {
    known: Mutex<HashMap<(String, bool), MetadataRecord>>,
    pub calls: Mutex<Vec<(String, bool)>>,
}

impl FakeResolver {
    pub fn knows(&self, title: &str, native: bool, record: MetadataRecord) {
        self.known.lock().insert((title.to_string(), native), record);
    }
}

#[async_trait]
impl TitleResolver for FakeResolver {
    async fn resolve(&self, title: &str, is_native_script: bool) -> Option<MetadataRecord> {
        self.calls.lock().push((title.to_string(), is_native_script));
        self.known
            .lock()
            .get(&(title.to_string(), is_native_script))
            .cloned()
    }
}

/// Prober answering from a title table.
#[derive(Default)]
pub struct FakeProber {
    known: Mutex<HashMap<String, WatchCandidate>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn lists(&self, probed: &str, matched_title: &str, watch_url: &str) {
        self.known.lock().insert(
            probed.to_string(),
            WatchCandidate {
                matched_title: matched_title.to_string(),
                watch_url: watch_url.to_string(),
            },
        );
    }
}

#[async_trait]
impl WatchProber for FakeProber {
    async fn probe(&self, title: &str) -> Option<WatchCandidate> {
        self.calls.lock().push(title.to_string());
        self.known.lock().get(title).cloned()
    }
}

/// Lookup returning a fixed outcome and counting calls.
pub struct FakeLookup {
    outcome: Mutex<LookupOutcome>,
    pub queries: Mutex<Vec<String>>,
}

impl Default for FakeLookup {
    fn default() -> Self {
        Self {
            outcome: Mutex::new(LookupOutcome::NoResults),
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl FakeLookup {
    pub fn answers(&self, outcome: LookupOutcome) {
        *self.outcome.lock() = outcome;
    }
}

#[async_trait]
impl MovieLookup for FakeLookup {
    async fn search_by_free_text(&self, query: &LookupQuery) -> LookupOutcome {
        self.queries.lock().push(query.as_str().to_string());
        self.outcome.lock().clone()
    }
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat: ChatId,
        text: String,
        reply_to: Option<MessageId>,
    },
    Photo {
        chat: ChatId,
        url: String,
    },
}

impl Sent {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Photo { .. } => None,
        }
    }
}

/// Transport that records instead of sending.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
    /// Fail every photo send.
    pub fail_photos: Mutex<bool>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat: ChatId, text: &str, reply_to: Option<MessageId>) -> Result<()> {
        self.sent.lock().push(Sent::Text {
            chat,
            text: text.to_string(),
            reply_to,
        });
        Ok(())
    }

    async fn send_photo(&self, chat: ChatId, photo_url: &str) -> Result<()> {
        if *self.fail_photos.lock() {
            anyhow::bail!("photo rejected");
        }
        self.sent.lock().push(Sent::Photo {
            chat,
            url: photo_url.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct TestHarness {
    pub ctx: AppContext,
    pub resolver: Arc<FakeResolver>,
    pub prober: Arc<FakeProber>,
    pub lookup: Arc<FakeLookup>,
    pub history: Arc<MemoryHistory>,
    pub transport: Arc<RecordingTransport>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let resolver = Arc::new(FakeResolver::default());
        let prober = Arc::new(FakeProber::default());
        let lookup = Arc::new(FakeLookup::default());
        let history = Arc::new(MemoryHistory::new());
        let transport = Arc::new(RecordingTransport::default());

        let ctx = AppContext::new(
            config,
            history.clone(),
            resolver.clone(),
            prober.clone(),
            lookup.clone(),
            transport.clone(),
        );

        Self {
            ctx,
            resolver,
            prober,
            lookup,
            history,
            transport,
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.transport.sent.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .iter()
            .filter_map(|s| s.text().map(str::to_string))
            .collect()
    }
}

pub const CHAT: ChatId = ChatId::new(500);

/// A message from `user` in the shared test chat.
pub fn message(user: i64, message_id: i64, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: CHAT,
        message_id: MessageId::new(message_id),
        user_id: UserId::new(user),
        text: text.to_string(),
    }
}

pub fn record(name: &str) -> MetadataRecord {
    MetadataRecord {
        name: name.to_string(),
        year: Some(1999),
        rating_imdb: Some(8.7),
        description: Some("Хакер Нео узнаёт правду о мире".to_string()),
        poster_url: Some(format!("https://img.example/{}.jpg", name.len())),
    }
}
