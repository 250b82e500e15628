use crate::domain::model::{CrowdingReading, QueryRequest};
use crate::domain::ports::CrowdingSource;
use crate::utils::error::{CrowdingError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 每個 ticket 依序收到一個 `Pending`，之後恰好一個 `Completed` 或 `Discarded`。
#[derive(Debug)]
pub enum SessionEvent {
    Pending {
        ticket: u64,
    },
    Completed {
        ticket: u64,
        outcome: Result<CrowdingReading>,
    },
    Discarded {
        ticket: u64,
    },
}

impl SessionEvent {
    pub fn ticket(&self) -> u64 {
        match self {
            SessionEvent::Pending { ticket }
            | SessionEvent::Completed { ticket, .. }
            | SessionEvent::Discarded { ticket } => *ticket,
        }
    }
}

/// Dispatches queries without blocking the caller and reports their outcomes
/// over a channel.
///
/// With `discard_stale` set, a response that arrives after a newer query was
/// submitted is reported as [`SessionEvent::Discarded`] instead of being
/// rendered.
pub struct QuerySession<S: CrowdingSource + 'static> {
    source: Arc<S>,
    latest: Arc<AtomicU64>,
    discard_stale: bool,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<S: CrowdingSource + 'static> QuerySession<S> {
    pub fn new(source: S, discard_stale: bool) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            source: Arc::new(source),
            latest: Arc::new(AtomicU64::new(0)),
            discard_stale,
            events,
        };
        (session, receiver)
    }

    pub fn discard_stale(&self) -> bool {
        self.discard_stale
    }

    /// 送出查詢並立即回傳 ticket，必須在 tokio runtime 內呼叫
    pub fn submit(&self, request: QueryRequest) -> u64 {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.events.send(SessionEvent::Pending { ticket });

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.latest);
        let events = self.events.clone();
        let discard_stale = self.discard_stale;

        tokio::spawn(async move {
            // 查詢在內層 task 執行，panic 時仍要回報一個結果
            let query = tokio::spawn(async move { source.submit_query(&request).await });
            let outcome = match query.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("❌ Query #{} aborted: {}", ticket, e);
                    Err(CrowdingError::QueryAborted {
                        message: format!("query task aborted: {}", e),
                    })
                }
            };

            let event = if discard_stale && latest.load(Ordering::SeqCst) != ticket {
                tracing::debug!("Discarding stale response for query #{}", ticket);
                SessionEvent::Discarded { ticket }
            } else {
                SessionEvent::Completed { ticket, outcome }
            };

            if events.send(event).is_err() {
                tracing::debug!("Session closed before query #{} completed", ticket);
            }
        });

        ticket
    }
}
