use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

use super::{AgentClient, ChatMessage, ChatSessionState, FALLBACK_MESSAGE};

/// Why `send_message` declined to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejected {
    BlankDraft,
    InFlight,
    Closed,
}

/// Message log plus one send/receive cycle at a time.
#[derive(Debug)]
pub struct ChatStore {
    client: Arc<dyn AgentClient>,
    tx: watch::Sender<ChatSessionState>,
    /// Bumped by `clear` and `close`; replies from an older epoch are dropped.
    epoch: AtomicU64,
    closed: AtomicBool,
}

impl ChatStore {
    pub fn new(client: Arc<dyn AgentClient>) -> Self {
        let (tx, _rx) = watch::channel(ChatSessionState::default());
        Self {
            client,
            tx,
            epoch: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ChatSessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSessionState> {
        self.tx.subscribe()
    }

    pub fn update_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.tx.send_modify(|state| state.draft = text);
    }

    /// Send the current draft.
    ///
    /// Returns `false` if the draft is blank or a send is already running.
    /// The user's message is logged before the network call and is never
    /// removed, whatever the outcome.
    pub async fn send_message(&self) -> bool {
        let mut started = Err(Rejected::BlankDraft);
        self.tx.send_if_modified(|state| {
            let text = match self.check_start(state) {
                Ok(text) => text,
                Err(reason) => {
                    started = Err(reason);
                    return false;
                }
            };

            state.messages.push(ChatMessage::user(text.clone()));
            state.draft.clear();
            state.is_loading = true;
            state.last_error = None;

            started = Ok((text, self.epoch.load(Ordering::SeqCst)));
            true
        });

        let (text, epoch) = match started {
            Ok(started) => started,
            Err(reason) => {
                tracing::debug!(?reason, "chat send ignored");
                return false;
            }
        };

        let outcome = self.client.ask(&text).await;

        let applied = self.tx.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst) || self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            match outcome {
                Ok(reply) => {
                    tracing::info!(chars = reply.chars().count(), "agent replied");
                    state.messages.push(ChatMessage::agent(reply));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "agent request failed");
                    state.messages.push(ChatMessage::agent(FALLBACK_MESSAGE));
                    state.last_error = Some(err.to_string());
                }
            }
            state.is_loading = false;
            true
        });

        if !applied {
            tracing::debug!("chat session reset before the agent replied, dropping reply");
        }
        true
    }

    /// Trimmed draft to send, or the reason no send may start.
    fn check_start(&self, state: &ChatSessionState) -> Result<String, Rejected> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Rejected::Closed);
        }
        if state.is_loading {
            return Err(Rejected::InFlight);
        }
        match state.draft.trim() {
            "" => Err(Rejected::BlankDraft),
            text => Ok(text.to_string()),
        }
    }

    pub fn clear_error(&self) {
        self.tx.send_if_modified(|state| state.last_error.take().is_some());
    }

    /// Start over with an empty session.
    pub fn clear(&self) {
        self.tx.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *state = ChatSessionState::default();
        });
    }

    /// Detach from the screen. Replies still in flight are dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}
