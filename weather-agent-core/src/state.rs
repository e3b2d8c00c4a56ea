use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

/// Lifecycle of one asynchronous load.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AsyncState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> AsyncState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            AsyncState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AsyncState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Proof that the holder started the load currently shown as `Loading`.
///
/// Completions carrying an outdated ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Observable holder for an [`AsyncState`].
///
/// Every transition is published to all receivers handed out by
/// [`StateCell::subscribe`].
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<AsyncState<T>>,
    generation: AtomicU64,
    closed: AtomicBool,
}

impl<T> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StateCell<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AsyncState::Idle);
        Self {
            tx,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Move to `Loading` unless a load is already in flight.
    ///
    /// The check and the transition happen under the channel's write lock,
    /// so two racing callers can never both receive a ticket.
    pub fn begin(&self) -> Option<Ticket> {
        let mut ticket = None;
        self.tx.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst) || state.is_loading() {
                return false;
            }
            let next = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            ticket = Some(Ticket(next));
            *state = AsyncState::Loading;
            true
        });
        ticket
    }

    /// Publish a successful result. Returns `false` if the ticket is stale.
    pub fn succeed(&self, ticket: Ticket, value: T) -> bool {
        self.finish(ticket, AsyncState::Success(value))
    }

    /// Publish a failure. Returns `false` if the ticket is stale.
    pub fn fail(&self, ticket: Ticket, message: impl Into<String>) -> bool {
        self.finish(ticket, AsyncState::Failure(message.into()))
    }

    fn finish(&self, ticket: Ticket, outcome: AsyncState<T>) -> bool {
        self.tx.send_if_modified(move |state| {
            if self.closed.load(Ordering::SeqCst)
                || self.generation.load(Ordering::SeqCst) != ticket.0
                || !state.is_loading()
            {
                return false;
            }
            *state = outcome;
            true
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<AsyncState<T>> {
        self.tx.subscribe()
    }

    /// Tear the cell down. Loads still in flight will find their ticket
    /// outdated, and no further load can begin.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl<T: Clone> StateCell<T> {
    pub fn current(&self) -> AsyncState<T> {
        self.tx.borrow().clone()
    }
}
