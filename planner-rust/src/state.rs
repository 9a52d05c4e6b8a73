use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Lifecycle of one planner operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    InFlight,
    Succeeded(T),
    /// Holds the message to show the user.
    Failed(String),
}

impl<T> RequestState<T> {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one trigger of an operation. Only the ticket of the most
/// recent trigger may commit a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

struct SlotInner<T> {
    state: RequestState<T>,
    generation: u64,
}

/// The state slot of one operation. The lock is only held while a
/// transition is applied, never across a request.
pub struct OperationSlot<T> {
    name: &'static str,
    inner: Mutex<SlotInner<T>>,
}

impl<T: Clone> OperationSlot<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(SlotInner {
                state: RequestState::Idle,
                generation: 0,
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> RequestState<T> {
        self.lock().state.clone()
    }

    /// Number of triggers so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Move to `InFlight` under a new generation.
    pub fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = RequestState::InFlight;
        debug!(slot = self.name, generation = inner.generation, "in flight");
        Ticket(inner.generation)
    }

    /// Publish the outcome of the trigger identified by `ticket`. Returns
    /// `false` and leaves the slot untouched when a newer trigger started
    /// since.
    pub fn commit(&self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.generation {
            debug!(
                slot = self.name,
                stale = ticket.0,
                current = inner.generation,
                "discarding stale completion"
            );
            return false;
        }

        inner.state = match outcome {
            Ok(payload) => RequestState::Succeeded(payload),
            Err(message) => RequestState::Failed(message),
        };
        debug!(slot = self.name, generation = ticket.0, "committed");
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
