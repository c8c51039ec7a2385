use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{Field, OptionSet},
    validation::validate_required,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod error;
pub mod form;
pub mod transport;

pub use error::{SubmitError, TransportError};
pub use form::{FormAction, FormState, SubmissionStatus, View};
pub use transport::{HttpRegistrationTransport, RegistrationTransport, REGISTER_PATH};

use form::{FAILURE_TOAST, SUCCESS_TOAST, VALIDATION_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Toast(Toast),
    Navigated(View),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// A previous submission has not answered yet; nothing was sent.
    AlreadyPending,
}

/// Owns the registration form. Every change goes through [`FormState::reduce`]
/// and swaps in a new state; readers only ever see whole snapshots.
///
/// The state lock is never held across an await.
pub struct FormController<T: RegistrationTransport> {
    transport: T,
    state: Mutex<Arc<FormState>>,
    events: broadcast::Sender<FormEvent>,
}

impl<T: RegistrationTransport> FormController<T> {
    pub fn new(transport: T) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            transport,
            state: Mutex::new(Arc::new(FormState::default())),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Arc<FormState> {
        lock_state(&self.state).clone()
    }

    pub async fn update_field(&self, field: Field, value: impl Into<String>) -> Arc<FormState> {
        self.dispatch(FormAction::Update {
            field,
            value: value.into(),
        })
    }

    pub async fn select<O: OptionSet>(&self, option: O) -> Arc<FormState> {
        self.update_field(O::FIELD, option.as_str()).await
    }

    pub async fn reset(&self) -> Arc<FormState> {
        self.dispatch(FormAction::Reset)
    }

    pub async fn return_to_form(&self) -> Arc<FormState> {
        let state = self.dispatch(FormAction::ReturnToForm);
        self.emit(FormEvent::Navigated(View::Form));
        state
    }

    /// Validates the form and, when complete, sends it exactly once.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let payload = {
            let mut current = lock_state(&self.state);
            if current.is_pending() {
                debug!("submission already in flight; ignoring submit");
                return Ok(SubmitOutcome::AlreadyPending);
            }

            let requested = current.reduce(FormAction::SubmitRequested);
            if let Err(error) = validate_required(&requested.payload) {
                *current = Arc::new(requested.reduce(FormAction::ValidationFailed));
                drop(current);
                debug!(missing = ?error.missing_fields(), "registration form incomplete");
                self.emit(FormEvent::Toast(Toast::error(VALIDATION_MESSAGE)));
                return Err(error.into());
            }

            let started = Arc::new(requested.reduce(FormAction::SubmitStarted));
            *current = started.clone();
            started.payload.clone()
        };

        let mut in_flight = InFlight {
            state: &self.state,
            armed: true,
        };
        let result = self.transport.submit(&payload).await;
        in_flight.armed = false;

        match result {
            Ok(()) => {
                self.dispatch(FormAction::SubmitSucceeded);
                info!("registration submitted");
                self.emit(FormEvent::Toast(Toast::success(SUCCESS_TOAST)));
                self.emit(FormEvent::Navigated(View::Success));
                Ok(SubmitOutcome::Submitted)
            }
            Err(error) => {
                self.dispatch(FormAction::SubmitFailed);
                warn!(%error, "registration submission failed");
                self.emit(FormEvent::Toast(Toast::error(FAILURE_TOAST)));
                Err(error.into())
            }
        }
    }

    fn dispatch(&self, action: FormAction) -> Arc<FormState> {
        let mut current = lock_state(&self.state);
        let next = Arc::new(current.reduce(action));
        *current = next.clone();
        next
    }

    fn emit(&self, event: FormEvent) {
        let _ = self.events.send(event);
    }
}

/// Marks a submission whose future was dropped before the transport answered
/// (timeout, `select!`, shutdown) as cancelled, so the form can be sent again.
struct InFlight<'a> {
    state: &'a Mutex<Arc<FormState>>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut current = lock_state(self.state);
        if current.is_pending() {
            debug!("registration submission abandoned before the proxy answered");
            *current = Arc::new(current.reduce(FormAction::SubmitCancelled));
        }
    }
}

fn lock_state(state: &Mutex<Arc<FormState>>) -> MutexGuard<'_, Arc<FormState>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
