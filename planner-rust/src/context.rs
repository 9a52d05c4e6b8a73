use crate::{credential::CREDENTIAL_KEY, CredentialStore, PlannerError};
use std::sync::Arc;
use tracing::info;

/// State shared by every planner operation: where the API key lives.
///
/// The key is read from the store on every call so an edit made through
/// [`PlannerContext::set_credential`] (or by another process writing the
/// same store) applies to the next request.
#[derive(Clone)]
pub struct PlannerContext {
    store: Arc<dyn CredentialStore>,
}

impl PlannerContext {
    /// Open the context and read the stored credential once to report
    /// whether one is configured.
    pub fn load(store: Arc<dyn CredentialStore>) -> Result<Self, PlannerError> {
        let context = Self { store };
        let configured = !context.credential()?.is_empty();
        info!(configured, "loaded credential store");
        Ok(context)
    }

    /// The current API key, trimmed. Empty when none is stored.
    pub fn credential(&self) -> Result<String, PlannerError> {
        Ok(self
            .store
            .get(CREDENTIAL_KEY)?
            .map(|value| value.trim().to_string())
            .unwrap_or_default())
    }

    pub fn has_credential(&self) -> Result<bool, PlannerError> {
        Ok(!self.credential()?.is_empty())
    }

    /// Persist a new API key. Surrounding whitespace is dropped; an empty
    /// value clears the key.
    pub fn set_credential(&self, value: &str) -> Result<(), PlannerError> {
        let value = value.trim();
        self.store.set(CREDENTIAL_KEY, value)?;
        info!(configured = !value.is_empty(), "updated credential");
        Ok(())
    }
}
