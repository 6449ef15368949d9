//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::conversation::ChatAssembler;
use crate::error::RelayResult;
use crate::gateway::{GeminiClient, GeminiConfig, GenerativeModel};
use crate::session::{InMemorySessionStore, SessionStore};

/// Shared application state.
pub struct AppState {
    /// Conversation assembler for `/chat`.
    pub assembler: ChatAssembler,
    /// Configuration the server was started with.
    pub config: RelayConfig,
}

impl AppState {
    /// Create state backed by the Gemini client and an in-memory store.
    ///
    /// # Errors
    /// Returns an error if the Gemini HTTP client cannot be created.
    pub fn new(config: RelayConfig) -> RelayResult<Arc<Self>> {
        let gemini = GeminiClient::new(
            GeminiConfig::new(config.api_key.clone())
                .with_base_url(config.gemini_base_url.clone())
                .with_timeout(config.request_timeout),
        )?;
        let store = Arc::new(InMemorySessionStore::with_max_turns(config.max_turns));

        Ok(Self::with_parts(config, store, Arc::new(gemini)))
    }

    /// Create state from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        config: RelayConfig,
        store: Arc<dyn SessionStore>,
        model: Arc<dyn GenerativeModel>,
    ) -> Arc<Self> {
        let assembler = ChatAssembler::new(store, model, config.model.clone());
        Arc::new(Self { assembler, config })
    }
}
