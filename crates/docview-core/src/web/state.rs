//! Shared state for the web server.

use std::sync::Arc;

use crate::convert::DocumentConverter;
use crate::resolve::UrlResolver;
use crate::viewer::{DocumentReference, PreviewSession};

/// State shared by all handlers.
pub struct AppState {
    /// Converter used for office documents
    pub converter: Arc<dyn DocumentConverter>,
    /// Resolver applied to every file reference
    pub resolver: UrlResolver,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Shared state handle.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(converter: Arc<dyn DocumentConverter>, resolver: UrlResolver) -> Self {
        Self {
            converter,
            resolver,
        }
    }

    /// Open a preview session for a request.
    #[must_use]
    pub fn open_session(&self, reference: DocumentReference) -> PreviewSession {
        PreviewSession::open(reference, Arc::clone(&self.converter), self.resolver.clone())
    }
}
