//! Preview sessions.
//!
//! A [`PreviewSession`] owns everything one open preview needs: the
//! classification, the resolved URL, the viewer state and, for office
//! documents, the conversion result. It drives the pipeline
//!
//! ```text
//! DocumentReference -> classify -> resolve -> (native | convert | unsupported) -> render
//! ```
//!
//! Conversion runs on a spawned task. Its result comes back over a channel
//! and is applied by [`PreviewSession::settle`] or
//! [`PreviewSession::poll_events`]. Every request carries a generation number
//! and a child cancellation token, so a result for a superseded URL or a
//! closed session is dropped rather than applied.
//!
//! ## Example
//!
//! ```rust,ignore
//! let reference = DocumentReference::new("resume.docx", "").with_url("resume.docx");
//! let mut session = PreviewSession::open(reference, converter, UrlResolver::default());
//! let phase = session.settle().await;
//! let branch = session.render();
//! ```

mod state;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::convert::{ConversionResult, DocumentConverter};
use crate::error::{Error, Result};
use crate::format::{classify, DocumentFormat, FormatFlags};
use crate::render::{dispatch, RenderBranch};
use crate::resolve::UrlResolver;

pub use state::{
    DocumentReference, PreviewPhase, ViewerError, ViewerErrorKind, ViewerState,
};

/// Result of one conversion request, tagged with the request generation.
struct ConversionEvent {
    generation: u64,
    outcome: Result<ConversionResult>,
}

/// Inputs that trigger a conversion request when they change.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    resolved_url: String,
    is_office_document: bool,
}

/// One open document preview.
pub struct PreviewSession {
    id: Uuid,
    converter: Arc<dyn DocumentConverter>,
    resolver: UrlResolver,
    reference: DocumentReference,
    format: DocumentFormat,
    resolved_url: String,
    state: ViewerState,
    conversion: Option<ConversionResult>,
    fetch_key: FetchKey,
    generation: u64,
    in_flight: Option<CancellationToken>,
    lifetime: CancellationToken,
    events_tx: mpsc::UnboundedSender<ConversionEvent>,
    events_rx: mpsc::UnboundedReceiver<ConversionEvent>,
    closed: bool,
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("id", &self.id)
            .field("format", &self.format)
            .field("resolved_url", &self.resolved_url)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl PreviewSession {
    /// Open a preview for `reference`.
    ///
    /// Office documents with a resolvable location dispatch their conversion
    /// request immediately, so this must be called from within a tokio runtime.
    #[must_use]
    pub fn open(
        reference: DocumentReference,
        converter: Arc<dyn DocumentConverter>,
        resolver: UrlResolver,
    ) -> Self {
        let format = classify(&reference.file_type, &reference.file_name);
        let resolved_url = resolver.resolve(reference.file_url.as_deref());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut session = Self {
            id: Uuid::new_v4(),
            converter,
            resolver,
            reference,
            format,
            resolved_url,
            state: ViewerState::initial(format),
            conversion: None,
            fetch_key: FetchKey {
                resolved_url: String::new(),
                is_office_document: false,
            },
            generation: 0,
            in_flight: None,
            lifetime: CancellationToken::new(),
            events_tx,
            events_rx,
            closed: false,
        };

        tracing::debug!(
            session_id = %session.id,
            format = %session.format,
            resolved_url = %session.resolved_url,
            "opened preview session"
        );

        session.sync_conversion();
        session
    }

    /// Replace the document reference.
    ///
    /// The viewer state resets when the format or resolved URL changes. A new
    /// conversion request is issued only when the resolved URL or the office
    /// flag changes.
    pub fn update(&mut self, reference: DocumentReference) {
        if self.closed {
            tracing::debug!(session_id = %self.id, "ignoring update on closed session");
            return;
        }

        let format = classify(&reference.file_type, &reference.file_name);
        let resolved_url = self.resolver.resolve(reference.file_url.as_deref());
        self.reference = reference;

        if format == self.format && resolved_url == self.resolved_url {
            return;
        }

        let same_key = self.fetch_key
            == FetchKey {
                resolved_url: resolved_url.clone(),
                is_office_document: format.is_office_document(),
            };

        let carried_error = if same_key && format.is_office_document() {
            self.state
                .error
                .take()
                .filter(|e| e.kind == ViewerErrorKind::Conversion)
        } else {
            None
        };

        self.format = format;
        self.resolved_url = resolved_url;
        self.state = ViewerState::initial(format);
        self.state.error = carried_error;

        tracing::debug!(
            session_id = %self.id,
            format = %self.format,
            resolved_url = %self.resolved_url,
            "preview reference changed"
        );

        self.sync_conversion();
    }

    /// Issue or cancel the conversion request so it matches the current inputs.
    fn sync_conversion(&mut self) {
        let key = FetchKey {
            resolved_url: self.resolved_url.clone(),
            is_office_document: self.format.is_office_document(),
        };

        if key == self.fetch_key {
            return;
        }

        self.fetch_key = key;
        self.conversion = None;
        self.cancel_in_flight();

        if self.fetch_key.is_office_document && !self.fetch_key.resolved_url.is_empty() {
            self.dispatch_conversion();
        }
    }

    fn dispatch_conversion(&mut self) {
        self.generation += 1;

        let generation = self.generation;
        let token = self.lifetime.child_token();
        let converter = Arc::clone(&self.converter);
        let file_url = self.resolved_url.clone();
        let events_tx = self.events_tx.clone();
        let session_id = self.id;

        self.in_flight = Some(token.clone());

        tracing::debug!(%session_id, generation, %file_url, "requesting document conversion");

        tokio::spawn(async move {
            // Separate task: a converter panic arrives here as a JoinError.
            let mut request = tokio::spawn(async move { converter.convert(&file_url).await });

            let outcome = tokio::select! {
                () = token.cancelled() => {
                    request.abort();
                    tracing::debug!(%session_id, generation, "conversion request cancelled");
                    return;
                }
                joined = &mut request => joined.unwrap_or_else(|err| {
                    Err(Error::Internal(format!("converter task failed: {err}")))
                }),
            };

            if events_tx.send(ConversionEvent { generation, outcome }).is_err() {
                tracing::debug!(%session_id, generation, "session dropped before conversion finished");
            }
        });
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    fn apply_event(&mut self, event: ConversionEvent) -> bool {
        if self.closed || self.in_flight.is_none() || event.generation != self.generation {
            tracing::debug!(
                session_id = %self.id,
                generation = event.generation,
                "discarding stale conversion result"
            );
            return false;
        }

        self.in_flight = None;

        match event.outcome {
            Ok(result) => {
                tracing::debug!(
                    session_id = %self.id,
                    bytes = result.html_content.len(),
                    "document converted"
                );
                self.conversion = Some(result);
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %self.id,
                    resolved_url = %self.resolved_url,
                    error = %err,
                    recoverable = err.is_recoverable(),
                    "document conversion failed"
                );
                self.state.error = Some(ViewerError::conversion(&err));
            }
        }

        true
    }

    /// Wait until no conversion request is outstanding and return the phase.
    pub async fn settle(&mut self) -> PreviewPhase {
        while self.in_flight.is_some() && !self.closed {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            self.apply_event(event);
        }
        self.phase()
    }

    /// Apply any conversion results that have already arrived, without waiting.
    ///
    /// Returns the number of results applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Signal that the host finished loading the native image or frame.
    pub fn native_loaded(&mut self) -> PreviewPhase {
        if self.accepts_native_signal() {
            self.state.is_loading = false;
        }
        self.phase()
    }

    /// Signal that the host failed to load the native image or frame.
    pub fn native_failed(&mut self, detail: &str) -> PreviewPhase {
        if self.accepts_native_signal() {
            self.state.is_loading = false;
            self.state.error = Some(ViewerError::native_load(self.format, detail));
            tracing::warn!(
                session_id = %self.id,
                resolved_url = %self.resolved_url,
                detail,
                "native preview failed to load"
            );
        }
        self.phase()
    }

    fn accepts_native_signal(&self) -> bool {
        !self.closed
            && self.format.can_preview_natively()
            && self.state.is_loading
            && !self.resolved_url.is_empty()
    }

    /// Close the session. Any in-flight conversion is cancelled and late
    /// results are discarded.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.lifetime.cancel();
        self.in_flight = None;
        self.conversion = None;
        tracing::debug!(session_id = %self.id, "closed preview session");
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> PreviewPhase {
        if self.closed {
            PreviewPhase::Closed
        } else if self.resolved_url.is_empty() {
            PreviewPhase::Empty
        } else {
            PreviewPhase::derive(self.format, &self.state, self.conversion.is_some())
        }
    }

    /// What the host should display right now. `None` renders nothing.
    #[must_use]
    pub fn render(&self) -> Option<RenderBranch> {
        if self.closed {
            return None;
        }
        dispatch(
            self.format,
            &self.state,
            self.conversion.as_ref(),
            &self.resolved_url,
        )
    }

    /// Serializable view of the session.
    #[must_use]
    pub fn snapshot(&self) -> PreviewSnapshot {
        PreviewSnapshot {
            session_id: self.id,
            file_name: self.reference.file_name.clone(),
            resolved_url: self.resolved_url.clone(),
            format: self.format,
            flags: self.format.flags(),
            phase: self.phase(),
            state: self.state.clone(),
            render: self.render(),
        }
    }

    /// Session identifier, as recorded in log events.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The current document reference.
    #[must_use]
    pub const fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    /// The classified format.
    #[must_use]
    pub const fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Boolean view of the classified format.
    #[must_use]
    pub const fn flags(&self) -> FormatFlags {
        self.format.flags()
    }

    /// The resolved URL; empty when there is nothing to preview.
    #[must_use]
    pub fn resolved_url(&self) -> &str {
        &self.resolved_url
    }

    /// Loading and error flags.
    #[must_use]
    pub const fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Converted markup, once available.
    #[must_use]
    pub const fn conversion(&self) -> Option<&ConversionResult> {
        self.conversion.as_ref()
    }

    /// Whether a conversion request is outstanding.
    #[must_use]
    pub const fn is_converting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for PreviewSession {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Serializable view of a [`PreviewSession`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSnapshot {
    /// Session identifier
    pub session_id: Uuid,
    /// File name of the reference
    pub file_name: String,
    /// Resolved URL
    pub resolved_url: String,
    /// Classified format
    pub format: DocumentFormat,
    /// Boolean view of the format
    pub flags: FormatFlags,
    /// Lifecycle phase
    pub phase: PreviewPhase,
    /// Loading and error flags
    pub state: ViewerState,
    /// Render decision, absent when nothing is rendered
    pub render: Option<RenderBranch>,
}
