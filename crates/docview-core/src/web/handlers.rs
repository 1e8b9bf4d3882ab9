//! HTTP endpoint handlers for the Docview web API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolve::UrlResolver;
use crate::viewer::{DocumentReference, PreviewSnapshot};

use super::error::ApiResult;
use super::state::SharedState;

/// Health response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Server version
    pub version: String,
}

/// Preview request body.
///
/// `fileUrl` accepts any JSON value; anything but a string means there is
/// nothing to preview.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewRequest {
    /// Stored file reference
    pub file_url: Value,
    /// Display name
    pub file_name: String,
    /// Declared MIME type
    pub file_type: String,
}

impl PreviewRequest {
    /// Convert into a document reference whose location is already resolved.
    ///
    /// A `fileUrl` that is not a string, or resolves to nothing, leaves the
    /// reference without a location.
    #[must_use]
    pub fn into_reference(self, resolver: &UrlResolver) -> DocumentReference {
        let resolved = resolver.resolve_value(&self.file_url);
        let reference = DocumentReference::new(self.file_name, self.file_type);
        if resolved.is_empty() {
            reference
        } else {
            reference.with_url(resolved)
        }
    }
}

/// Preview response: the settled session plus its HTML fragment.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Settled session view
    #[serde(flatten)]
    pub snapshot: PreviewSnapshot,
    /// HTML fragment for the render branch, absent when nothing is rendered
    pub html: Option<String>,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// POST /api/preview
///
/// Waits for any office conversion before answering. Conversion failures are
/// reported in the body (`phase: "office_failed"`), not as an HTTP error.
#[allow(clippy::missing_errors_doc)]
pub async fn create_preview(
    State(state): State<SharedState>,
    request: Result<Json<PreviewRequest>, JsonRejection>,
) -> ApiResult<Json<PreviewResponse>> {
    let Json(request) = request?;
    let mut session = state.open_session(request.into_reference(&state.resolver));
    let phase = session.settle().await;

    tracing::info!(
        session_id = %session.id(),
        format = %session.format(),
        ?phase,
        "preview served"
    );

    let snapshot = session.snapshot();
    let html = snapshot
        .render
        .as_ref()
        .map(|branch| branch.to_html(&snapshot.file_name));
    session.close();

    Ok(Json(PreviewResponse { snapshot, html }))
}
