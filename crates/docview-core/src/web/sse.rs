//! Server-Sent Events (SSE) for preview phases.
//!
//! A client opens `/api/preview/events?fileUrl=…&fileName=…&fileType=…` and
//! receives a `phase` event with the initial snapshot, then (for office
//! documents) a second one once conversion settles. Disconnecting drops the
//! session, which cancels an outstanding conversion.

use std::convert::Infallible;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::viewer::{DocumentReference, PreviewSession, PreviewSnapshot};

use super::error::ApiResult;
use super::state::SharedState;

/// Query parameters for the event stream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewQuery {
    /// Stored file reference
    pub file_url: Option<String>,
    /// Display name
    pub file_name: String,
    /// Declared MIME type
    pub file_type: String,
}

impl From<PreviewQuery> for DocumentReference {
    fn from(query: PreviewQuery) -> Self {
        Self {
            file_url: query.file_url,
            file_name: query.file_name,
            file_type: query.file_type,
        }
    }
}

fn phase_event(snapshot: &PreviewSnapshot) -> Event {
    Event::default()
        .event("phase")
        .json_data(snapshot)
        .unwrap_or_else(|err| Event::default().event("error").data(err.to_string()))
}

/// GET /api/preview/events - SSE stream of phase events.
#[allow(clippy::missing_errors_doc)]
pub async fn preview_events(
    State(state): State<SharedState>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let Query(query) = query?;
    let session = state.open_session(query.into());

    let stream = stream::unfold(
        Some((session, true)),
        |step: Option<(PreviewSession, bool)>| async move {
            let (mut session, first) = step?;

            if !first {
                session.settle().await;
            }

            let event = phase_event(&session.snapshot());
            let next = (first && session.is_converting()).then_some((session, false));
            Some((Ok(event), next))
        },
    );

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
