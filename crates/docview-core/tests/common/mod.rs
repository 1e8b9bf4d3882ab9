//! Common test utilities for `Docview` integration tests.
//!
//! Provides scripted converters and a fake conversion endpoint.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use docview_core::convert::{
    ConversionRequest, ConversionResponse, ConversionResult, DocumentConverter,
};
use docview_core::{Error, Result};

/// Converter with scripted behavior that records every request.
pub struct ScriptedConverter {
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    delay: Duration,
    failure: Option<String>,
}

impl ScriptedConverter {
    /// Succeeds immediately with `<p>{url}</p>`.
    pub fn ok() -> Arc<Self> {
        Self::build(Duration::ZERO, None)
    }

    /// Succeeds after `delay`.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::build(delay, None)
    }

    /// Fails with a conversion error.
    pub fn failing(message: &str) -> Arc<Self> {
        Self::build(Duration::ZERO, Some(message.to_string()))
    }

    fn build(delay: Duration, failure: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            delay,
            failure,
        })
    }

    /// Number of conversion requests issued.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs requested, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentConverter for ScriptedConverter {
    async fn convert(&self, file_url: &str) -> Result<ConversionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(file_url.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.failure {
            Some(message) => Err(Error::ConversionFailed(message.clone())),
            None => Ok(ConversionResult::new(format!("<p>{file_url}</p>"))),
        }
    }
}

/// A fake conversion endpoint listening on a loopback port.
///
/// The response depends on the requested file URL:
///
/// | URL contains | Response |
/// |--------------|----------|
/// | `broken` | `{ "success": false, "error": "corrupt document" }` |
/// | `crash` | HTTP 500 |
/// | `garbage` | non-JSON body |
/// | `empty` | `{ "success": true }` with no content |
/// | `stall` | normal response after a two second delay |
/// | anything else | `<p>{fileUrl}</p>` |
pub struct FakeEndpoint {
    /// Address the endpoint listens on
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl FakeEndpoint {
    /// Start the endpoint on an ephemeral port.
    pub async fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let app = Router::new().route(
            "/api/documents/convert",
            post(move |Json(request): Json<ConversionRequest>| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if request.file_url.contains("stall") {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                    respond(&request.file_url)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake endpoint");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, hits }
    }

    /// Full URL of the conversion route.
    pub fn url(&self) -> String {
        format!("http://{}/api/documents/convert", self.addr)
    }

    /// Number of requests received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn respond(file_url: &str) -> Response {
    if file_url.contains("broken") {
        Json(ConversionResponse::failed("corrupt document")).into_response()
    } else if file_url.contains("crash") {
        (StatusCode::INTERNAL_SERVER_ERROR, "converter crashed").into_response()
    } else if file_url.contains("garbage") {
        (StatusCode::OK, "<html>not json</html>").into_response()
    } else if file_url.contains("empty") {
        Json(ConversionResponse {
            success: true,
            ..Default::default()
        })
        .into_response()
    } else {
        Json(ConversionResponse::ok(format!("<p>{file_url}</p>"))).into_response()
    }
}
