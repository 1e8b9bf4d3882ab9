//! Integration tests for the HTTP conversion client.

#![cfg(feature = "http")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FakeEndpoint;
use docview_core::convert::{DocumentConverter, HttpConverter};
use docview_core::resolve::UrlResolver;
use docview_core::viewer::{DocumentReference, PreviewPhase, PreviewSession};
use docview_core::Error;

#[tokio::test]
async fn test_successful_conversion() {
    let endpoint = FakeEndpoint::start().await;
    let converter = HttpConverter::new(endpoint.url());

    let result = converter.convert("/uploads/documents/a.docx").await.unwrap();
    assert_eq!(result.html_content, "<p>/uploads/documents/a.docx</p>");
    assert_eq!(endpoint.hits(), 1);
}

#[tokio::test]
async fn test_reported_failure() {
    let endpoint = FakeEndpoint::start().await;
    let converter = HttpConverter::new(endpoint.url());

    let err = converter.convert("/broken.docx").await.unwrap_err();
    assert!(matches!(err, Error::ConversionFailed(ref m) if m == "corrupt document"));
    assert_eq!(err.code(), Some("E001"));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_server_error_status() {
    let endpoint = FakeEndpoint::start().await;
    let converter = HttpConverter::new(endpoint.url());

    let err = converter.convert("/crash.xlsx").await.unwrap_err();
    assert!(matches!(err, Error::ConversionRequest(ref m) if m.contains("500")));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_unparseable_body() {
    let endpoint = FakeEndpoint::start().await;
    let converter = HttpConverter::new(endpoint.url());

    let err = converter.convert("/garbage.pptx").await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)));
}

#[tokio::test]
async fn test_success_without_content() {
    let endpoint = FakeEndpoint::start().await;
    let converter = HttpConverter::new(endpoint.url());

    let err = converter.convert("/empty.docx").await.unwrap_err();
    assert_eq!(err.code(), Some("E003"));
}

#[tokio::test]
async fn test_sub_second_timeout_reports_whole_second() {
    let endpoint = FakeEndpoint::start().await;
    let converter = HttpConverter::with_timeout(endpoint.url(), Duration::from_millis(200));

    let err = converter.convert("/stall.docx").await.unwrap_err();
    assert!(matches!(err, Error::Timeout(1)), "unexpected error: {err}");
    assert_eq!(err.to_string(), "operation timed out after 1 seconds");
    assert_eq!(err.code(), Some("E004"));
}

#[tokio::test]
async fn test_session_over_http() {
    let endpoint = FakeEndpoint::start().await;
    let converter = Arc::new(HttpConverter::with_timeout(
        endpoint.url(),
        Duration::from_secs(5),
    ));

    let mut ok = PreviewSession::open(
        DocumentReference::new("hi.docx", "").with_url("hi.docx"),
        converter.clone(),
        UrlResolver::default(),
    );
    assert_eq!(ok.settle().await, PreviewPhase::OfficeReady);
    assert_eq!(
        ok.conversion().unwrap().html_content,
        "<p>/uploads/documents/hi.docx</p>"
    );

    let mut failed = PreviewSession::open(
        DocumentReference::new("broken.docx", "").with_url("broken.docx"),
        converter,
        UrlResolver::default(),
    );
    assert_eq!(failed.settle().await, PreviewPhase::OfficeFailed);
    assert_eq!(endpoint.hits(), 2);
}
