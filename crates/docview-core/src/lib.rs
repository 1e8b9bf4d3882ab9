//! # Docview Core Library
//!
//! `docview-core` decides how a stored document is previewed: shown natively,
//! converted to markup by a remote converter, or offered as a download.
//!
//! ## Features
//!
//! - **Format classification**: MIME type first, file extension as fallback
//! - **URL resolution**: bare file names are placed under the upload prefix
//! - **Office conversion**: one cancellable request per document location
//! - **Render dispatch**: a single render decision per session state
//!
//! ## Modules
//!
//! - [`config`] - Configuration management
//! - [`convert`] - Conversion endpoint contract and HTTP client
//! - [`error`] - Error types
//! - [`format`] - Document format classification
//! - [`render`] - Render dispatch and HTML fragments
//! - [`resolve`] - File reference to URL resolution
//! - [`viewer`] - Preview sessions
//! - [`web`] - Embedded web API
//!
//! ## Example
//!
//! ```rust,ignore
//! use docview_core::convert::HttpConverter;
//! use docview_core::viewer::{DocumentReference, PreviewSession};
//!
//! let converter = Arc::new(HttpConverter::new("http://localhost:3000/api/documents/convert"));
//! let reference = DocumentReference::new("resume.docx", "").with_url("resume.docx");
//! let mut session = PreviewSession::open(reference, converter, Default::default());
//! session.settle().await;
//! println!("{:?}", session.render());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod render;
pub mod resolve;
pub mod viewer;

#[cfg(feature = "web")]
pub mod web;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix prepended to bare file names
pub const DEFAULT_UPLOAD_PREFIX: &str = "/uploads/documents";

/// Default conversion endpoint
pub const DEFAULT_CONVERTER_ENDPOINT: &str = "http://localhost:3000/api/documents/convert";

/// Default per-request conversion timeout in seconds
pub const DEFAULT_CONVERSION_TIMEOUT_SECS: u64 = 30;

/// Default web server port
pub const DEFAULT_WEB_PORT: u16 = 8080;
