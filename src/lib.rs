//! reqhelper - HTTP request helper for integration tests
//!
//! A thin session over a single `reqwest::Client` that sends plain, multipart
//! and bodyless requests, threads cookies between calls, and decodes
//! compressed (gzip, Brotli, zstd, deflate) and JSON response bodies.

pub mod config;
pub mod cookie;
pub mod error;
pub mod exit_code;
pub mod http;
pub mod logging;
pub mod payloads;
pub mod report;
pub mod utils;

pub use cookie::Cookie;
pub use error::{ReqHelperError, Result};
pub use http::request::{Payload, RequestOptions};
pub use http::response::{Exchange, HttpResponse};
pub use http::Session;
pub use report::{FailureReporter, PanicReporter};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
