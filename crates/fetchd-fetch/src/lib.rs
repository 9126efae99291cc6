//! `fetchd-fetch` — pluggable transport strategies.
//!
//! A [`FetchStrategy`] performs exactly one request/response exchange and
//! reports the outcome as a [`FetchResult`] — it never touches scheduling
//! state. The shipped implementation is [`HttpFetchStrategy`] (reqwest,
//! POST, bounded by a request timeout).

pub mod http;
pub mod strategy;

pub use http::HttpFetchStrategy;
pub use strategy::FetchStrategy;
