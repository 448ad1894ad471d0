//! Network utilities for the storage REST clients.

mod client;

pub use client::{describe_failure, extract_domain, redact_query, HttpClient};
