//! Member CRUD API client
//!
//! Request builder/invoker for the member CRUD service. Each operation
//! builds a target URI, issues the request through the shared pooled
//! [`HttpClient`](crate::http::HttpClient), and returns the parsed body or
//! the full response envelope.

pub mod client;

pub use client::{CrudApiClient, ResponseEnvelope, MY_HEADER};
