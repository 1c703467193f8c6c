//! WorkNow REST API client.
//!
//! One-shot request/response wrappers: no retry, batching or caching. Every
//! call reads the bearer token from the session store at send time.

mod applications;
mod auth;
pub mod client;
pub mod models;
mod postings;
mod profiles;

pub use client::ApiClient;
pub use models::*;
