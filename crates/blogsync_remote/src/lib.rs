//! # blogsync remote
//!
//! Remote blog API source for blogsync.
//!
//! This crate provides:
//! - The [`RemoteSource`] trait the engine fetches through
//! - [`HttpRemoteSource`], a JSON-over-HTTP implementation with retry
//! - [`MockRemoteSource`], an in-process source for tests
//! - [`NetworkError`], the single error type of remote fetches
//!
//! Retry belongs here, not in the engine: a source may retry transient
//! failures internally, but every engine-level fetch is a single call.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod source;

pub use config::{RemoteConfig, RetryConfig, DEFAULT_BASE_URL};
pub use error::{NetworkError, NetworkResult};
pub use http::{HttpClient, HttpRemoteSource, HttpResponse, ReqwestClient};
pub use source::{MockRemoteSource, RemoteCall, RemoteSource};
