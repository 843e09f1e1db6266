//! HTTP client module with error normalization and cancellation handling.

mod client;
mod error;
mod intercept;

pub use client::{ApiClient, Method, Outcome, RequestDescriptor};
pub use error::{ApiError, ErrorKind};
pub use intercept::{Interceptor, Passthrough};
