//! Error types for the Namecheap API client.
//!
//! # Design
//! Four failure classes are kept apart so callers can react to each:
//! local misuse (`Configuration`), the HTTP round-trip itself (`Transport`),
//! a body that is not the expected XML envelope (`Decode`), and a
//! well-formed envelope whose status is `ERROR` (`Remote`). Remote errors are
//! only ever built from what the API returned, in the order it returned them.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `NamecheapClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client or request was misused before anything was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The HTTP round-trip failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body is not a valid API envelope. `payload` holds the
    /// raw body for diagnosis.
    #[error("failed to decode response: {message}")]
    Decode { message: String, payload: String },

    /// The API answered with `Status="ERROR"`.
    #[error(transparent)]
    Remote(#[from] RemoteErrors),
}

impl ApiError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn decode(message: impl fmt::Display, payload: impl Into<String>) -> Self {
        Self::Decode {
            message: message.to_string(),
            payload: payload.into(),
        }
    }

    /// The remote error list, if this is a `Remote` error.
    pub fn remote_errors(&self) -> Option<&[RemoteError]> {
        match self {
            Self::Remote(errors) => Some(&errors.0),
            _ => None,
        }
    }
}

/// Failures of the underlying HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, TLS or read failure.
    #[error("request failed: {0}")]
    Io(String),

    /// The per-request deadline elapsed.
    #[error("request timed out")]
    Timeout,

    /// A non-2xx status whose body was not an API envelope.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// A single `(Number, Message)` pair from the `Errors` element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error {number}: {message}")]
pub struct RemoteError {
    pub number: u32,
    pub message: String,
}

/// Every error the API reported for one request, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote API error: {}", join(.0))]
pub struct RemoteErrors(pub Vec<RemoteError>);

impl RemoteErrors {
    pub fn iter(&self) -> impl Iterator<Item = &RemoteError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any entry carries the given error number.
    pub fn contains(&self, number: u32) -> bool {
        self.0.iter().any(|e| e.number == number)
    }
}

fn join(errors: &[RemoteError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
