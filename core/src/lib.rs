//! Blocking client for the Namecheap domain XML API.
//!
//! # Overview
//! Covers listing, lookup, availability checks, registration, renewal and
//! TLD listing. Each call becomes one form-encoded POST carrying the account
//! credentials; each XML response is decoded into a typed result or a typed
//! error.
//!
//! # Design
//! - `NamecheapClient` holds read-only configuration and a transport; it is
//!   safe to share across threads whenever the transport is.
//! - Every operation has a `build_*` / `parse_*` pair so the HTTP round-trip
//!   can be executed by the host. The plain methods run it through an
//!   `HttpTransport` (`UreqTransport` by default).
//! - `get_all_domains` walks the paginated listing sequentially and returns
//!   what it collected alongside the error if a page fails.
//! - Payloads are a `CommandResponse` variant keyed by the issued command.

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod http;
pub mod paging;
pub mod query;
pub mod registrant;
pub mod request;
pub mod response;
pub mod types;
pub mod validate;

pub use client::{DomainCreateOptions, NamecheapClient};
pub use command::Command;
pub use config::{ClientConfig, Credentials, Endpoint};
pub use error::{ApiError, RemoteError, RemoteErrors, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use paging::PartialResult;
pub use query::{DomainListQuery, ListType, SortBy};
pub use registrant::Registrant;
pub use request::ApiRequest;
pub use response::{decode_response, CommandResponse, Envelope};
pub use types::{
    DnsDetails, DomainCheckResult, DomainCreateResult, DomainDetails, DomainInfo, DomainListEntry,
    DomainPage, DomainRenewResult, Paging, Tld, Whoisguard,
};
pub use validate::{is_valid_domain_label, is_valid_domain_name};
