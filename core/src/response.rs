//! Decoding of the `ApiResponse` XML envelope.
//!
//! # Design
//! The wire document carries one slot per command under `CommandResponse`.
//! Decoding is keyed by the command that was issued: only that command's
//! slot is read, and it comes back as the matching `CommandResponse`
//! variant. An `ERROR` status becomes `ApiError::Remote` with every error
//! entry in document order.

use serde::Deserialize;

use crate::command::Command;
use crate::error::{ApiError, RemoteError, RemoteErrors, Result, TransportError};
use crate::http::HttpResponse;
use crate::types::{
    DomainCheckResult, DomainCreateResult, DomainInfo, DomainListEntry, DomainRenewResult, Paging,
    Tld,
};

/// Payload of a successful response, keyed by the command that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    DomainList(Vec<DomainListEntry>),
    DomainInfo(DomainInfo),
    DomainCheck(Vec<DomainCheckResult>),
    DomainCreate(DomainCreateResult),
    DomainRenew(DomainRenewResult),
    TldList(Vec<Tld>),
}

/// A decoded `Status="OK"` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// `RequestedCommand` as echoed by the server.
    pub requested_command: String,
    pub payload: CommandResponse,
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "@Status")]
    status: String,
    #[serde(rename = "Errors", default)]
    errors: RawErrors,
    #[serde(rename = "RequestedCommand", default)]
    requested_command: String,
    #[serde(rename = "CommandResponse")]
    command_response: Option<RawCommandResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct RawErrors {
    #[serde(rename = "Error", default)]
    items: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
struct RawError {
    #[serde(rename = "@Number")]
    number: u32,
    #[serde(rename = "$text", default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawCommandResponse {
    #[serde(rename = "DomainGetListResult")]
    domain_list: Option<RawDomainList>,
    #[serde(rename = "Paging")]
    paging: Option<Paging>,
    #[serde(rename = "DomainGetInfoResult")]
    domain_info: Option<DomainInfo>,
    #[serde(rename = "DomainCheckResult", default)]
    domain_check: Vec<DomainCheckResult>,
    #[serde(rename = "DomainCreateResult")]
    domain_create: Option<DomainCreateResult>,
    #[serde(rename = "DomainRenewResult")]
    domain_renew: Option<DomainRenewResult>,
    #[serde(rename = "Tlds")]
    tlds: Option<RawTlds>,
}

#[derive(Debug, Deserialize)]
struct RawDomainList {
    #[serde(rename = "Domain", default)]
    domains: Vec<DomainListEntry>,
}

#[derive(Debug, Deserialize)]
struct RawTlds {
    #[serde(rename = "Tld", default)]
    items: Vec<Tld>,
}

/// Decode the response to `command`.
///
/// A non-2xx response is still read as an envelope first, since the API can
/// report its own errors that way. Only when that fails does the HTTP
/// status surface as `TransportError::Status`.
pub fn decode_response(command: Command, response: &HttpResponse) -> Result<Envelope> {
    let text = match std::str::from_utf8(&response.body) {
        Ok(text) => text,
        Err(err) => {
            let payload = String::from_utf8_lossy(&response.body).into_owned();
            if !response.is_success() {
                return Err(status_error(response.status, payload));
            }
            return Err(ApiError::decode(err, payload));
        }
    };

    let raw: RawEnvelope = match quick_xml::de::from_str(text) {
        Ok(raw) => raw,
        Err(err) if response.is_success() => return Err(ApiError::decode(err, text)),
        Err(_) => return Err(status_error(response.status, text.to_string())),
    };

    if raw.status.eq_ignore_ascii_case("ERROR") {
        if raw.errors.items.is_empty() {
            return Err(ApiError::decode("ERROR status without error entries", text));
        }
        let errors = raw
            .errors
            .items
            .into_iter()
            .map(|e| RemoteError {
                number: e.number,
                message: e.message.trim().to_string(),
            })
            .collect();
        return Err(RemoteErrors(errors).into());
    }
    if !raw.status.eq_ignore_ascii_case("OK") {
        return Err(ApiError::decode(
            format!("unknown response status `{}`", raw.status),
            text,
        ));
    }
    if !raw.errors.items.is_empty() {
        return Err(ApiError::decode("OK status with error entries", text));
    }

    let Some(body) = raw.command_response else {
        return Err(ApiError::decode("missing CommandResponse element", text));
    };
    let paging = body.paging;
    let missing = |element: &str| ApiError::decode(format!("missing {element} element"), text);

    let payload = match command {
        Command::DomainsGetList => CommandResponse::DomainList(
            body.domain_list
                .ok_or_else(|| missing("DomainGetListResult"))?
                .domains,
        ),
        Command::DomainsGetInfo => {
            CommandResponse::DomainInfo(body.domain_info.ok_or_else(|| missing("DomainGetInfoResult"))?)
        }
        Command::DomainsCheck => {
            if body.domain_check.is_empty() {
                return Err(missing("DomainCheckResult"));
            }
            CommandResponse::DomainCheck(body.domain_check)
        }
        Command::DomainsCreate => CommandResponse::DomainCreate(
            body.domain_create.ok_or_else(|| missing("DomainCreateResult"))?,
        ),
        Command::DomainsRenew => CommandResponse::DomainRenew(
            body.domain_renew.ok_or_else(|| missing("DomainRenewResult"))?,
        ),
        Command::DomainsGetTldList => {
            CommandResponse::TldList(body.tlds.ok_or_else(|| missing("Tlds"))?.items)
        }
    };

    Ok(Envelope {
        requested_command: raw.requested_command.trim().to_string(),
        payload,
        paging,
    })
}

fn status_error(status: u16, body: String) -> ApiError {
    TransportError::Status { status, body }.into()
}
