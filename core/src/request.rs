//! Logical requests and their form-encoded wire form.
//!
//! # Design
//! An `ApiRequest` is what an operation wants to send: a command, a method
//! and its own parameters. `encode` turns it into an `HttpRequest` by adding
//! the account fields from `ClientConfig`. Parameters are kept in a
//! `BTreeMap` so the encoded body is deterministic.

use std::collections::BTreeMap;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Field names the client fills in on every request.
pub const INJECTED_FIELDS: [&str; 5] = ["ApiUser", "ApiKey", "UserName", "ClientIp", "Command"];

/// A command plus its parameters, before credentials are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    command: Command,
    method: Option<HttpMethod>,
    params: BTreeMap<String, String>,
}

impl ApiRequest {
    /// A request with no method set. `encode` refuses it until one is.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            method: None,
            params: BTreeMap::new(),
        }
    }

    pub fn post(command: Command) -> Self {
        Self::new(command).with_method(HttpMethod::Post)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.params
    }

    /// Attach credentials and produce the HTTP request.
    ///
    /// Injected fields overwrite caller parameters of the same name.
    pub fn encode(&self, config: &ClientConfig) -> Result<HttpRequest> {
        let method = self
            .method
            .ok_or_else(|| ApiError::configuration("request method cannot be blank"))?;

        let credentials = &config.credentials;
        let mut fields = self.params.clone();
        fields.insert("ApiUser".to_string(), credentials.api_user.clone());
        fields.insert("ApiKey".to_string(), credentials.api_key.clone());
        fields.insert("UserName".to_string(), credentials.username.clone());
        fields.insert("ClientIp".to_string(), credentials.client_ip.clone());
        fields.insert("Command".to_string(), self.command.as_str().to_string());

        let body = encode_form(&fields);
        let mut headers = vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())];
        if method == HttpMethod::Post {
            headers.push(("content-length".to_string(), body.len().to_string()));
        }

        Ok(HttpRequest {
            method,
            url: config.endpoint.url().to_string(),
            headers,
            body: Some(body),
            timeout: config.timeout,
        })
    }
}

/// `application/x-www-form-urlencoded` body for `fields`, in key order.
pub fn encode_form(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
