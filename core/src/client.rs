//! Namecheap domain API client.
//!
//! # Design
//! `NamecheapClient` holds an immutable `ClientConfig`, an optional
//! `Registrant` and a transport. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`; hosts that run their own HTTP stack can use just those.
//! The plain operation methods (`list_domains`, `domain_info`, ...) join the
//! two through the `HttpTransport`, issue exactly one request each, and never
//! retry.

use std::time::Duration;

use crate::command::Command;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport, UreqTransport};
use crate::paging::{collect_all_pages, PartialResult};
use crate::query::{DomainListQuery, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::registrant::Registrant;
use crate::request::ApiRequest;
use crate::response::{decode_response, CommandResponse};
use crate::types::{
    DomainCheckResult, DomainCreateResult, DomainInfo, DomainListEntry, DomainPage,
    DomainRenewResult, Tld,
};
use crate::validate::{require_domain_name, require_years};

/// Optional settings for `create_domain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCreateOptions {
    /// Custom nameservers; the registrar's defaults are used when empty.
    pub nameservers: Vec<String>,
    pub add_free_whoisguard: bool,
    pub wg_enabled: bool,
}

/// Blocking client for the Namecheap XML API.
#[derive(Debug, Clone)]
pub struct NamecheapClient<T = UreqTransport> {
    config: ClientConfig,
    registrant: Option<Registrant>,
    transport: T,
}

impl NamecheapClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T> NamecheapClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            registrant: None,
            transport,
        }
    }

    pub fn with_registrant(mut self, registrant: Registrant) -> Self {
        self.registrant = Some(registrant);
        self
    }

    pub fn set_registrant(&mut self, registrant: Registrant) {
        self.registrant = Some(registrant);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registrant(&self) -> Option<&Registrant> {
        self.registrant.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_list_domains(&self, query: &DomainListQuery) -> Result<HttpRequest> {
        let mut request = ApiRequest::post(Command::DomainsGetList);
        query.normalized()?.write_params(request.params_mut());
        request.encode(&self.config)
    }

    pub fn build_domain_info(&self, domain_name: &str) -> Result<HttpRequest> {
        require_domain_name(domain_name)?;
        ApiRequest::post(Command::DomainsGetInfo)
            .param("DomainName", domain_name)
            .encode(&self.config)
    }

    pub fn build_check_domains<S: AsRef<str>>(&self, domain_names: &[S]) -> Result<HttpRequest> {
        if domain_names.is_empty() {
            return Err(ApiError::configuration("no domain names to check"));
        }
        let names: Vec<&str> = domain_names.iter().map(AsRef::as_ref).collect();
        for name in &names {
            require_domain_name(name)?;
        }
        ApiRequest::post(Command::DomainsCheck)
            .param("DomainList", names.join(","))
            .encode(&self.config)
    }

    /// Fails with `Configuration` when no registrant is set on the client.
    pub fn build_create_domain(
        &self,
        domain_name: &str,
        years: u32,
        options: &DomainCreateOptions,
    ) -> Result<HttpRequest> {
        let registrant = self.registrant.as_ref().ok_or_else(|| {
            ApiError::configuration("registrant information is required to create a domain")
        })?;
        require_domain_name(domain_name)?;
        require_years(years)?;

        let mut request = ApiRequest::post(Command::DomainsCreate)
            .param("DomainName", domain_name)
            .param("Years", years.to_string());
        if options.add_free_whoisguard {
            request.set("AddFreeWhoisguard", "yes");
        }
        if options.wg_enabled {
            request.set("WGEnabled", "yes");
        }
        if !options.nameservers.is_empty() {
            request.set("Nameservers", options.nameservers.join(","));
        }
        registrant.write_params(request.params_mut())?;
        request.encode(&self.config)
    }

    pub fn build_renew_domain(&self, domain_name: &str, years: u32) -> Result<HttpRequest> {
        require_domain_name(domain_name)?;
        require_years(years)?;
        ApiRequest::post(Command::DomainsRenew)
            .param("DomainName", domain_name)
            .param("Years", years.to_string())
            .encode(&self.config)
    }

    pub fn build_tld_list(&self) -> Result<HttpRequest> {
        ApiRequest::post(Command::DomainsGetTldList).encode(&self.config)
    }

    pub fn parse_list_domains(&self, response: &HttpResponse) -> Result<DomainPage> {
        let envelope = decode_response(Command::DomainsGetList, response)?;
        let Some(paging) = envelope.paging else {
            return Err(ApiError::decode("missing Paging element", body_text(response)));
        };
        match envelope.payload {
            CommandResponse::DomainList(domains) => Ok(DomainPage { domains, paging }),
            _ => Err(mismatch(Command::DomainsGetList, response)),
        }
    }

    pub fn parse_domain_info(&self, response: &HttpResponse) -> Result<DomainInfo> {
        match decode_response(Command::DomainsGetInfo, response)?.payload {
            CommandResponse::DomainInfo(info) => Ok(info),
            _ => Err(mismatch(Command::DomainsGetInfo, response)),
        }
    }

    pub fn parse_check_domains(&self, response: &HttpResponse) -> Result<Vec<DomainCheckResult>> {
        match decode_response(Command::DomainsCheck, response)?.payload {
            CommandResponse::DomainCheck(results) => Ok(results),
            _ => Err(mismatch(Command::DomainsCheck, response)),
        }
    }

    pub fn parse_create_domain(&self, response: &HttpResponse) -> Result<DomainCreateResult> {
        match decode_response(Command::DomainsCreate, response)?.payload {
            CommandResponse::DomainCreate(result) => Ok(result),
            _ => Err(mismatch(Command::DomainsCreate, response)),
        }
    }

    pub fn parse_renew_domain(&self, response: &HttpResponse) -> Result<DomainRenewResult> {
        match decode_response(Command::DomainsRenew, response)?.payload {
            CommandResponse::DomainRenew(result) => Ok(result),
            _ => Err(mismatch(Command::DomainsRenew, response)),
        }
    }

    pub fn parse_tld_list(&self, response: &HttpResponse) -> Result<Vec<Tld>> {
        match decode_response(Command::DomainsGetTldList, response)?.payload {
            CommandResponse::TldList(tlds) => Ok(tlds),
            _ => Err(mismatch(Command::DomainsGetTldList, response)),
        }
    }
}

impl<T: Clone> NamecheapClient<T> {
    /// A copy of this client whose requests carry `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut client = self.clone();
        client.config.timeout = Some(timeout);
        client
    }
}

impl<T: HttpTransport> NamecheapClient<T> {
    fn execute(&self, command: Command, request: &HttpRequest) -> Result<HttpResponse> {
        log::debug!("[namecheap] {} {} ({command})", request.method, request.url);
        let response = self.transport.execute(request)?;
        log::debug!(
            "[namecheap] {command}: HTTP {} ({} bytes)",
            response.status,
            response.body.len()
        );
        Ok(response)
    }

    /// One page of the account's domains.
    pub fn list_domains(&self, query: &DomainListQuery) -> Result<DomainPage> {
        let request = self.build_list_domains(query)?;
        let response = self.execute(Command::DomainsGetList, &request)?;
        self.parse_list_domains(&response)
    }

    /// Every domain on the account, fetched page by page at the maximum page
    /// size.
    ///
    /// If a page fails, the records from earlier pages come back inside the
    /// `PartialResult` together with the error.
    pub fn get_all_domains(&self) -> std::result::Result<Vec<DomainListEntry>, PartialResult> {
        collect_all_pages(|page| self.list_domains(&DomainListQuery::page(page, MAX_PAGE_SIZE)))
    }

    /// Number of domains on the account.
    pub fn domain_count(&self) -> Result<u32> {
        let page = self.list_domains(&DomainListQuery::page(1, MIN_PAGE_SIZE))?;
        Ok(page.paging.total_items)
    }

    pub fn domain_info(&self, domain_name: &str) -> Result<DomainInfo> {
        let request = self.build_domain_info(domain_name)?;
        let response = self.execute(Command::DomainsGetInfo, &request)?;
        self.parse_domain_info(&response)
    }

    /// Availability of each name, checked in a single request.
    pub fn check_domains<S: AsRef<str>>(&self, domain_names: &[S]) -> Result<Vec<DomainCheckResult>> {
        let request = self.build_check_domains(domain_names)?;
        let response = self.execute(Command::DomainsCheck, &request)?;
        self.parse_check_domains(&response)
    }

    pub fn create_domain(
        &self,
        domain_name: &str,
        years: u32,
        options: &DomainCreateOptions,
    ) -> Result<DomainCreateResult> {
        let request = self.build_create_domain(domain_name, years, options)?;
        let response = self.execute(Command::DomainsCreate, &request)?;
        self.parse_create_domain(&response)
    }

    pub fn renew_domain(&self, domain_name: &str, years: u32) -> Result<DomainRenewResult> {
        let request = self.build_renew_domain(domain_name, years)?;
        let response = self.execute(Command::DomainsRenew, &request)?;
        self.parse_renew_domain(&response)
    }

    pub fn tld_list(&self) -> Result<Vec<Tld>> {
        let request = self.build_tld_list()?;
        let response = self.execute(Command::DomainsGetTldList, &request)?;
        self.parse_tld_list(&response)
    }
}

fn body_text(response: &HttpResponse) -> String {
    String::from_utf8_lossy(&response.body).into_owned()
}

fn mismatch(command: Command, response: &HttpResponse) -> ApiError {
    ApiError::decode(
        format!("response payload does not match {command}"),
        body_text(response),
    )
}
