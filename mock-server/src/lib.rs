//! In-memory stand-in for the Namecheap XML endpoint.
//!
//! Accepts form-encoded POSTs (and GET query strings) at `/xml.response`,
//! answers in the API's XML envelope, and records every parameter map it
//! receives so tests can inspect exactly what a client sent.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Router,
};
use quick_xml::escape::escape;
use tokio::{net::TcpListener, sync::RwLock};

pub const API_USER: &str = "mockuser";
pub const API_KEY: &str = "mockkey";
pub const ENDPOINT_PATH: &str = "/xml.response";

const ERR_MISSING_API_USER: u32 = 1010101;
const ERR_MISSING_API_KEY: u32 = 1010102;
const ERR_MISSING_USER_NAME: u32 = 1010103;
const ERR_MISSING_COMMAND: u32 = 1010104;
const ERR_MISSING_CLIENT_IP: u32 = 1010105;
const ERR_INVALID_API_KEY: u32 = 1011102;
const ERR_UNKNOWN_COMMAND: u32 = 1010106;
const ERR_MISSING_PARAMETER: u32 = 2010324;
const ERR_DOMAIN_NOT_FOUND: u32 = 2019166;
const ERR_DOMAIN_TAKEN: u32 = 2033409;

const PRICE_PER_YEAR: f64 = 8.88;

#[derive(Debug, Clone, PartialEq)]
pub struct MockDomain {
    pub id: u64,
    pub name: String,
    pub created: String,
    pub expires_year: u32,
    pub is_expired: bool,
    pub auto_renew: bool,
    pub whoisguard: bool,
    pub nameservers: Vec<String>,
}

impl MockDomain {
    fn expires(&self) -> String {
        format!("01/15/{}", self.expires_year)
    }
}

/// Server state: the account's domains plus test hooks.
#[derive(Debug)]
pub struct MockState {
    pub api_user: String,
    pub api_key: String,
    pub domains: Vec<MockDomain>,
    /// Listing pages answered with HTTP 500 instead of XML.
    pub failing_pages: HashSet<u32>,
    /// Every parameter map received, in arrival order.
    pub received: Vec<HashMap<String, String>>,
    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            api_user: API_USER.to_string(),
            api_key: API_KEY.to_string(),
            domains: Vec::new(),
            failing_pages: HashSet::new(),
            received: Vec::new(),
            next_id: 1,
        }
    }
}

impl MockState {
    /// An account holding `count` domains named `domain-0000.com` onward.
    pub fn with_domains(count: usize) -> Self {
        let mut state = Self::default();
        for i in 0..count {
            state.add_domain(&format!("domain-{i:04}.com"), 1, false, Vec::new());
        }
        state
    }

    pub fn fail_page(&mut self, page: u32) {
        self.failing_pages.insert(page);
    }

    /// `Command` field of each received request.
    pub fn received_commands(&self) -> Vec<String> {
        self.received
            .iter()
            .map(|p| p.get("Command").cloned().unwrap_or_default())
            .collect()
    }

    /// `Page` field of each received listing request.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.received
            .iter()
            .filter(|p| {
                p.get("Command")
                    .is_some_and(|c| c.eq_ignore_ascii_case("namecheap.domains.getList"))
            })
            .map(|p| int_param(p, "Page", 1))
            .collect()
    }

    fn add_domain(
        &mut self,
        name: &str,
        years: u32,
        whoisguard: bool,
        nameservers: Vec<String>,
    ) -> &MockDomain {
        let id = self.next_id;
        self.next_id += 1;
        self.domains.push(MockDomain {
            id,
            name: name.to_string(),
            created: "01/15/2024".to_string(),
            expires_year: 2024 + years,
            is_expired: false,
            auto_renew: false,
            whoisguard,
            nameservers,
        });
        &self.domains[self.domains.len() - 1]
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.domains
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))
    }
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    app_with_state(Arc::new(RwLock::new(MockState::default())))
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route(ENDPOINT_PATH, post(handle_form).get(handle_query))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

async fn handle_form(
    State(db): State<Db>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    dispatch(&db, params).await
}

async fn handle_query(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    dispatch(&db, params).await
}

async fn dispatch(db: &Db, params: HashMap<String, String>) -> Response {
    let mut state = db.write().await;
    state.received.push(params.clone());

    let command = params.get("Command").cloned().unwrap_or_default();
    tracing::debug!(command = %command, "request");

    let auth = auth_errors(&state, &params);
    if !auth.is_empty() {
        return xml(error_envelope(&command, &auth));
    }

    match command.to_ascii_lowercase().as_str() {
        "namecheap.domains.getlist" => get_list(&state, &params),
        "namecheap.domains.getinfo" => get_info(&state, &params),
        "namecheap.domains.check" => check(&state, &params),
        "namecheap.domains.create" => create(&mut state, &params),
        "namecheap.domains.renew" => renew(&mut state, &params),
        "namecheap.domains.gettldlist" => xml(ok_envelope(
            &command,
            r#"<Tlds>
<Tld Name="biz" NonRealTime="false" MinRegisterYears="1" MaxRegisterYears="10" IsApiRegisterable="true">US Business</Tld>
<Tld Name="com" NonRealTime="false" MinRegisterYears="1" MaxRegisterYears="10" IsApiRegisterable="true">Commercial</Tld>
<Tld Name="net" NonRealTime="false" MinRegisterYears="1" MaxRegisterYears="10" IsApiRegisterable="true">Network</Tld>
<Tld Name="org" NonRealTime="false" MinRegisterYears="1" MaxRegisterYears="10" IsApiRegisterable="true">Organization</Tld>
</Tlds>"#,
        )),
        _ => xml(error_envelope(
            &command,
            &[(ERR_UNKNOWN_COMMAND, format!("Unknown command {command}"))],
        )),
    }
}

fn auth_errors(state: &MockState, params: &HashMap<String, String>) -> Vec<(u32, String)> {
    let mut errors = Vec::new();
    let missing = |name: &str| params.get(name).map_or(true, |v| v.is_empty());
    if missing("ApiUser") {
        errors.push((ERR_MISSING_API_USER, "Parameter APIUser is missing".to_string()));
    }
    if missing("ApiKey") {
        errors.push((ERR_MISSING_API_KEY, "Parameter APIKey is missing".to_string()));
    }
    if missing("UserName") {
        errors.push((ERR_MISSING_USER_NAME, "Parameter UserName is missing".to_string()));
    }
    if missing("ClientIp") {
        errors.push((ERR_MISSING_CLIENT_IP, "Parameter ClientIP is missing".to_string()));
    }
    if missing("Command") {
        errors.push((ERR_MISSING_COMMAND, "Parameter Command is missing".to_string()));
    }
    if errors.is_empty()
        && (params["ApiUser"] != state.api_user || params["ApiKey"] != state.api_key)
    {
        errors.push((
            ERR_INVALID_API_KEY,
            "API Key is invalid or API access has not been enabled".to_string(),
        ));
    }
    errors
}

fn get_list(state: &MockState, params: &HashMap<String, String>) -> Response {
    let page = int_param(params, "Page", 1).clamp(1, 999);
    let page_size = int_param(params, "PageSize", 20).clamp(10, 100);
    if state.failing_pages.contains(&page) {
        tracing::warn!(page, "failing listing page on request");
        return (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response();
    }

    let term = params
        .get("SearchTerm")
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default();
    let list_type = params.get("ListType").map_or("ALL", String::as_str);
    let mut matching: Vec<&MockDomain> = state
        .domains
        .iter()
        .filter(|d| d.name.contains(&term))
        .filter(|d| match list_type {
            "EXPIRED" => d.is_expired,
            _ => true,
        })
        .collect();
    match params.get("SortBy").map(String::as_str) {
        Some("NAME") => matching.sort_by(|a, b| a.name.cmp(&b.name)),
        Some("NAME_DESC") => matching.sort_by(|a, b| b.name.cmp(&a.name)),
        _ => {}
    }

    let start = ((page - 1) * page_size) as usize;
    let rows: String = matching
        .iter()
        .skip(start)
        .take(page_size as usize)
        .map(|d| {
            format!(
                r#"<Domain ID="{}" Name="{}" User="{}" Created="{}" Expires="{}" IsExpired="{}" IsLocked="false" AutoRenew="{}" WhoisGuard="{}" IsOurDNS="true" />"#,
                d.id,
                escape(&d.name),
                escape(&state.api_user),
                d.created,
                d.expires(),
                d.is_expired,
                d.auto_renew,
                if d.whoisguard { "ENABLED" } else { "NOTPRESENT" },
            )
        })
        .collect();

    let body = format!(
        "<DomainGetListResult>{rows}</DomainGetListResult>\
         <Paging><TotalItems>{}</TotalItems><CurrentPage>{page}</CurrentPage><PageSize>{page_size}</PageSize></Paging>",
        matching.len()
    );
    xml(ok_envelope("namecheap.domains.getList", &body))
}

fn get_info(state: &MockState, params: &HashMap<String, String>) -> Response {
    let command = "namecheap.domains.getInfo";
    let Some(name) = required(params, "DomainName") else {
        return xml(missing_parameter(command, "DomainName"));
    };
    let Some(index) = state.find(name) else {
        return xml(domain_not_found(command, name));
    };
    let d = &state.domains[index];
    let nameservers: String = if d.nameservers.is_empty() {
        "<Nameserver>dns1.registrar-servers.com</Nameserver><Nameserver>dns2.registrar-servers.com</Nameserver>".to_string()
    } else {
        d.nameservers
            .iter()
            .map(|ns| format!("<Nameserver>{}</Nameserver>", escape(ns)))
            .collect()
    };
    let body = format!(
        r#"<DomainGetInfoResult Status="Ok" ID="{id}" DomainName="{name}" OwnerName="{owner}" IsOwner="true" IsPremium="false">
<DomainDetails><CreatedDate>{created}</CreatedDate><ExpiredDate>{expires}</ExpiredDate><NumYears>0</NumYears></DomainDetails>
<Whoisguard Enabled="{wg}"><ID>{wg_id}</ID><ExpiredDate>{expires}</ExpiredDate></Whoisguard>
<DnsDetails ProviderType="{provider}" IsUsingOurDNS="{ours}">{nameservers}</DnsDetails>
</DomainGetInfoResult>"#,
        id = d.id,
        name = escape(&d.name),
        owner = escape(&state.api_user),
        created = d.created,
        expires = d.expires(),
        wg = if d.whoisguard { "True" } else { "NotAlloted" },
        wg_id = if d.whoisguard { d.id + 50_000 } else { 0 },
        provider = if d.nameservers.is_empty() { "FREE" } else { "CUSTOM" },
        ours = d.nameservers.is_empty(),
    );
    xml(ok_envelope(command, &body))
}

fn check(state: &MockState, params: &HashMap<String, String>) -> Response {
    let command = "namecheap.domains.check";
    let Some(list) = required(params, "DomainList") else {
        return xml(missing_parameter(command, "DomainList"));
    };
    let body: String = list
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|name| {
            format!(
                r#"<DomainCheckResult Domain="{}" Available="{}" ErrorNo="0" Description="" IsPremiumName="false" PremiumRegistrationPrice="0" PremiumRenewalPrice="0" PremiumRestorePrice="0" PremiumTransferPrice="0" IcannFee="0" EapFee="0" />"#,
                escape(name),
                state.find(name).is_none(),
            )
        })
        .collect();
    xml(ok_envelope(command, &body))
}

fn create(state: &mut MockState, params: &HashMap<String, String>) -> Response {
    let command = "namecheap.domains.create";
    let mut fields = vec!["DomainName".to_string(), "Years".to_string()];
    for role in ["Registrant", "Tech", "Admin", "AuxBilling"] {
        for suffix in [
            "FirstName",
            "LastName",
            "Address1",
            "City",
            "StateProvince",
            "PostalCode",
            "Country",
            "Phone",
            "EmailAddress",
        ] {
            fields.push(format!("{role}{suffix}"));
        }
    }
    if let Some(field) = fields.iter().find(|f| required(params, f).is_none()) {
        return xml(missing_parameter(command, field));
    }

    let name = params["DomainName"].clone();
    if state.find(&name).is_some() {
        return xml(error_envelope(
            command,
            &[(ERR_DOMAIN_TAKEN, format!("Domain name not available: {name}"))],
        ));
    }
    let years = int_param(params, "Years", 1).max(1);
    let whoisguard = params
        .get("AddFreeWhoisguard")
        .is_some_and(|v| v.eq_ignore_ascii_case("yes"))
        && params
            .get("WGEnabled")
            .is_some_and(|v| v.eq_ignore_ascii_case("yes"));
    let nameservers = params
        .get("Nameservers")
        .map(|ns| ns.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();

    let domain = state.add_domain(&name, years, whoisguard, nameservers);
    let body = format!(
        r#"<DomainCreateResult Domain="{}" Registered="true" ChargedAmount="{:.4}" DomainID="{}" OrderID="{}" TransactionID="{}" WhoisguardEnable="{}" NonRealTimeDomain="false" />"#,
        escape(&domain.name),
        PRICE_PER_YEAR * f64::from(years),
        domain.id,
        domain.id + 10_000,
        domain.id + 20_000,
        domain.whoisguard,
    );
    xml(ok_envelope(command, &body))
}

fn renew(state: &mut MockState, params: &HashMap<String, String>) -> Response {
    let command = "namecheap.domains.renew";
    let Some(name) = required(params, "DomainName") else {
        return xml(missing_parameter(command, "DomainName"));
    };
    let Some(index) = state.find(name) else {
        return xml(domain_not_found(command, name));
    };
    let years = int_param(params, "Years", 1).max(1);
    let domain = &mut state.domains[index];
    domain.expires_year += years;
    let body = format!(
        r#"<DomainRenewResult DomainName="{}" DomainID="{}" Renew="true" OrderID="{}" TransactionID="{}" ChargedAmount="{:.4}">
<DomainDetails><ExpiredDate>{}</ExpiredDate><NumYears>0</NumYears></DomainDetails>
</DomainRenewResult>"#,
        escape(&domain.name),
        domain.id,
        domain.id + 30_000,
        domain.id + 40_000,
        PRICE_PER_YEAR * f64::from(years),
        domain.expires(),
    );
    xml(ok_envelope(command, &body))
}

fn ok_envelope(command: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <Warnings />
  <RequestedCommand>{}</RequestedCommand>
  <CommandResponse Type="{}">{body}</CommandResponse>
  <Server>MOCK</Server>
  <GMTTimeDifference>--5:00</GMTTimeDifference>
  <ExecutionTime>0.001</ExecutionTime>
</ApiResponse>"#,
        escape(&command.to_ascii_lowercase()),
        escape(command),
    )
}

fn error_envelope(command: &str, errors: &[(u32, String)]) -> String {
    let entries: String = errors
        .iter()
        .map(|(number, message)| format!(r#"<Error Number="{number}">{}</Error>"#, escape(message)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="ERROR" xmlns="http://api.namecheap.com/xml.response">
  <Errors>{entries}</Errors>
  <Warnings />
  <RequestedCommand>{}</RequestedCommand>
  <Server>MOCK</Server>
  <GMTTimeDifference>--5:00</GMTTimeDifference>
  <ExecutionTime>0.001</ExecutionTime>
</ApiResponse>"#,
        escape(&command.to_ascii_lowercase()),
    )
}

fn missing_parameter(command: &str, name: &str) -> String {
    error_envelope(
        command,
        &[(ERR_MISSING_PARAMETER, format!("Parameter {name} is missing"))],
    )
}

fn domain_not_found(command: &str, name: &str) -> String {
    error_envelope(
        command,
        &[(ERR_DOMAIN_NOT_FOUND, format!("Domain {name} not found"))],
    )
}

fn xml(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn int_param(params: &HashMap<String, String>, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
