//! Typed payloads decoded from `CommandResponse`.
//!
//! Field names follow the attributes and child elements the API emits.
//! Dates stay as the API's `MM/DD/YYYY` strings.

use serde::{de, Deserialize, Deserializer};

/// One row of `namecheap.domains.getList`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainListEntry {
    #[serde(rename = "@ID")]
    pub id: u64,
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@User", default)]
    pub user: String,
    #[serde(rename = "@Created", default)]
    pub created: String,
    #[serde(rename = "@Expires", default)]
    pub expires: String,
    #[serde(rename = "@IsExpired", default, deserialize_with = "flag")]
    pub is_expired: bool,
    #[serde(rename = "@IsLocked", default, deserialize_with = "flag")]
    pub is_locked: bool,
    #[serde(rename = "@AutoRenew", default, deserialize_with = "flag")]
    pub auto_renew: bool,
    /// `ENABLED`, `NOTPRESENT`, ...
    #[serde(rename = "@WhoisGuard", default)]
    pub whois_guard: String,
}

/// Paging block attached to listing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Paging {
    #[serde(rename = "TotalItems")]
    pub total_items: u32,
    #[serde(rename = "CurrentPage")]
    pub current_page: u32,
    #[serde(rename = "PageSize")]
    pub page_size: u32,
}

/// One page of the domain listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainPage {
    pub domains: Vec<DomainListEntry>,
    pub paging: Paging,
}

/// Result of `namecheap.domains.getInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainInfo {
    #[serde(rename = "@ID")]
    pub id: u64,
    #[serde(rename = "@DomainName")]
    pub domain_name: String,
    #[serde(rename = "@OwnerName", default)]
    pub owner_name: String,
    #[serde(rename = "@IsExpired", default, deserialize_with = "flag")]
    pub is_expired: bool,
    #[serde(rename = "@IsLocked", default, deserialize_with = "flag")]
    pub is_locked: bool,
    #[serde(rename = "@AutoRenew", default, deserialize_with = "flag")]
    pub auto_renew: bool,
    #[serde(rename = "DomainDetails", default)]
    pub details: DomainDetails,
    #[serde(rename = "DnsDetails", default)]
    pub dns: DnsDetails,
    #[serde(rename = "Whoisguard", default)]
    pub whoisguard: Whoisguard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DomainDetails {
    #[serde(rename = "CreatedDate", default)]
    pub created_date: String,
    #[serde(rename = "ExpiredDate", default)]
    pub expired_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DnsDetails {
    #[serde(rename = "@ProviderType", default)]
    pub provider_type: String,
    #[serde(rename = "@IsUsingOurDNS", default, deserialize_with = "flag")]
    pub is_using_our_dns: bool,
    #[serde(rename = "Nameserver", default)]
    pub nameservers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Whoisguard {
    /// `True`, `False` or `NotAlloted`.
    #[serde(rename = "@Enabled", default)]
    pub enabled: String,
    #[serde(rename = "ID", default)]
    pub id: u64,
    #[serde(rename = "ExpiredDate", default)]
    pub expired_date: String,
}

impl Whoisguard {
    pub fn is_enabled(&self) -> bool {
        self.enabled.eq_ignore_ascii_case("true")
    }
}

/// Availability of one name from `namecheap.domains.check`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainCheckResult {
    #[serde(rename = "@Domain")]
    pub domain: String,
    #[serde(rename = "@Available", deserialize_with = "flag")]
    pub available: bool,
    #[serde(rename = "@IsPremiumName", default, deserialize_with = "flag")]
    pub is_premium_name: bool,
    #[serde(rename = "@PremiumRegistrationPrice", default)]
    pub premium_registration_price: f64,
    #[serde(rename = "@PremiumRenewalPrice", default)]
    pub premium_renewal_price: f64,
    #[serde(rename = "@PremiumRestorePrice", default)]
    pub premium_restore_price: f64,
    #[serde(rename = "@PremiumTransferPrice", default)]
    pub premium_transfer_price: f64,
    #[serde(rename = "@IcannFee", default)]
    pub icann_fee: f64,
}

/// Result of `namecheap.domains.create`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainCreateResult {
    #[serde(rename = "@Domain")]
    pub domain: String,
    #[serde(rename = "@Registered", deserialize_with = "flag")]
    pub registered: bool,
    #[serde(rename = "@ChargedAmount", default)]
    pub charged_amount: f64,
    #[serde(rename = "@DomainID", default)]
    pub domain_id: u64,
    #[serde(rename = "@OrderID", default)]
    pub order_id: u64,
    #[serde(rename = "@TransactionID", default)]
    pub transaction_id: u64,
    #[serde(rename = "@WhoisguardEnable", default, deserialize_with = "flag")]
    pub whoisguard_enable: bool,
    #[serde(rename = "@NonRealTimeDomain", default, deserialize_with = "flag")]
    pub non_real_time_domain: bool,
}

/// Result of `namecheap.domains.renew`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainRenewResult {
    #[serde(rename = "@DomainID", default)]
    pub domain_id: u64,
    #[serde(rename = "@DomainName")]
    pub domain_name: String,
    #[serde(rename = "@Renew", deserialize_with = "flag")]
    pub renewed: bool,
    #[serde(rename = "@ChargedAmount", default)]
    pub charged_amount: f64,
    #[serde(rename = "@OrderID", default)]
    pub order_id: u64,
    #[serde(rename = "@TransactionID", default)]
    pub transaction_id: u64,
    #[serde(rename = "DomainDetails", default)]
    pub details: DomainDetails,
}

impl DomainRenewResult {
    pub fn expire_date(&self) -> &str {
        &self.details.expired_date
    }
}

/// A TLD from `namecheap.domains.getTldList`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tld {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@MinRegisterYears", default)]
    pub min_register_years: u32,
    #[serde(rename = "@MaxRegisterYears", default)]
    pub max_register_years: u32,
    #[serde(rename = "@IsApiRegisterable", default, deserialize_with = "flag")]
    pub is_api_registerable: bool,
    #[serde(rename = "$text", default)]
    pub description: String,
}

/// Boolean attribute as the API writes it (`true`, `True`, `false`, ...).
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        other => Err(de::Error::custom(format!("invalid boolean `{other}`"))),
    }
}
