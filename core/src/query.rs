//! Filters for `namecheap.domains.getList`.
//!
//! # Design
//! Numeric bounds are clamped to what the API accepts (page 1..=999, page
//! size 10..=100) so a caller asking for page 0 or 500 rows still gets a
//! valid request. List type and sort order are enums, so there is nothing to
//! validate. The search term is the one input that fails fast: characters
//! the API would reject produce a `Configuration` error before any request
//! is built.

use std::collections::BTreeMap;

use crate::error::{ApiError, Result};

pub const MIN_PAGE: u32 = 1;
pub const MAX_PAGE: u32 = 999;
pub const MIN_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_SEARCH_TERM_LEN: usize = 128;

/// Which domains the listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    #[default]
    All,
    Expiring,
    Expired,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Expiring => "EXPIRING",
            Self::Expired => "EXPIRED",
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    NameAsc,
    NameDesc,
    ExpireDateAsc,
    ExpireDateDesc,
    CreateDateAsc,
    CreateDateDesc,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "NAME",
            Self::NameDesc => "NAME_DESC",
            Self::ExpireDateAsc => "EXPIREDATE",
            Self::ExpireDateDesc => "EXPIREDATE_DESC",
            Self::CreateDateAsc => "CREATEDATE",
            Self::CreateDateDesc => "CREATEDATE_DESC",
        }
    }
}

/// One listing request: a page cursor plus optional filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search_term: Option<String>,
    pub list_type: ListType,
    pub sort_by: Option<SortBy>,
}

impl Default for DomainListQuery {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search_term: None,
            list_type: ListType::All,
            sort_by: None,
        }
    }
}

impl DomainListQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_list_type(mut self, list_type: ListType) -> Self {
        self.list_type = list_type;
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Clamp page and page size into range and clean up the search term.
    ///
    /// Terms shorter than two characters are dropped and terms longer than
    /// 128 are truncated. A term containing anything other than letters,
    /// digits, `-` or `.` is rejected.
    pub fn normalized(&self) -> Result<Self> {
        let search_term = match self.search_term.as_deref().map(str::trim) {
            Some(term) if term.chars().count() >= 2 => {
                if let Some(bad) = term
                    .chars()
                    .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
                {
                    return Err(ApiError::configuration(format!(
                        "invalid character {bad:?} in search term"
                    )));
                }
                // ASCII only past this point, so byte truncation is safe.
                Some(term[..term.len().min(MAX_SEARCH_TERM_LEN)].to_string())
            }
            _ => None,
        };

        Ok(Self {
            page: self.page.clamp(MIN_PAGE, MAX_PAGE),
            page_size: self.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            search_term,
            list_type: self.list_type,
            sort_by: self.sort_by,
        })
    }

    /// Write the form fields for this query. Expects a normalized query.
    pub(crate) fn write_params(&self, params: &mut BTreeMap<String, String>) {
        params.insert("Page".to_string(), self.page.to_string());
        params.insert("PageSize".to_string(), self.page_size.to_string());
        params.insert("ListType".to_string(), self.list_type.as_str().to_string());
        if let Some(term) = &self.search_term {
            params.insert("SearchTerm".to_string(), term.clone());
        }
        if let Some(sort_by) = self.sort_by {
            params.insert("SortBy".to_string(), sort_by.as_str().to_string());
        }
    }
}
