//! Local input checks run before a request is built.

use crate::error::{ApiError, Result};

/// True when every character is in `[a-z0-9-]`, ignoring ASCII case.
///
/// This checks one label (the part between dots). The empty string passes;
/// callers that need a non-empty label check that separately.
pub fn is_valid_domain_label(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// A registrable name: at least two non-empty labels, each passing
/// [`is_valid_domain_label`].
pub fn is_valid_domain_name(name: &str) -> bool {
    let mut labels = 0;
    for label in name.split('.') {
        if label.is_empty() || !is_valid_domain_label(label) {
            return false;
        }
        labels += 1;
    }
    labels >= 2
}

pub(crate) fn require_domain_name(name: &str) -> Result<()> {
    if is_valid_domain_name(name) {
        Ok(())
    } else {
        Err(ApiError::configuration(format!(
            "invalid domain name `{name}`"
        )))
    }
}

pub(crate) fn require_years(years: u32) -> Result<()> {
    if years == 0 {
        return Err(ApiError::configuration("years must be at least 1"));
    }
    Ok(())
}
