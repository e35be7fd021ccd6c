//! Contact details sent with `namecheap.domains.create`.

use std::collections::BTreeMap;

use crate::error::{ApiError, Result};

/// Contact roles the create command requires. The same details are sent for
/// each role.
const CONTACT_ROLES: [&str; 4] = ["Registrant", "Tech", "Admin", "AuxBilling"];

/// Registrant contact information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registrant {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    /// `+NNN.NNNNNNNNNN`
    pub phone: String,
    pub email_address: String,
}

impl Registrant {
    fn required_fields(&self) -> [(&'static str, &str); 9] {
        [
            ("FirstName", self.first_name.as_str()),
            ("LastName", self.last_name.as_str()),
            ("Address1", self.address1.as_str()),
            ("City", self.city.as_str()),
            ("StateProvince", self.state_province.as_str()),
            ("PostalCode", self.postal_code.as_str()),
            ("Country", self.country.as_str()),
            ("Phone", self.phone.as_str()),
            ("EmailAddress", self.email_address.as_str()),
        ]
    }

    /// Add the contact fields for every role to `params`.
    pub(crate) fn write_params(&self, params: &mut BTreeMap<String, String>) -> Result<()> {
        let fields = self.required_fields();
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ApiError::configuration(format!(
                "registrant is missing {}",
                missing.join(", ")
            )));
        }

        for role in CONTACT_ROLES {
            for (name, value) in fields {
                params.insert(format!("{role}{name}"), value.to_string());
            }
            if !self.address2.is_empty() {
                params.insert(format!("{role}Address2"), self.address2.clone());
            }
        }
        Ok(())
    }
}
