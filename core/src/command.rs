use std::fmt;

/// Remote operations this client knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    DomainsGetList,
    DomainsGetInfo,
    DomainsCheck,
    DomainsCreate,
    DomainsRenew,
    DomainsGetTldList,
}

impl Command {
    /// Wire name sent in the `Command` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainsGetList => "namecheap.domains.getList",
            Self::DomainsGetInfo => "namecheap.domains.getInfo",
            Self::DomainsCheck => "namecheap.domains.check",
            Self::DomainsCreate => "namecheap.domains.create",
            Self::DomainsRenew => "namecheap.domains.renew",
            Self::DomainsGetTldList => "namecheap.domains.getTldList",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
