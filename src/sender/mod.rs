//! Sender address resolution and validation.
//!
//! [`validate_sender_address`] is a pure, ordered rule chain; the first failing
//! rule determines the rejection.

use thiserror::Error;

/// Domain suffix of provider-managed sending domains
pub const MANAGED_DOMAIN_SUFFIX: &str = ".azurecomm.net";

/// Local part required on managed domains
pub const MANAGED_DOMAIN_LOCAL_PART: &str = "donotreply";

const PLACEHOLDER_DOMAINS: [&str; 3] = ["example.com", "example.org", "example.net"];

/// Why a sender address was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Sender address cannot be empty")]
    Empty,

    #[error("Sender address must be a valid email format")]
    InvalidFormat,

    #[error(
        "The sender domain appears to be a placeholder domain (example.com/org/net). \
         Please use an Azure managed domain (recommended): donotreply@{{domain-guid}}.azurecomm.net \
         or a custom verified domain linked to your Azure Communication Service resource."
    )]
    PlaceholderDomain,

    #[error(
        "For Azure managed domains, the sender should typically be 'donotreply@{{domain-guid}}.azurecomm.net'"
    )]
    ManagedDomainConvention,
}

/// Check `address` against the sender rules.
pub fn validate_sender_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    if !address.contains('@') || !address.contains('.') {
        return Err(ValidationError::InvalidFormat);
    }

    let parts: Vec<&str> = address.split('@').collect();
    let (local, domain) = match parts.as_slice() {
        [local, domain] if !local.is_empty() && !domain.is_empty() => (*local, *domain),
        _ => return Err(ValidationError::InvalidFormat),
    };

    if PLACEHOLDER_DOMAINS
        .iter()
        .any(|placeholder| domain.eq_ignore_ascii_case(placeholder))
    {
        return Err(ValidationError::PlaceholderDomain);
    }

    if domain.to_ascii_lowercase().ends_with(MANAGED_DOMAIN_SUFFIX)
        && !local.eq_ignore_ascii_case(MANAGED_DOMAIN_LOCAL_PART)
    {
        return Err(ValidationError::ManagedDomainConvention);
    }

    Ok(())
}

/// Pick the explicit sender when one is given, else the configured default.
/// Blank values count as absent.
pub fn resolve_sender<'a>(explicit: Option<&'a str>, default: Option<&'a str>) -> Option<&'a str> {
    explicit
        .filter(|s| !s.trim().is_empty())
        .or_else(|| default.filter(|s| !s.trim().is_empty()))
}
