//! Stateless validation predicates.
//!
//! Each validator answers one yes/no question about one value. Validators
//! that need a context (a membership collection, a pattern) take it at
//! construction and fail there when it is missing or malformed; plain
//! mismatches at validate time are booleans, never errors.

use std::net::IpAddr;
use std::sync::OnceLock;
use tracing::warn;
use vnfcheck_proto::{Error, Result};

/// A predicate over one string value.
pub trait Validator {
    fn validate(&self, entity: &str) -> bool;
}

/// Fails with a validation error when a predicate rejects the entity.
///
/// `kind` names what is being checked so the message reads like
/// `matcher "isnotoris" is not allowed`.
pub fn ensure(validator: &dyn Validator, kind: &str, entity: &str) -> Result<()> {
    if validator.validate(entity) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{kind} \"{entity}\" is not allowed"
        )))
    }
}

/// Membership in the set of allowed execution contexts.
#[derive(Debug)]
pub struct Context {
    allowed: Vec<String>,
}

impl Context {
    pub fn new<I, S>(allowed: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        if allowed.is_empty() {
            return Err(Error::Validation(
                "a context is necessary for the validator \"Context\"".into(),
            ));
        }
        Ok(Self { allowed })
    }
}

impl Validator for Context {
    fn validate(&self, entity: &str) -> bool {
        if !self.allowed.iter().any(|a| a == entity) {
            warn!(
                "context \"{entity}\" not allowed, must be any of {:?}",
                self.allowed
            );
            return false;
        }
        true
    }
}

/// Membership in a property table's key set.
pub struct Property {
    keys: Vec<String>,
}

impl Property {
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(Error::Validation(
                "a context is necessary for the validator \"Property\"".into(),
            ));
        }
        Ok(Self { keys })
    }
}

impl Validator for Property {
    fn validate(&self, entity: &str) -> bool {
        if !self.keys.iter().any(|k| k == entity) {
            warn!(
                "property \"{entity}\" not allowed, must be any of {:?}",
                self.keys
            );
            return false;
        }
        true
    }
}

/// Membership in a plain list.
pub struct InList {
    items: Vec<String>,
}

impl InList {
    pub fn new<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(Error::Validation(
                "a context is necessary for the validator \"InList\"".into(),
            ));
        }
        Ok(Self { items })
    }
}

impl Validator for InList {
    fn validate(&self, entity: &str) -> bool {
        self.items.iter().any(|i| i == entity)
    }
}

/// Pattern search (not a full match) against a regex compiled at
/// construction time.
#[derive(Debug)]
pub struct Regex {
    pattern: regex::Regex,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::Validation(
                "a context is necessary for the validator \"Regex\"".into(),
            ));
        }
        let pattern = regex::Regex::new(pattern)
            .map_err(|_| Error::Validation("context must be a valid regex".into()))?;
        Ok(Self { pattern })
    }
}

impl Validator for Regex {
    fn validate(&self, entity: &str) -> bool {
        if !self.pattern.is_match(entity) {
            warn!(
                "value \"{entity}\" not allowed, must match the regex {}",
                self.pattern
            );
            return false;
        }
        true
    }
}

/// TCP/UDP port number, inclusive range 1-65535. Non-numeric input is
/// invalid, not an error.
pub struct Port;

impl Validator for Port {
    fn validate(&self, entity: &str) -> bool {
        entity
            .trim()
            .parse::<u32>()
            .map(|p| (1..=65535).contains(&p))
            .unwrap_or(false)
    }
}

fn domain_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
            .unwrap()
    })
}

/// Domain-name syntax: dot-separated labels with an alphabetic TLD of at
/// least two characters.
pub struct Domain;

impl Validator for Domain {
    fn validate(&self, entity: &str) -> bool {
        domain_pattern().is_match(entity)
    }
}

/// IPv4 or IPv6 literal syntax.
pub struct IpAddress;

impl Validator for IpAddress {
    fn validate(&self, entity: &str) -> bool {
        // hack: :: is a valid IPv6 address
        if entity == "::" {
            return true;
        }
        entity.parse::<IpAddr>().is_ok()
    }
}

/// URL syntax.
pub struct Url;

impl Validator for Url {
    fn validate(&self, entity: &str) -> bool {
        url::Url::parse(entity).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_accepts_the_inclusive_range_bounds() {
        assert!(Port.validate("1"));
        assert!(Port.validate("65535"));
        assert!(!Port.validate("0"));
        assert!(!Port.validate("65536"));
    }

    #[test]
    fn port_rejects_non_numeric_input_without_error() {
        assert!(!Port.validate("http"));
        assert!(!Port.validate(""));
        assert!(!Port.validate("80/tcp"));
    }

    #[test]
    fn regex_with_invalid_pattern_fails_at_construction() {
        let err = Regex::new("[unclosed").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn regex_searches_rather_than_full_matches() {
        let v = Regex::new(r"\d+").unwrap();
        assert!(v.validate("port 8080 open"));
        assert!(!v.validate("no digits here"));
    }

    #[test]
    fn context_requires_a_collection() {
        let err = Context::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let v = Context::new(["service"]).unwrap();
        assert!(v.validate("service"));
        assert!(!v.validate("network"));
    }

    #[test]
    fn in_list_membership() {
        let v = InList::new(["is", "is not"]).unwrap();
        assert!(v.validate("is"));
        assert!(v.validate("is not"));
        assert!(!v.validate("isnotoris"));
    }

    #[test]
    fn domain_syntax() {
        assert!(Domain.validate("www.google.com"));
        assert!(Domain.validate("sub.domain.example.org"));
        assert!(!Domain.validate("www.google.d"));
        assert!(!Domain.validate("not a domain"));
        assert!(!Domain.validate("-leading.example.com"));
    }

    #[test]
    fn ip_address_syntax_including_the_unspecified_quirk() {
        assert!(IpAddress.validate("127.0.0.1"));
        assert!(IpAddress.validate("2001:db8::1"));
        assert!(IpAddress.validate("::"));
        assert!(!IpAddress.validate("256.1.1.1"));
        assert!(!IpAddress.validate("www.google.com"));
    }

    #[test]
    fn url_syntax() {
        assert!(Url.validate("https://example.com/health"));
        assert!(!Url.validate("example.com/health"));
    }
}
