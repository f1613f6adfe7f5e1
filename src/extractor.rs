/* src/extractor.rs */

use std::collections::HashMap;
use tracing::debug;

use crate::classify::{AddressClass, classify};

/// Type alias for header maps, keyed by lower-cased header name.
pub type HeaderMap = HashMap<String, String>;

/// Address used when neither headers nor the connection yield one.
pub const LOOPBACK: &str = "127.0.0.1";

/// How a header value is turned into a candidate address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderValueKind {
    /// The whole (trimmed) value is the address.
    Single,
    /// A comma-separated hop chain; the first hop is the originating client.
    HopChain,
}

/// One entry of the header precedence table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRule {
    pub name: String,
    pub kind: HeaderValueKind,
}

impl HeaderRule {
    pub fn single(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            kind: HeaderValueKind::Single,
        }
    }

    pub fn hop_chain(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            kind: HeaderValueKind::HopChain,
        }
    }

    /// Extract the candidate this rule yields for `headers`, if any.
    fn candidate<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let value = headers.get(&self.name)?;
        let candidate = match self.kind {
            HeaderValueKind::Single => value.trim(),
            HeaderValueKind::HopChain => value.split(',').next().unwrap_or_default().trim(),
        };
        (!candidate.is_empty()).then_some(candidate)
    }
}

/// Resolves the client address from proxy headers, in order of trust.
///
/// Headers set by a known front door (the hosting platform, then the CDN)
/// come first. The generic `x-real-ip` and `x-forwarded-for` headers are
/// client-controllable when no proxy rewrites them, so a caller can spoof the
/// resolved address unless the edge strips them.
#[derive(Debug, Clone)]
pub struct AddressResolver {
    /// Headers to check, in order of preference.
    pub rules: Vec<HeaderRule>,
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self {
            rules: vec![
                HeaderRule::hop_chain("x-vercel-forwarded-for"),
                HeaderRule::single("cf-connecting-ip"),
                HeaderRule::single("x-real-ip"),
                HeaderRule::hop_chain("x-forwarded-for"),
            ],
        }
    }
}

impl AddressResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the precedence table.
    pub fn with_rules(mut self, rules: Vec<HeaderRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Resolve the client address, falling back to the remote socket
    /// address and finally to loopback. Never returns an empty string.
    pub fn resolve(&self, headers: &HeaderMap, fallback: Option<&str>) -> String {
        for rule in &self.rules {
            if let Some(candidate) = rule.candidate(headers) {
                debug!(header = %rule.name, address = candidate, "resolved client address from header");
                return candidate.to_string();
            }
        }

        match fallback.map(str::trim).filter(|addr| !addr.is_empty()) {
            Some(addr) => {
                debug!(address = addr, "resolved client address from connection");
                addr.to_string()
            }
            None => LOOPBACK.to_string(),
        }
    }

    /// Resolve the address to hand to the lookup provider.
    ///
    /// `None` means the caller is local and the provider should locate the
    /// server's own egress address instead.
    pub fn lookup_target(&self, headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
        let address = self.resolve(headers, fallback);
        target_for(&address).map(str::to_string)
    }
}

/// Apply the local-to-egress rule to an already resolved address.
pub fn target_for(address: &str) -> Option<&str> {
    match classify(address) {
        AddressClass::Local => {
            debug!(address, "local client address, using server egress address");
            None
        }
        AddressClass::Public => Some(address),
    }
}

/// Resolve the client address with the default precedence table.
///
/// # Arguments
///
/// * `headers` - Map of HTTP headers with lower-cased keys
/// * `fallback` - Remote socket address of the connection, if known
///
/// # Examples
///
/// ```rust
/// use iplocate::{resolve_client_address, HeaderMap};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for".to_string(), "8.8.8.8, 10.0.0.5".to_string());
///
/// assert_eq!(resolve_client_address(&headers, Some("127.0.0.1")), "8.8.8.8");
/// ```
pub fn resolve_client_address(headers: &HeaderMap, fallback: Option<&str>) -> String {
    AddressResolver::default().resolve(headers, fallback)
}

/// Resolve the lookup target with the default precedence table.
pub fn lookup_target(headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
    AddressResolver::default().lookup_target(headers, fallback)
}
