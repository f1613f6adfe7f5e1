/* src/classify.rs */

use serde::Serialize;
use std::fmt;

/// Whether an address is usable for a geolocation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressClass {
    /// Loopback, private or link-local: the provider cannot locate it.
    Local,
    /// Anything else.
    Public,
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressClass::Local => f.write_str("local"),
            AddressClass::Public => f.write_str("public"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Match {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Match {
    fn test(self, address: &str) -> bool {
        match self {
            Match::Exact(literal) => address == literal,
            Match::Prefix(prefix) => address
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix)),
        }
    }
}

/// Textual tests that mark an address as local, checked in order.
///
/// Literals compare exactly; prefixes ignore ASCII case so `FE80::1` matches.
/// `172.` covers more than 172.16.0.0/12 (every 172.x address matches).
const LOCAL_RULES: &[Match] = &[
    Match::Exact("127.0.0.1"),
    Match::Exact("localhost"),
    Match::Prefix("192.168."),
    Match::Prefix("10."),
    Match::Prefix("172."),
    Match::Exact("::1"),
    Match::Exact("::ffff:127.0.0.1"),
    Match::Prefix("fe80:"),
    Match::Prefix("fc00:"),
    Match::Prefix("fd00:"),
];

/// Classify an address as local or public.
///
/// This is a purely syntactic test: malformed input is public unless it
/// happens to match one of the local literals or prefixes.
///
/// # Examples
///
/// ```rust
/// use iplocate::{classify, AddressClass};
///
/// assert_eq!(classify("192.168.1.10"), AddressClass::Local);
/// assert_eq!(classify("8.8.8.8"), AddressClass::Public);
/// ```
pub fn classify(address: &str) -> AddressClass {
    if LOCAL_RULES.iter().any(|rule| rule.test(address)) {
        AddressClass::Local
    } else {
        AddressClass::Public
    }
}
