/* src/format.rs */

use regex::Regex;
use std::sync::LazyLock;

/// Four 1-3 digit groups in 0..=255. A group may carry a leading zero
/// (`08`, `001`), matching what the lookup endpoint has always accepted.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("IPv4 pattern is valid")
});

/// Check whether `ip` is a dotted-quad IPv4 address.
///
/// Surrounding whitespace or any other extra characters make the address invalid.
///
/// # Examples
///
/// ```rust
/// use iplocate::is_well_formed_ipv4;
///
/// assert!(is_well_formed_ipv4("8.8.8.8"));
/// assert!(!is_well_formed_ipv4("8.8.8.8.8"));
/// assert!(!is_well_formed_ipv4("256.1.1.1"));
/// ```
pub fn is_well_formed_ipv4(ip: &str) -> bool {
    IPV4_PATTERN.is_match(ip)
}

/// Strip leading zeros from every group of a well-formed address.
///
/// Anything that fails [`is_well_formed_ipv4`] is returned unchanged.
pub fn normalize_ipv4(ip: &str) -> String {
    if !is_well_formed_ipv4(ip) {
        return ip.to_string();
    }

    ip.split('.')
        .map(|group| group.parse::<u8>().map_or_else(|_| group.to_string(), |n| n.to_string()))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dotted_quads() {
        assert!(is_well_formed_ipv4("8.8.8.8"));
        assert!(is_well_formed_ipv4("0.0.0.0"));
        assert!(is_well_formed_ipv4("255.255.255.255"));
        assert!(is_well_formed_ipv4("192.168.1.10"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(!is_well_formed_ipv4("8.8.8.8.8"));
        assert!(!is_well_formed_ipv4("8.8.8"));
        assert!(!is_well_formed_ipv4("256.1.1.1"));
        assert!(!is_well_formed_ipv4("1.1.1.1000"));
        assert!(!is_well_formed_ipv4(" 8.8.8.8"));
        assert!(!is_well_formed_ipv4("8.8.8.8\n"));
        assert!(!is_well_formed_ipv4("8..8.8"));
        assert!(!is_well_formed_ipv4("a.b.c.d"));
        assert!(!is_well_formed_ipv4(""));
        assert!(!is_well_formed_ipv4("::1"));
    }

    #[test]
    fn leading_zeros_are_accepted() {
        assert!(is_well_formed_ipv4("08.8.8.8"));
        assert!(is_well_formed_ipv4("008.008.008.008"));
        assert!(!is_well_formed_ipv4("0008.8.8.8"));
    }

    #[test]
    fn normalize_strips_leading_zeros() {
        assert_eq!(normalize_ipv4("08.008.0.10"), "8.8.0.10");
        assert_eq!(normalize_ipv4("1.2.3.4"), "1.2.3.4");
        assert_eq!(normalize_ipv4("not-an-ip"), "not-an-ip");
    }
}
