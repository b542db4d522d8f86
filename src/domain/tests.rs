// Domain module tests.

use super::*;

#[test]
fn test_normalize_domain_bare() {
    assert_eq!(normalize_domain("example.com").unwrap(), "example.com");
}

#[test]
fn test_normalize_domain_lowercases() {
    assert_eq!(normalize_domain("EXAMPLE.Com").unwrap(), "example.com");
}

#[test]
fn test_normalize_domain_strips_scheme_www_and_path() {
    assert_eq!(
        normalize_domain("https://www.example.com/path?query=1#fragment").unwrap(),
        "example.com"
    );
    assert_eq!(
        normalize_domain("http://www.example.com/").unwrap(),
        "example.com"
    );
}

#[test]
fn test_normalize_domain_strips_port() {
    assert_eq!(
        normalize_domain("https://example.com:8443/login").unwrap(),
        "example.com"
    );
}

#[test]
fn test_normalize_domain_keeps_other_subdomains() {
    // Only the www. prefix is removed; shop.example.com is a different site
    assert_eq!(
        normalize_domain("shop.example.com").unwrap(),
        "shop.example.com"
    );
}

#[test]
fn test_normalize_domain_trailing_dot_and_whitespace() {
    assert_eq!(normalize_domain("  example.com.  ").unwrap(), "example.com");
}

#[test]
fn test_normalize_domain_rejects_empty() {
    assert!(normalize_domain("").is_err());
    assert!(normalize_domain("   ").is_err());
}

#[test]
fn test_normalize_domain_rejects_ip_addresses() {
    assert!(normalize_domain("192.0.2.1").is_err());
    assert!(normalize_domain("http://[2001:db8::1]/").is_err());
}

#[test]
fn test_normalize_domain_rejects_single_label() {
    assert!(normalize_domain("localhost").is_err());
}
