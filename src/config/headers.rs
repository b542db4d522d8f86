//! HTTP header name constants.
//!
//! Header names are lower-case because `reqwest::header::HeaderMap` lookups
//! are case-insensitive and the detection tables compare lower-cased text.

/// Web server banner
pub const HEADER_SERVER: &str = "server";
/// Application stack banner, sometimes carries the CMS name
pub const HEADER_X_POWERED_BY: &str = "x-powered-by";
/// Drupal and some other CMSs announce themselves here
pub const HEADER_X_GENERATOR: &str = "x-generator";

/// Response headers that identify the CDN in front of a site.
///
/// Keys are header-name prefixes, evaluated in order; the first header
/// present wins. This is a weaker signal than the DNS heuristic and only
/// fills the CDN field when DNS found nothing.
pub const CDN_HEADER_INDICATORS: &[(&str, &str)] = &[
    ("cf-ray", "Cloudflare"),
    ("x-amz-cf-id", "AWS CloudFront"),
    ("x-amz-cf-pop", "AWS CloudFront"),
    ("x-fastly-request-id", "Fastly"),
    ("x-served-by", "Fastly"),
    ("x-akamai-", "Akamai"),
    ("akamai-grn", "Akamai"),
    ("x-iinfo", "Incapsula"),
    ("x-azure-ref", "Azure CDN"),
];
