//! CDN inference from DNS artifacts.
//!
//! Nameserver and CNAME targets often name the CDN fronting a site
//! (`*.ns.cloudflare.com`, `*.cloudfront.net`). The match is a plain substring
//! test and is only a guess, not an authoritative answer.

/// Lower-case substring -> CDN display name.
///
/// Order is the tie-break: a host matching several indicators gets the one
/// declared first. Keep it stable.
pub const CDN_INDICATORS: &[(&str, &str)] = &[
    ("cloudflare", "Cloudflare"),
    ("cloudfront", "AWS CloudFront"),
    ("fastly", "Fastly"),
    ("akamai", "Akamai"),
    ("incapdns", "Incapsula"),
    ("azure", "Azure CDN"),
    ("google", "Google Cloud CDN"),
];

/// Returns the CDN of the first indicator found in any NS or CNAME value.
///
/// Indicators are tried in table order and scanning stops at the first hit.
pub fn detect_cdn(nameservers: &[String], cnames: &[String]) -> Option<&'static str> {
    let values: Vec<String> = nameservers
        .iter()
        .chain(cnames.iter())
        .map(|v| v.to_lowercase())
        .collect();

    CDN_INDICATORS
        .iter()
        .find(|(indicator, _)| values.iter().any(|v| v.contains(indicator)))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_detect_cdn_from_nameservers() {
        let ns = strings(&["ada.ns.cloudflare.com.", "bob.ns.cloudflare.com."]);
        assert_eq!(detect_cdn(&ns, &[]), Some("Cloudflare"));
    }

    #[test]
    fn test_detect_cdn_from_cname() {
        let cname = strings(&["d111111abcdef8.cloudfront.net."]);
        assert_eq!(detect_cdn(&[], &cname), Some("AWS CloudFront"));
    }

    #[test]
    fn test_detect_cdn_case_insensitive() {
        let ns = strings(&["NS1.FASTLY.NET."]);
        assert_eq!(detect_cdn(&ns, &[]), Some("Fastly"));
    }

    #[test]
    fn test_detect_cdn_none() {
        let ns = strings(&["a.iana-servers.net.", "b.iana-servers.net."]);
        assert_eq!(detect_cdn(&ns, &[]), None);
        assert_eq!(detect_cdn(&[], &[]), None);
    }

    #[test]
    fn test_detect_cdn_order_beats_position() {
        // "google" appears before "cloudflare" in the values, but cloudflare is
        // declared earlier in the table and must win every time.
        let cname = strings(&["ghs.google.com.cdn.cloudflare.net."]);
        for _ in 0..10 {
            assert_eq!(detect_cdn(&[], &cname), Some("Cloudflare"));
        }

        let ns = strings(&["ns-cloud-a1.googledomains.com."]);
        let cname = strings(&["example.cdn.cloudflare.net."]);
        assert_eq!(detect_cdn(&ns, &cname), Some("Cloudflare"));
    }

    #[test]
    fn test_detect_cdn_azure_before_google() {
        let cname = strings(&["site.azureedge.net.", "storage.googleapis.com."]);
        assert_eq!(detect_cdn(&[], &cname), Some("Azure CDN"));
    }

    #[test]
    fn test_indicator_table_order_is_fixed() {
        let indicators: Vec<&str> = CDN_INDICATORS.iter().map(|(i, _)| *i).collect();
        assert_eq!(
            indicators,
            vec![
                "cloudflare",
                "cloudfront",
                "fastly",
                "akamai",
                "incapdns",
                "azure",
                "google"
            ]
        );
    }
}
