//! Provider name normalization.
//!
//! Hosting providers, CDNs and registrars show up under several spellings
//! ("Cloudflare", "CLOUDFLARE, INC.", "Cloudflare, Inc."). Graph nodes are
//! keyed by name, so every provider string is collapsed to one canonical form
//! before it reaches storage.

/// Substring (lower-case) -> canonical provider name, evaluated in order.
const CANONICAL_PROVIDERS: &[(&str, &str)] = &[
    ("cloudflare", "Cloudflare, Inc."),
    ("namecheap", "Namecheap, Inc."),
];

/// Canonicalizes a provider name.
///
/// Returns the canonical name when the lower-cased, trimmed input contains a
/// known provider marker, otherwise the trimmed input unchanged.
/// `normalize_provider(normalize_provider(x)) == normalize_provider(x)`.
pub fn normalize_provider(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    CANONICAL_PROVIDERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Applies [`normalize_provider`] to an optional value, dropping blanks.
pub fn normalize_optional(name: Option<String>) -> Option<String> {
    name.map(|n| normalize_provider(&n)).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloudflare_variants_collapse() {
        assert_eq!(normalize_provider("Cloudflare"), "Cloudflare, Inc.");
        assert_eq!(normalize_provider("cloudflare"), "Cloudflare, Inc.");
        assert_eq!(normalize_provider("CLOUDFLARENET"), "Cloudflare, Inc.");
        assert_eq!(normalize_provider("Cloudflare, Inc."), "Cloudflare, Inc.");
    }

    #[test]
    fn test_namecheap_variants_collapse() {
        assert_eq!(normalize_provider("NameCheap, Inc."), "Namecheap, Inc.");
        assert_eq!(normalize_provider("  namecheap  "), "Namecheap, Inc.");
    }

    #[test]
    fn test_unknown_provider_is_trimmed_only() {
        assert_eq!(normalize_provider("  Google LLC "), "Google LLC");
        assert_eq!(normalize_provider("MarkMonitor Inc."), "MarkMonitor Inc.");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in [
            "Cloudflare, Inc.",
            "cloudflare",
            " Namecheap ",
            "Amazon.com, Inc.",
            "",
            "   ",
            "GoDaddy.com, LLC",
        ] {
            let once = normalize_provider(input);
            assert_eq!(normalize_provider(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_normalize_optional_drops_blank() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(normalize_optional(None), None);
        assert_eq!(
            normalize_optional(Some("cloudflare".to_string())),
            Some("Cloudflare, Inc.".to_string())
        );
    }
}
