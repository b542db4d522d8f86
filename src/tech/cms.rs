//! CMS validation.
//!
//! Fingerprinting happily reports front-end libraries, web servers and CDNs
//! as "the CMS". Candidates are checked against a deny list of technologies
//! that are never a CMS and an allow list of known platforms; anything on
//! neither list is kept.

/// Known CMS and site-builder platforms (lower-case substrings).
pub const VALID_CMS_PLATFORMS: &[&str] = &[
    "wordpress",
    "joomla",
    "drupal",
    "shopify",
    "squarespace",
    "wix",
    "magento",
    "woocommerce",
    "prestashop",
    "opencart",
    "bigcommerce",
    "ghost",
    "grav",
    "strapi",
    "contentful",
    "craft cms",
    "expressionengine",
    "typo3",
    "concrete5",
    "silverstripe",
    "sitecore",
    "umbraco",
    "kentico",
    "pimcore",
    "aem",
    "adobe experience manager",
    "liferay",
    "sharepoint",
    "dnn",
    "dotnetnuke",
    "plone",
    "modx",
    "processwire",
    "textpattern",
    "bolt",
    "pico",
    "kirby",
    "statamic",
    "wagtail",
    "django cms",
    "weebly",
    "carrd",
    "webflow",
    "tumblr",
    "medium",
    "blogger",
    "blogspot",
];

/// Technologies that are never a CMS (lower-case substrings).
pub const NOT_CMS: &[&str] = &[
    "bootstrap",
    "jquery",
    "nginx",
    "apache",
    "cloudflare",
    "react",
    "vue",
    "angular",
    "node.js",
    "php",
    "python",
    "ruby",
    "java",
    "javascript",
    "typescript",
    "css",
    "html",
    "sass",
    "less",
    "webpack",
    "gulp",
    "babel",
    "express",
    "django",
    "rails",
    "laravel",
    "flask",
    "spring",
    "asp.net",
    "symfony",
    "fastly",
    "cloudfront",
    "akamai",
    "maxcdn",
    "keycdn",
    "bunnycdn",
    "stackpath",
    "sucuri",
    "incapsula",
    "imperva",
    "amazon s3",
    "s3",
    "jsdelivr",
    "polyfill",
    "fingerprintjs",
    "next.js",
    "netlify",
    "statcounter",
    "google cloud",
    "amazon web services",
    "aws",
    "iconicons",
    "cloud storage",
    "cdn",
    "hosting",
    "platform",
    "analytics",
    "counter",
    "icons",
    "font awesome",
    "fontawesome",
];

/// Whether a CMS value may be stored.
///
/// Absent or empty values are valid (the field is simply unset). The deny
/// list is checked before the allow list, so "django" is rejected even
/// though "django cms" is allowed. Unknown names are accepted.
pub fn is_valid_cms(cms: Option<&str>) -> bool {
    let Some(value) = cms.map(str::trim).filter(|v| !v.is_empty()) else {
        return true;
    };
    let lower = value.to_lowercase();

    if NOT_CMS.iter().any(|bad| lower.contains(bad)) {
        return false;
    }
    if VALID_CMS_PLATFORMS.iter().any(|known| lower.contains(known)) {
        return true;
    }
    true
}

/// Canonical stored form of a CMS candidate.
///
/// The known platform it names when there is one ("WordPress 6.4.2" becomes
/// "wordpress"), otherwise the lower-cased name with trailing version words
/// dropped ("Hugo 0.120.4" becomes "hugo").
pub fn canonical_cms(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if let Some(known) = VALID_CMS_PLATFORMS.iter().find(|known| lower.contains(*known)) {
        return Some((*known).to_string());
    }
    let name: Vec<&str> = lower
        .split_whitespace()
        .take_while(|word| !is_version_word(word))
        .collect();
    if name.is_empty() {
        Some(lower)
    } else {
        Some(name.join(" "))
    }
}

fn is_version_word(word: &str) -> bool {
    let digits = word.strip_prefix('v').unwrap_or(word);
    digits.starts_with(|c: char| c.is_ascii_digit())
}
