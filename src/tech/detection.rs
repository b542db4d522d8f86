//! Technology detection over a fetched page.
//!
//! Pure functions: no I/O happens here, so every heuristic is unit tested
//! against literal markup and headers.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::cms::{canonical_cms, is_valid_cms};
use super::fetch::FetchedPage;
use super::payment::detect_payment_processors;
use super::TechProfile;
use crate::config::{CDN_HEADER_INDICATORS, HEADER_SERVER, HEADER_X_GENERATOR, HEADER_X_POWERED_BY};

/// Marker substring (lower-case) -> CMS, evaluated in order against the
/// lower-cased body and final URL. Specific paths precede generic names
/// within a platform to keep false positives down.
pub const CMS_MARKERS: &[(&str, &str)] = &[
    ("wp-content", "WordPress"),
    ("wp-includes", "WordPress"),
    ("wp-json", "WordPress"),
    ("/wp-admin/", "WordPress"),
    ("wordpress", "WordPress"),
    ("joomla", "Joomla"),
    ("/administrator/", "Joomla"),
    ("com_content", "Joomla"),
    ("option=com_", "Joomla"),
    ("drupal", "Drupal"),
    ("sites/all/", "Drupal"),
    ("/sites/default/", "Drupal"),
    ("drupal.js", "Drupal"),
    ("shopify", "Shopify"),
    ("cdn.shopify.com", "Shopify"),
    ("myshopify.com", "Shopify"),
    ("shopify-analytics", "Shopify"),
    ("squarespace", "Squarespace"),
    ("sqs-cdn", "Squarespace"),
    ("/skin/frontend/", "Magento"),
    ("/skin/adminhtml/", "Magento"),
    ("mage/translate.js", "Magento"),
    ("mage/cookies.js", "Magento"),
    ("mage.js", "Magento"),
    ("mage/adminhtml", "Magento"),
    ("/mage/", "Magento"),
    ("magento", "Magento"),
    ("prestashop", "PrestaShop"),
    ("ghost.org", "Ghost"),
    ("/ghost/", "Ghost"),
    ("ghost.min.js", "Ghost"),
    ("content/themes/ghost", "Ghost"),
    ("wix.com", "Wix"),
    ("wixstatic.com", "Wix"),
    ("wixpress.com", "Wix"),
    ("weebly.com", "Weebly"),
    ("weeblycdn.com", "Weebly"),
    ("bigcommerce.com", "BigCommerce"),
    ("bigcommerceapi", "BigCommerce"),
    ("opencart", "OpenCart"),
    ("/catalog/view/theme/", "OpenCart"),
    ("/catalog/controller/", "OpenCart"),
];

/// Script/stylesheet URL substring -> library name.
pub const LIBRARY_MARKERS: &[(&str, &str)] = &[
    ("jquery", "jQuery"),
    ("bootstrap", "Bootstrap"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("angular", "Angular"),
    ("/_next/", "Next.js"),
    ("/_nuxt/", "Nuxt.js"),
    ("svelte", "Svelte"),
    ("ember", "Ember.js"),
    ("backbone", "Backbone.js"),
    ("lodash", "Lodash"),
    ("font-awesome", "Font Awesome"),
    ("fontawesome", "Font Awesome"),
    ("googletagmanager.com", "Google Tag Manager"),
    ("google-analytics.com", "Google Analytics"),
];

static GENERATOR_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| {
        Selector::parse("meta[name=generator], meta[name=Generator], meta[name=GENERATOR]").ok()
    });

static ASSET_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("script[src], link[href]").ok());

/// Runs every detector over `page`.
pub fn detect(page: &FetchedPage) -> TechProfile {
    let body_lower = page.body.to_lowercase();
    let url_lower = page.final_url.to_lowercase();

    let (generators, assets) = parse_document(&page.body);

    let mut candidates: Vec<String> = Vec::new();
    if let Some(name) = cms_from_markers(&body_lower, &url_lower) {
        candidates.push(name.to_string());
    }
    if let Some(powered_by) = page.header(HEADER_X_POWERED_BY) {
        if let Some(name) = cms_named_in(powered_by) {
            candidates.push(name.to_string());
        }
    }
    candidates.extend(generators.iter().cloned());
    if let Some(generator) = page.header(HEADER_X_GENERATOR) {
        candidates.push(generator.to_string());
    }

    let cms = select_cms(&candidates);

    let web_server = page
        .header(HEADER_SERVER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut technologies: Vec<String> = Vec::new();
    let mut push_unique = |name: &str| {
        if !technologies.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            technologies.push(name.to_string());
        }
    };
    for candidate in &candidates {
        push_unique(candidate.trim());
    }
    if let Some(server) = &web_server {
        push_unique(server);
    }
    if let Some(powered_by) = page.header(HEADER_X_POWERED_BY) {
        push_unique(powered_by.trim());
    }
    for library in libraries_from_assets(&assets) {
        push_unique(library);
    }

    TechProfile {
        cms,
        payment_processors: detect_payment_processors(&body_lower),
        technologies,
        web_server,
        cdn: cdn_from_headers(page).map(str::to_string),
    }
}

/// First CMS marker found in the body or URL.
pub fn cms_from_markers(body_lower: &str, url_lower: &str) -> Option<&'static str> {
    CMS_MARKERS
        .iter()
        .find(|(marker, _)| body_lower.contains(marker) || url_lower.contains(marker))
        .map(|(_, name)| *name)
}

/// A CMS from the marker table whose name appears in `text`.
fn cms_named_in(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CMS_MARKERS
        .iter()
        .map(|(_, name)| *name)
        .find(|name| lower.contains(&name.to_lowercase()))
}

/// First candidate that passes CMS validation, in canonical form.
///
/// Validation sees the raw token: "Bootstrap Ghost Theme" is rejected even
/// though its canonical form would be "ghost".
pub fn select_cms(candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .filter(|c| is_valid_cms(Some(c)))
        .find_map(|c| canonical_cms(c))
}

/// CDN implied by response headers, in table order.
pub fn cdn_from_headers(page: &FetchedPage) -> Option<&'static str> {
    CDN_HEADER_INDICATORS
        .iter()
        .find(|(prefix, _)| page.headers.keys().any(|name| name.starts_with(prefix)))
        .map(|(_, cdn)| *cdn)
}

fn libraries_from_assets(assets: &[String]) -> Vec<&'static str> {
    LIBRARY_MARKERS
        .iter()
        .filter(|(marker, _)| assets.iter().any(|a| a.contains(marker)))
        .map(|(_, name)| *name)
        .collect()
}

/// Generator meta contents and lower-cased asset URLs.
///
/// `Html` is not `Send`; everything is extracted here so callers can hold
/// the results across await points.
fn parse_document(body: &str) -> (Vec<String>, Vec<String>) {
    let document = Html::parse_document(body);

    let generators = GENERATOR_SELECTOR
        .as_ref()
        .map(|selector| {
            document
                .select(selector)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let assets = ASSET_SELECTOR
        .as_ref()
        .map(|selector| {
            document
                .select(selector)
                .filter_map(|el| el.value().attr("src").or_else(|| el.value().attr("href")))
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();

    (generators, assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn page(body: &str, headers: &[(&str, &str)]) -> FetchedPage {
        FetchedPage {
            status: 200,
            final_url: "https://example.com/".to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_wordpress_from_markup() {
        let profile = detect(&page(
            r#"<link rel="stylesheet" href="/wp-content/themes/x/style.css">"#,
            &[],
        ));
        assert_eq!(profile.cms.as_deref(), Some("wordpress"));
        assert!(profile.technologies.contains(&"WordPress".to_string()));
    }

    #[test]
    fn test_generator_meta_names_cms() {
        let profile = detect(&page(
            r#"<html><head><meta name="generator" content="Hugo 0.120.4"></head></html>"#,
            &[],
        ));
        assert_eq!(profile.cms.as_deref(), Some("hugo"));
    }

    #[test]
    fn test_not_cms_generator_is_skipped() {
        let profile = detect(&page(
            r#"<html><head><meta name="generator" content="Bootstrap Studio"></head></html>"#,
            &[],
        ));
        assert_eq!(profile.cms, None);
    }

    #[test]
    fn test_deny_listed_generator_naming_a_cms_is_skipped() {
        let profile = detect(&page(
            r#"<html><head><meta name="generator" content="Pico CSS"></head></html>"#,
            &[],
        ));
        assert_eq!(profile.cms, None);

        let themed = detect(&page(
            r#"<html><head><meta name="generator" content="Bootstrap Ghost Theme"></head></html>"#,
            &[],
        ));
        assert_eq!(themed.cms, None);
    }

    #[test]
    fn test_mixed_token_is_rejected_before_canonicalization() {
        assert_eq!(select_cms(&["Bootstrap Ghost Theme".to_string()]), None);
        assert_eq!(select_cms(&["WordPress React Theme".to_string()]), None);

        let candidates = vec!["Bootstrap Ghost Theme".to_string(), "Ghost 5.2".to_string()];
        assert_eq!(select_cms(&candidates).as_deref(), Some("ghost"));
    }

    #[test]
    fn test_invalid_candidate_falls_through_to_next() {
        let candidates = vec!["jQuery".to_string(), "Drupal 10".to_string()];
        assert_eq!(select_cms(&candidates).as_deref(), Some("drupal"));
    }

    #[test]
    fn test_powered_by_only_counts_when_naming_a_cms() {
        let php = detect(&page("<html></html>", &[("x-powered-by", "PHP/8.2")]));
        assert_eq!(php.cms, None);
        assert!(php.technologies.contains(&"PHP/8.2".to_string()));

        let shop = detect(&page("<html></html>", &[("x-powered-by", "Shopify")]));
        assert_eq!(shop.cms.as_deref(), Some("shopify"));
    }

    #[test]
    fn test_x_generator_header() {
        let profile = detect(&page("<html></html>", &[("x-generator", "Drupal 9 (https://www.drupal.org)")]));
        assert_eq!(profile.cms.as_deref(), Some("drupal"));
    }

    #[test]
    fn test_plain_page_has_no_cms() {
        let profile = detect(&page(
            "<html><head><title>Example Domain</title></head><body><p>This domain is for use in examples.</p></body></html>",
            &[],
        ));
        assert_eq!(profile.cms, None);
        assert!(profile.payment_processors.is_empty());
    }

    #[test]
    fn test_web_server_and_libraries() {
        let profile = detect(&page(
            r#"<script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
               <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">"#,
            &[("server", "nginx")],
        ));
        assert_eq!(profile.web_server.as_deref(), Some("nginx"));
        assert_eq!(profile.technologies, vec!["nginx", "jQuery", "Bootstrap"]);
        assert_eq!(profile.cms, None);
    }

    #[test]
    fn test_cdn_from_headers_in_table_order() {
        let both = page("", &[("x-served-by", "cache-lhr"), ("cf-ray", "8a-LHR")]);
        assert_eq!(cdn_from_headers(&both), Some("Cloudflare"));

        let akamai = page("", &[("x-akamai-request-id", "1")]);
        assert_eq!(cdn_from_headers(&akamai), Some("Akamai"));

        assert_eq!(cdn_from_headers(&page("", &[("server", "nginx")])), None);
    }

    #[test]
    fn test_payment_processors_detected() {
        let profile = detect(&page(
            r#"<script src="https://js.stripe.com/v3/"></script>"#,
            &[],
        ));
        assert_eq!(profile.payment_processors, vec!["stripe"]);
    }

    #[test]
    fn test_cms_from_url_marker() {
        assert_eq!(
            cms_from_markers("", "https://shop.myshopify.com/"),
            Some("Shopify")
        );
    }
}
