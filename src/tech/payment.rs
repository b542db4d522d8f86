//! Payment processor detection.

/// Processor name -> domain markers, evaluated in order.
pub const PAYMENT_PROCESSORS: &[(&str, &[&str])] = &[
    (
        "stripe",
        &["stripe.com", "js.stripe.com", "checkout.stripe.com"],
    ),
    ("paypal", &["paypal.com", "paypalobjects.com"]),
    ("square", &["square.com", "squareup.com"]),
    ("braintree", &["braintreegateway.com"]),
    ("coinbase", &["coinbase.com", "commerce.coinbase.com"]),
    ("bitpay", &["bitpay.com"]),
    ("crypto", &["crypto.com", "binance.com", "bitcoin.org"]),
];

/// Generic checkout button markers that do not name a processor.
pub const PAYMENT_BUTTON_MARKERS: &[&str] = &[
    "paypal-button",
    "stripe-button",
    "checkout-button",
    "payment-button",
];

/// Name recorded for a generic payment button.
pub const UNKNOWN_PROCESSOR: &str = "unknown";

/// Separator of the flat processor column.
const PROCESSOR_SEPARATOR: &str = ", ";

/// Detects processors referenced in a lower-cased page body.
///
/// Processors come out in table order, each at most once. "unknown" is
/// appended once when any generic button marker appears, even if a named
/// processor was also found.
pub fn detect_payment_processors(body_lower: &str) -> Vec<String> {
    let mut processors: Vec<String> = PAYMENT_PROCESSORS
        .iter()
        .filter(|(_, markers)| markers.iter().any(|m| body_lower.contains(m)))
        .map(|(name, _)| (*name).to_string())
        .collect();

    if PAYMENT_BUTTON_MARKERS
        .iter()
        .any(|marker| body_lower.contains(marker))
    {
        processors.push(UNKNOWN_PROCESSOR.to_string());
    }

    processors
}

/// Flattens processors into the relational column form.
///
/// Names containing a comma do not survive [`split_processors`]; none of
/// the detected names do.
pub fn join_processors(processors: &[String]) -> Option<String> {
    let names: Vec<&str> = processors
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(PROCESSOR_SEPARATOR))
    }
}

/// Reads the flat column back into names.
pub fn split_processors(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
