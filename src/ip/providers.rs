//! Response shapes of the IP geolocation providers.

use serde::Deserialize;
use serde_json::Value;

use super::IpInfo;

/// `GET http://ip-api.com/json/{ip}`
#[derive(Debug, Deserialize)]
pub(crate) struct IpApiResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub country: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    #[serde(rename = "as")]
    pub as_field: Option<String>,
}

impl IpApiResponse {
    pub(crate) fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    pub(crate) fn into_info(self) -> IpInfo {
        IpInfo {
            country: non_blank(self.country),
            isp: non_blank(self.isp),
            host_name: non_blank(self.org),
            asn: self.as_field.as_deref().and_then(parse_asn),
        }
    }
}

/// `GET https://www.iplocate.io/api/lookup/{ip}?apikey=...`
///
/// `asn` has been observed both as `"AS15169"` and as an object carrying the
/// number, so it is decoded loosely.
#[derive(Debug, Deserialize)]
pub(crate) struct IpLocateResponse {
    pub country: Option<String>,
    pub org: Option<String>,
    pub asn: Option<Value>,
}

impl IpLocateResponse {
    pub(crate) fn into_info(self) -> IpInfo {
        let asn = match self.asn {
            Some(Value::String(s)) => parse_asn(&s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Object(map)) => match map.get("asn") {
                Some(Value::String(s)) => parse_asn(s),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            },
            _ => None,
        };
        let org = non_blank(self.org);
        IpInfo {
            country: non_blank(self.country),
            // IPLocate has no separate ISP; its org is the operator
            isp: org.clone(),
            host_name: org
                .as_deref()
                .and_then(|o| o.split_whitespace().next())
                .map(str::to_string),
            asn,
        }
    }
}

/// Extracts the AS number from `"AS15169 Google LLC"`, `"AS15169"` or `"15169"`.
pub fn parse_asn(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_prefix = trimmed
        .strip_prefix("AS")
        .or_else(|| trimmed.strip_prefix("as"))
        .unwrap_or(trimmed);
    let digits: String = without_prefix
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asn() {
        assert_eq!(parse_asn("AS15169 Google LLC").as_deref(), Some("15169"));
        assert_eq!(parse_asn("AS13335").as_deref(), Some("13335"));
        assert_eq!(parse_asn(" 16509 ").as_deref(), Some("16509"));
        assert_eq!(parse_asn("Google"), None);
        assert_eq!(parse_asn(""), None);
    }

    #[test]
    fn test_ip_api_success_payload() {
        let body = r#"{"status":"success","country":"United States","isp":"Google LLC",
            "org":"Google Public DNS","as":"AS15169 Google LLC","query":"8.8.8.8"}"#;
        let parsed: IpApiResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.is_success());
        let info = parsed.into_info();
        assert_eq!(info.country.as_deref(), Some("United States"));
        assert_eq!(info.isp.as_deref(), Some("Google LLC"));
        assert_eq!(info.host_name.as_deref(), Some("Google Public DNS"));
        assert_eq!(info.asn.as_deref(), Some("15169"));
    }

    #[test]
    fn test_ip_api_blank_fields_are_absent() {
        let body = r#"{"status":"success","country":"","isp":" ","org":"","as":""}"#;
        let info = serde_json::from_str::<IpApiResponse>(body)
            .unwrap()
            .into_info();
        assert_eq!(info, IpInfo::default());
    }

    #[test]
    fn test_iplocate_asn_shapes() {
        let as_string: IpLocateResponse =
            serde_json::from_str(r#"{"country":"Germany","org":"Hetzner Online GmbH","asn":"AS24940"}"#)
                .unwrap();
        let info = as_string.into_info();
        assert_eq!(info.asn.as_deref(), Some("24940"));
        assert_eq!(info.isp.as_deref(), Some("Hetzner Online GmbH"));
        assert_eq!(info.host_name.as_deref(), Some("Hetzner"));

        let as_object: IpLocateResponse =
            serde_json::from_str(r#"{"asn":{"asn":"AS13335","name":"CLOUDFLARENET"}}"#).unwrap();
        assert_eq!(as_object.into_info().asn.as_deref(), Some("13335"));

        let as_number: IpLocateResponse = serde_json::from_str(r#"{"asn":16509}"#).unwrap();
        assert_eq!(as_number.into_info().asn.as_deref(), Some("16509"));
    }
}
