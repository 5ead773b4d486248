//! Small helpers shared by the config, api and model modules.

use serde::{Deserialize, Deserializer};

const ERROR_BODY_LIMIT: usize = 180;

/// Trimmed text, or `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Whether `value` carries an `http` or `https` scheme.
pub fn has_http_scheme(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// First characters of a response body, for error messages.
pub fn error_excerpt(body: &str) -> String {
    body.trim().chars().take(ERROR_BODY_LIMIT).collect()
}

/// Deserialize an integer that may arrive as a JSON number or a string.
///
/// 64-bit proto fields are rendered as strings by the JSON gateway.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) if text.trim().is_empty() => Ok(0),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_and_drops_empty_text() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" \t ".to_string())), None);
        assert_eq!(
            non_blank(Some(" https://memos.example.com ".to_string())).as_deref(),
            Some("https://memos.example.com")
        );
    }

    #[test]
    fn http_scheme_is_required() {
        assert!(has_http_scheme("http://localhost:8081"));
        assert!(has_http_scheme("https://memos.example.com"));
        assert!(!has_http_scheme("memos.example.com"));
        assert!(!has_http_scheme("ws://memos.example.com"));
    }

    #[test]
    fn error_excerpt_is_bounded() {
        let body = format!("  {}  ", "x".repeat(500));
        assert_eq!(error_excerpt(&body).len(), ERROR_BODY_LIMIT);
    }

    #[test]
    fn lenient_i64_accepts_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(deserialize_with = "lenient_i64")]
            size: i64,
        }

        let number: Payload = serde_json::from_str(r#"{"size": 42}"#).unwrap();
        let text: Payload = serde_json::from_str(r#"{"size": "1024"}"#).unwrap();
        assert_eq!(number.size, 42);
        assert_eq!(text.size, 1024);
        assert!(serde_json::from_str::<Payload>(r#"{"size": "big"}"#).is_err());
    }
}
