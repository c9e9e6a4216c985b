use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SeedError};

static NEXT_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script id="__NEXT_DATA__" type="application/json">(.*?)</script>"#).unwrap()
});

/// Decode the server-rendered state embedded in the page.
pub fn extract_next_data(html: &str) -> Result<Value> {
    let raw = NEXT_DATA_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            SeedError::MissingData("unable to find __NEXT_DATA__ in source HTML".into())
        })?;

    debug!(bytes = raw.len(), "Found __NEXT_DATA__ block");
    serde_json::from_str(raw)
        .map_err(|e| SeedError::MalformedData(format!("__NEXT_DATA__ is not valid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_script_block() {
        let html = r#"<html><body>
<script src="/app.js"></script>
<script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"n":1}}}</script>
</body></html>"#;
        let data = extract_next_data(html).unwrap();
        assert_eq!(data["props"]["pageProps"]["n"], 1);
    }

    #[test]
    fn payload_may_span_lines() {
        let html = "<script id=\"__NEXT_DATA__\" type=\"application/json\">{\n\"a\":\n[1,2]\n}</script>";
        let data = extract_next_data(html).unwrap();
        assert_eq!(data["a"][1], 2);
    }

    #[test]
    fn missing_block_is_missing_data() {
        let err = extract_next_data("<html><body>nothing</body></html>").unwrap_err();
        assert!(matches!(err, SeedError::MissingData(_)));
    }

    #[test]
    fn untagged_json_script_is_ignored() {
        let html = r#"<script type="application/json">{"a":1}</script>"#;
        assert!(matches!(
            extract_next_data(html),
            Err(SeedError::MissingData(_))
        ));
    }

    #[test]
    fn broken_json_is_malformed() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">{"props": </script>"#;
        let err = extract_next_data(html).unwrap_err();
        assert!(matches!(err, SeedError::MalformedData(_)));
    }
}
