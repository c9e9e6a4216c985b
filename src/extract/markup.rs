//! Auxiliary fields read straight from the markup. Nothing here is fatal:
//! a missing value is reported as `None`/empty and the caller picks a default.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static ROOT_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<html\b[^>]*?\sstyle="([^"]*)""#).unwrap());
static TEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tel:([+0-9]+)").unwrap());

/// CSS custom properties (`--name: value`) declared on the root `<html>` element.
pub fn parse_root_style_vars(html: &str) -> BTreeMap<String, String> {
    let Some(caps) = ROOT_STYLE_RE.captures(html) else {
        return BTreeMap::new();
    };

    caps[1]
        .split(';')
        .map(str::trim)
        .filter(|decl| decl.starts_with("--"))
        .map(|decl| {
            let (key, value) = decl.split_once(':').unwrap_or((decl, ""));
            (key.trim().to_string(), value.trim().to_string())
        })
        .collect()
}

/// First `tel:` link in the page, formatted when it is a full 11-digit number.
pub fn extract_phone(html: &str) -> Option<String> {
    let caps = TEL_RE.captures(html)?;
    Some(format_phone(&caps[1]))
}

/// `79991234567` / `+79991234567` → `+7 (999) 123-45-67`; anything else is returned as-is.
pub fn format_phone(raw: &str) -> String {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if digits.len() != 11 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }
    format!(
        "+{} ({}) {}-{}-{}",
        &digits[0..1],
        &digits[1..4],
        &digits[4..7],
        &digits[7..9],
        &digits[9..11]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_style_vars() {
        let html = r#"<!DOCTYPE html><html lang="ru" style="--accent: #ff5a00; --radius:12px;color: red;"><head>"#;
        let vars = parse_root_style_vars(html);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["--accent"], "#ff5a00");
        assert_eq!(vars["--radius"], "12px");
        assert!(!vars.contains_key("color"));
    }

    #[test]
    fn style_on_other_elements_is_ignored() {
        let html = r#"<html lang="ru"><body style="--accent: red">"#;
        assert!(parse_root_style_vars(html).is_empty());
    }

    #[test]
    fn no_root_style_is_empty_map() {
        assert!(parse_root_style_vars("<html><body></body></html>").is_empty());
    }

    #[test]
    fn formats_eleven_digit_number() {
        assert_eq!(format_phone("79991234567"), "+7 (999) 123-45-67");
        assert_eq!(format_phone("+78002006559"), "+7 (800) 200-65-59");
    }

    #[test]
    fn wrong_length_passes_through() {
        assert_eq!(format_phone("123456"), "123456");
        assert_eq!(format_phone("+7999123456789"), "+7999123456789");
    }

    #[test]
    fn phone_from_tel_link() {
        let html = r#"<a class="phone" href="tel:+79991234567">call</a> <a href="tel:111">x</a>"#;
        assert_eq!(extract_phone(html).as_deref(), Some("+7 (999) 123-45-67"));
    }

    #[test]
    fn short_tel_link_is_raw() {
        let html = r#"<a href="tel:123456">call</a>"#;
        assert_eq!(extract_phone(html).as_deref(), Some("123456"));
    }

    #[test]
    fn no_tel_link() {
        assert_eq!(extract_phone("<a href=\"mailto:x@y.z\">mail</a>"), None);
    }
}
