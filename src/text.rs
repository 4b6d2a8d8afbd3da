use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::OnceLock;
use url::Url;

/// Collapse all whitespace runs (spaces, tabs, newlines) to a single space
/// and trim the ends. Absent input yields an empty string.
pub fn clean_text(value: Option<&str>) -> String {
    match value {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => String::new(),
    }
}

/// Return the authority (host[:port]) component of a URL. Unparseable input
/// is returned unchanged rather than treated as an error.
pub fn ensure_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = match parsed.host_str() {
                Some(host) => host,
                None => return url.to_string(),
            };
            match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            }
        }
        Err(_) => url.to_string(),
    }
}

fn iso_duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").unwrap()
    })
}

/// Turn an ISO-8601 duration like `P1DT2H30M` into a compact human string
/// (`"1 d 2 h 30 min"`), keeping only non-zero components. A matching
/// duration with all components zero becomes `"0 min"`. Anything that does
/// not look like an ISO duration passes through unchanged; empty or absent
/// input yields `None`.
pub fn normalize_iso_duration(value: Option<&str>) -> Option<String> {
    let normalized = value?.trim();
    if normalized.is_empty() {
        return None;
    }

    let captures = match iso_duration_pattern().captures(normalized) {
        Some(captures) => captures,
        None => return Some(normalized.to_string()),
    };

    let mut components = Vec::new();
    for (group, label) in [(1usize, "d"), (2, "h"), (3, "min"), (4, "s")] {
        if let Some(part) = captures.get(group) {
            let number: u64 = part.as_str().parse().unwrap_or(0);
            if number > 0 {
                components.push(format!("{number} {label}"));
            }
        }
    }

    if components.is_empty() {
        return Some("0 min".to_string());
    }

    Some(components.join(" "))
}

/// Best-effort plain-text rendering of a page for the language-model
/// fallback: boilerplate subtrees are dropped, line structure is preserved,
/// and single-character noise lines are filtered out.
pub fn extract_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    collect_text(&document.root_element(), &mut lines);

    lines
        .iter()
        .map(|line| clean_text(Some(line.as_str())))
        .filter(|line| line.chars().count() >= 2)
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: &ElementRef, lines: &mut Vec<String>) {
    if should_skip_element(element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, lines);
                }
            }
            _ => {}
        }
    }
}

fn should_skip_element(element: &ElementRef) -> bool {
    matches!(
        element.value().name(),
        "script" | "style" | "noscript" | "svg" | "canvas" | "iframe"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_runs() {
        assert_eq!(clean_text(Some("  a \t b\n\nc  ")), "a b c");
        assert_eq!(clean_text(Some("")), "");
        assert_eq!(clean_text(None), "");
    }

    #[test]
    fn ensure_domain_extracts_authority() {
        assert_eq!(ensure_domain("https://example.com/r/cake?a=1"), "example.com");
        assert_eq!(ensure_domain("http://example.com:8080/x"), "example.com:8080");
        assert_eq!(ensure_domain("not a url"), "not a url");
    }

    #[test]
    fn iso_duration_full() {
        assert_eq!(
            normalize_iso_duration(Some("P1DT2H30M")),
            Some("1 d 2 h 30 min".to_string())
        );
        assert_eq!(
            normalize_iso_duration(Some("PT45M")),
            Some("45 min".to_string())
        );
        assert_eq!(
            normalize_iso_duration(Some("pt1h10m")),
            Some("1 h 10 min".to_string())
        );
    }

    #[test]
    fn iso_duration_all_zero() {
        assert_eq!(normalize_iso_duration(Some("PT0S")), Some("0 min".to_string()));
        assert_eq!(normalize_iso_duration(Some("PT0H0M")), Some("0 min".to_string()));
    }

    #[test]
    fn iso_duration_passthrough_and_empty() {
        assert_eq!(
            normalize_iso_duration(Some("not-a-duration")),
            Some("not-a-duration".to_string())
        );
        assert_eq!(
            normalize_iso_duration(Some("30 minutes")),
            Some("30 minutes".to_string())
        );
        assert_eq!(normalize_iso_duration(Some("")), None);
        assert_eq!(normalize_iso_duration(Some("   ")), None);
        assert_eq!(normalize_iso_duration(None), None);
    }

    #[test]
    fn page_text_strips_boilerplate() {
        let html = r#"
            <html><head>
            <script>var x = 1;</script>
            <style>.a { color: red }</style>
            </head><body>
            <h1>Chocolate Cake</h1>
            <noscript>Enable JS</noscript>
            <p>Mix the  flour
            and sugar.</p>
            <span>*</span>
            </body></html>
        "#;
        let text = extract_page_text(html);
        assert!(text.contains("Chocolate Cake"));
        assert!(text.contains("Mix the flour"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Enable JS"));
        // single-character noise line dropped
        assert!(!text.lines().any(|line| line == "*"));
    }
}
