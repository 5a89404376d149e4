//! Content sanitization for untrusted rich-text post bodies.
//!
//! Posts may contain markup that is later rendered as HTML in mail bodies
//! and board pages, so content is screened against a deny-list of dangerous
//! constructs before it is ever stored. Any match rejects the content
//! outright; there is no strip-and-continue. Content that passes is
//! HTML-escaped and returned for storage.

use regex::Regex;

use crate::{BoardError, Result};

/// Deny-list of dangerous constructs. Any match rejects the content.
const DENY_PATTERNS: &[(&str, &str)] = &[
    ("script element", r"(?is)<\s*script"),
    ("javascript URI scheme", r"(?i)javascript\s*:"),
    ("data URI scheme", r"(?i)data\s*:"),
    ("vbscript URI scheme", r"(?i)vbscript\s*:"),
    ("inline event handler", r#"(?is)\bon\w+\s*=\s*"[^"]*""#),
    ("inline event handler", r"(?is)\bon\w+\s*=\s*'[^']*'"),
    ("inline event handler", r"(?i)\bon\w+\s*=\s*[\w.$]+\s*\("),
    ("CSS expression", r"(?i)\bexpression\s*\("),
    ("CSS url", r"(?i)\burl\s*\("),
    ("CSS import", r"(?i)@import"),
    ("CSS expression block", r"\{[^}]*\}"),
    ("unicode escape sequence", r"(?i)\\u[0-9a-f]{4}"),
    (
        "unsafe document reference",
        r"(?i)\bdocument\s*\.\s*(location|cookie|write)",
    ),
    ("HTML comment", r"(?s)<!--.*?-->"),
];

/// Tags that are only dangerous in combination with a risky attribute.
const RISKY_TAGS: &[&str] = &[
    "<img", "<iframe", "<embed", "<object", "<link", "<meta", "<base",
];

/// Attribute tokens that trigger rejection when a risky tag is present.
const RISKY_TOKENS: &[&str] = &["onerror", "onload", "src=", "data:", "href=", "content="];

/// Validates and escapes untrusted rich-text content.
///
/// Compiles its deny-list once at construction; the sanitizer itself is
/// pure and deterministic. Construct one at process start and share it by
/// reference with the boundary validation that needs it.
pub struct ContentSanitizer {
    deny: Vec<(&'static str, Regex)>,
}

impl ContentSanitizer {
    /// Create a sanitizer with the built-in deny-list compiled.
    pub fn new() -> Self {
        let deny = DENY_PATTERNS
            .iter()
            .map(|(name, pattern)| {
                (
                    *name,
                    Regex::new(pattern).expect("built-in sanitizer pattern"),
                )
            })
            .collect();
        Self { deny }
    }

    /// Validate and escape raw content.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidContent`] naming the matched construct
    /// if the content hits the deny-list or the risky tag/attribute
    /// co-occurrence rule. Rejected content must never be stored.
    pub fn sanitize(&self, raw: &str) -> Result<String> {
        for (name, pattern) in &self.deny {
            if pattern.is_match(raw) {
                return Err(BoardError::InvalidContent(name.to_string()));
            }
        }

        // Risky tags are rejected only together with a risky attribute
        // token; either alone is allowed.
        let lowered = raw.to_lowercase();
        let has_risky_tag = RISKY_TAGS.iter().any(|tag| lowered.contains(tag));
        if has_risky_tag {
            if let Some(token) = RISKY_TOKENS.iter().find(|t| lowered.contains(*t)) {
                return Err(BoardError::InvalidContent(format!(
                    "risky tag combined with {token}"
                )));
            }
        }

        Ok(escape_html(raw))
    }
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape HTML-reserved characters and quotes.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> ContentSanitizer {
        ContentSanitizer::new()
    }

    #[test]
    fn test_rejects_script_element() {
        let result = sanitizer().sanitize("<script>alert(1)</script>");
        assert!(matches!(result, Err(BoardError::InvalidContent(_))));
    }

    #[test]
    fn test_rejects_script_element_case_insensitive() {
        let result = sanitizer().sanitize("< SCRIPT src=x>");
        assert!(matches!(result, Err(BoardError::InvalidContent(_))));
    }

    #[test]
    fn test_rejects_uri_schemes() {
        for content in [
            "<a href=\"javascript:alert(1)\">x</a>",
            "click javascript : alert(1)",
            "data:text/html;base64,xxxx",
            "vbscript:MsgBox(1)",
        ] {
            let result = sanitizer().sanitize(content);
            assert!(result.is_err(), "should reject: {content}");
        }
    }

    #[test]
    fn test_rejects_event_handler_attributes() {
        for content in [
            r#"onerror="stealCookies()""#,
            r"onload='init()'",
            "onclick=doEvil(1)",
        ] {
            let result = sanitizer().sanitize(content);
            assert!(result.is_err(), "should reject: {content}");
        }
    }

    #[test]
    fn test_rejects_css_attacks() {
        for content in [
            "width: expression(alert(1))",
            "background: url (evil)",
            "@import 'evil.css'",
            "style { color: red }",
        ] {
            let result = sanitizer().sanitize(content);
            assert!(result.is_err(), "should reject: {content}");
        }
    }

    #[test]
    fn test_rejects_unicode_escape() {
        let result = sanitizer().sanitize(r"payload \u003cb\u003e");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_document_references() {
        for content in [
            "document.location = 'x'",
            "document . cookie",
            "document.write(x)",
        ] {
            let result = sanitizer().sanitize(content);
            assert!(result.is_err(), "should reject: {content}");
        }
    }

    #[test]
    fn test_rejects_html_comments() {
        let result = sanitizer().sanitize("before <!-- hidden payload --> after");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_risky_tag_with_risky_token() {
        let result = sanitizer().sanitize(r#"<img src="x" onerror="y">"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_risky_tag_alone_is_allowed() {
        // A bare tag without any risky attribute token passes the
        // co-occurrence rule.
        let result = sanitizer().sanitize("<iframe>");
        assert!(result.is_ok());
    }

    #[test]
    fn test_risky_token_alone_is_allowed() {
        let result = sanitizer().sanitize("the onload phase of the rollout");
        assert!(result.is_ok());
    }

    #[test]
    fn test_escapes_reserved_characters() {
        let escaped = sanitizer().sanitize(r#"a < b & "c" is 'd'"#).unwrap();
        assert_eq!(escaped, "a &lt; b &amp; &quot;c&quot; is &#x27;d&#x27;");
    }

    #[test]
    fn test_safe_content_passes_unchanged() {
        let escaped = sanitizer()
            .sanitize("Maintenance window on Friday at 22:00 UTC.")
            .unwrap();
        assert_eq!(escaped, "Maintenance window on Friday at 22:00 UTC.");
    }

    #[test]
    fn test_idempotent_on_plain_output() {
        let s = sanitizer();
        let once = s.sanitize("Scheduled downtime notice for all tenants").unwrap();
        let twice = s.sanitize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_partial_sanitation() {
        // A rejection returns an error; it never returns stripped content.
        let result = sanitizer().sanitize("fine text <script>bad</script> fine text");
        assert!(result.is_err());
    }
}
