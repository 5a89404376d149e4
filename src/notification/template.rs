//! Localized notification message templates.
//!
//! Templates use `{placeholder}` substitution with the service name, post
//! title and sanitized contents. Built-in templates cover `en`, `ja` and
//! `ko`; unknown locales fall back to the configured default.

use std::collections::HashMap;

/// Subject line template, shared across locales.
const SUBJECT_TEMPLATE: &str = "[{service_name}] {title}";

const BODY_EN: &str = r#"<html>
<body>
  <p>A new notice has been posted on {service_name}.</p>
  <h2>{title}</h2>
  <div>{contents}</div>
  <p>This mail was sent automatically by {service_name}.</p>
</body>
</html>"#;

const BODY_JA: &str = r#"<html>
<body>
  <p>{service_name} に新しいお知らせが投稿されました。</p>
  <h2>{title}</h2>
  <div>{contents}</div>
  <p>このメールは {service_name} から自動送信されています。</p>
</body>
</html>"#;

const BODY_KO: &str = r#"<html>
<body>
  <p>{service_name}에 새로운 공지사항이 등록되었습니다.</p>
  <h2>{title}</h2>
  <div>{contents}</div>
  <p>이 메일은 {service_name}에서 자동 발송되었습니다.</p>
</body>
</html>"#;

/// A rendered subject and body ready for the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Message subject.
    pub subject: String,
    /// Message body (HTML).
    pub body: String,
}

/// One locale's template pair.
#[derive(Debug, Clone)]
struct NoticeTemplate {
    subject: String,
    body: String,
}

/// Registry of per-locale notification templates.
///
/// Constructed once at process start and handed to the dispatcher; no
/// module-level template state.
#[derive(Debug, Clone)]
pub struct MessageTemplates {
    templates: HashMap<String, NoticeTemplate>,
    default_locale: String,
}

impl MessageTemplates {
    /// Create the registry with built-in templates.
    ///
    /// `default_locale` is used for locales with no registered template;
    /// if it is unknown itself, rendering falls back to `en`.
    pub fn builtin(default_locale: impl Into<String>) -> Self {
        let mut templates = HashMap::new();
        for (locale, body) in [("en", BODY_EN), ("ja", BODY_JA), ("ko", BODY_KO)] {
            templates.insert(
                locale.to_string(),
                NoticeTemplate {
                    subject: SUBJECT_TEMPLATE.to_string(),
                    body: body.to_string(),
                },
            );
        }
        Self {
            templates,
            default_locale: default_locale.into(),
        }
    }

    /// Register or replace a locale's templates.
    pub fn register(
        &mut self,
        locale: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) {
        self.templates.insert(
            locale.into(),
            NoticeTemplate {
                subject: subject.into(),
                body: body.into(),
            },
        );
    }

    /// Locales with a registered template.
    pub fn locales(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Render a message for the given locale.
    pub fn render(
        &self,
        locale: &str,
        service_name: &str,
        title: &str,
        contents: &str,
    ) -> RenderedMessage {
        let template = self
            .templates
            .get(locale)
            .or_else(|| self.templates.get(&self.default_locale))
            .or_else(|| self.templates.get("en"))
            .cloned()
            .unwrap_or(NoticeTemplate {
                subject: SUBJECT_TEMPLATE.to_string(),
                body: BODY_EN.to_string(),
            });

        RenderedMessage {
            subject: substitute(&template.subject, service_name, title, contents),
            body: substitute(&template.body, service_name, title, contents),
        }
    }
}

/// Replace the known placeholders in a template string.
fn substitute(template: &str, service_name: &str, title: &str, contents: &str) -> String {
    template
        .replace("{service_name}", service_name)
        .replace("{title}", title)
        .replace("{contents}", contents)
}
