use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::core::errors::{KeyferryError, Result};

/// Escape everything outside the URL "unreserved" set `[A-Za-z0-9._~-]`.
const IDENTIFIER_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode an untrusted identifier for use as a URL path segment.
///
/// Total over all inputs; emits uppercase hex escapes.
pub fn encode_identifier(identifier: &str) -> String {
    utf8_percent_encode(identifier, IDENTIFIER_ESCAPE).to_string()
}

/// A validated keyserver URL template with exactly one `%s` placeholder.
#[derive(Debug, Clone)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if template.is_empty() {
            return Err(KeyferryError::InvalidTemplate {
                detail: "template is empty".into(),
            });
        }
        match template.matches("%s").count() {
            1 => Ok(Self(template)),
            n => Err(KeyferryError::InvalidTemplate {
                detail: format!("expected one %s placeholder, found {n}"),
            }),
        }
    }

    /// Substitute the percent-encoded identifier, never the raw one.
    pub fn resolve(&self, identifier: &str) -> String {
        self.0.replace("%s", &encode_identifier(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(encode_identifier("Alice-01._~"), "Alice-01._~");
    }

    #[test]
    fn reserved_characters_are_escaped_uppercase() {
        assert_eq!(encode_identifier("a b/c%"), "a%20b%2Fc%25");
        assert_eq!(encode_identifier("ü"), "%C3%BC");
    }

    #[test]
    fn encoded_output_stays_in_safe_alphabet() {
        let encoded = encode_identifier("weird !@#$^&*()\n\t{}[]|\\\"'<>?");
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "%._~-".contains(c))
        );
    }

    #[test]
    fn template_rejects_empty() {
        assert!(UrlTemplate::new("").is_err());
    }

    #[test]
    fn template_rejects_missing_placeholder() {
        assert!(UrlTemplate::new("https://example.com/keys").is_err());
    }

    #[test]
    fn template_rejects_multiple_placeholders() {
        assert!(UrlTemplate::new("https://%s.example.com/%s").is_err());
    }

    #[test]
    fn resolve_substitutes_encoded_identifier() {
        let template = UrlTemplate::new("https://keys.example.com/%s/ssh").unwrap();
        assert_eq!(
            template.resolve("a b"),
            "https://keys.example.com/a%20b/ssh"
        );
    }
}
