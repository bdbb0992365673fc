//! Contact extraction from résumé text, used to prefill application forms.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("email pattern is a valid regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\+?\d[\d\s-]{8,}\d").expect("phone pattern is a valid regex"))
}

/// Name is the first line; email and phone are the first pattern match.
/// Missing fields are empty strings.
pub fn extract_contact(text: &str) -> ContactInfo {
    let first_match = |pattern: &Regex| {
        pattern
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    ContactInfo {
        name: text.lines().next().unwrap_or_default().trim().to_string(),
        email: first_match(email_pattern()),
        phone: first_match(phone_pattern()),
    }
}
