use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_MESSAGE_LENGTH: usize = 255;

#[derive(sqlx::FromRow, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password: String,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub posted_at: i64,
}

/// Account body as sent by clients to `/register` and `/login`.
///
/// Every field is optional so that a missing value reaches the validation
/// rules instead of failing deserialization.
#[derive(Deserialize, Validate, Clone, Debug)]
#[must_use]
pub struct AccountPayload {
    #[validate(required)]
    pub username: Option<String>,
    #[validate(required, custom(function = "password_length"))]
    pub password: Option<String>,
}

/// Message body for creation and updates. Updates only read `message_text`.
#[derive(Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct MessagePayload {
    pub posted_by: Option<i64>,
    #[validate(required, custom(function = "message_text_length"))]
    pub message_text: Option<String>,
    pub posted_at: Option<i64>,
}

/// Lengths are counted in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane counts twice.
fn utf16_length(value: &str) -> usize {
    value.encode_utf16().count()
}

fn password_length(password: &str) -> Result<(), ValidationError> {
    if utf16_length(password) < MIN_PASSWORD_LENGTH {
        let message = format!("must be at least {MIN_PASSWORD_LENGTH} characters long");
        return Err(ValidationError::new("length").with_message(Cow::Owned(message)));
    }
    Ok(())
}

fn message_text_length(message_text: &str) -> Result<(), ValidationError> {
    if utf16_length(message_text) > MAX_MESSAGE_LENGTH {
        let message = format!("must be at most {MAX_MESSAGE_LENGTH} characters long");
        return Err(ValidationError::new("length").with_message(Cow::Owned(message)));
    }
    Ok(())
}

/// Whitespace as understood by the account and message rules: the ASCII
/// controls `\t`..`\r` and `\x1c`..`\x1f`, plus the Unicode space, line and
/// paragraph separators except the no-break spaces.
const fn is_blank_char(c: char) -> bool {
    matches!(
        c,
        '\t'..='\r'
            | '\u{1c}'..='\u{20}'
            | '\u{1680}'
            | '\u{2000}'..='\u{2006}'
            | '\u{2008}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{205f}'
            | '\u{3000}'
    )
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.chars().all(is_blank_char))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> MessagePayload {
        MessagePayload {
            posted_by: Some(1),
            message_text: Some(text.to_owned()),
            posted_at: None,
        }
    }

    #[test]
    fn blank_covers_separators_but_not_no_break_spaces() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\n\r\u{b}\u{c}")));
        assert!(is_blank(Some("\u{1c}\u{1d}\u{1e}\u{1f}")));
        assert!(is_blank(Some("\u{2003}\u{2028}\u{3000}")));

        assert!(!is_blank(Some("\u{a0}")));
        assert!(!is_blank(Some("\u{2007}")));
        assert!(!is_blank(Some("\u{202f}")));
        assert!(!is_blank(Some("\u{85}")));
        assert!(!is_blank(Some("  x  ")));
    }

    #[test]
    fn message_text_length_counts_utf16_units() {
        assert!(message(&"a".repeat(255)).validate().is_ok());
        assert!(message(&"a".repeat(256)).validate().is_err());

        // Each emoji is a surrogate pair.
        assert!(message(&"\u{1f600}".repeat(127)).validate().is_ok());
        assert!(message(&"\u{1f600}".repeat(128)).validate().is_err());
        assert!(message(&"\u{1f600}".repeat(200)).validate().is_err());
    }

    #[test]
    fn password_length_counts_utf16_units() {
        let credentials = |password: &str| AccountPayload {
            username: Some("user".to_owned()),
            password: Some(password.to_owned()),
        };
        assert!(credentials("abcd").validate().is_ok());
        assert!(credentials("abc").validate().is_err());
        assert!(credentials("\u{1f600}\u{1f600}").validate().is_ok());
        assert!(credentials("\u{1f600}a").validate().is_err());
    }
}
