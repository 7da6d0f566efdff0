//! Header keyword syntax

use regex::Regex;
use std::sync::OnceLock;

use crate::error::SchemaError;

/// Maximum keyword length for standard cards
pub const MAX_KEYWORD_LEN: usize = 8;

/// Maximum keyword length for cards marked as long
pub const MAX_LONG_KEYWORD_LEN: usize = 67;

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_-]*$").expect("static keyword pattern"))
}

fn card_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static name pattern"))
}

/// Check a keyword against the header keyword rules
pub fn check_keyword(keyword: &str, long: bool) -> Result<(), SchemaError> {
    if keyword.is_empty() {
        return Err(SchemaError::invalid_keyword(keyword, "keyword is empty"));
    }

    if !keyword_pattern().is_match(keyword) {
        return Err(SchemaError::invalid_keyword(
            keyword,
            "must start with an uppercase letter and contain only uppercase letters, digits, '_' or '-'",
        ));
    }

    let max = if long { MAX_LONG_KEYWORD_LEN } else { MAX_KEYWORD_LEN };
    let length = keyword.chars().count();
    if length > max {
        return Err(SchemaError::invalid_keyword(
            keyword,
            format!("{} characters exceeds the maximum of {}", length, max),
        ));
    }

    Ok(())
}

/// Check a card name, the identifier a keyword defaults from
pub fn check_card_name(name: &str) -> Result<(), SchemaError> {
    if card_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidCardName {
            name: name.to_string(),
            reason: "must be an identifier of letters, digits and '_'".to_string(),
        })
    }
}
