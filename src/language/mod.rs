//! Language tags, the per-manual language catalog and `Accept-Language`
//! negotiation.

mod catalog;
mod matcher;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use catalog::available_languages;
pub use matcher::negotiate;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{tag}` is not a language tag: {reason}")]
pub struct LanguageError {
    pub tag: String,
    pub reason: String,
}

/// A well-formed BCP 47 language tag in canonical case (`en-US`,
/// `zh-Hant-TW`, `sr-Latn`).
///
/// The primary language subtag must be two or three letters, so directory
/// names like `assets` or `manufacturer` never parse as languages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn parse(input: &str) -> Result<Self, LanguageError> {
        let error = |reason: &str| LanguageError {
            tag: input.to_string(),
            reason: reason.to_string(),
        };

        let parsed = language_tags::LanguageTag::parse(input).map_err(|e| error(&e.to_string()))?;
        let primary = parsed.primary_language();
        if !(2..=3).contains(&primary.len()) || !primary.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(error("primary language must be 2 or 3 letters"));
        }

        Ok(Self(canonical_case(parsed.as_str())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageTag {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase language, titlecase script, uppercase region; everything after
/// a singleton (extensions, private use) lowercase.
fn canonical_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut after_singleton = false;

    for (i, subtag) in tag.split('-').enumerate() {
        if i > 0 {
            out.push('-');
        }
        let is_alpha = subtag.bytes().all(|b| b.is_ascii_alphabetic());
        let is_digit = subtag.bytes().all(|b| b.is_ascii_digit());

        if i == 0 || after_singleton {
            out.push_str(&subtag.to_ascii_lowercase());
        } else if subtag.len() == 1 {
            after_singleton = true;
            out.push_str(&subtag.to_ascii_lowercase());
        } else if subtag.len() == 4 && is_alpha {
            let (first, rest) = subtag.split_at(1);
            out.push_str(&first.to_ascii_uppercase());
            out.push_str(&rest.to_ascii_lowercase());
        } else if (subtag.len() == 2 && is_alpha) || (subtag.len() == 3 && is_digit) {
            out.push_str(&subtag.to_ascii_uppercase());
        } else {
            out.push_str(&subtag.to_ascii_lowercase());
        }
    }
    out
}
