//! Type-token mini-language: `name`, `name[]`, `name?`, `name[]?`.
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// First group: base name. Second: array suffix. Third: optional suffix.
/// Word characters are ASCII only.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+)(\[\])?(\?)?$").expect("type token pattern compiles")
});

/// Base name that accepts every value.
pub const WILDCARD: &str = "any";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeToken<'a> {
    pub base: &'a str,
    pub array: bool,
    pub optional: bool,
}

impl<'a> TypeToken<'a> {
    /// `None` when the text is not a token at all. An unknown base name still
    /// parses; it just never matches a value.
    pub fn parse(src: &'a str) -> Option<Self> {
        let caps = TOKEN_PATTERN.captures(src)?;
        let base = caps.get(1)?.as_str();
        Some(Self {
            base,
            array: caps.get(2).is_some(),
            optional: caps.get(3).is_some(),
        })
    }

    /// The same token with the `?` suffix dropped.
    pub fn without_optional(&self) -> TypeToken<'a> {
        TypeToken { optional: false, ..*self }
    }

    /// The element token of an array token.
    pub fn element(&self) -> TypeToken<'a> {
        TypeToken { base: self.base, array: false, optional: false }
    }

    pub fn is_wildcard(&self) -> bool {
        self.base == WILDCARD
    }
}

impl fmt::Display for TypeToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base)?;
        if self.array {
            f.write_str("[]")?;
        }
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_suffix_combinations() {
        assert_eq!(
            TypeToken::parse("string"),
            Some(TypeToken { base: "string", array: false, optional: false })
        );
        assert_eq!(
            TypeToken::parse("number[]"),
            Some(TypeToken { base: "number", array: true, optional: false })
        );
        assert_eq!(
            TypeToken::parse("boolean?"),
            Some(TypeToken { base: "boolean", array: false, optional: true })
        );
        assert_eq!(
            TypeToken::parse("any[]?"),
            Some(TypeToken { base: "any", array: true, optional: true })
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for src in ["", ".", " ", "\n", "something invalid", "string?[]", "string[][]", "[]", "string??", "string\n", "strïng"] {
            assert_eq!(TypeToken::parse(src), None, "{src:?}");
        }
    }

    #[test]
    fn unknown_names_still_parse() {
        let token = TypeToken::parse("Date_2").unwrap();
        assert_eq!(token.base, "Date_2");
        assert!(!token.is_wildcard());
    }

    #[test]
    fn rewrites_render_back_to_tokens() {
        let token = TypeToken::parse("string[]?").unwrap();
        assert_eq!(token.to_string(), "string[]?");
        assert_eq!(token.without_optional().to_string(), "string[]");
        assert_eq!(token.without_optional().element().to_string(), "string");
    }
}
