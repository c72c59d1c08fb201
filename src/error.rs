//! Layout faults raised while decoding a registry extract.
//!
//! Both variants mean the document does not match the fixed layout the
//! parser targets. There is no repair path: callers abort the document.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The page banner did not carry the gush/plot tokens.
    #[error("banner line has {found} tokens, expected at least 4: {line:?}")]
    BannerOutOfRange { line: String, found: usize },

    /// A subplot's fixed-field row (area, floor, share) is missing or short.
    #[error("subplot {subplot:?}: fixed-field row has {found} tokens, expected at least {needed}: {line:?}")]
    FieldOutOfRange {
        subplot: String,
        line: Option<String>,
        found: usize,
        needed: usize,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Bounds-checked token access. Returns `None` past the end so each caller
/// can attach its own fault variant.
pub fn token<'a>(tokens: &[&'a str], index: usize) -> Option<&'a str> {
    tokens.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_in_and_out_of_range() {
        let tokens = vec!["a", "b"];
        assert_eq!(token(&tokens, 1), Some("b"));
        assert_eq!(token(&tokens, 2), None);
    }

    #[test]
    fn messages_name_the_offending_line() {
        let e = ParseError::BannerOutOfRange {
            line: "גוש 123".into(),
            found: 2,
        };
        assert!(e.to_string().contains("2 tokens"));
        assert!(e.to_string().contains("גוש 123"));
    }
}
