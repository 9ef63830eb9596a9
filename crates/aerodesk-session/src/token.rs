//! Access token shape check
//!
//! Only the structure is checked: three non-empty segments separated by
//! exactly two dots. Signatures are the backend's business.

use std::fmt;

pub fn is_well_formed(token: &str) -> bool {
    let mut segments = 0;
    for part in token.split('.') {
        if part.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}

/// A bearer token that passed the shape check
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if is_well_formed(&raw) {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed("header.payload.signature"));
        assert!(is_well_formed("a.b.c"));
    }

    #[test]
    fn test_malformed() {
        for token in [
            "",
            "abc",
            "a.b",
            "a.b.c.d",
            "a..c",
            ".b.c",
            "a.b.",
            "..",
            "a.b.c.",
        ] {
            assert!(!is_well_formed(token), "accepted {:?}", token);
            assert!(AccessToken::parse(token).is_none());
        }
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::parse("secret.jwt.value").unwrap();
        assert_eq!(token.as_str(), "secret.jwt.value");
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
