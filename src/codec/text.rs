//! Real and string codecs

use super::Encoded;
use crate::error::ValueError;

pub const REAL_TAG: char = 'r';
pub const STRING_TAG: char = 's';

/// Real values pass through as text without numeric validation.
///
/// The text must still be a single token, since the body line is split on
/// whitespace to find the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RealCodec;

impl RealCodec {
    pub fn encode(&self, value: &str) -> Result<String, ValueError> {
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(ValueError::NotAToken {
                value: value.to_string(),
            });
        }
        Ok(format!("{}{}", REAL_TAG, value))
    }

    pub fn decode(&self, token: &str) -> Result<String, ValueError> {
        let text = super::strip_tag(token, REAL_TAG, "real")?;
        if text.is_empty() {
            return Err(ValueError::Malformed {
                kind: "real",
                token: token.to_string(),
            });
        }
        Ok(text.to_string())
    }
}

/// String values with whitespace and backslashes escaped as three-digit
/// octal (`\040`, `\134`).
///
/// Remembers whether the last encoded value was empty so that repeated
/// clears come back as [`Encoded::Duplicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringCodec {
    last_empty: bool,
}

impl StringCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, value: &str) -> Encoded {
        if value.is_empty() {
            if self.last_empty {
                return Encoded::Duplicate;
            }
            self.last_empty = true;
        } else {
            self.last_empty = false;
        }
        Encoded::Token(format!("{}{}", STRING_TAG, escape(value)))
    }

    pub fn decode(&self, token: &str) -> Result<String, ValueError> {
        let text = super::strip_tag(token, STRING_TAG, "string")?;
        Ok(unescape(text))
    }
}

/// Escape characters that would split a body line, plus the escape character itself
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ' ' | '\t' | '\n' | '\r' | '\\' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// Undo `\ooo` octal escapes; other backslashes are kept literally
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let octal = after
            .get(..3)
            .filter(|d| d.bytes().all(|b| (b'0'..=b'7').contains(&b)))
            .and_then(|d| u32::from_str_radix(d, 8).ok())
            .and_then(char::from_u32);
        match octal {
            Some(c) => {
                out.push(c);
                rest = &after[3..];
            }
            None => {
                out.push('\\');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_real_passthrough() {
        let codec = RealCodec;
        assert_eq!(codec.encode("-3.4").unwrap(), "r-3.4");
        assert_eq!(codec.encode("NaN").unwrap(), "rNaN");
        assert_eq!(codec.decode("r1.25").unwrap(), "1.25");
        assert!(codec.decode("r").is_err());
    }

    #[test]
    fn test_real_rejects_split_tokens() {
        let codec = RealCodec;
        for bad in ["", "2.5 !", "1.0\t", " 3", "not a number"] {
            assert_eq!(
                codec.encode(bad),
                Err(ValueError::NotAToken {
                    value: bad.to_string()
                }),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_empty_string_suppressed() {
        let mut codec = StringCodec::new();
        assert_eq!(codec.encode(""), Encoded::Token("s".into()));
        assert_eq!(codec.encode(""), Encoded::Duplicate);
        assert_eq!(codec.encode(""), Encoded::Duplicate);
    }

    #[test]
    fn test_empty_transition_not_suppressed() {
        let mut codec = StringCodec::new();
        assert!(matches!(codec.encode(""), Encoded::Token(_)));
        assert!(matches!(codec.encode("x"), Encoded::Token(_)));
        assert!(matches!(codec.encode(""), Encoded::Token(_)));
    }

    #[test]
    fn test_repeated_non_empty_not_suppressed() {
        let mut codec = StringCodec::new();
        assert!(matches!(codec.encode("a"), Encoded::Token(_)));
        assert!(matches!(codec.encode("a"), Encoded::Token(_)));
    }

    #[test]
    fn test_escape() {
        let mut codec = StringCodec::new();
        assert_eq!(
            codec.encode("String command"),
            Encoded::Token("sString\\040command".into())
        );
        assert_eq!(codec.encode("a\tb"), Encoded::Token("sa\\011b".into()));
        assert_eq!(
            codec.encode(r"C:\040dir"),
            Encoded::Token(r"sC:\134040dir".into())
        );
    }

    #[test]
    fn test_backslash_text_round_trips() {
        let mut codec = StringCodec::new();
        for text in [r"C:\040dir", r"a\b", "\\", r"end\"] {
            let token = match codec.encode(text) {
                Encoded::Token(t) => t,
                Encoded::Duplicate => unreachable!("non-empty text is never a duplicate"),
            };
            assert_eq!(codec.decode(&token).unwrap(), text);
        }
    }

    #[test]
    fn test_unescape_keeps_stray_backslash() {
        assert_eq!(unescape("a\\040b"), "a b");
        assert_eq!(unescape("c:\\path"), "c:\\path");
        assert_eq!(unescape("end\\"), "end\\");
        assert_eq!(unescape("\\04"), "\\04");
    }

    proptest! {
        #[test]
        fn test_string_roundtrip(s in r"[a-zA-Z0-9 _.:\\\t-]{0,40}") {
            let mut codec = StringCodec::new();
            let token = match codec.encode(&s) {
                Encoded::Token(t) => t,
                Encoded::Duplicate => unreachable!("first encode is never a duplicate"),
            };
            prop_assert!(!token.contains(char::is_whitespace));
            prop_assert_eq!(codec.decode(&token).unwrap(), s);
        }
    }
}
