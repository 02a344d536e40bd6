//! Emoji tokenization for text columns.
//!
//! Emoji scalars are rewritten as `{U+XXXX}` tokens before text reaches the
//! database and restored on the way out. A literal `{U+` in the input is
//! escaped as `{U+7B}U+`, so [`detokenize`] is an exact inverse of
//! [`tokenize`] for every input.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Escape emitted for a literal `{U+` prefix (`{` is U+007B).
const ESCAPED_PREFIX: &str = "{U+7B}U+";

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\{U\+|[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{200D}\x{FE0F}\x{20E3}]",
    )
    .expect("emoji pattern is valid")
});

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{U\+([0-9A-F]{1,6})\}").expect("token pattern is valid")
});

/// Replace every emoji scalar in `text` with a `{U+XXXX}` token.
#[must_use]
pub fn tokenize(text: &str) -> Cow<'_, str> {
    EMOJI_RE.replace_all(text, |caps: &Captures<'_>| {
        let matched = &caps[0];
        if matched == "{U+" {
            return ESCAPED_PREFIX.to_string();
        }
        matched
            .chars()
            .map(|c| format!("{{U+{:X}}}", u32::from(c)))
            .collect::<String>()
    })
}

/// Restore emoji scalars from `{U+XXXX}` tokens.
///
/// Tokens that do not name a valid scalar value are left as they are.
#[must_use]
pub fn detokenize(text: &str) -> Cow<'_, str> {
    TOKEN_RE.replace_all(text, |caps: &Captures<'_>| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    })
}

/// Whether `text` contains any character that [`tokenize`] would rewrite.
#[must_use]
pub fn contains_emoji(text: &str) -> bool {
    EMOJI_RE.find_iter(text).any(|m| m.as_str() != "{U+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_single_emoji() {
        assert_eq!(tokenize("Hello 😁"), "Hello {U+1F601}");
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let text = "no emoji here, just {braces} and U+ signs";
        assert!(matches!(tokenize(text), Cow::Borrowed(_)));
        assert!(!contains_emoji(text));
    }

    #[test]
    fn test_zwj_sequence_round_trip() {
        let family = "👨\u{200D}👩\u{200D}👧 at the lake 🏞\u{FE0F}";
        let stored = tokenize(family);
        assert!(!contains_emoji(&stored));
        assert!(stored.is_ascii());
        assert_eq!(detokenize(&stored), family);
    }

    #[test]
    fn test_skin_tone_and_flags_round_trip() {
        let text = "👍🏽 🇺🇸 #️⃣";
        assert_eq!(detokenize(&tokenize(text)), text);
    }

    #[test]
    fn test_literal_token_text_survives() {
        let text = "already looks like {U+1F601} and {U+7B}";
        let stored = tokenize(text);
        assert_eq!(
            stored,
            "already looks like {U+7B}U+1F601} and {U+7B}U+7B}"
        );
        assert_eq!(detokenize(&stored), text);
    }

    #[test]
    fn test_invalid_token_left_verbatim() {
        assert_eq!(detokenize("{U+D800} {U+FFFFFF}"), "{U+D800} {U+FFFFFF}");
    }

    #[test]
    fn test_non_emoji_unicode_untouched() {
        let text = "café – 東京";
        assert_eq!(tokenize(text), text);
    }
}
