//! Output filename derivation.
//!
//! A phrase maps to a filename by dropping everything except word
//! characters, whitespace and hyphens, turning whitespace runs into single
//! underscores, lowercasing, and appending `.wav`. The mapping is not
//! injective: `"Hello!"` and `"Hello?"` both become `hello.wav`.

use std::sync::LazyLock;

use regex::Regex;

/// Extension appended to every derived filename.
pub const EXTENSION: &str = ".wav";

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid punctuation pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Derive the output filename for a phrase.
///
/// A phrase made only of punctuation yields just the extension (`".wav"`).
#[must_use]
pub fn derive_filename(phrase: &str) -> String {
    let stripped = PUNCTUATION.replace_all(phrase, "");
    let joined = WHITESPACE.replace_all(&stripped, "_");
    let mut name = joined.to_lowercase();
    name.push_str(EXTENSION);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(derive_filename("hello   world"), "hello_world.wav");
        assert_eq!(derive_filename("hello world"), "hello_world.wav");
        assert_eq!(derive_filename("tab\tand\nnewline"), "tab_and_newline.wav");
    }

    #[test]
    fn removes_punctuation_keeps_hyphens() {
        assert_eq!(derive_filename("G'day, mate!"), "gday_mate.wav");
        assert_eq!(derive_filename("Well-done, mate."), "well-done_mate.wav");
    }

    #[test]
    fn keeps_underscores_and_digits() {
        assert_eq!(derive_filename("Room_42 is open"), "room_42_is_open.wav");
    }

    #[test]
    fn degenerate_phrase_is_extension_only() {
        assert_eq!(derive_filename("..."), ".wav");
        assert_eq!(derive_filename(""), ".wav");
    }

    #[test]
    fn edge_whitespace_becomes_underscores() {
        assert_eq!(derive_filename("  hi  "), "_hi_.wav");
    }

    #[test]
    fn collision_is_possible() {
        assert_eq!(derive_filename("Hello!"), derive_filename("Hello?"));
        assert_eq!(derive_filename("Hello!"), "hello.wav");
    }

    #[test]
    fn deterministic() {
        for phrase in ["G'day mate", "No worries!", "  spaced  out  ", "¿Qué tal?"] {
            assert_eq!(derive_filename(phrase), derive_filename(phrase));
        }
    }

    #[test]
    fn output_alphabet() {
        let phrases = [
            "G'day mate",
            "Crikey! That's a big one...",
            "Fair dinkum -- really?",
            "UPPER lower MiXeD",
            "tabs\tand\r\nbreaks",
            "emoji 🦘 kangaroo",
        ];
        for phrase in phrases {
            let name = derive_filename(phrase);
            let stem = name.strip_suffix(EXTENSION).unwrap_or_default();
            assert!(name.ends_with(EXTENSION));
            assert!(
                stem.chars()
                    .all(|c| c == '_' || c == '-' || (c.is_alphanumeric() && !c.is_uppercase())),
                "unexpected character in {name:?}"
            );
        }
    }

    #[test]
    fn unicode_word_characters_survive() {
        assert_eq!(derive_filename("Ça va?"), "ça_va.wav");
    }
}
