//! Phrase list loading.
//!
//! The input is a JSON array of strings. Order and duplicates are kept.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Default phrase list location, relative to the working directory.
pub const DEFAULT_PHRASES_PATH: &str = "phrases.json";

/// Decode a JSON array of strings.
///
/// # Errors
///
/// Returns [`Error::Json`] when the text is not an array of strings.
pub fn parse_phrases(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and decode the phrase list at `path`.
///
/// # Errors
///
/// Returns [`Error::Input`] naming the path when the file cannot be read or
/// does not decode to a list of strings.
pub async fn load_phrases(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::input(path, e.to_string()))?;

    let phrases = parse_phrases(&content).map_err(|e| match e {
        Error::Json(json) => Error::input(path, format!("expected a JSON list of strings: {json}")),
        other => other,
    })?;

    debug!(path = %path.display(), count = phrases.len(), "loaded phrases");
    Ok(phrases)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    mod parse {
        use super::*;

        #[test]
        fn keeps_order_and_duplicates() {
            let phrases = parse_phrases(r#"["G'day mate", "Hello!", "G'day mate"]"#).unwrap();
            assert_eq!(phrases, vec!["G'day mate", "Hello!", "G'day mate"]);
        }

        #[test]
        fn empty_list() {
            assert!(parse_phrases("[]").unwrap().is_empty());
        }

        #[test]
        fn rejects_object() {
            assert!(parse_phrases(r#"{"phrases": ["a"]}"#).is_err());
        }

        #[test]
        fn rejects_non_string_items() {
            assert!(parse_phrases(r#"["a", 1, null]"#).is_err());
        }

        #[test]
        fn unicode_survives() {
            let phrases = parse_phrases(r#"["Ça va?", "こんにちは"]"#).unwrap();
            assert_eq!(phrases[1], "こんにちは");
        }
    }

    mod load {
        use super::*;

        #[tokio::test]
        async fn reads_file() {
            let dir = TempDir::new().unwrap();
            let file = dir.child("phrases.json");
            file.write_str(r#"["one", "two"]"#).unwrap();

            let phrases = load_phrases(file.path()).await.unwrap();
            assert_eq!(phrases, vec!["one", "two"]);
        }

        #[tokio::test]
        async fn missing_file_is_input_error() {
            let dir = TempDir::new().unwrap();
            let err = load_phrases(dir.path().join("nope.json")).await.unwrap_err();
            assert!(matches!(err, Error::Input { .. }));
            assert!(err.to_string().contains("nope.json"));
        }

        #[tokio::test]
        async fn wrong_shape_is_input_error() {
            let dir = TempDir::new().unwrap();
            let file = dir.child("phrases.json");
            file.write_str(r#"{"not": "a list"}"#).unwrap();

            let err = load_phrases(file.path()).await.unwrap_err();
            assert!(matches!(err, Error::Input { .. }));
        }
    }
}
