//! Stream name validation and identifier derivation.
//!
//! Stream names are user-authored and seed the logical identifiers of every
//! resource emitted for the stream, so they are checked once here before any
//! resource is built.

/// Error constants for validation failures.
pub mod errmsg {
    pub const NAME_MISSING: &str = "stream name is required";
    pub const NAME_EMPTY: &str = "stream name cannot be empty";
    pub const CLEAN_NAME_INVALID_START: &str =
        "derived identifier must start with an uppercase letter";
    pub const CLEAN_NAME_INVALID_CHARS: &str =
        "derived identifier contains invalid characters (allowed: A-Z, a-z, 0-9)";
}

/// Validation failures for stream names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", errmsg::NAME_MISSING)]
    NameMissing,

    #[error("{}", errmsg::NAME_EMPTY)]
    NameEmpty,

    #[error("{reason}: '{name}' derives '{clean_name}'")]
    InvalidIdentifier {
        name: String,
        clean_name: String,
        reason: &'static str,
    },
}

/// Derive the identifier fragment for a stream name.
///
/// A hyphen, underscore or period directly followed by a letter is dropped
/// and the letter uppercased; finally the first character is uppercased.
/// Separators not followed by a letter are kept as-is.
///
/// `my-cool.stream` becomes `MyCoolStream`.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if matches!(ch, '-' | '_' | '.') {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_alphabetic) {
                chars.next();
                out.push(next.to_ascii_uppercase());
                continue;
            }
        }
        out.push(ch);
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validate a stream name and return its derived identifier fragment.
///
/// Rules:
/// - Must be present and non-empty
/// - The derived identifier must start with an uppercase ASCII letter
/// - The derived identifier may contain only ASCII letters and digits
pub fn validate_stream_name(name: Option<&str>) -> Result<String, ValidationError> {
    let name = name.ok_or(ValidationError::NameMissing)?;
    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }

    let clean_name = sanitize_name(name);
    let invalid = |reason| ValidationError::InvalidIdentifier {
        name: name.to_string(),
        clean_name: clean_name.clone(),
        reason,
    };

    if !clean_name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err(invalid(errmsg::CLEAN_NAME_INVALID_START));
    }
    if !clean_name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid(errmsg::CLEAN_NAME_INVALID_CHARS));
    }

    Ok(clean_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sanitize {
        use super::*;

        #[test]
        fn test_separators_are_collapsed() {
            assert_eq!(sanitize_name("my-cool.stream"), "MyCoolStream");
            assert_eq!(sanitize_name("click_events"), "ClickEvents");
            assert_eq!(sanitize_name("a.b-c_d"), "ABCD");
        }

        #[test]
        fn test_already_capitalized_segment() {
            assert_eq!(sanitize_name("already-Clean"), "AlreadyClean");
        }

        #[test]
        fn test_single_word_only_first_char_changes() {
            assert_eq!(sanitize_name("test"), "Test");
            assert_eq!(sanitize_name("Test"), "Test");
            assert_eq!(sanitize_name("tEST"), "TEST");
        }

        #[test]
        fn test_separator_before_non_letter_is_kept() {
            assert_eq!(sanitize_name("stream-1"), "Stream-1");
            assert_eq!(sanitize_name("trailing-"), "Trailing-");
            assert_eq!(sanitize_name("a--b"), "A-B");
        }

        #[test]
        fn test_leading_separator() {
            assert_eq!(sanitize_name("-events"), "Events");
            assert_eq!(sanitize_name("_x"), "X");
        }

        #[test]
        fn test_empty() {
            assert_eq!(sanitize_name(""), "");
        }
    }

    mod stream_name {
        use super::*;

        #[test]
        fn test_valid_names() {
            assert_eq!(validate_stream_name(Some("Test")).as_deref(), Ok("Test"));
            assert_eq!(
                validate_stream_name(Some("my-cool.stream")).as_deref(),
                Ok("MyCoolStream")
            );
            assert_eq!(
                validate_stream_name(Some("events2024")).as_deref(),
                Ok("Events2024")
            );
        }

        #[test]
        fn test_missing_name() {
            assert_eq!(validate_stream_name(None), Err(ValidationError::NameMissing));
        }

        #[test]
        fn test_empty_name() {
            assert_eq!(validate_stream_name(Some("")), Err(ValidationError::NameEmpty));
        }

        #[test]
        fn test_invalid_start() {
            let err = validate_stream_name(Some("1stream")).unwrap_err();
            assert!(err.to_string().contains("must start with an uppercase letter"));
        }

        #[test]
        fn test_invalid_chars() {
            for name in ["my stream", "stream-1", "a--b", "caf\u{e9}"] {
                let err = validate_stream_name(Some(name)).unwrap_err();
                assert!(
                    matches!(err, ValidationError::InvalidIdentifier { .. }),
                    "{name} should be rejected"
                );
            }
        }
    }
}
