//! Template name validation.

use crate::error::{BrickError, Result};

/// Check that `name` matches `[A-Za-z0-9_-]+`.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(BrickError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_names() {
        for name in ["demo", "react-button", "ui_kit", "v2", "A-b_C-9"] {
            assert!(validate_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty_and_punctuation() {
        for name in ["", "has space", "dot.name", "slash/name", "../up", "ünicode"] {
            assert!(
                matches!(validate_name(name), Err(BrickError::InvalidName { .. })),
                "{name:?} should be invalid"
            );
        }
    }
}
