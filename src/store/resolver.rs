//! Name-or-index template selection.
//!
//! Commands accept either a template name or its 1-based position in
//! `brick list`. The raw argument is parsed once into a [`Selector`] and
//! resolved against the registry into a canonical name; nothing downstream
//! re-interprets strings.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use super::registry::Registry;
use crate::error::{BrickError, Result};

/// A user-supplied template reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A literal template name.
    ByName(String),
    /// A 1-based list position. The literal is kept so that a template
    /// actually named e.g. `"42"` is still reachable when 42 is out of range.
    ByIndex { position: NonZeroUsize, literal: String },
}

impl Selector {
    /// Parse a CLI argument. Positive integers become [`Selector::ByIndex`].
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<NonZeroUsize>() {
            Ok(position) => Self::ByIndex {
                position,
                literal: trimmed.to_string(),
            },
            Err(_) => Self::ByName(trimmed.to_string()),
        }
    }

    /// Resolve to a canonical registered name.
    pub fn resolve(&self, registry: &Registry) -> Result<String> {
        match self {
            Self::ByName(name) => {
                if registry.contains(name) {
                    Ok(name.clone())
                } else {
                    Err(BrickError::not_found(name))
                }
            }
            Self::ByIndex { position, literal } => {
                if let Some(name) = registry.name_at(position.get() - 1) {
                    return Ok(name.to_string());
                }
                if registry.contains(literal) {
                    return Ok(literal.clone());
                }
                Err(BrickError::not_found(literal))
            }
        }
    }
}

impl FromStr for Selector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "{}", name),
            Self::ByIndex { literal, .. } => write!(f, "{}", literal),
        }
    }
}
