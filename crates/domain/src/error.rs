//! Unified error types for the domain layer
//!
//! `DomainError` covers lookups and string-to-type parsing. Rule violations
//! raised while editing a character live in
//! [`crate::character_sheet::ConstraintViolation`].

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for CharacterClass {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "rogue" => Ok(Self::Rogue),
    ///             _ => Err(DomainError::parse(format!("Unknown class: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Character", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Character"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown class: Gunslinger");
        assert_eq!(err.to_string(), "Parse error: Unknown class: Gunslinger");
    }
}
