//! Input validation for user settings.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Too many entries in a list field.
    TooMany { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::TooMany { field, max, actual } => {
                write!(f, "{} has too many entries ({}, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for custom summarization instructions.
pub const MAX_INSTRUCTIONS_LENGTH: usize = 2000;

/// Maximum number of alert keywords or VIP IDs.
pub const MAX_LIST_ENTRIES: usize = 100;

/// Maximum length of a single keyword or VIP ID.
pub const MAX_ENTRY_LENGTH: usize = 64;

/// Validate custom summarization instructions.
pub fn validate_instructions(instructions: &str) -> Result<(), ValidationError> {
    let count = instructions.trim().chars().count();
    if count > MAX_INSTRUCTIONS_LENGTH {
        return Err(ValidationError::TooLong {
            field: "report_custom_instructions".to_string(),
            max: MAX_INSTRUCTIONS_LENGTH,
            actual: count,
        });
    }
    Ok(())
}

/// Validate a keyword or VIP list.
pub fn validate_list(field: &str, entries: &[String]) -> Result<(), ValidationError> {
    if entries.len() > MAX_LIST_ENTRIES {
        return Err(ValidationError::TooMany {
            field: field.to_string(),
            max: MAX_LIST_ENTRIES,
            actual: entries.len(),
        });
    }

    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(ValidationError::Empty(format!("{} entry", field)));
        }
        let count = entry.chars().count();
        if count > MAX_ENTRY_LENGTH {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_ENTRY_LENGTH,
                actual: count,
            });
        }
    }

    Ok(())
}

/// Trim entries and drop duplicates, keeping first occurrence order.
pub fn normalize_list(entries: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let trimmed = entry.trim();
        if !out.iter().any(|existing| existing == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}
