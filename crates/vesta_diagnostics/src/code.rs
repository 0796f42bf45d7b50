//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of problem a diagnostic code describes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Compilation errors, prefixed with `E`.
    Error,
    /// Compilation warnings, prefixed with `W`.
    Warning,
    /// Dependency hygiene findings, prefixed with `D`.
    Dependency,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Dependency => 'D',
        }
    }
}

/// A category prefix plus a number, displayed as `D001`, `E102` and so on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Dependency.prefix(), 'D');
    }

    #[test]
    fn display_pads_number() {
        assert_eq!(DiagnosticCode::new(Category::Dependency, 1).to_string(), "D001");
        assert_eq!(DiagnosticCode::new(Category::Error, 2322).to_string(), "E2322");
        assert_eq!(DiagnosticCode::new(Category::Warning, 42).to_string(), "W042");
    }
}
