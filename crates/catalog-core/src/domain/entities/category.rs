//! Category entity.

use crate::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category, identified externally by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Unique name.
    pub name: String,
}

impl Category {
    /// Maximum length of a category name.
    pub const MAX_NAME_LEN: usize = 100;

    /// Name reserved for "no category filter" in listing queries and keys.
    pub const ALL: &'static str = "all";

    /// Creates a new category with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
        }
    }

    /// Returns true if `name` is the reserved listing wildcard.
    #[must_use]
    pub fn is_reserved_name(name: &str) -> bool {
        name == Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Books");
        assert_eq!(category.name, "Books");
    }

    #[test]
    fn test_reserved_name() {
        assert!(Category::is_reserved_name("all"));
        assert!(!Category::is_reserved_name("All Books"));
        assert!(!Category::is_reserved_name("Books"));
    }
}
