//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CompanyId, Error};

/// Database identifier for a category.
pub type CategoryId = i64;

/// What a category classifies.
///
/// Deletion rules are scoped by type, e.g. every company keeps at least one
/// top-level category of each type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Products and services that are sold or bought.
    Item,
    /// Anything else, e.g. transfers between accounts.
    Other,
}

impl CategoryType {
    /// The lowercase name used in the database and in translation keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
            CategoryType::Item => "item",
            CategoryType::Other => "other",
        }
    }
}

impl FromStr for CategoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            "item" => Ok(CategoryType::Item),
            "other" => Ok(CategoryType::Other),
            other => Err(Error::InvalidCategoryType(other.to_owned())),
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a company's category tree.
///
/// Sub-categories share the type of their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The company that owns the category.
    pub company_id: CompanyId,
    /// The display name.
    pub name: CategoryName,
    /// What the category classifies.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// The parent category, `None` for top-level categories.
    pub parent_id: Option<CategoryId>,
}

impl Category {
    /// Whether the category has no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The data needed to create a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The company that will own the category.
    pub company_id: CompanyId,
    /// The display name.
    pub name: CategoryName,
    /// What the category classifies.
    pub category_type: CategoryType,
    /// The parent category, `None` for a top-level category.
    pub parent_id: Option<CategoryId>,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let name = CategoryName::new("");

        assert_eq!(name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let name = CategoryName::new("\n\t \r");

        assert_eq!(name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = CategoryName::new("  Groceries ").unwrap();

        assert_eq!(name.as_ref(), "Groceries");
    }
}

#[cfg(test)]
mod category_type_tests {
    use std::str::FromStr;

    use crate::{Error, category::CategoryType};

    #[test]
    fn parses_display_output() {
        for category_type in [
            CategoryType::Income,
            CategoryType::Expense,
            CategoryType::Item,
            CategoryType::Other,
        ] {
            let parsed = CategoryType::from_str(&category_type.to_string());

            assert_eq!(parsed, Ok(category_type));
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let parsed = CategoryType::from_str("transfer");

        assert_eq!(parsed, Err(Error::InvalidCategoryType("transfer".to_owned())));
    }
}
