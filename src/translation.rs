//! Human-readable messages.
//!
//! Messages are looked up by key and may contain `:name` style placeholders
//! that are filled in from the parameters.

use std::collections::HashMap;

/// Turns a message key and its parameters into text for the user.
pub trait Translator {
    /// Build the message for `key`, substituting each `:param` with its value.
    ///
    /// Unknown keys are returned as-is.
    fn message(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// A catalogue of message templates for one locale.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    templates: HashMap<&'static str, &'static str>,
}

const ENGLISH: &[(&str, &str)] = &[
    (
        "messages.error.transfer_category",
        "The :name category is used for transfers and cannot be deleted.",
    ),
    (
        "messages.error.last_category",
        "Cannot delete the last :type category.",
    ),
    (
        "messages.warning.deleted",
        "You are not allowed to delete :name because it has :text related.",
    ),
    ("messages.success.deleted", ":type deleted successfully"),
    ("general.categories", "Categories"),
    ("general.income", "Income"),
    ("general.expense", "Expense"),
    ("general.item", "Item"),
    ("general.other", "Other"),
    ("general.incomes", "Incomes"),
    ("general.expenses", "Expenses"),
];

impl Translations {
    /// The English catalogue.
    pub fn english() -> Self {
        Self {
            templates: ENGLISH.iter().copied().collect(),
        }
    }
}

impl Translator for Translations {
    fn message(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.templates.get(key) else {
            tracing::debug!("no translation for {key}");
            return key.to_owned();
        };

        substitute(template, params)
    }
}

/// Replace every `:name` placeholder in `template` in a single pass.
///
/// At each `:` the longest matching parameter name wins, and substituted
/// values are never scanned again.
fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    let mut text = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(position) = rest.find(':') {
        text.push_str(&rest[..position]);
        let after_colon = &rest[position + 1..];

        let matched = params
            .iter()
            .filter(|(name, _)| !name.is_empty() && after_colon.starts_with(*name))
            .max_by_key(|(name, _)| name.len());

        match matched {
            Some((name, value)) => {
                text.push_str(value);
                rest = &after_colon[name.len()..];
            }
            None => {
                text.push(':');
                rest = after_colon;
            }
        }
    }

    text.push_str(rest);
    text
}

#[cfg(test)]
mod translations_tests {
    use super::{Translations, Translator};

    #[test]
    fn substitutes_parameters() {
        let translations = Translations::english();

        let message = translations.message(
            "messages.warning.deleted",
            &[("name", "Food"), ("text", "transactions")],
        );

        assert_eq!(
            message,
            "You are not allowed to delete Food because it has transactions related."
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let translations = Translations::english();

        assert_eq!(translations.message("general.nope", &[]), "general.nope");
    }

    #[test]
    fn longer_parameter_names_win() {
        let translations = Translations {
            templates: [("test", ":type and :type_plural")].into_iter().collect(),
        };

        let message = translations.message("test", &[("type", "bill"), ("type_plural", "bills")]);

        assert_eq!(message, "bill and bills");
    }

    #[test]
    fn substituted_values_are_not_substituted_again() {
        let translations = Translations::english();

        let message = translations.message(
            "messages.warning.deleted",
            &[("name", "Tax :text"), ("text", "transactions")],
        );

        assert_eq!(
            message,
            "You are not allowed to delete Tax :text because it has transactions related."
        );
    }

    #[test]
    fn colon_without_parameter_is_kept() {
        let translations = Translations {
            templates: [("test", "Ratio 1:2 for :name:")].into_iter().collect(),
        };

        let message = translations.message("test", &[("name", "Food")]);

        assert_eq!(message, "Ratio 1:2 for Food:");
    }
}
