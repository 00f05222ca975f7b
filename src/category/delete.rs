//! Deleting a category together with its sub-categories.
//!
//! Sub-categories are deleted first, one at a time. A sub-category that
//! cannot be deleted does not stop its siblings from being deleted: the
//! failure is recorded as a warning and the walk continues. The category
//! itself is then re-read and validated, and is only deleted if nothing
//! depends on it any more.

use indexmap::IndexSet;
use serde::Serialize;

use crate::{
    CompanyId, Error,
    category::{Category, CategoryId, CategoryName, CategoryStore, CategoryType},
    events::{CategoryEvent, EventBus},
    reference::ReferenceKind,
    settings::{DefaultCategory, Settings},
    translation::Translator,
};

/// Why a category was not deleted.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DeletionError {
    /// The category is reserved for internal use, e.g. transfers.
    #[error("{message}")]
    ProtectedEntity {
        /// Text for the user.
        message: String,
    },

    /// The category is the last top-level category of its type.
    #[error("{message}")]
    LastOfType {
        /// The type that would be left without categories.
        category_type: CategoryType,
        /// Text for the user.
        message: String,
    },

    /// Other records still point at the category or its sub-categories.
    ///
    /// The user can fix this by removing the references and trying again.
    #[error("{message}")]
    ReferencedEntity {
        /// The kinds of records that block the deletion, without duplicates,
        /// in the order they were found.
        kinds: Vec<String>,
        /// Text for the user.
        message: String,
    },

    /// The store failed, e.g. the category no longer exists.
    #[error("could not delete category: {0}")]
    Store(#[from] Error),
}

/// A sub-category that was kept while its ancestor was being deleted.
#[derive(Debug, PartialEq)]
pub struct DeletionWarning {
    /// The ID of the sub-category that was kept.
    pub category_id: CategoryId,
    /// The name of the sub-category that was kept.
    pub category_name: CategoryName,
    /// Why it was kept.
    pub error: DeletionError,
}

impl DeletionWarning {
    /// Text for the user.
    pub fn message(&self) -> String {
        match &self.error {
            DeletionError::Store(error) => format!("{}: {error}", self.category_name),
            error => error.to_string(),
        }
    }
}

/// A flattened [DeletionWarning] for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningSummary {
    /// The ID of the sub-category that was kept.
    pub category_id: CategoryId,
    /// Why it was kept.
    pub message: String,
}

impl From<&DeletionWarning> for WarningSummary {
    fn from(warning: &DeletionWarning) -> Self {
        Self {
            category_id: warning.category_id,
            message: warning.message(),
        }
    }
}

/// The result of deleting a category tree.
#[derive(Debug, PartialEq)]
pub struct DeletionReport {
    /// Every category that was deleted, children before parents.
    pub deleted: Vec<Category>,
    /// The sub-categories that were kept, and why.
    pub warnings: Vec<DeletionWarning>,
    /// Whether the requested category itself was deleted.
    pub outcome: Result<(), DeletionError>,
}

impl DeletionReport {
    fn failed(error: DeletionError) -> Self {
        Self {
            deleted: Vec::new(),
            warnings: Vec::new(),
            outcome: Err(error),
        }
    }

    /// The number of categories that were deleted.
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Split the report into the outcome for the requested category and
    /// the warnings for its sub-categories.
    pub fn into_result(
        self,
    ) -> Result<Vec<DeletionWarning>, (DeletionError, Vec<DeletionWarning>)> {
        match self.outcome {
            Ok(()) => Ok(self.warnings),
            Err(error) => Err((error, self.warnings)),
        }
    }

    fn absorb(&mut self, child: &Category, report: DeletionReport) {
        self.deleted.extend(report.deleted);
        self.warnings.extend(report.warnings);

        if let Err(error) = report.outcome {
            tracing::warn!(
                "kept sub-category {} ({}) of category {}: {error}",
                child.id,
                child.name,
                child.parent_id.unwrap_or_default()
            );

            self.warnings.push(DeletionWarning {
                category_id: child.id,
                category_name: child.name.clone(),
                error,
            });
        }
    }
}

/// Deletes a category and, where possible, its sub-categories.
#[derive(Debug, Clone)]
pub struct DeleteCategory<S, C, E, T> {
    store: S,
    settings: C,
    events: E,
    translator: T,
    reference_kinds: &'static [ReferenceKind],
}

impl<S, C, E, T> DeleteCategory<S, C, E, T>
where
    S: CategoryStore,
    C: Settings,
    E: EventBus,
    T: Translator,
{
    /// Create the workflow. Every [ReferenceKind] is checked before deleting.
    pub fn new(store: S, settings: C, events: E, translator: T) -> Self {
        Self {
            store,
            settings,
            events,
            translator,
            reference_kinds: ReferenceKind::ALL,
        }
    }

    /// Check only `kinds` for references before deleting.
    pub fn with_reference_kinds(mut self, kinds: &'static [ReferenceKind]) -> Self {
        self.reference_kinds = kinds;
        self
    }

    /// Delete the category `category_id` of `company_id` and its sub-categories.
    ///
    /// Sub-categories that cannot be deleted are reported as warnings. The
    /// requested category is only deleted if all of its sub-categories were,
    /// and if no other record depends on it.
    pub fn delete(&self, company_id: CompanyId, category_id: CategoryId) -> DeletionReport {
        match self.store.find(company_id, category_id) {
            Ok(category) => self.delete_tree(&category),
            Err(error) => {
                tracing::debug!("could not find category {category_id} of company {company_id}");
                DeletionReport::failed(error.into())
            }
        }
    }

    fn delete_tree(&self, category: &Category) -> DeletionReport {
        tracing::debug!("deleting category {} ({})", category.id, category.name);

        // Snapshot the children, they are deleted while we iterate.
        let children = match self.store.children(category.company_id, category.id) {
            Ok(children) => children,
            Err(error) => return DeletionReport::failed(error.into()),
        };

        let mut report = DeletionReport {
            deleted: Vec::new(),
            warnings: Vec::new(),
            outcome: Ok(()),
        };

        for child in &children {
            let child_report = self.delete_tree(child);
            report.absorb(child, child_report);
        }

        match self.delete_node(category) {
            Ok(deleted) => report.deleted.push(deleted),
            Err(error) => report.outcome = Err(error),
        }

        report
    }

    fn delete_node(&self, category: &Category) -> Result<Category, DeletionError> {
        // The children may have changed, validate against the stored state.
        let category = self.store.find(category.company_id, category.id)?;

        self.authorize(&category)?;

        self.events.publish(CategoryEvent::Deleting(category.clone()));

        self.store
            .delete(category.company_id, category.id)
            .inspect_err(|error| {
                tracing::error!("could not delete category {}: {error}", category.id)
            })?;

        tracing::info!(
            "deleted category {} ({}) of company {}",
            category.id,
            category.name,
            category.company_id
        );

        self.events.publish(CategoryEvent::Deleted(category.clone()));

        Ok(category)
    }

    /// Check that `category` may be deleted. The first failing rule wins.
    fn authorize(&self, category: &Category) -> Result<(), DeletionError> {
        let company_id = category.company_id;

        let transfer_category = self
            .settings
            .default_category(company_id, DefaultCategory::Transfer)?;

        if transfer_category == Some(category.id) {
            let message = self.translator.message(
                "messages.error.transfer_category",
                &[("name", category.name.as_ref())],
            );

            return Err(DeletionError::ProtectedEntity { message });
        }

        if category.is_top_level()
            && self
                .store
                .count_top_level(company_id, category.category_type)?
                <= 1
        {
            let type_name = self
                .translator
                .message(&format!("general.{}", category.category_type), &[])
                .to_lowercase();
            let message = self
                .translator
                .message("messages.error.last_category", &[("type", type_name.as_str())]);

            return Err(DeletionError::LastOfType {
                category_type: category.category_type,
                message,
            });
        }

        let mut kinds: IndexSet<String> = self.relationships(category)?.into_iter().collect();

        let children = self.store.children(company_id, category.id)?;

        for child in &children {
            kinds.extend(self.relationships(child)?);
        }

        if !children.is_empty() && kinds.is_empty() {
            // Kept sub-categories block the deletion even when nothing
            // else points at them.
            kinds.insert(
                self.translator
                    .message("general.categories", &[])
                    .to_lowercase(),
            );
        }

        if !kinds.is_empty() {
            let kinds: Vec<String> = kinds.into_iter().collect();
            let text = kinds.join(", ");
            let message = self.translator.message(
                "messages.warning.deleted",
                &[("name", category.name.as_ref()), ("text", text.as_str())],
            );

            return Err(DeletionError::ReferencedEntity { kinds, message });
        }

        Ok(())
    }

    /// The labels of everything that depends on `category`.
    ///
    /// Being one of the company's default categories counts as a dependency.
    fn relationships(&self, category: &Category) -> Result<Vec<String>, DeletionError> {
        let mut relationships = Vec::new();

        for kind in self.reference_kinds {
            let count = self
                .store
                .count_references(category.company_id, category.id, *kind)?;

            if count > 0 {
                relationships.push(kind.label().to_owned());
            }
        }

        for (default, key) in [
            (DefaultCategory::Income, "general.incomes"),
            (DefaultCategory::Expense, "general.expenses"),
        ] {
            if self
                .settings
                .default_category(category.company_id, default)?
                == Some(category.id)
            {
                relationships.push(self.translator.message(key, &[]).to_lowercase());
            }
        }

        Ok(relationships)
    }
}
