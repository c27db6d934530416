use crate::models::{FileCategory, OperationKind, ProjectCatalog, VersionChain};

/// Criteria for selecting version chains from a catalog
///
/// All set criteria must match (AND). An empty filter selects every chain.
/// Criteria are evaluated against the chain's current version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Category display name, matched case-insensitively
    pub category: Option<String>,
    pub operation: Option<OperationKind>,
    /// Case-sensitive substring of the normalized path
    pub path_contains: Option<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn with_operation(mut self, kind: OperationKind) -> Self {
        self.operation = Some(kind);
        self
    }

    pub fn with_path_contains(mut self, needle: impl Into<String>) -> Self {
        self.path_contains = Some(needle.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.operation.is_none() && self.path_contains.is_none()
    }

    /// Matching chains in catalog order
    pub fn apply<'a>(&self, catalog: &'a ProjectCatalog) -> Vec<&'a VersionChain> {
        if self.is_empty() {
            return catalog.files().iter().collect();
        }

        // Resolve the category once; an unknown name can match nothing
        let category = match self.category.as_deref() {
            Some(name) => match FileCategory::from_name(name) {
                Some(category) => Some(category),
                None => return Vec::new(),
            },
            None => None,
        };

        catalog.files().iter().filter(|chain| self.matches_chain(chain, category)).collect()
    }

    /// Check a single chain against this filter
    pub fn matches(&self, chain: &VersionChain) -> bool {
        let category = match self.category.as_deref() {
            Some(name) => match FileCategory::from_name(name) {
                Some(category) => Some(category),
                None => return false,
            },
            None => None,
        };
        self.matches_chain(chain, category)
    }

    fn matches_chain(&self, chain: &VersionChain, category: Option<FileCategory>) -> bool {
        if let Some(category) = category
            && chain.category() != category
        {
            return false;
        }
        if let Some(kind) = self.operation
            && chain.current().kind != kind
        {
            return false;
        }
        if let Some(needle) = self.path_contains.as_deref()
            && !chain.path().contains(needle)
        {
            return false;
        }
        true
    }
}
