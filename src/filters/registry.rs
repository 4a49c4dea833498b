//! Filter registry for the closed set of selectable filters.

use crate::filters::descriptor::{Category, FilterDescriptor};
use indexmap::IndexMap;
use log::warn;

/// Registry for all available filters.
///
/// The registry keeps descriptors in registration order so menus list
/// filters the same way every run. One filter is marked as the default
/// a new session starts with.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    /// Descriptors indexed by their unique ID.
    filters: IndexMap<String, FilterDescriptor>,
    /// Filters grouped by category.
    categories: IndexMap<Category, Vec<String>>,
    /// ID of the filter selected at session start.
    default_filter: Option<String>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
            default_filter: None,
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter descriptor.
    ///
    /// Re-registering an ID replaces the previous descriptor. The first
    /// registered filter becomes the default until one is chosen.
    pub fn register(&mut self, descriptor: FilterDescriptor) {
        let id = descriptor.id.clone();
        let category = descriptor.category;

        if let Some(previous) = self.filters.insert(id.clone(), descriptor) {
            if let Some(ids) = self.categories.get_mut(&previous.category) {
                ids.retain(|i| i != &id);
            }
        }

        self.categories.entry(category).or_default().push(id.clone());

        if self.default_filter.is_none() {
            self.default_filter = Some(id);
        }
    }

    /// Choose the default filter. Returns false if `id` is not registered.
    pub fn set_default(&mut self, id: &str) -> bool {
        if self.filters.contains_key(id) {
            self.default_filter = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// The descriptor a new session starts with.
    pub fn default_filter(&self) -> Option<&FilterDescriptor> {
        self.default_filter.as_deref().and_then(|id| self.filters.get(id))
    }

    /// Look up a descriptor by ID.
    pub fn lookup(&self, id: &str) -> Option<&FilterDescriptor> {
        self.filters.get(id)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Get all registered filter IDs in registration order.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Get all registered descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.filters.values()
    }

    /// Get filters by category.
    pub fn filters_by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Get all non-empty categories.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(c, _)| c)
    }

    /// Search filters by id, name or description.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.filters
            .iter()
            .filter(|(_, d)| {
                d.id.to_lowercase().contains(&query)
                    || d.name.to_lowercase().contains(&query)
                    || d.description.to_lowercase().contains(&query)
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get descriptors grouped by category for menu display.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterDescriptor>> {
        let mut grouped: IndexMap<Category, Vec<&FilterDescriptor>> = IndexMap::new();

        for descriptor in self.filters.values() {
            grouped.entry(descriptor.category).or_default().push(descriptor);
        }

        for filters in grouped.values_mut() {
            filters.sort_by(|a, b| a.name.cmp(&b.name));
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Builder for creating a customized registry.
pub struct RegistryBuilder {
    registry: FilterRegistry,
    include_builtins: bool,
    default_filter: Option<String>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: FilterRegistry::new(),
            include_builtins: true,
            default_filter: None,
        }
    }

    /// Include or exclude built-in filters.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Register a custom filter.
    pub fn register(mut self, descriptor: FilterDescriptor) -> Self {
        self.registry.register(descriptor);
        self
    }

    /// Choose the default filter by ID.
    pub fn default_filter(mut self, id: impl Into<String>) -> Self {
        self.default_filter = Some(id.into());
        self
    }

    /// Build the registry.
    ///
    /// An unknown default ID is ignored and the built-in default stays.
    pub fn build(mut self) -> FilterRegistry {
        if self.include_builtins {
            crate::filters::builtin::register_all(&mut self.registry);
        }
        if let Some(id) = self.default_filter {
            if !self.registry.set_default(&id) {
                let current = self
                    .registry
                    .default_filter()
                    .map(|d| d.id.as_str())
                    .unwrap_or("<none>");
                warn!("Default filter '{}' is not registered; keeping '{}'", id, current);
            }
        }
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
