//! Service registry -- the lookup table from generation titles to builders.
//!
//! Every generatable piece of content is a [`ServiceDescriptor`]: a
//! title, an optional category scope, the builder that serves it, and the
//! fixed params that specialize the builder for this title. The registry
//! is populated once at startup (see [`crate::catalog`]) and then shared
//! immutably behind an `Arc`; request handling only reads it.
//!
//! Keys are structural ([`ServiceKey`]), so a title or category that
//! happens to contain a `:` can never collide with another entry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builder::ContentBuilder;

/// Identity of a registered service: title plus optional category scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    pub title: String,
    pub category: Option<String>,
}

impl ServiceKey {
    pub fn new(title: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            title: title.into(),
            category: category.map(str::to_string),
        }
    }
}

/// One entry in the service menu.
#[derive(Clone)]
pub struct ServiceDescriptor {
    pub title: String,
    pub category: Option<String>,
    pub builder: Arc<dyn ContentBuilder>,
    /// Fixed trailing arguments handed to the builder, letting one
    /// builder serve several titles (platform tags, funnel steps, ...).
    pub params: Vec<String>,
    pub description: Option<String>,
}

impl ServiceDescriptor {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        builder: Arc<dyn ContentBuilder>,
    ) -> Self {
        Self {
            title: title.into(),
            category: Some(category.into()),
            builder,
            params: Vec::new(),
            description: None,
        }
    }

    /// A descriptor with no category scope, matched by bare title.
    pub fn uncategorized(title: impl Into<String>, builder: Arc<dyn ContentBuilder>) -> Self {
        Self {
            title: title.into(),
            category: None,
            builder,
            params: Vec::new(),
            description: None,
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn key(&self) -> ServiceKey {
        ServiceKey::new(self.title.clone(), self.category.as_deref())
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("title", &self.title)
            .field("category", &self.category)
            .field("builder", &self.builder.name())
            .field("params", &self.params)
            .finish()
    }
}

/// Outcome of a pre-dispatch validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// A collection of registered [`ServiceDescriptor`]s, keyed by
/// [`ServiceKey`].
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<ServiceKey, ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own key.
    ///
    /// If a descriptor with the same key is already registered it is
    /// replaced and the old one is returned -- last write wins, with no
    /// uniqueness error.
    pub fn register(&mut self, descriptor: ServiceDescriptor) -> Option<ServiceDescriptor> {
        self.services.insert(descriptor.key(), descriptor)
    }

    /// Register a batch of descriptors in order.
    pub fn register_batch(&mut self, descriptors: Vec<ServiceDescriptor>) {
        for descriptor in descriptors {
            self.register(descriptor);
        }
    }

    /// Exact key lookup.
    pub fn get(&self, title: &str, category: Option<&str>) -> Option<&ServiceDescriptor> {
        self.services.get(&ServiceKey::new(title, category))
    }

    /// Resolve a generation request: exact `(title, main_category)` key
    /// first, then the bare-title key as fallback. This is the
    /// dispatcher's primary path.
    pub fn resolve(&self, title: &str, main_category: &str) -> Option<&ServiceDescriptor> {
        self.get(title, Some(main_category))
            .or_else(|| self.get(title, None))
    }

    pub fn has(&self, title: &str, category: Option<&str>) -> bool {
        self.services.contains_key(&ServiceKey::new(title, category))
    }

    pub fn remove(&mut self, title: &str, category: Option<&str>) -> Option<ServiceDescriptor> {
        self.services.remove(&ServiceKey::new(title, category))
    }

    pub fn clear(&mut self) {
        self.services.clear();
    }

    /// Return the number of registered descriptors.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Return `true` if no descriptors are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Check a descriptor is present and well-formed before dispatch.
    ///
    /// Misconfiguration is reported in the error list, never panicked on;
    /// the dispatcher turns an invalid report into a "no content" result.
    pub fn validate(&self, title: &str, category: Option<&str>) -> ValidationReport {
        let Some(descriptor) = self.get(title, category) else {
            return ValidationReport::from_errors(vec![format!(
                "no service registered for title {title:?} in category {category:?}"
            )]);
        };

        let mut errors = Vec::new();
        if descriptor.title.trim().is_empty() {
            errors.push("descriptor has an empty title".to_string());
        }
        if descriptor.builder.name().trim().is_empty() {
            errors.push(format!(
                "builder for {title:?} reports an empty family name"
            ));
        }
        ValidationReport::from_errors(errors)
    }

    /// Distinct category tags, sorted and deduplicated.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .services
            .values()
            .filter_map(|d| d.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// All descriptors tagged with the given category.
    pub fn by_category(&self, category: &str) -> Vec<&ServiceDescriptor> {
        let mut matched: Vec<&ServiceDescriptor> = self
            .services
            .values()
            .filter(|d| d.category.as_deref() == Some(category))
            .collect();
        matched.sort_by(|a, b| a.title.cmp(&b.title));
        matched
    }

    /// All descriptors, sorted by category then title (for menu surfaces).
    pub fn all(&self) -> Vec<&ServiceDescriptor> {
        let mut all: Vec<&ServiceDescriptor> = self.services.values().collect();
        all.sort_by(|a, b| (&a.category, &a.title).cmp(&(&b.category, &b.title)));
        all
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;

    use crate::builder::{GenerationInput, ProgressFn};

    use super::*;

    /// Minimal builder for registry tests.
    struct FakeBuilder {
        family: String,
    }

    impl FakeBuilder {
        fn arc(family: &str) -> Arc<dyn ContentBuilder> {
            Arc::new(Self {
                family: family.to_string(),
            })
        }
    }

    #[async_trait]
    impl ContentBuilder for FakeBuilder {
        fn name(&self) -> &str {
            &self.family
        }

        async fn build(
            &self,
            _input: &GenerationInput,
            _progress: Option<&ProgressFn>,
        ) -> Result<String> {
            Ok(String::new())
        }
    }

    fn descriptor(title: &str, category: &str) -> ServiceDescriptor {
        ServiceDescriptor::new(title, category, FakeBuilder::arc("fake"))
    }

    #[test]
    fn registry_starts_empty() {
        let registry = ServiceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.categories().is_empty());
    }

    #[test]
    fn register_and_get() {
        let mut registry = ServiceRegistry::new();
        let old = registry.register(descriptor("Welcome Email", "Email"));
        assert!(old.is_none());

        let found = registry.get("Welcome Email", Some("Email"));
        assert!(found.is_some());
        assert_eq!(found.unwrap().title, "Welcome Email");
        assert!(registry.get("Welcome Email", None).is_none());
    }

    #[test]
    fn last_registration_wins_for_same_key() {
        // The documented overwrite semantics: three registrations of the
        // same key with different params leave only the last one visible.
        let mut registry = ServiceRegistry::new();
        registry.register(
            descriptor("Ad Generator", "Advertising").with_params(["facebook", "e-commerce"]),
        );
        registry
            .register(descriptor("Ad Generator", "Advertising").with_params(["facebook", "saas"]));
        let old = registry.register(
            descriptor("Ad Generator", "Advertising").with_params(["facebook", "generic"]),
        );

        assert!(old.is_some());
        assert_eq!(old.unwrap().params, vec!["facebook", "saas"]);
        assert_eq!(registry.len(), 1);

        let current = registry.get("Ad Generator", Some("Advertising")).unwrap();
        assert_eq!(current.params, vec!["facebook", "generic"]);
    }

    #[test]
    fn colon_in_title_does_not_collide_with_category_scoping() {
        // Structural keys: ("A:B", None) and ("B", Some("A")) are distinct.
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceDescriptor::uncategorized("A:B", FakeBuilder::arc("fake")));
        registry.register(descriptor("B", "A"));

        assert_eq!(registry.len(), 2);
        assert!(registry.has("A:B", None));
        assert!(registry.has("B", Some("A")));
    }

    #[test]
    fn resolve_falls_back_to_bare_title() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceDescriptor::uncategorized(
            "Tagline Options",
            FakeBuilder::arc("branding"),
        ));
        registry.register(descriptor("Welcome Email", "Email"));

        // Exact category hit.
        assert!(registry.resolve("Welcome Email", "Email").is_some());
        // Bare-title fallback when the scoped key misses.
        assert!(registry.resolve("Tagline Options", "Branding").is_some());
        // No key at all.
        assert!(registry.resolve("Nonexistent", "Email").is_none());
    }

    #[test]
    fn remove_and_clear() {
        let mut registry = ServiceRegistry::new();
        registry.register(descriptor("Welcome Email", "Email"));
        registry.register(descriptor("Blog Post", "Article"));

        let removed = registry.remove("Welcome Email", Some("Email"));
        assert!(removed.is_some());
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn categories_are_sorted_and_deduped() {
        let mut registry = ServiceRegistry::new();
        registry.register(descriptor("Blog Post", "Article"));
        registry.register(descriptor("Welcome Email", "Email"));
        registry.register(descriptor("Broadcast Email", "Email"));

        assert_eq!(registry.categories(), vec!["Article", "Email"]);
    }

    #[test]
    fn by_category_filters_and_sorts() {
        let mut registry = ServiceRegistry::new();
        registry.register(descriptor("Welcome Email", "Email"));
        registry.register(descriptor("Broadcast Email", "Email"));
        registry.register(descriptor("Blog Post", "Article"));

        let email = registry.by_category("Email");
        let titles: Vec<&str> = email.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Broadcast Email", "Welcome Email"]);
        assert!(registry.by_category("Missing").is_empty());
    }

    #[test]
    fn validate_reports_missing_descriptor() {
        let registry = ServiceRegistry::new();
        let report = registry.validate("Welcome Email", Some("Email"));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Welcome Email"));
    }

    #[test]
    fn validate_accepts_well_formed_descriptor() {
        let mut registry = ServiceRegistry::new();
        registry.register(descriptor("Welcome Email", "Email"));
        let report = registry.validate("Welcome Email", Some("Email"));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn registry_debug_shows_keys() {
        let mut registry = ServiceRegistry::new();
        registry.register(descriptor("Welcome Email", "Email"));
        let debug = format!("{registry:?}");
        assert!(debug.contains("Welcome Email"));
    }
}
