//! Share scopes: named tables of shared module versions

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::range::{RangeSet, Version};
use crate::share::error::ShareError;
use crate::share::provider::{ModuleProvider, SharedModule};

/// Scope used when a consumer does not name one
pub const DEFAULT_SCOPE: &str = "default";

/// One registered version of a shared module
pub struct SharedEntry<M: SharedModule> {
    pub version: Version,
    provider: Arc<dyn ModuleProvider<M>>,
}

impl<M: SharedModule> SharedEntry<M> {
    pub fn load(&self) -> Result<M, ShareError> {
        self.provider.load()
    }
}

impl<M: SharedModule> Clone for SharedEntry<M> {
    fn clone(&self) -> Self {
        Self {
            version: self.version.clone(),
            provider: Arc::clone(&self.provider),
        }
    }
}

/// scope name -> module name -> version -> entry
///
/// Insertion order is kept at every level so lookups prefer whatever was
/// registered first.
pub struct ShareScopes<M: SharedModule> {
    scopes: IndexMap<String, IndexMap<String, IndexMap<String, SharedEntry<M>>>>,
}

impl<M: SharedModule> Default for ShareScopes<M> {
    fn default() -> Self {
        Self {
            scopes: IndexMap::new(),
        }
    }
}

impl<M: SharedModule> ShareScopes<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `version` of `name` in `scope`.
    ///
    /// Registering the same version twice replaces the earlier provider.
    pub fn register(
        &mut self,
        scope: &str,
        name: &str,
        version: &str,
        provider: Arc<dyn ModuleProvider<M>>,
    ) -> Result<(), ShareError> {
        let parsed = Version::parse(version).map_err(|source| ShareError::InvalidVersion {
            name: name.to_string(),
            version: version.to_string(),
            source,
        })?;

        debug!("Registering {}@{} in scope {}", name, parsed, scope);
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
            .insert(
                parsed.to_string(),
                SharedEntry {
                    version: parsed,
                    provider,
                },
            );
        Ok(())
    }

    /// All registered entries of `name` in `scope`, in registration order
    pub fn entries(&self, scope: &str, name: &str) -> Vec<&SharedEntry<M>> {
        self.scopes
            .get(scope)
            .and_then(|modules| modules.get(name))
            .map(|versions| versions.values().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, scope: &str, name: &str) -> bool {
        !self.entries(scope, name).is_empty()
    }

    /// First registered entry of `name` whose version satisfies `required`,
    /// or simply the first entry when there is no requirement.
    ///
    /// An unparseable requirement matches nothing.
    pub fn find_satisfying(
        &self,
        scope: &str,
        name: &str,
        required: Option<&str>,
    ) -> Option<&SharedEntry<M>> {
        let entries = self.entries(scope, name);
        let Some(required) = required else {
            return entries.into_iter().next();
        };

        let range = match RangeSet::parse(required) {
            Ok(range) => range,
            Err(e) => {
                warn!("Ignoring invalid required version for {}: {}", name, e);
                return None;
            }
        };

        entries.into_iter().find(|entry| range.test(&entry.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::provider::provider_fn;
    use rstest::rstest;

    fn scopes_with(versions: &[&str]) -> ShareScopes<String> {
        let mut scopes = ShareScopes::new();
        for version in versions {
            let value = format!("vue@{version}");
            scopes
                .register(
                    DEFAULT_SCOPE,
                    "vue",
                    version,
                    Arc::new(provider_fn(move || Ok(value.clone()))),
                )
                .unwrap();
        }
        scopes
    }

    #[rstest]
    #[case(&["3.3.4", "3.2.0"], Some("^3.2.0"), Some("3.3.4"))]
    #[case(&["2.7.0", "3.2.0"], Some("^3.0.0"), Some("3.2.0"))]
    #[case(&["2.7.0", "3.2.0"], Some(">=2.0.0"), Some("2.7.0"))]
    #[case(&["2.7.0"], Some("^3.0.0"), None)]
    #[case(&["2.7.0", "3.2.0"], None, Some("2.7.0"))]
    #[case(&[], None, None)]
    #[case(&["3.2.0"], Some("bogus"), None)]
    fn find_satisfying_returns_first_match_in_registration_order(
        #[case] registered: &[&str],
        #[case] required: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let scopes = scopes_with(registered);

        let found = scopes.find_satisfying(DEFAULT_SCOPE, "vue", required);

        assert_eq!(
            found.map(|entry| entry.version.to_string()),
            expected.map(str::to_string)
        );
    }

    #[test]
    fn register_rejects_partial_versions() {
        let mut scopes = ShareScopes::<String>::new();

        let result = scopes.register(
            DEFAULT_SCOPE,
            "vue",
            "3.x",
            Arc::new(provider_fn(|| Ok("vue".to_string()))),
        );

        assert!(matches!(result, Err(ShareError::InvalidVersion { .. })));
        assert!(!scopes.contains(DEFAULT_SCOPE, "vue"));
    }

    #[test]
    fn register_same_version_replaces_provider() {
        let mut scopes = ShareScopes::new();
        for value in ["first", "second"] {
            scopes
                .register(
                    DEFAULT_SCOPE,
                    "vue",
                    "v3.2.0",
                    Arc::new(provider_fn(move || Ok(value.to_string()))),
                )
                .unwrap();
        }

        let entries = scopes.entries(DEFAULT_SCOPE, "vue");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].load().unwrap(), "second");
    }

    #[test]
    fn entries_are_isolated_per_scope() {
        let scopes = scopes_with(&["3.2.0"]);

        assert!(scopes.contains(DEFAULT_SCOPE, "vue"));
        assert!(!scopes.contains("legacy", "vue"));
        assert!(scopes.entries(DEFAULT_SCOPE, "react").is_empty());
    }
}
