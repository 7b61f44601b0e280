//! Shared module loader
//!
//! Resolution order for `import_shared(name, scope)`:
//! 1. value cached by an earlier import of `name`
//! 2. first version in the share scope that satisfies the consumer's
//!    required version (or the first version if none is required)
//! 3. the consumer's local copy, when the requirement allows importing it
//!
//! Each module name has its own cache slot. The slot stays locked while the
//! module loads, so concurrent imports of one name call the provider once
//! and imports of other names are not blocked.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::share::error::ShareError;
use crate::share::provider::{ModuleProvider, SharedModule};
use crate::share::scope::ShareScopes;

/// What a consumer expects from a shared module
pub struct ModuleRequirement<M: SharedModule> {
    /// Range the shared version must satisfy; `None` accepts any version
    pub required_version: Option<String>,
    /// Whether the local copy may be used when the scope has no match
    pub import: bool,
    /// The consumer's own copy of the module
    pub local: Option<Arc<dyn ModuleProvider<M>>>,
}

impl<M: SharedModule> ModuleRequirement<M> {
    pub fn new(required_version: Option<String>) -> Self {
        Self {
            required_version,
            import: true,
            local: None,
        }
    }

    pub fn with_local(mut self, local: Arc<dyn ModuleProvider<M>>) -> Self {
        self.local = Some(local);
        self
    }

    pub fn without_import(mut self) -> Self {
        self.import = false;
        self
    }
}

type Slot<M> = Arc<Mutex<Option<M>>>;

pub struct SharedLoader<M: SharedModule> {
    scopes: ShareScopes<M>,
    requirements: HashMap<String, ModuleRequirement<M>>,
    cache: Mutex<HashMap<String, Slot<M>>>,
}

impl<M: SharedModule + Clone> SharedLoader<M> {
    pub fn new(scopes: ShareScopes<M>) -> Self {
        Self {
            scopes,
            requirements: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_requirement(mut self, name: &str, requirement: ModuleRequirement<M>) -> Self {
        self.requirements.insert(name.to_string(), requirement);
        self
    }

    pub fn scopes(&self) -> &ShareScopes<M> {
        &self.scopes
    }

    /// Resolve `name` from `scope`, falling back to the local copy.
    ///
    /// Successful results are cached per module name, regardless of scope.
    pub fn import_shared(&self, name: &str, scope: &str) -> Result<M, ShareError> {
        let slot = self.slot(name);
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(module) = cached.as_ref() {
            debug!("Using cached shared module {}", name);
            return Ok(module.clone());
        }

        let module = match self.load_from_scope(name, scope)? {
            Some(module) => module,
            None => self.load_local(name)?,
        };

        *cached = Some(module.clone());
        Ok(module)
    }

    /// Cache slot for `name`; the map lock is only held while looking it up
    fn slot(&self, name: &str) -> Slot<M> {
        let mut slots = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(name.to_string()).or_default())
    }

    fn load_from_scope(&self, name: &str, scope: &str) -> Result<Option<M>, ShareError> {
        if !self.scopes.contains(scope, name) {
            return Ok(None);
        }

        let required = self
            .requirements
            .get(name)
            .and_then(|r| r.required_version.as_deref());

        match self.scopes.find_satisfying(scope, name, required) {
            Some(entry) => {
                info!("Loading shared {}@{} from scope {}", name, entry.version, scope);
                entry.load().map(Some)
            }
            None => {
                warn!(
                    "No version of {} in scope {} satisfies required version {}",
                    name,
                    scope,
                    required.unwrap_or("*")
                );
                Ok(None)
            }
        }
    }

    fn load_local(&self, name: &str) -> Result<M, ShareError> {
        let requirement = self
            .requirements
            .get(name)
            .ok_or_else(|| ShareError::NotFound(name.to_string()))?;

        match (&requirement.local, requirement.import) {
            (Some(local), true) => {
                info!("Falling back to local copy of {}", name);
                local.load()
            }
            _ => Err(ShareError::NoFallback {
                name: name.to_string(),
            }),
        }
    }
}
