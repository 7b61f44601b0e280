//! Shared module registry and loader
//!
//! Shared modules are registered once at startup into named share scopes.
//! A [`SharedLoader`] then resolves a module by name, picking a registered
//! version that satisfies the consumer's required range and falling back to
//! the consumer's own copy otherwise.

pub mod error;
pub mod loader;
pub mod provider;
pub mod scope;

pub use error::ShareError;
pub use loader::{ModuleRequirement, SharedLoader};
pub use provider::{FnProvider, ModuleProvider, SharedModule, provider_fn};
pub use scope::{DEFAULT_SCOPE, ShareScopes, SharedEntry};
