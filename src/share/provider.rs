//! Module providers: deferred constructors for shared module values

#[cfg(test)]
use mockall::automock;

use crate::share::error::ShareError;

/// Values that can be handed out by a loader shared across threads
pub trait SharedModule: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> SharedModule for T {}

/// Produces a module value on demand
///
/// Providers are registered once at startup and only invoked when the
/// loader actually selects them.
#[cfg_attr(test, automock)]
pub trait ModuleProvider<M: SharedModule>: Send + Sync + 'static {
    fn load(&self) -> Result<M, ShareError>;
}

/// Provider backed by a closure
pub struct FnProvider<F>(F);

impl<M, F> ModuleProvider<M> for FnProvider<F>
where
    M: SharedModule,
    F: Fn() -> Result<M, ShareError> + Send + Sync + 'static,
{
    fn load(&self) -> Result<M, ShareError> {
        (self.0)()
    }
}

/// Wrap a closure as a [`ModuleProvider`]
pub fn provider_fn<M, F>(f: F) -> FnProvider<F>
where
    M: SharedModule,
    F: Fn() -> Result<M, ShareError> + Send + Sync + 'static,
{
    FnProvider(f)
}
