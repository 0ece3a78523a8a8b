use alloc::sync::Arc;
use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

use crate::{capability::Capability, errors::ResolveErrorKind, registry::Registry};

/// Accessor resolving `C` from its registry on every call.
///
/// The failure policy is up to the caller: [`Injected::get`] returns the error,
/// [`Injected::get_or_default`] drops it.
///
/// # Examples
/// ```rust
/// use wirebox::{capability, Injected, Registry};
///
/// struct Clock(u64);
///
/// capability!(Clock);
///
/// struct Scheduler {
///     clock: Injected<Clock>,
/// }
///
/// let registry = Registry::new();
/// let scheduler = Scheduler {
///     clock: Injected::new(&registry),
/// };
///
/// assert!(scheduler.clock.get().is_err());
///
/// registry.register_singleton::<Clock, _>(Clock(42)).unwrap();
///
/// assert_eq!(scheduler.clock.get().unwrap().0, 42);
/// ```
pub struct Injected<C: Capability + ?Sized> {
    registry: Registry,
    _capability: PhantomData<fn() -> Arc<C::Object>>,
}

impl<C: Capability + ?Sized> Injected<C> {
    #[inline]
    #[must_use]
    pub fn new(registry: &Registry) -> Self {
        Self {
            registry: registry.clone(),
            _capability: PhantomData,
        }
    }

    /// Binds the accessor to the process-wide registry, see [`crate::global`]
    #[cfg(feature = "std")]
    #[inline]
    #[must_use]
    pub fn global() -> Self {
        Self::new(crate::global::global())
    }

    /// # Errors
    /// Returns the error of [`Registry::resolve`]
    #[inline]
    pub fn get(&self) -> Result<Arc<C::Object>, ResolveErrorKind> {
        self.registry.resolve::<C>()
    }

    #[inline]
    #[must_use]
    pub fn get_or_default(&self) -> Option<Arc<C::Object>> {
        self.registry.resolve_or_default::<C>()
    }
}

impl<C: Capability + ?Sized> Clone for Injected<C> {
    fn clone(&self) -> Self {
        Self::new(&self.registry)
    }
}

impl<C: Capability + ?Sized> Debug for Injected<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("capability", &crate::CapabilityId::of::<C>())
            .finish_non_exhaustive()
    }
}
