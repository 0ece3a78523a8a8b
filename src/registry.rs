use alloc::{collections::BTreeMap, collections::BTreeSet, sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};
use parking_lot::RwLock;
use tracing::{debug, debug_span, error, info_span, warn};

use crate::{
    capability::{Capability, CapabilityId, Instance, RcAny, TypeInfo},
    errors::{InstantiateErrorKind, RegisterErrorKind, ResolveErrorKind},
    factory::{boxed_factory, BoxedFactory},
    lazy::LazyCell,
};

#[derive(Default)]
struct Tables {
    eager: BTreeMap<CapabilityId, Instance>,
    lazy: BTreeMap<CapabilityId, Arc<LazyCell>>,
    transient: BTreeMap<CapabilityId, BoxedFactory>,
}

enum Provider {
    Transient(BoxedFactory),
    Lazy(Arc<LazyCell>),
}

/// A flat registry mapping capabilities to their providers.
///
/// Every capability can have an eager singleton or a lazy singleton, and independently of them a transient factory.
/// Resolution checks them in a fixed order: transient, then lazy, then eager.
///
/// The registry is a cheap handle, clones share the same tables.
/// All operations are safe to call from many threads at once.
#[derive(Clone, Default)]
pub struct Registry {
    tables: Arc<RwLock<Tables>>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an already constructed instance as the singleton of `C`.
    ///
    /// Removes a pending lazy registration of `C`, a transient registration is kept.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::IncompatibleType`] if the instance doesn't satisfy `C`.
    /// The registry is left untouched in this case
    #[inline]
    pub fn register_singleton<C, T>(&self, instance: T) -> Result<(), RegisterErrorKind>
    where
        C: Capability + ?Sized,
        T: Send + Sync + 'static,
    {
        self.register_singleton_rc::<C, T>(Arc::new(instance))
    }

    /// Same as [`Self::register_singleton`], but for an instance which is already shared.
    /// Resolving `C` returns the same allocation.
    ///
    /// # Errors
    /// Returns [`RegisterErrorKind::IncompatibleType`] if the instance doesn't satisfy `C`
    pub fn register_singleton_rc<C, T>(&self, instance: Arc<T>) -> Result<(), RegisterErrorKind>
    where
        C: Capability + ?Sized,
        T: Send + Sync + 'static,
    {
        let capability = CapabilityId::of::<C>();
        let actual = TypeInfo::of::<T>();
        let span = debug_span!("register_singleton", capability = capability.name(), actual = actual.name);
        let _guard = span.enter();

        let Some(instance) = Instance::adapt::<C>(instance as RcAny, actual) else {
            let err = RegisterErrorKind::IncompatibleType {
                expected: capability,
                actual,
            };
            error!("{}", err);
            return Err(err);
        };

        let mut tables = self.tables.write();
        if tables.lazy.remove(&capability).is_some() {
            debug!("Lazy registration evicted");
        }
        tables.eager.insert(capability, instance);
        debug!("Registered");

        Ok(())
    }

    /// Registers a factory constructing the singleton of `C` on its first resolution.
    ///
    /// Overwrites an eager or lazy registration of `C`, a transient registration is kept.
    /// The instance is checked against `C` only when the factory runs.
    pub fn register_lazy_singleton<C, T, F>(&self, factory: F)
    where
        C: Capability + ?Sized,
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let capability = CapabilityId::of::<C>();
        let span = debug_span!("register_lazy_singleton", capability = capability.name());
        let _guard = span.enter();

        let cell = Arc::new(LazyCell::new(boxed_factory::<C, T, F>(factory)));

        let mut tables = self.tables.write();
        if tables.eager.remove(&capability).is_some() {
            debug!("Eager registration evicted");
        }
        tables.lazy.insert(capability, cell);
        debug!("Registered");
    }

    /// Registers a factory constructing a new instance of `C` on every resolution.
    ///
    /// Overwrites only a previous transient registration of `C`.
    pub fn register_transient<C, T, F>(&self, factory: F)
    where
        C: Capability + ?Sized,
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let capability = CapabilityId::of::<C>();
        let span = debug_span!("register_transient", capability = capability.name());
        let _guard = span.enter();

        let factory = boxed_factory::<C, T, F>(factory);

        self.tables.write().transient.insert(capability, factory);
        debug!("Registered");
    }

    /// Resolves `C`.
    ///
    /// The first registration found wins, in order:
    /// 1. transient factory, called on each resolution
    /// 2. lazy singleton, forced on the first resolution and memoized
    /// 3. eager singleton
    ///
    /// Factories run without the registry lock held, so they can resolve other capabilities.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NothingRegistered`] if `C` has no registration
    /// - Returns [`ResolveErrorKind::IncompatibleType`] if a factory built an instance which doesn't satisfy `C`
    /// - Returns [`ResolveErrorKind::Instantiate`] if a factory failed
    pub fn resolve<C>(&self) -> Result<Arc<C::Object>, ResolveErrorKind>
    where
        C: Capability + ?Sized,
    {
        let capability = CapabilityId::of::<C>();
        let span = info_span!("resolve", capability = capability.name());
        let _guard = span.enter();

        let provider = {
            let tables = self.tables.read();
            if let Some(factory) = tables.transient.get(&capability) {
                Provider::Transient(factory.clone())
            } else if let Some(cell) = tables.lazy.get(&capability) {
                Provider::Lazy(cell.clone())
            } else if let Some(instance) = tables.eager.get(&capability) {
                debug!(actual = instance.actual().name, "Found eager");
                return instance.get::<C>();
            } else {
                let err = ResolveErrorKind::NothingRegistered { capability };
                warn!("{}", err);
                return Err(err);
            }
        };

        match provider {
            Provider::Transient(factory) => {
                debug!("Calling transient factory");
                factory()?.get::<C>()
            }
            Provider::Lazy(cell) => cell.get_or_force(Instance::get::<C>)?,
        }
    }

    /// Same as [`Self::resolve`], but any error becomes `None`.
    /// Use [`Self::resolve`] to tell a missing registration from an incompatible one.
    #[inline]
    #[must_use]
    pub fn resolve_or_default<C>(&self) -> Option<Arc<C::Object>>
    where
        C: Capability + ?Sized,
    {
        self.resolve::<C>().ok()
    }

    /// Forces every lazy singleton which doesn't hold an instance yet, skipping capabilities from `excluding`.
    /// A singleton already forced with an incompatible instance is reported without running its factory again.
    /// Entries are visited in [`CapabilityId`] order.
    ///
    /// Intended for startup self-checks: entries forced before a failure stay forced.
    ///
    /// # Errors
    /// Returns the first failure of a factory, the remaining entries aren't visited
    pub fn validate_all_lazy(&self, excluding: &BTreeSet<CapabilityId>) -> Result<(), ResolveErrorKind> {
        let span = info_span!("validate_all_lazy", excluded = excluding.len());
        let _guard = span.enter();

        let cells: Vec<(CapabilityId, Arc<LazyCell>)> = self
            .tables
            .read()
            .lazy
            .iter()
            .filter(|(capability, cell)| !excluding.contains(*capability) && !cell.holds_instance())
            .map(|(capability, cell)| (*capability, cell.clone()))
            .collect();

        for (capability, cell) in cells {
            debug!(capability = capability.name(), "Validating");
            cell.get_or_force(|_| ())?;
        }

        debug!("All lazy singletons forced");
        Ok(())
    }

    /// Removes every registration of `C`.
    /// Returns `true` if there was any.
    pub fn unregister<C>(&self) -> bool
    where
        C: Capability + ?Sized,
    {
        let capability = CapabilityId::of::<C>();

        let mut tables = self.tables.write();
        let eager = tables.eager.remove(&capability).is_some();
        let lazy = tables.lazy.remove(&capability).is_some();
        let transient = tables.transient.remove(&capability).is_some();

        let removed = eager || lazy || transient;
        if removed {
            debug!(capability = capability.name(), "Unregistered");
        }
        removed
    }

    /// Empties all tables at once
    pub fn clear_all(&self) {
        let mut tables = self.tables.write();
        tables.eager.clear();
        tables.lazy.clear();
        tables.transient.clear();
        debug!("Registry cleared");
    }

    /// Checks whether `C` has any registration. Doesn't force lazy singletons.
    #[must_use]
    pub fn is_registered<C>(&self) -> bool
    where
        C: Capability + ?Sized,
    {
        let capability = CapabilityId::of::<C>();
        let tables = self.tables.read();

        tables.transient.contains_key(&capability)
            || tables.lazy.contains_key(&capability)
            || tables.eager.contains_key(&capability)
    }

    /// Number of distinct registered capabilities
    #[must_use]
    pub fn len(&self) -> usize {
        let tables = self.tables.read();

        let mut capabilities: BTreeSet<&CapabilityId> = tables.eager.keys().collect();
        capabilities.extend(tables.lazy.keys());
        capabilities.extend(tables.transient.keys());
        capabilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        let tables = self.tables.read();

        tables.eager.is_empty() && tables.lazy.is_empty() && tables.transient.is_empty()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();

        f.debug_struct("Registry")
            .field("eager", &tables.eager.keys().collect::<Vec<_>>())
            .field("lazy", &tables.lazy.keys().collect::<Vec<_>>())
            .field("transient", &tables.transient.keys().collect::<Vec<_>>())
            .finish()
    }
}
