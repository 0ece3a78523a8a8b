use alloc::sync::Arc;
use tracing::{debug, error};

use crate::{
    capability::{Capability, CapabilityId, Instance, TypeInfo},
    errors::{InstantiateErrorKind, ResolveErrorKind},
};

/// Type-erased factory of a lazy or transient entry.
/// Produces an instance already adapted to the capability it was registered for.
pub(crate) type BoxedFactory = Arc<dyn Fn() -> Result<Instance, ResolveErrorKind> + Send + Sync>;

/// Wraps `factory` so that every call adapts the created value to `C`.
/// The compatibility check happens here, at call time, not at registration.
#[must_use]
pub(crate) fn boxed_factory<C, T, F>(factory: F) -> BoxedFactory
where
    C: Capability + ?Sized,
    T: Send + Sync + 'static,
    F: Fn() -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
{
    let capability = CapabilityId::of::<C>();

    Arc::new(move || {
        let value = match factory() {
            Ok(value) => value,
            Err(source) => {
                let err = ResolveErrorKind::Instantiate { capability, source };
                error!("{}", err);
                return Err(err);
            }
        };

        let actual = TypeInfo::of::<T>();
        match Instance::adapt::<C>(Arc::new(value), actual) {
            Some(instance) => {
                debug!(actual = actual.name, "Created");
                Ok(instance)
            }
            None => {
                let err = ResolveErrorKind::IncompatibleType {
                    expected: capability,
                    actual,
                };
                error!("{}", err);
                Err(err)
            }
        }
    })
}
