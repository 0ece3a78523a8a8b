use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    capability::{CapabilityId, Instance, TypeInfo},
    errors::ResolveErrorKind,
    factory::BoxedFactory,
};

enum LazyState {
    Pending(BoxedFactory),
    Forced(Instance),
    Incompatible { expected: CapabilityId, actual: TypeInfo },
}

/// Memoization cell of a lazy singleton.
///
/// Forced at most once: the first resolution runs the factory under the cell's write lock,
/// concurrent first resolutions wait for it and read the stored outcome.
/// An instance which doesn't satisfy the capability is an outcome too, it's reported on every resolution.
/// A failed factory keeps the cell pending, so the next resolution runs it again.
pub(crate) struct LazyCell {
    state: RwLock<LazyState>,
}

fn incompatible(expected: CapabilityId, actual: TypeInfo) -> ResolveErrorKind {
    let err = ResolveErrorKind::IncompatibleType { expected, actual };
    warn!("{}", err);
    err
}

impl LazyCell {
    #[inline]
    #[must_use]
    pub(crate) fn new(factory: BoxedFactory) -> Self {
        Self {
            state: RwLock::new(LazyState::Pending(factory)),
        }
    }

    /// Whether the factory has already run to completion, with any outcome
    #[inline]
    #[must_use]
    pub(crate) fn is_forced(&self) -> bool {
        !matches!(&*self.state.read(), LazyState::Pending(_))
    }

    #[inline]
    #[must_use]
    pub(crate) fn holds_instance(&self) -> bool {
        matches!(&*self.state.read(), LazyState::Forced(_))
    }

    /// Reads the memoized instance with `read`, forcing the cell first if needed.
    ///
    /// # Warning
    /// The factory runs while the cell is locked, so it must not resolve its own capability
    pub(crate) fn get_or_force<R>(&self, read: impl FnOnce(&Instance) -> R) -> Result<R, ResolveErrorKind> {
        match &*self.state.read() {
            LazyState::Forced(instance) => {
                debug!("Found forced");
                return Ok(read(instance));
            }
            LazyState::Incompatible { expected, actual } => return Err(incompatible(*expected, *actual)),
            LazyState::Pending(_) => {}
        }

        let mut state = self.state.write();
        let factory = match &*state {
            LazyState::Forced(instance) => {
                debug!("Forced by concurrent resolution");
                return Ok(read(instance));
            }
            LazyState::Incompatible { expected, actual } => return Err(incompatible(*expected, *actual)),
            LazyState::Pending(factory) => factory.clone(),
        };

        match factory() {
            Ok(instance) => {
                let value = read(&instance);
                debug!(actual = instance.actual().name, "Forced");
                // Replacing the pending state drops the registered factory
                *state = LazyState::Forced(instance);
                Ok(value)
            }
            Err(ResolveErrorKind::IncompatibleType { expected, actual }) => {
                *state = LazyState::Incompatible { expected, actual };
                debug!("Forced with incompatible instance");
                Err(ResolveErrorKind::IncompatibleType { expected, actual })
            }
            Err(err) => Err(err),
        }
    }
}
