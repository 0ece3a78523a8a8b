use once_cell::sync::Lazy;

use crate::registry::Registry;

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Process-wide registry, created on first access.
///
/// Meant for the edges of an application, like `main` or [`crate::Injected::global`].
/// Everything else takes a [`Registry`] explicitly.
/// Tests sharing it should call [`Registry::clear_all`] between cases.
#[inline]
#[must_use]
pub fn global() -> &'static Registry {
    &GLOBAL_REGISTRY
}
