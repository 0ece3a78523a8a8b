#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod capability;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod inject;
pub(crate) mod lazy;
pub(crate) mod registry;

#[cfg(feature = "std")]
pub(crate) mod global;

pub use capability::{Capability, CapabilityId, RcAny, TypeInfo};
pub use errors::{InstantiateErrorKind, RegisterErrorKind, ResolveErrorKind};
pub use inject::Injected;
pub use registry::Registry;

#[cfg(feature = "std")]
pub use global::global;

#[doc(hidden)]
pub mod __private {
    pub use alloc::sync::Arc;
}
