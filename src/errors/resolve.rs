use super::{instantiate::InstantiateErrorKind, register::RegisterErrorKind};
use crate::capability::{CapabilityId, TypeInfo};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Nothing registered for {capability}")]
    NothingRegistered { capability: CapabilityId },
    #[error("Provided instance doesn't satisfy the capability. Actual: {actual}, expected: {expected}")]
    IncompatibleType { expected: CapabilityId, actual: TypeInfo },
    #[error("Factory of {capability} failed")]
    Instantiate {
        capability: CapabilityId,
        #[source]
        source: InstantiateErrorKind,
    },
}

impl ResolveErrorKind {
    #[inline]
    #[must_use]
    pub const fn capability(&self) -> CapabilityId {
        match self {
            Self::NothingRegistered { capability } | Self::Instantiate { capability, .. } => *capability,
            Self::IncompatibleType { expected, .. } => *expected,
        }
    }
}

impl From<RegisterErrorKind> for ResolveErrorKind {
    fn from(err: RegisterErrorKind) -> Self {
        match err {
            RegisterErrorKind::IncompatibleType { expected, actual } => Self::IncompatibleType { expected, actual },
        }
    }
}
