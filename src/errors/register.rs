use crate::capability::{CapabilityId, TypeInfo};

#[derive(thiserror::Error, Debug)]
pub enum RegisterErrorKind {
    #[error("Instance doesn't satisfy the capability. Actual: {actual}, expected: {expected}")]
    IncompatibleType { expected: CapabilityId, actual: TypeInfo },
}
