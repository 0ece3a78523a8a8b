mod instantiate;
mod register;
mod resolve;

pub use instantiate::InstantiateErrorKind;
pub use register::RegisterErrorKind;
pub use resolve::ResolveErrorKind;
