use alloc::{boxed::Box, sync::Arc};
use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

use crate::errors::ResolveErrorKind;

pub type RcAny = Arc<dyn Any + Send + Sync>;

/// Name and [`TypeId`] of a type.
/// Comparison and hashing only look at the id, the name is kept for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

/// Identity of a capability, the key of every registry table.
///
/// Derived statically from the capability type, so two requests for the same capability
/// always produce equal ids and distinct capabilities never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityId(TypeInfo);

impl CapabilityId {
    #[inline]
    #[must_use]
    pub fn of<C>() -> Self
    where
        C: Capability + ?Sized,
    {
        Self(TypeInfo::of::<C>())
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.name
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.0
    }
}

impl Display for CapabilityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// An abstract contract which concrete values can satisfy.
///
/// Usually implemented for a trait object type with [`crate::capability!`], listing every concrete type
/// that may be registered for it. [`Capability::adapt`] is the compatibility check:
/// it turns an opaque instance into the capability object or hands it back unchanged.
///
/// # Examples
/// ```rust
/// use wirebox::{capability, Registry};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> &'static str;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> &'static str {
///         "Hello"
///     }
/// }
///
/// capability!(dyn Greeter = [English]);
///
/// let registry = Registry::new();
/// registry.register_lazy_singleton::<dyn Greeter, _, _>(|| Ok(English));
///
/// assert_eq!(registry.resolve::<dyn Greeter>().unwrap().greet(), "Hello");
/// ```
pub trait Capability: 'static {
    type Object: ?Sized + Send + Sync + 'static;

    /// # Errors
    /// Returns the instance back if it doesn't satisfy the capability
    fn adapt(instance: RcAny) -> Result<Arc<Self::Object>, RcAny>;
}

/// Declares a capability.
///
/// - `capability!(dyn Trait = [ImplA, ImplB])` makes `dyn Trait` a capability satisfied by the listed types.
///   The trait must have `Send + Sync` supertraits.
/// - `capability!(Type)` makes a concrete type a capability satisfied only by itself.
#[macro_export]
macro_rules! capability {
    (dyn $trait:path = [ $( $implementation:ty ),* $(,)? ]) => {
        impl $crate::Capability for dyn $trait {
            type Object = dyn $trait;

            #[allow(unused_mut)]
            fn adapt(
                mut instance: $crate::RcAny,
            ) -> ::core::result::Result<$crate::__private::Arc<Self::Object>, $crate::RcAny> {
                $(
                    instance = match instance.downcast::<$implementation>() {
                        ::core::result::Result::Ok(concrete) => {
                            return ::core::result::Result::Ok(concrete as $crate::__private::Arc<Self::Object>);
                        }
                        ::core::result::Result::Err(instance) => instance,
                    };
                )*
                ::core::result::Result::Err(instance)
            }
        }
    };
    ($ty:ty) => {
        impl $crate::Capability for $ty {
            type Object = $ty;

            #[inline]
            fn adapt(
                instance: $crate::RcAny,
            ) -> ::core::result::Result<$crate::__private::Arc<Self::Object>, $crate::RcAny> {
                instance.downcast::<$ty>()
            }
        }
    };
}

/// An instance already adapted to its capability, together with the type it was built from.
pub(crate) struct Instance {
    actual: TypeInfo,
    object: Box<dyn Any + Send + Sync>,
}

impl Instance {
    /// Returns `None` if `value` doesn't satisfy `C`
    #[must_use]
    pub(crate) fn adapt<C>(value: RcAny, actual: TypeInfo) -> Option<Self>
    where
        C: Capability + ?Sized,
    {
        C::adapt(value).ok().map(|object| Self {
            actual,
            object: Box::new(object),
        })
    }

    #[inline]
    #[must_use]
    pub(crate) const fn actual(&self) -> TypeInfo {
        self.actual
    }

    pub(crate) fn get<C>(&self) -> Result<Arc<C::Object>, ResolveErrorKind>
    where
        C: Capability + ?Sized,
    {
        self.object
            .downcast_ref::<Arc<C::Object>>()
            .cloned()
            .ok_or_else(|| ResolveErrorKind::IncompatibleType {
                expected: CapabilityId::of::<C>(),
                actual: self.actual,
            })
    }
}
