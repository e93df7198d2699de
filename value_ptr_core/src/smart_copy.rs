//! Type-erased copy strategies.

use std::any::{TypeId, type_name};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::upcast::Upcast;

/// Identity of the concrete type a [`SmartCopy`] is bound to.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    id: TypeId,
    name: &'static str,
}

impl Target {
    /// Returns the target of type `T`.
    #[inline]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Target {}

impl std::hash::Hash for Target {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

type CopyFn<B> = Arc<dyn Fn(&B) -> Result<Box<B>> + Send + Sync>;

struct Binding<B: ?Sized> {
    target: Target,
    copy: CopyFn<B>,
}

impl<B: ?Sized> Clone for Binding<B> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            copy: Arc::clone(&self.copy),
        }
    }
}

/// [`SmartCopy`] knows how to copy a value seen through the base type `B` while keeping the
/// concrete type it was bound to.
///
/// A strategy is either empty or bound to exactly one concrete type, captured when that type
/// is statically known. Strategies are cheap to clone and compare equal when they are bound to
/// the same concrete type, regardless of their base type.
///
/// # Example
///
/// ```
/// use std::any::Any;
///
/// use value_ptr_core::SmartCopy;
///
/// let copier = SmartCopy::<dyn Any>::of::<String>();
/// let copy = copier.copy(&"Hello".to_string()).unwrap();
/// assert_eq!(copy.downcast_ref::<String>().unwrap(), "Hello");
///
/// assert!(SmartCopy::<dyn Any>::empty().copy(&0_u8).is_err());
/// ```
pub struct SmartCopy<B: ?Sized> {
    binding: Option<Binding<B>>,
}

impl<B> SmartCopy<B>
where
    B: ?Sized + 'static,
{
    /// Creates a strategy that is not bound to any type.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { binding: None }
    }

    /// Creates a strategy copying values of type `D` with [`Clone`].
    #[must_use]
    pub fn of<D>() -> Self
    where
        D: Clone + 'static,
        B: Upcast<D>,
    {
        Self::from_fn(D::clone)
    }

    /// Creates a strategy copying values of type `D` with a custom function.
    #[must_use]
    pub fn from_fn<D, F>(copy: F) -> Self
    where
        D: 'static,
        F: Fn(&D) -> D + Send + Sync + 'static,
        B: Upcast<D>,
    {
        let copy = move |base: &B| -> Result<Box<B>> {
            let concrete = B::concrete(base).ok_or_else(Error::type_mismatch::<D>)?;
            Ok(B::upcast(Box::new(copy(concrete))))
        };

        Self {
            binding: Some(Binding {
                target: Target::of::<D>(),
                copy: Arc::new(copy),
            }),
        }
    }

    /// Returns `true` if the strategy is not bound to any type.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.binding.is_none()
    }

    /// Returns the concrete type this strategy is bound to.
    #[inline]
    pub fn target(&self) -> Option<Target> {
        self.binding.as_ref().map(|binding| binding.target)
    }

    /// Returns `true` if this strategy is bound to type `T`.
    #[inline]
    pub fn is_bound_to<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.target().is_some_and(|target| target.id() == TypeId::of::<T>())
    }

    /// Allocates a copy of `source`, which must be a value of the bound type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the strategy is empty, and
    /// [`Error::TypeMismatch`] if `source` is not a value of the bound type.
    pub fn copy(&self, source: &B) -> Result<Box<B>> {
        match &self.binding {
            Some(binding) => (binding.copy)(source),
            None => Err(Error::InvalidState),
        }
    }
}

impl<D> SmartCopy<D>
where
    D: 'static,
{
    /// Converts this strategy into one for the base type `C`, keeping the bound type.
    ///
    /// This is how a strategy for a concrete type is assigned to a strategy of a more general
    /// base.
    #[must_use]
    pub fn upcast<C>(self) -> SmartCopy<C>
    where
        C: ?Sized + Upcast<D> + 'static,
    {
        let binding = self.binding.map(|Binding { target, copy }| {
            let copy = move |base: &C| -> Result<Box<C>> {
                let concrete = C::concrete(base).ok_or(Error::TypeMismatch(target))?;
                copy(concrete).map(C::upcast)
            };
            Binding {
                target,
                copy: Arc::new(copy) as CopyFn<C>,
            }
        });

        SmartCopy { binding }
    }
}

impl<B: ?Sized> Clone for SmartCopy<B> {
    fn clone(&self) -> Self {
        Self {
            binding: self.binding.clone(),
        }
    }
}

impl<B: ?Sized> Default for SmartCopy<B> {
    fn default() -> Self {
        Self { binding: None }
    }
}

impl<B: ?Sized, C: ?Sized> PartialEq<SmartCopy<C>> for SmartCopy<B> {
    fn eq(&self, other: &SmartCopy<C>) -> bool {
        let this = self.binding.as_ref().map(|binding| binding.target);
        let other = other.binding.as_ref().map(|binding| binding.target);
        this == other
    }
}

impl<B: ?Sized> Eq for SmartCopy<B> {}

impl<B: ?Sized> std::fmt::Debug for SmartCopy<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartCopy")
            .field("target", &self.binding.as_ref().map(|binding| binding.target.name()))
            .finish_non_exhaustive()
    }
}
