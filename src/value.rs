//! Owning pointer with value semantics for polymorphic types.

use std::panic::{self, AssertUnwindSafe};

use value_ptr_core::{Error, Result, SmartCopy, Target, Upcast};

/// [`ValuePtr`] uniquely owns a value seen through the base type `B` and copies it as its
/// concrete type.
///
/// The concrete type is captured when the pointer is constructed, together with a
/// [`SmartCopy`] bound to it. Cloning a `ValuePtr<dyn Trait>` therefore allocates a new value
/// of the original concrete type, without requiring the trait itself to be cloneable.
///
/// A pointer may be null. Taking the value out with [`take`](Self::take) leaves a null pointer
/// behind; cloning a null pointer yields another null pointer.
///
/// # Example
///
/// ```
/// use std::any::Any;
///
/// use value_ptr::{ValuePtr, capability};
///
/// trait Animal: Any {
///     fn name(&self) -> &str;
/// }
///
/// #[derive(Clone)]
/// struct Dog {
///     name: String,
/// }
///
/// impl Animal for Dog {
///     fn name(&self) -> &str {
///         &self.name
///     }
/// }
///
/// capability!(dyn Animal);
///
/// let dog = ValuePtr::<dyn Animal>::new(Box::new(Dog { name: "Rex".to_string() }));
/// let copy = dog.clone();
///
/// assert_eq!(copy.get().unwrap().name(), "Rex");
/// assert!((copy.get().unwrap() as &dyn Any).is::<Dog>());
/// ```
pub struct ValuePtr<B: ?Sized> {
    value: Option<Box<B>>,
    copier: SmartCopy<B>,
}

impl<B> ValuePtr<B>
where
    B: ?Sized + 'static,
{
    /// Creates a null pointer.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self {
            value: None,
            copier: SmartCopy::empty(),
        }
    }

    /// Takes ownership of `value`, copying it as `D` from now on.
    #[must_use]
    pub fn new<D>(value: Box<D>) -> Self
    where
        D: Clone + 'static,
        B: Upcast<D>,
    {
        Self {
            value: Some(B::upcast(value)),
            copier: SmartCopy::of::<D>(),
        }
    }

    /// Takes ownership of `value` if there is one, returning a null pointer otherwise.
    ///
    /// The copy strategy is bound to `D` in both cases.
    #[must_use]
    pub fn from_option<D>(value: Option<Box<D>>) -> Self
    where
        D: Clone + 'static,
        B: Upcast<D>,
    {
        Self {
            value: value.map(B::upcast),
            copier: SmartCopy::of::<D>(),
        }
    }

    /// Moves `value` to the heap and takes ownership of it.
    #[inline]
    #[must_use]
    pub fn make<D>(value: D) -> Self
    where
        D: Clone + 'static,
        B: Upcast<D>,
    {
        Self::new(Box::new(value))
    }

    /// Takes ownership of `value`, copying it with `copier` instead of [`Clone`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if `copier` is empty, and [`Error::TypeMismatch`] if it
    /// is bound to a type other than `D`.
    pub fn with_copier<D>(value: Box<D>, copier: SmartCopy<B>) -> Result<Self>
    where
        D: 'static,
        B: Upcast<D>,
    {
        match copier.target() {
            None => Err(Error::InvalidState),
            Some(target) if target != Target::of::<D>() => Err(Error::TypeMismatch(target)),
            Some(_) => Ok(Self {
                value: Some(B::upcast(value)),
                copier,
            }),
        }
    }

    /// Returns a reference to the owned value, or `None` if the pointer is null.
    #[inline]
    pub fn get(&self) -> Option<&B> {
        self.value.as_deref()
    }

    /// Returns a mutable reference to the owned value, or `None` if the pointer is null.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut B> {
        self.value.as_deref_mut()
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the strategy used to copy the owned value.
    #[inline]
    pub const fn copier(&self) -> &SmartCopy<B> {
        &self.copier
    }

    /// Moves the owned value out, leaving a null pointer behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Replaces the owned value with `value` and returns the previous pointer.
    #[must_use]
    pub fn replace<D>(&mut self, value: Box<D>) -> Self
    where
        D: Clone + 'static,
        B: Upcast<D>,
    {
        std::mem::replace(self, Self::new(value))
    }

    /// Drops the owned value, leaving a null pointer.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::null();
    }

    /// Releases the owned value.
    #[inline]
    pub fn into_box(self) -> Option<Box<B>> {
        self.value
    }

    /// Copies the pointer, reporting failures instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] if copying the owned value unwinds, which is how
    /// allocation failures and panicking [`Clone`] implementations surface.
    pub fn try_clone(&self) -> Result<Self> {
        let value = match self.value.as_deref() {
            Some(value) => Some(self.copy_value(value)?),
            None => None,
        };

        Ok(Self {
            value,
            copier: self.copier.clone(),
        })
    }

    /// Replaces `self` with a copy of `source`.
    ///
    /// The copy is made before the current value is dropped, so `self` is left untouched when
    /// it fails.
    ///
    /// # Errors
    ///
    /// See [`try_clone`](Self::try_clone).
    pub fn try_clone_from(&mut self, source: &Self) -> Result<()> {
        *self = source.try_clone()?;
        Ok(())
    }

    fn copy_value(&self, value: &B) -> Result<Box<B>> {
        let target = self.copier.target().ok_or(Error::InvalidState)?;
        trace!("type" = target.name(), "copy");

        if let Ok(copied) = panic::catch_unwind(AssertUnwindSafe(|| self.copier.copy(value))) {
            copied
        } else {
            debug!("type" = target.name(), "copy unwound");
            Err(Error::AllocationFailure(target))
        }
    }
}

impl<D> ValuePtr<D>
where
    D: 'static,
{
    /// Converts the pointer into one with the base type `B`, keeping the allocation and the
    /// copy strategy.
    ///
    /// To copy into another base, clone first: `ptr.clone().upcast()`.
    ///
    /// Only pointers whose base is the concrete type itself can be converted. A
    /// `ValuePtr<dyn SubTrait>` cannot be turned into a `ValuePtr<dyn SuperTrait>`; build the
    /// pointer with the wider base from the concrete value instead.
    #[must_use]
    pub fn upcast<B>(self) -> ValuePtr<B>
    where
        B: ?Sized + Upcast<D> + 'static,
    {
        ValuePtr {
            value: self.value.map(B::upcast),
            copier: self.copier.upcast(),
        }
    }
}

/// Moves `value` to the heap and wraps it in a [`ValuePtr`] with the base type `B`.
#[inline]
#[must_use]
pub fn make_value<B, D>(value: D) -> ValuePtr<B>
where
    B: ?Sized + Upcast<D> + 'static,
    D: Clone + 'static,
{
    ValuePtr::make(value)
}

impl<B> Clone for ValuePtr<B>
where
    B: ?Sized + 'static,
{
    /// Copies the owned value as its concrete type.
    ///
    /// # Panics
    ///
    /// Panics if the concrete type's copy panics. Use [`ValuePtr::try_clone`] to report the
    /// failure instead.
    fn clone(&self) -> Self {
        let value = self.value.as_deref().map(|value| {
            trace!("type" = ?self.copier.target().map(|target| target.name()), "copy");
            self.copier
                .copy(value)
                .expect("the copy strategy should be bound to the type of the owned value")
        });

        Self {
            value,
            copier: self.copier.clone(),
        }
    }
}

impl<B: ?Sized> Default for ValuePtr<B> {
    fn default() -> Self {
        Self {
            value: None,
            copier: SmartCopy::default(),
        }
    }
}

impl<B, D> From<Box<D>> for ValuePtr<B>
where
    B: ?Sized + Upcast<D> + 'static,
    D: Clone + 'static,
{
    #[inline]
    fn from(value: Box<D>) -> Self {
        Self::new(value)
    }
}

impl<B: ?Sized> std::fmt::Debug for ValuePtr<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuePtr")
            .field("is_null", &self.value.is_none())
            .field("copier", &self.copier)
            .finish_non_exhaustive()
    }
}
