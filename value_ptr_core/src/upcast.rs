//! Conversions between a concrete type and the base type it is viewed through.

use std::any::Any;

/// [`Upcast`] is implemented by a base type `Self` for every concrete type `D` that can be
/// stored behind it.
///
/// The base is usually a trait object such as `dyn Shape`, which is implemented through
/// the [`capability!`](crate::capability) macro. Every `'static` sized type is its own base.
///
/// Implementations must keep the concrete type intact: [`upcast`](Self::upcast) only changes
/// the static view of the allocation, and [`concrete`](Self::concrete) returns `Some` exactly
/// when `base` is a `D`.
pub trait Upcast<D> {
    /// Views an owned `D` as the base type without reallocating.
    fn upcast(value: Box<D>) -> Box<Self>;

    /// Recovers the concrete value from a reference to the base type.
    fn concrete(base: &Self) -> Option<&D>;
}

impl<T> Upcast<T> for T
where
    T: Any,
{
    #[inline]
    fn upcast(value: Box<T>) -> Box<T> {
        value
    }

    #[inline]
    fn concrete(base: &T) -> Option<&T> {
        Some(base)
    }
}

macro_rules! impl_upcast_any {
    ($($bound:tt)*) => {
        impl<D> Upcast<D> for dyn Any $($bound)*
        where
            D: Any $($bound)*,
        {
            #[inline]
            fn upcast(value: Box<D>) -> Box<Self> {
                value
            }

            #[inline]
            fn concrete(base: &Self) -> Option<&D> {
                base.downcast_ref()
            }
        }
    };
}

impl_upcast_any!();
impl_upcast_any!(+ Send);
impl_upcast_any!(+ Send + Sync);

/// Implements [`Upcast`] for a trait object type, for every `'static` type implementing
/// the trait and the listed auto traits.
///
/// The trait must have [`Any`] as a supertrait, which is how a stored value is checked
/// against the type a copy strategy is bound to.
///
/// # Example
///
/// ```
/// use std::any::Any;
///
/// use value_ptr_core::{SmartCopy, capability};
///
/// trait Shape: Any {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone)]
/// struct Square(f64);
///
/// impl Shape for Square {
///     fn area(&self) -> f64 {
///         self.0 * self.0
///     }
/// }
///
/// capability!(dyn Shape);
/// capability!(dyn Shape + Send + Sync);
///
/// let copier = SmartCopy::<dyn Shape>::of::<Square>();
/// let copy = copier.copy(&Square(2.0)).unwrap();
/// assert_eq!(copy.area(), 4.0);
/// ```
#[macro_export]
macro_rules! capability {
    (dyn $($bound:tt)+) => {
        impl<D> $crate::Upcast<D> for dyn $($bound)+
        where
            D: $($bound)+ + 'static,
        {
            #[inline]
            fn upcast(value: ::std::boxed::Box<D>) -> ::std::boxed::Box<Self> {
                value
            }

            #[inline]
            fn concrete(base: &Self) -> ::core::option::Option<&D> {
                (base as &dyn ::core::any::Any).downcast_ref::<D>()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::Upcast;

    trait Named: Any {
        fn name(&self) -> &str;
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Person(String);

    impl Named for Person {
        fn name(&self) -> &str {
            &self.0
        }
    }

    #[derive(Clone)]
    struct Robot(u32);

    impl Named for Robot {
        fn name(&self) -> &str {
            "robot"
        }
    }

    capability!(dyn Named);
    capability!(dyn Named + Send + Sync);

    #[test]
    fn test_identity() {
        let boxed = <String as Upcast<String>>::upcast(Box::new("Hello".to_string()));
        assert_eq!(*boxed, "Hello");
        assert_eq!(
            <String as Upcast<String>>::concrete(&boxed).map(String::as_str),
            Some("Hello")
        );
    }

    #[test]
    fn test_any() {
        let boxed = <dyn Any as Upcast<i32>>::upcast(Box::new(7));
        assert_eq!(<dyn Any as Upcast<i32>>::concrete(&*boxed), Some(&7));
        assert!(<dyn Any as Upcast<u8>>::concrete(&*boxed).is_none());

        let boxed = <dyn Any + Send + Sync as Upcast<i32>>::upcast(Box::new(7));
        assert_eq!(<dyn Any + Send + Sync as Upcast<i32>>::concrete(&*boxed), Some(&7));
    }

    #[test]
    fn test_capability() {
        let boxed = <dyn Named as Upcast<Person>>::upcast(Box::new(Person("Ann".to_string())));
        assert_eq!(boxed.name(), "Ann");
        assert_eq!(
            <dyn Named as Upcast<Person>>::concrete(&*boxed),
            Some(&Person("Ann".to_string()))
        );
        assert!(<dyn Named as Upcast<Robot>>::concrete(&*boxed).is_none());
    }

    #[test]
    fn test_capability_with_auto_traits() {
        let boxed = <dyn Named + Send + Sync as Upcast<Robot>>::upcast(Box::new(Robot(1)));
        assert_eq!(boxed.name(), "robot");
        assert!(
            <dyn Named + Send + Sync as Upcast<Robot>>::concrete(&*boxed)
                .is_some_and(|robot| robot.0 == 1)
        );
    }
}
