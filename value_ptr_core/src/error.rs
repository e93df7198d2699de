//! Error types.

use std::any::TypeId;
use std::error::Error as StdError;

use crate::smart_copy::Target;

/// [`Error`] is an error that can be raised by functions and methods from this library.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A copy was requested from a strategy that is not bound to any type.
    InvalidState,
    /// A strategy bound to the contained type was handed a value of another concrete type.
    TypeMismatch(Target),
    /// Copying a value of the contained type did not complete.
    AllocationFailure(Target),
}

impl Error {
    pub fn type_mismatch<T>() -> Self
    where
        T: 'static,
    {
        Self::TypeMismatch(Target::of::<T>())
    }

    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState)
    }

    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch(_))
    }

    pub fn is_type_mismatch_for<T>(&self) -> bool
    where
        T: 'static,
    {
        matches!(self, Self::TypeMismatch(target) if target.id() == TypeId::of::<T>())
    }

    pub const fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::AllocationFailure(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState => f.write_str("copy strategy is not bound to any type"),
            Self::TypeMismatch(target) => {
                write!(f, "value is not of type `{target}` expected by the copy strategy")
            }
            Self::AllocationFailure(target) => {
                write!(f, "failed to copy a value of type `{target}`")
            }
        }
    }
}

impl StdError for Error {}

/// [`Result`] is an alias to [`core::result::Result`] with [`Error`] as the
/// default error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::InvalidState.to_string(),
            "copy strategy is not bound to any type"
        );
        assert_eq!(
            Error::type_mismatch::<String>().to_string(),
            format!(
                "value is not of type `{}` expected by the copy strategy",
                std::any::type_name::<String>()
            )
        );
        assert_eq!(
            Error::AllocationFailure(Target::of::<u8>()).to_string(),
            "failed to copy a value of type `u8`"
        );
    }

    #[test]
    fn test_predicates() {
        let err = Error::type_mismatch::<String>();
        assert!(err.is_type_mismatch());
        assert!(err.is_type_mismatch_for::<String>());
        assert!(!err.is_type_mismatch_for::<i32>());
        assert!(!err.is_invalid_state());
        assert!(Error::InvalidState.is_invalid_state());
        assert!(Error::AllocationFailure(Target::of::<u8>()).is_allocation_failure());
    }
}
