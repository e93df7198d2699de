//! Owning pointers with value semantics for polymorphic types.
//!
//! A [`ValuePtr<dyn Trait>`](ValuePtr) owns one value and, when cloned, allocates a copy of
//! the value's concrete type. The trait does not need a clone method: the copy operation is
//! captured as a [`SmartCopy`] when the pointer is built from a concrete type.
//!
//! ```
//! use std::any::Any;
//!
//! use value_ptr::{ValuePtr, capability, make_value};
//!
//! trait Shape: Any {
//!     fn area(&self) -> f64;
//! }
//!
//! #[derive(Clone)]
//! struct Rect {
//!     width: f64,
//!     height: f64,
//! }
//!
//! impl Shape for Rect {
//!     fn area(&self) -> f64 {
//!         self.width * self.height
//!     }
//! }
//!
//! capability!(dyn Shape);
//!
//! let shape: ValuePtr<dyn Shape> = make_value(Rect { width: 2.0, height: 3.0 });
//! let copy = shape.clone();
//!
//! assert_eq!(copy.get().unwrap().area(), 6.0);
//! assert!((copy.get().unwrap() as &dyn Any).is::<Rect>());
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
pub(crate) mod macros;

pub mod value;

pub use value::{ValuePtr, make_value};
pub use value_ptr_core::{Error, Result, SmartCopy, Target, Upcast, capability};
pub use value_ptr_core::{error, smart_copy, upcast};
