//! Core types and traits for `value_ptr` library.
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod smart_copy;
pub mod upcast;

pub use error::{Error, Result};
pub use smart_copy::{SmartCopy, Target};
pub use upcast::Upcast;
