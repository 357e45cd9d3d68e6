//! Compile-time lists of types and the traits built on them.

pub mod callback;
pub mod list;
pub mod raw;
