//! pyargs is a crate for parsing the arguments of Python functions implemented in Rust on top of
//! CPython's argument parser, `PyArg_ParseTupleAndKeywords`.
//!
//! That function is driven by a format string and a table of keywords, and writes the parsed
//! arguments to a list of variadic pointers. Keeping these three in sync by hand is error-prone,
//! and the values it produces are raw C types that still have to be converted and, in some
//! cases, released. pyargs derives all of them from a list of typed argument descriptors, and
//! calls a Rust function with the converted values.
//!
//! # Overview
//!
//! An incomplete list of features that are currently supported by pyargs:
//!
//!  - Declare the arguments of a function as a tuple of descriptors, the format string and
//!    keyword table are computed once when the signature is created.
//!  - Required, optional, keyword-only and positional-only arguments, with default values for
//!    numbers, strings and paths.
//!  - Integers of every width, floating-point and complex numbers, booleans and characters.
//!  - Strings and bytes borrowed from the arguments, or copied to owned Rust types.
//!  - Strings encoded by the argument parser, objects supporting the buffer protocol, and file
//!    system paths. Everything the parser allocates for these is released after the call, even
//!    if the callback panics.
//!  - Objects, optionally type-checked against a type known at compile time or at runtime.
//!  - Call a function whose parameter types must match the types of the values exactly, or
//!    return the values as a tuple.
//!  - Dispatch between overloads, the first signature that accepts the arguments wins.
//!  - With the `pyo3` feature, descriptors that produce pyo3's `Bound` smart pointers.
//!
//! # Using this crate
//!
//! The easiest way to get started is by importing the prelude, which reexports the most
//! commonly used traits, types and functions. A signature is typically created once and
//! stored in a static, and used from the implementation of a method with the
//! `METH_VARARGS | METH_KEYWORDS` calling convention:
//!
//! ```no_run
//! use std::ffi::c_long;
//!
//! use once_cell::sync::Lazy;
//! use pyargs::{ffi, prelude::*};
//!
//! static ARGS: Lazy<Arguments<TList![ArgI32, Optional, ArgF32]>> = Lazy::new(|| {
//!     Arguments::new((arg_i32("x"), optional(), arg_f32("y").with_default(5.0)))
//!         .expect("invalid signature")
//! });
//!
//! unsafe extern "C" fn scale(
//!     _module: *mut ffi::PyObject,
//!     args: *mut ffi::PyObject,
//!     kwargs: *mut ffi::PyObject,
//! ) -> *mut ffi::PyObject {
//!     let mut result = std::ptr::null_mut();
//!     ARGS.match_raw(args, kwargs, |x: i32, y: f32| {
//!         result = ffi::PyLong_FromLong((x as f32 * y) as c_long);
//!     });
//!     result
//! }
//! ```
//!
//! If the arguments are rejected, `result` remains null and the exception raised by the
//! argument parser is propagated to the caller.
//!
//! # Features
//!
//!  - `extension-module`: don't link libpython, required when building an extension module.
//!  - `pyo3`: descriptors that produce `Bound` smart pointers, see the `arg::wrappers` module.
//!
//! # Logging
//!
//! Match attempts and rejections are logged with [`tracing`] at the trace and debug levels. No
//! subscriber is installed by this crate.

#![forbid(rustdoc::broken_intra_doc_links)]

pub mod arg;
pub mod error;
pub mod object;
pub mod prelude;
pub(crate) mod private;
pub mod signature;
pub(crate) mod sys;
pub mod types;

pub use pyo3_ffi as ffi;

/// The maximum number of raw slots a single signature can use.
///
/// Most descriptors use one slot, those with a `#` or `!` in their format use two or three.
pub const MAX_SLOTS: usize = 32;
