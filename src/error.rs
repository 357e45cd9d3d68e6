//! Everything related to errors.

use std::{
    ffi::{CStr, CString},
    str::Utf8Error,
};

use pyo3_ffi as ffi;
use thiserror::Error;

use crate::arg::Marker;

/// Alias that is used for the `Result`s returned when an argument signature is created.
pub type ArgsResult<T> = Result<T, ArgsError>;

/// Errors detected while building an argument signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArgsError {
    #[error("the signature needs {slots} slots, at most {max} are supported")]
    TooManySlots { slots: usize, max: usize },
    #[error("keyword {0:?} contains a nul byte")]
    InvalidKeyword(String),
    #[error("keyword {0} is used more than once")]
    DuplicateKeyword(String),
    #[error("positional-only argument {0:?} follows an argument that accepts a keyword")]
    PositionalOnlyAfterKeyword(String),
    #[error("the {0:?} marker is used more than once")]
    RepeatedMarker(Marker),
    #[error("markers must appear in the order positional-only, optional, keyword-only")]
    MarkerOrder,
    #[error("format {0:?} contains a nul byte")]
    InvalidFormat(String),
}

/// Errors that can occur while converting parsed arguments to their Rust representation.
///
/// The argument parser has accepted the input when these errors occur, they exist because some
/// Rust types have stronger invariants than the C types the parser produces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("argument is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
    #[error("{0:#x} is not a valid unicode scalar value")]
    InvalidChar(u32),
    #[error("path is not valid on this platform")]
    InvalidPath,
    #[error("the argument parser returned a negative length ({0})")]
    NegativeLength(isize),
}

impl ExtractError {
    /// Set the Python exception that corresponds to this error.
    ///
    /// Safety: the GIL must be held.
    pub unsafe fn raise(&self) {
        let exc = match self {
            ExtractError::InvalidUtf8(_) | ExtractError::InvalidPath => ffi::PyExc_UnicodeError,
            ExtractError::InvalidChar(_) => ffi::PyExc_ValueError,
            ExtractError::NegativeLength(_) => ffi::PyExc_SystemError,
        };

        match CString::new(self.to_string()) {
            Ok(msg) => ffi::PyErr_SetString(exc, msg.as_ptr()),
            Err(_) => ffi::PyErr_SetString(exc, FALLBACK_MESSAGE.as_ptr()),
        }
    }
}

static FALLBACK_MESSAGE: &CStr = c"invalid argument";
