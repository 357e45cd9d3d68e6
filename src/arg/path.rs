//! File system paths.

use std::{
    path::{Path, PathBuf},
    slice,
};

use pyo3_ffi::{self as ffi, PyObject};

use super::{keyword_methods, Arg, Extract, Keyword, RawRefs};
use crate::{
    error::ExtractError,
    tlist,
    types::raw::{Converter, ConverterToken},
    TList,
};

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf, ExtractError> {
            use std::{ffi::OsStr, os::unix::ffi::OsStrExt};
            Ok(PathBuf::from(OsStr::from_bytes(bytes)))
        }
    } else {
        fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf, ExtractError> {
            std::str::from_utf8(bytes)
                .map(PathBuf::from)
                .map_err(|_| ExtractError::InvalidPath)
        }
    }
}

/// A `str`, `bytes` or path-like object converted with `os.fsencode`, `O&`.
///
/// The parser stores the encoded path in a new `bytes` object, which is released when the
/// arguments have been handled. An omitted argument produces the default path, which is empty
/// unless another default is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPath {
    keyword: Keyword,
    default: PathBuf,
}

impl ArgPath {
    #[inline]
    pub fn new(keyword: &'static str) -> Self {
        ArgPath {
            keyword: Keyword::new(keyword),
            default: PathBuf::new(),
        }
    }

    /// Use `default` if the argument is omitted.
    #[inline]
    pub fn with_default<P: AsRef<Path>>(mut self, default: P) -> Self {
        self.default = default.as_ref().to_path_buf();
        self
    }

    keyword_methods!(builder);
}

/// Create a new [`ArgPath`].
#[inline]
pub fn arg_path(keyword: &'static str) -> ArgPath {
    ArgPath::new(keyword)
}

unsafe impl Arg for ArgPath {
    const FORMAT: &'static str = "O&";
    const HAS_DEFAULT: bool = true;
    const HAS_CLEANUP: bool = true;
    type Raw = TList![ConverterToken, *mut PyObject];

    keyword_methods!();

    #[inline]
    fn init(&self, raw: RawRefs<'_, Self>) {
        let converter: Converter = ffi::PyUnicode_FSConverter;
        *raw.head = ConverterToken::new(converter);
        *raw.tail.head = std::ptr::null_mut();
    }

    #[inline]
    unsafe fn clean(&self, raw: RawRefs<'_, Self>) {
        let obj = raw.tail.head;
        if !obj.is_null() {
            ffi::Py_DECREF(*obj);
            *obj = std::ptr::null_mut();
        }
    }
}

unsafe impl<'py> Extract<'py> for ArgPath {
    type Value = TList![PathBuf];

    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
        let bytes = *raw.tail.head;
        if bytes.is_null() {
            return Ok(tlist![self.default.clone()]);
        }

        let data = ffi::PyBytes_AsString(bytes);
        let len = usize::try_from(ffi::PyBytes_Size(bytes))
            .map_err(|_| ExtractError::InvalidPath)?;
        let path = path_from_bytes(slice::from_raw_parts(data.cast_const().cast(), len))?;
        Ok(tlist![path])
    }
}
