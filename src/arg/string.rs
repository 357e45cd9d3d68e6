//! Strings and bytes.
//!
//! The argument parser hands out pointers into the internal buffers of the argument objects. The
//! values produced by these descriptors borrow that data for `'py`, except [`ArgString`] which
//! copies it.

use std::{
    ffi::{c_char, CStr},
    slice,
};

use pyo3_ffi::Py_ssize_t;

use super::{keyword_methods, Arg, Extract, Keyword, RawRefs};
use crate::{error::ExtractError, tlist, TList};

/// Convert the pointer and length written by a `#` format unit to a slice.
///
/// Safety: `ptr` must be null or point to `len` bytes that are valid for `'py`.
#[inline]
pub(crate) unsafe fn raw_bytes<'py>(
    ptr: *const c_char,
    len: Py_ssize_t,
) -> Result<&'py [u8], ExtractError> {
    let len = usize::try_from(len).map_err(|_| ExtractError::NegativeLength(len))?;
    if ptr.is_null() {
        return Ok(&[]);
    }

    Ok(slice::from_raw_parts(ptr.cast(), len))
}

#[inline]
unsafe fn raw_str<'py>(ptr: *const c_char, len: Py_ssize_t) -> Result<&'py str, ExtractError> {
    Ok(std::str::from_utf8(raw_bytes(ptr, len)?)?)
}

macro_rules! impl_sized_str {
    (
        $(#[$meta:meta])*
        $name:ident, $ctor:ident, $fmt:literal, $default:ty, $value:ty,
        |$ptr:ident, $len:ident| $from_raw:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            keyword: Keyword,
            default: $default,
        }

        impl $name {
            #[inline]
            pub fn new(keyword: &'static str) -> Self {
                $name {
                    keyword: Keyword::new(keyword),
                    default: Default::default(),
                }
            }

            /// Use `default` if the argument is omitted.
            #[inline]
            pub fn with_default(mut self, default: $default) -> Self {
                self.default = default;
                self
            }

            keyword_methods!(builder);
        }

        #[doc = concat!("Create a new [`", stringify!($name), "`].")]
        #[inline]
        pub fn $ctor(keyword: &'static str) -> $name {
            $name::new(keyword)
        }

        unsafe impl Arg for $name {
            const FORMAT: &'static str = $fmt;
            const HAS_DEFAULT: bool = true;
            type Raw = TList![*const c_char, Py_ssize_t];

            keyword_methods!();

            #[inline]
            fn init(&self, raw: RawRefs<'_, Self>) {
                let (ptr, len) = DefaultBytes::parts(self.default);
                *raw.head = ptr;
                *raw.tail.head = len;
            }
        }

        unsafe impl<'py> Extract<'py> for $name {
            type Value = TList![$value];

            #[inline]
            unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
                let $ptr = *raw.head;
                let $len = *raw.tail.head;
                Ok(tlist![$from_raw])
            }
        }
    };
}

/// Defaults of the `#` format units, stored in the same two slots the parser writes to.
trait DefaultBytes: Copy {
    fn parts(self) -> (*const c_char, Py_ssize_t);
}

impl DefaultBytes for &'static str {
    #[inline]
    fn parts(self) -> (*const c_char, Py_ssize_t) {
        self.as_bytes().parts()
    }
}

impl DefaultBytes for &'static [u8] {
    #[inline]
    fn parts(self) -> (*const c_char, Py_ssize_t) {
        // Allocations never exceed isize::MAX bytes.
        (self.as_ptr().cast(), self.len() as Py_ssize_t)
    }
}

impl DefaultBytes for Option<&'static str> {
    #[inline]
    fn parts(self) -> (*const c_char, Py_ssize_t) {
        match self {
            Some(s) => s.parts(),
            None => (std::ptr::null(), 0),
        }
    }
}

impl_sized_str!(
    /// A `str` or read-only bytes-like object, `s#`.
    ///
    /// Bytes-like objects that don't contain valid UTF-8 are rejected with a `UnicodeError`.
    ArgStr, arg_str, "s#", &'static str, &'py str,
    |ptr, len| raw_str(ptr, len)?
);

impl_sized_str!(
    /// A `str` or read-only bytes-like object copied to a `String`, `s#`.
    ArgString, arg_string, "s#", &'static str, String,
    |ptr, len| raw_str(ptr, len)?.to_owned()
);

impl_sized_str!(
    /// A `str`, read-only bytes-like object or `None`, `z#`.
    ArgOptStr, arg_opt_str, "z#", Option<&'static str>, Option<&'py str>,
    |ptr, len| if ptr.is_null() { None } else { Some(raw_str(ptr, len)?) }
);

impl_sized_str!(
    /// A read-only bytes-like object, `y#`.
    ArgBytes, arg_bytes, "y#", &'static [u8], &'py [u8],
    |ptr, len| raw_bytes(ptr, len)?
);

macro_rules! impl_c_str {
    (
        $(#[$meta:meta])*
        $name:ident, $ctor:ident, $fmt:literal, $default:ty, $value:ty,
        |$default_value:ident| $to_raw:expr,
        |$ptr:ident| $from_raw:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            keyword: Keyword,
            default: $default,
        }

        impl $name {
            #[inline]
            pub fn new(keyword: &'static str) -> Self {
                $name {
                    keyword: Keyword::new(keyword),
                    default: Default::default(),
                }
            }

            /// Use `default` if the argument is omitted.
            #[inline]
            pub fn with_default(mut self, default: $default) -> Self {
                self.default = default;
                self
            }

            keyword_methods!(builder);
        }

        #[doc = concat!("Create a new [`", stringify!($name), "`].")]
        #[inline]
        pub fn $ctor(keyword: &'static str) -> $name {
            $name::new(keyword)
        }

        unsafe impl Arg for $name {
            const FORMAT: &'static str = $fmt;
            const HAS_DEFAULT: bool = true;
            type Raw = TList![*const c_char];

            keyword_methods!();

            #[inline]
            fn init(&self, raw: RawRefs<'_, Self>) {
                let $default_value = self.default;
                *raw.head = $to_raw;
            }
        }

        unsafe impl<'py> Extract<'py> for $name {
            type Value = TList![$value];

            #[inline]
            unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
                let $ptr = *raw.head;
                Ok(tlist![$from_raw])
            }
        }
    };
}

impl_c_str!(
    /// A `str` without embedded nul characters, `s`.
    ArgCStr, arg_c_str, "s", &'static CStr, &'py CStr,
    |default| default.as_ptr(),
    |ptr| CStr::from_ptr(ptr)
);

impl_c_str!(
    /// A `str` without embedded nul characters or `None`, `z`.
    ArgOptCStr, arg_opt_c_str, "z", Option<&'static CStr>, Option<&'py CStr>,
    |default| default.map_or(std::ptr::null(), CStr::as_ptr),
    |ptr| if ptr.is_null() { None } else { Some(CStr::from_ptr(ptr)) }
);

impl_c_str!(
    /// A `bytes` object without embedded nul bytes, `y`.
    ArgBytesCStr, arg_bytes_c_str, "y", &'static CStr, &'py CStr,
    |default| default.as_ptr(),
    |ptr| CStr::from_ptr(ptr)
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::raw::RawList;

    #[test]
    fn default_is_used_when_omitted() {
        let arg = arg_str("name").with_default("anonymous");
        let mut raw = <ArgStr as Arg>::Raw::zeroed();
        arg.init(raw.refs_mut());

        let value = unsafe { arg.get(raw.refs_mut()) }.unwrap();
        assert_eq!(value.head, "anonymous");
    }

    #[test]
    fn missing_optional_str_is_none() {
        let arg = arg_opt_str("name");
        let mut raw = <ArgOptStr as Arg>::Raw::zeroed();
        arg.init(raw.refs_mut());

        let value = unsafe { arg.get(raw.refs_mut()) }.unwrap();
        assert_eq!(value.head, None);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        static BYTES: [u8; 2] = [b'a', 0xff];
        let arg = arg_str("name");
        let mut raw = <ArgStr as Arg>::Raw::zeroed();
        raw.head = BYTES.as_ptr().cast();
        raw.tail.head = 2;

        let err = unsafe { arg.get(raw.refs_mut()) }.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidUtf8(_)));
    }

    #[test]
    fn negative_length_is_an_error() {
        let arg = arg_bytes("data");
        let mut raw = <ArgBytes as Arg>::Raw::zeroed();
        raw.head = c"x".as_ptr();
        raw.tail.head = -1;

        let err = unsafe { arg.get(raw.refs_mut()) }.unwrap_err();
        assert_eq!(err, ExtractError::NegativeLength(-1));
    }

    #[test]
    fn c_str_default() {
        let arg = arg_c_str("mode").with_default(c"r");
        let mut raw = <ArgCStr as Arg>::Raw::zeroed();
        arg.init(raw.refs_mut());

        let value = unsafe { arg.get(raw.refs_mut()) }.unwrap();
        assert_eq!(value.head, c"r");
    }
}
