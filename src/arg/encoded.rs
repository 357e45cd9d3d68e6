//! Strings encoded by the argument parser.
//!
//! The `es` and `et` format units encode a `str` with the codec named by an [`Encoding`] into a
//! buffer allocated by the parser. `et` accepts `bytes` and `bytearray` objects too, these are
//! passed through unchanged. The `#` variants also return the length of the encoded data and
//! allow it to contain nul bytes.
//!
//! The buffer is freed when the arguments have been handled, the value is a copy of its contents.
//! If the parser rejects the arguments after allocating a buffer it frees the buffer itself and
//! nulls the slot. Releases of CPython before 3.10.9 and 3.11.1 free it without nulling the slot,
//! these descriptors must not be used with them.

use std::{
    ffi::{c_char, CStr},
    fmt,
    marker::PhantomData,
};

use pyo3_ffi::{self as ffi, Py_ssize_t};

use super::{keyword_methods, string::raw_bytes, Arg, Extract, Keyword, RawRefs};
use crate::{
    error::ExtractError,
    tlist,
    types::raw::EncodingToken,
    TList,
};

/// The name of a codec known to Python.
pub trait Encoding: 'static {
    const NAME: &'static CStr;
}

macro_rules! impl_encoding {
    ($($(#[$meta:meta])* $name:ident => $codec:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Encoding for $name {
                const NAME: &'static CStr = $codec;
            }
        )+
    };
}

impl_encoding! {
    Utf8 => c"utf-8",
    Utf16 => c"utf-16",
    Utf32 => c"utf-32",
    Ascii => c"ascii",
    Latin1 => c"latin1",
    Iso8859 => c"iso8859",
    /// Identical to [`Latin1`], under the name used by the ISO standard.
    #[allow(non_camel_case_types)]
    Iso8859_1 => c"iso8859-1",
}

/// Free the buffer allocated by the argument parser.
///
/// Safety: `buffer` must be null or have been allocated by the argument parser.
#[inline]
unsafe fn free_buffer(buffer: &mut *mut c_char) {
    if !(*buffer).is_null() {
        ffi::PyMem_Free((*buffer).cast());
        *buffer = std::ptr::null_mut();
    }
}

macro_rules! impl_encoded {
    (
        $(#[$meta:meta])*
        $name:ident, $ctor:ident, $fmt:literal, $raw:ty,
        |$slots:ident| $from_raw:expr,
        |$clean_slots:ident| $clean:expr
    ) => {
        $(#[$meta])*
        pub struct $name<E: Encoding = Utf8> {
            keyword: Keyword,
            _encoding: PhantomData<fn() -> E>,
        }

        impl<E: Encoding> $name<E> {
            #[inline]
            pub fn new(keyword: &'static str) -> Self {
                $name {
                    keyword: Keyword::new(keyword),
                    _encoding: PhantomData,
                }
            }

            keyword_methods!(builder);
        }

        #[doc = concat!("Create a new [`", stringify!($name), "`].")]
        #[inline]
        pub fn $ctor<E: Encoding>(keyword: &'static str) -> $name<E> {
            $name::new(keyword)
        }

        impl<E: Encoding> Clone for $name<E> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<E: Encoding> Copy for $name<E> {}

        impl<E: Encoding> fmt::Debug for $name<E> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("keyword", &self.keyword)
                    .field("encoding", &E::NAME)
                    .finish()
            }
        }

        unsafe impl<E: Encoding> Arg for $name<E> {
            const FORMAT: &'static str = $fmt;
            const HAS_CLEANUP: bool = true;
            type Raw = $raw;

            keyword_methods!();

            #[inline]
            fn init(&self, raw: RawRefs<'_, Self>) {
                // The parser only allocates a buffer if the slot is null.
                *raw.head = EncodingToken::new(E::NAME);
                *raw.tail.head = std::ptr::null_mut();
            }

            #[inline]
            unsafe fn clean(&self, $clean_slots: RawRefs<'_, Self>) {
                $clean
            }
        }

        unsafe impl<'py, E: Encoding> Extract<'py> for $name<E> {
            type Value = TList![Vec<u8>];

            #[inline]
            unsafe fn get(&self, $slots: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
                Ok(tlist![$from_raw])
            }
        }
    };
}

impl_encoded!(
    /// A `str` encoded with `E`, `es`. The encoded data must not contain nul bytes.
    ///
    /// An omitted argument is empty.
    ArgEncoded, arg_encoded, "es", TList![EncodingToken, *mut c_char],
    |raw| copy_c_str(*raw.tail.head),
    |raw| free_buffer(raw.tail.head)
);

impl_encoded!(
    /// A `str` encoded with `E`, or a `bytes` or `bytearray` object, `et`. The data must not
    /// contain nul bytes.
    ///
    /// An omitted argument is empty.
    ArgEncodedText, arg_encoded_text, "et", TList![EncodingToken, *mut c_char],
    |raw| copy_c_str(*raw.tail.head),
    |raw| free_buffer(raw.tail.head)
);

impl_encoded!(
    /// A `str` encoded with `E`, `es#`.
    ///
    /// An omitted argument is empty.
    ArgEncodedLen, arg_encoded_len, "es#", TList![EncodingToken, *mut c_char, Py_ssize_t],
    |raw| raw_bytes(*raw.tail.head, *raw.tail.tail.head)?.to_vec(),
    |raw| free_buffer(raw.tail.head)
);

impl_encoded!(
    /// A `str` encoded with `E`, or a `bytes` or `bytearray` object, `et#`.
    ///
    /// An omitted argument is empty.
    ArgEncodedTextLen, arg_encoded_text_len, "et#", TList![EncodingToken, *mut c_char, Py_ssize_t],
    |raw| raw_bytes(*raw.tail.head, *raw.tail.tail.head)?.to_vec(),
    |raw| free_buffer(raw.tail.head)
);

/// Copy a nul-terminated buffer, a null pointer is treated as an empty string.
#[inline]
unsafe fn copy_c_str(ptr: *mut c_char) -> Vec<u8> {
    if ptr.is_null() {
        return Vec::new();
    }

    CStr::from_ptr(ptr).to_bytes().to_vec()
}
