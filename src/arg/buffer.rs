//! Objects that support the buffer protocol.
//!
//! The parser acquires a buffer view that must be released once the arguments are no longer used.
//! The contents of read-only buffers are copied so the value doesn't depend on the view. Writable
//! buffers can't be copied, their value is a [`WritableBuffer`] that must not be used after the
//! callback has returned.

use std::{fmt, marker::PhantomData, slice};

use pyo3_ffi::{self as ffi, Py_buffer};

use super::{keyword_methods, string::raw_bytes, Arg, Extract, Keyword, RawRefs};
use crate::{error::ExtractError, tlist, TList};

/// Copy the contents of a buffer view.
///
/// Safety: `view` must be zeroed or filled in by the argument parser.
unsafe fn copy_view(view: &Py_buffer) -> Result<Vec<u8>, ExtractError> {
    Ok(raw_bytes(view.buf.cast_const().cast(), view.len)?.to_vec())
}

/// Release a buffer view if it holds an object.
///
/// Safety: `view` must be zeroed, released, or filled in by the argument parser.
unsafe fn release_view(view: &mut Py_buffer) {
    if !view.obj.is_null() {
        ffi::PyBuffer_Release(view);
    }
}

macro_rules! impl_buffer {
    (
        $(#[$meta:meta])*
        $name:ident, $ctor:ident, $fmt:literal, $value:ty,
        |$view:ident| $from_raw:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            keyword: Keyword,
        }

        impl $name {
            #[inline]
            pub fn new(keyword: &'static str) -> Self {
                $name {
                    keyword: Keyword::new(keyword),
                }
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
            const HAS_CLEANUP: bool = true;
            type Raw = TList![Py_buffer];

            keyword_methods!();

            #[inline]
            fn init(&self, _raw: RawRefs<'_, Self>) {}

            #[inline]
            unsafe fn clean(&self, raw: RawRefs<'_, Self>) {
                release_view(raw.head);
            }
        }

        unsafe impl<'py> Extract<'py> for $name {
            type Value = TList![$value];

            #[inline]
            unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
                let $view: &Py_buffer = raw.head;
                Ok(tlist![$from_raw])
            }
        }
    };
}

impl_buffer!(
    /// A `str` or bytes-like object, `s*`. Strings are encoded as UTF-8.
    ///
    /// An omitted argument is empty.
    ArgStrBuffer, arg_str_buffer, "s*", Vec<u8>,
    |view| copy_view(view)?
);

impl_buffer!(
    /// A bytes-like object, `y*`.
    ///
    /// An omitted argument is empty.
    ArgByteBuffer, arg_byte_buffer, "y*", Vec<u8>,
    |view| copy_view(view)?
);

impl_buffer!(
    /// A `str`, bytes-like object or `None`, `z*`.
    ///
    /// Both `None` and an omitted argument produce `None`.
    ArgOptBuffer, arg_opt_buffer, "z*", Option<Vec<u8>>,
    |view| if view.buf.is_null() { None } else { Some(copy_view(view)?) }
);

/// A writable bytes-like object, `w*`.
///
/// An omitted argument is an empty buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgWritableBuffer {
    keyword: Keyword,
}

impl ArgWritableBuffer {
    #[inline]
    pub fn new(keyword: &'static str) -> Self {
        ArgWritableBuffer {
            keyword: Keyword::new(keyword),
        }
    }

    keyword_methods!(builder);
}

/// Create a new [`ArgWritableBuffer`].
#[inline]
pub fn arg_writable_buffer(keyword: &'static str) -> ArgWritableBuffer {
    ArgWritableBuffer::new(keyword)
}

unsafe impl Arg for ArgWritableBuffer {
    const FORMAT: &'static str = "w*";
    const HAS_CLEANUP: bool = true;
    type Raw = TList![Py_buffer];

    keyword_methods!();

    #[inline]
    fn init(&self, _raw: RawRefs<'_, Self>) {}

    #[inline]
    unsafe fn clean(&self, raw: RawRefs<'_, Self>) {
        release_view(raw.head);
    }
}

unsafe impl<'py> Extract<'py> for ArgWritableBuffer {
    type Value = TList![WritableBuffer<'py>];

    #[inline]
    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
        let view: &Py_buffer = raw.head;
        let len = usize::try_from(view.len).map_err(|_| ExtractError::NegativeLength(view.len))?;
        Ok(tlist![WritableBuffer {
            buf: view.buf.cast(),
            len,
            _marker: PhantomData,
        }])
    }
}

/// The memory of a buffer view acquired by [`ArgWritableBuffer`].
///
/// The view is released when the callback returns, the memory must not be accessed after that.
/// Nothing prevents the same object from being passed for two writable arguments, in which case
/// both handles refer to the same memory.
pub struct WritableBuffer<'py> {
    buf: *mut u8,
    len: usize,
    _marker: PhantomData<&'py mut [u8]>,
}

impl<'py> WritableBuffer<'py> {
    /// Pointer to the start of the buffer, null if the argument was omitted.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.buf
    }

    /// Length of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the contents of the buffer.
    ///
    /// Safety: the callback this buffer was passed to must not have returned, and the memory
    /// must not be written through another handle while the slice is alive.
    #[inline]
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.buf.is_null() {
            return &[];
        }

        slice::from_raw_parts(self.buf, self.len)
    }

    /// Mutably borrow the contents of the buffer.
    ///
    /// Safety: the callback this buffer was passed to must not have returned, and the memory
    /// must not be accessed through another handle while the slice is alive.
    #[inline]
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.buf.is_null() {
            return &mut [];
        }

        slice::from_raw_parts_mut(self.buf, self.len)
    }
}

impl fmt::Debug for WritableBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritableBuffer")
            .field("buf", &self.buf)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::raw::RawList;

    #[test]
    fn omitted_buffers() {
        let mut raw = <ArgOptBuffer as Arg>::Raw::zeroed();
        let arg = arg_opt_buffer("data");
        arg.init(raw.refs_mut());
        let value = unsafe { arg.get(raw.refs_mut()) }.unwrap();
        assert_eq!(value.head, None);

        let mut raw = <ArgByteBuffer as Arg>::Raw::zeroed();
        let arg = arg_byte_buffer("data");
        arg.init(raw.refs_mut());
        let value = unsafe { arg.get(raw.refs_mut()) }.unwrap();
        assert!(value.head.is_empty());

        // Nothing to release
        unsafe { arg.clean(raw.refs_mut()) };
    }

    #[test]
    fn omitted_writable_buffer() {
        let mut raw = <ArgWritableBuffer as Arg>::Raw::zeroed();
        let arg = arg_writable_buffer("out");
        arg.init(raw.refs_mut());

        let mut value = unsafe { arg.get(raw.refs_mut()) }.unwrap().head;
        assert!(value.as_ptr().is_null());
        assert!(value.is_empty());
        assert!(unsafe { value.as_mut_slice() }.is_empty());

        unsafe { arg.clean(raw.refs_mut()) };
    }
}
