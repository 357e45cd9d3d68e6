//! Arbitrary objects.
//!
//! These descriptors produce a borrowed [`ObjectRef`], or `None` if an optional argument was
//! omitted. An explicit `None` passed by the caller is `Some` of the `None` singleton, which only
//! `O` accepts.

use std::{fmt, marker::PhantomData, ptr::addr_of_mut};

use pyo3_ffi::{self as ffi, PyObject, PyTypeObject};

use super::{keyword_methods, Arg, Extract, Keyword, RawRefs};
use crate::{error::ExtractError, object::ObjectRef, tlist, types::raw::TypeToken, TList};

/// A Python type with a statically known type object.
///
/// Safety: `type_object` must return a valid type object that lives until the interpreter is
/// finalized.
pub unsafe trait HostType: 'static {
    fn type_object() -> *mut PyTypeObject;
}

macro_rules! impl_host_type {
    ($($(#[$meta:meta])* $name:ident => $ty:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name;

            unsafe impl HostType for $name {
                #[inline]
                fn type_object() -> *mut PyTypeObject {
                    addr_of_mut!(ffi::$ty)
                }
            }
        )+
    };
}

impl_host_type! {
    /// `tuple`
    TupleType => PyTuple_Type,
    /// `dict`
    DictType => PyDict_Type,
    /// `list`
    ListType => PyList_Type,
    /// `bytes`
    BytesType => PyBytes_Type,
    /// `bytearray`
    ByteArrayType => PyByteArray_Type,
    /// `str`
    UnicodeType => PyUnicode_Type,
    /// `int`
    LongType => PyLong_Type,
    /// `float`
    FloatType => PyFloat_Type,
}

macro_rules! impl_object {
    ($(#[$meta:meta])* $name:ident, $ctor:ident, $fmt:literal) => {
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
            type Raw = TList![*mut PyObject];

            keyword_methods!();

            #[inline]
            fn init(&self, raw: RawRefs<'_, Self>) {
                *raw.head = std::ptr::null_mut();
            }
        }

        unsafe impl<'py> Extract<'py> for $name {
            type Value = TList![Option<ObjectRef<'py>>];

            #[inline]
            unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
                Ok(tlist![ObjectRef::from_ptr(*raw.head)])
            }
        }
    };
}

impl_object!(
    /// Any object, `O`.
    ArgObject,
    arg_object,
    "O"
);

impl_object!(
    /// A `bytes` object, `S`.
    ArgBytesObject,
    arg_bytes_object,
    "S"
);

impl_object!(
    /// A `bytearray` object, `Y`.
    ArgByteArrayObject,
    arg_byte_array_object,
    "Y"
);

impl_object!(
    /// A `str` object, `U`.
    ArgUnicodeObject,
    arg_unicode_object,
    "U"
);

/// An instance of `T` or one of its subtypes, `O!`.
pub struct ArgTyped<T: HostType> {
    keyword: Keyword,
    _type: PhantomData<fn() -> T>,
}

impl<T: HostType> ArgTyped<T> {
    #[inline]
    pub fn new(keyword: &'static str) -> Self {
        ArgTyped {
            keyword: Keyword::new(keyword),
            _type: PhantomData,
        }
    }

    keyword_methods!(builder);
}

/// Create a new [`ArgTyped`].
#[inline]
pub fn arg_typed<T: HostType>(keyword: &'static str) -> ArgTyped<T> {
    ArgTyped::new(keyword)
}

impl<T: HostType> Clone for ArgTyped<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: HostType> Copy for ArgTyped<T> {}

impl<T: HostType> fmt::Debug for ArgTyped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgTyped")
            .field("keyword", &self.keyword)
            .field("type", &T::type_object())
            .finish()
    }
}

unsafe impl<T: HostType> Arg for ArgTyped<T> {
    const FORMAT: &'static str = "O!";
    type Raw = TList![TypeToken, *mut PyObject];

    keyword_methods!();

    #[inline]
    fn init(&self, raw: RawRefs<'_, Self>) {
        *raw.head = TypeToken::new(T::type_object());
        *raw.tail.head = std::ptr::null_mut();
    }
}

unsafe impl<'py, T: HostType> Extract<'py> for ArgTyped<T> {
    type Value = TList![Option<ObjectRef<'py>>];

    #[inline]
    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
        Ok(tlist![ObjectRef::from_ptr(*raw.tail.head)])
    }
}

/// An instance of a type whose type object is only known at runtime, `O!`.
///
/// This is typically used for extension types created with `PyType_FromSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgInstance {
    keyword: Keyword,
    ty: TypeToken,
}

impl ArgInstance {
    /// Create a new descriptor that only accepts instances of `ty`.
    ///
    /// Safety: `ty` must be a type object that outlives every use of this descriptor.
    #[inline]
    pub unsafe fn new(keyword: &'static str, ty: *mut PyTypeObject) -> Self {
        ArgInstance {
            keyword: Keyword::new(keyword),
            ty: TypeToken::new(ty),
        }
    }

    /// The type object instances must have.
    #[inline]
    pub fn type_object(&self) -> *mut PyTypeObject {
        self.ty.as_ptr()
    }

    keyword_methods!(builder);
}

// Safety: the type object is only read by the argument parser, which requires the GIL.
unsafe impl Send for ArgInstance {}
unsafe impl Sync for ArgInstance {}

unsafe impl Arg for ArgInstance {
    const FORMAT: &'static str = "O!";
    type Raw = TList![TypeToken, *mut PyObject];

    keyword_methods!();

    #[inline]
    fn init(&self, raw: RawRefs<'_, Self>) {
        *raw.head = self.ty;
        *raw.tail.head = std::ptr::null_mut();
    }
}

unsafe impl<'py> Extract<'py> for ArgInstance {
    type Value = TList![Option<ObjectRef<'py>>];

    #[inline]
    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
        Ok(tlist![ObjectRef::from_ptr(*raw.tail.head)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::raw::RawList;

    #[test]
    fn type_token_is_reasserted() {
        let arg = arg_typed::<DictType>("mapping");
        let mut raw = <ArgTyped<DictType> as Arg>::Raw::zeroed();

        arg.init(raw.refs_mut());
        assert_eq!(raw.head.as_ptr(), DictType::type_object());

        raw.head = TypeToken::new(std::ptr::null_mut());
        arg.init(raw.refs_mut());
        assert_eq!(raw.head.as_ptr(), DictType::type_object());
    }
}
