//! Descriptors that produce pyo3 smart pointers.
//!
//! The values are owned `Bound` references, so unlike [`ObjectRef`] they can be stored beyond
//! the callback.
//!
//! [`ObjectRef`]: crate::object::ObjectRef

use std::{fmt, marker::PhantomData};

use pyo3::{
    ffi::{PyObject, PyTypeObject},
    types::{PyAny, PyAnyMethods},
    Bound, PyTypeInfo, Python,
};

use super::{keyword_methods, Arg, Extract, Keyword, RawRefs};
use crate::{error::ExtractError, tlist, types::raw::TypeToken, TList};

/// Any object, `O`. An omitted argument is `None`, an explicit `None` is `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgAny {
    keyword: Keyword,
}

impl ArgAny {
    #[inline]
    pub fn new(keyword: &'static str) -> Self {
        ArgAny {
            keyword: Keyword::new(keyword),
        }
    }

    keyword_methods!(builder);
}

/// Create a new [`ArgAny`].
#[inline]
pub fn arg_any(keyword: &'static str) -> ArgAny {
    ArgAny::new(keyword)
}

unsafe impl Arg for ArgAny {
    const FORMAT: &'static str = "O";
    type Raw = TList![*mut PyObject];

    keyword_methods!();

    #[inline]
    fn init(&self, raw: RawRefs<'_, Self>) {
        *raw.head = std::ptr::null_mut();
    }
}

unsafe impl<'py> Extract<'py> for ArgAny {
    type Value = TList![Option<Bound<'py, PyAny>>];

    #[inline]
    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
        let py = Python::assume_gil_acquired();
        Ok(tlist![Bound::<PyAny>::from_borrowed_ptr_or_opt(py, *raw.head)])
    }
}

/// An instance of `T` or one of its subtypes, `O!`. An omitted argument is `None`.
pub struct ArgBound<T: PyTypeInfo + 'static> {
    keyword: Keyword,
    ty: TypeToken,
    _type: PhantomData<fn() -> T>,
}

impl<T: PyTypeInfo + 'static> ArgBound<T> {
    /// The type object of `T` is looked up immediately, which requires the GIL.
    #[inline]
    pub fn new(py: Python<'_>, keyword: &'static str) -> Self {
        ArgBound {
            keyword: Keyword::new(keyword),
            ty: TypeToken::new(T::type_object_raw(py)),
            _type: PhantomData,
        }
    }

    #[inline]
    pub fn type_object(&self) -> *mut PyTypeObject {
        self.ty.as_ptr()
    }

    keyword_methods!(builder);
}

/// Create a new [`ArgBound`].
#[inline]
pub fn arg_bound<T: PyTypeInfo + 'static>(py: Python<'_>, keyword: &'static str) -> ArgBound<T> {
    ArgBound::new(py, keyword)
}

impl<T: PyTypeInfo + 'static> Clone for ArgBound<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: PyTypeInfo + 'static> Copy for ArgBound<T> {}

impl<T: PyTypeInfo + 'static> fmt::Debug for ArgBound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgBound")
            .field("keyword", &self.keyword)
            .field("type", &T::NAME)
            .finish()
    }
}

// Safety: the type object is only read by the argument parser, which requires the GIL. Type
// objects live until the interpreter is finalized.
unsafe impl<T: PyTypeInfo + 'static> Send for ArgBound<T> {}
unsafe impl<T: PyTypeInfo + 'static> Sync for ArgBound<T> {}

unsafe impl<T: PyTypeInfo + 'static> Arg for ArgBound<T> {
    const FORMAT: &'static str = "O!";
    type Raw = TList![TypeToken, *mut PyObject];

    keyword_methods!();

    #[inline]
    fn init(&self, raw: RawRefs<'_, Self>) {
        *raw.head = self.ty;
        *raw.tail.head = std::ptr::null_mut();
    }
}

unsafe impl<'py, T: PyTypeInfo + 'static> Extract<'py> for ArgBound<T> {
    type Value = TList![Option<Bound<'py, T>>];

    #[inline]
    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
        let py = Python::assume_gil_acquired();
        let obj = *raw.tail.head;
        if obj.is_null() {
            return Ok(tlist![None]);
        }

        // The parser has checked the type of the object.
        let bound = Bound::<PyAny>::from_borrowed_ptr(py, obj).downcast_into_unchecked::<T>();
        Ok(tlist![Some(bound)])
    }
}
