//! Borrowed references to Python objects.

use std::{fmt, marker::PhantomData, ptr::NonNull};

use pyo3_ffi::{self as ffi, PyObject};

/// A borrowed reference to a Python object that is valid for `'py`.
///
/// This is the value produced by the object descriptors and the type used to hand positional and
/// keyword arguments to an [`Arguments`]. The reference count is never changed, the object must
/// be kept alive by someone else, typically the argument tuple it was taken from.
///
/// [`Arguments`]: crate::signature::Arguments
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ObjectRef<'py> {
    ptr: NonNull<PyObject>,
    _marker: PhantomData<&'py PyObject>,
}

impl<'py> ObjectRef<'py> {
    /// Wrap a pointer to an object, returns `None` if it's null.
    ///
    /// Safety: the GIL must be held for `'py` and the object must remain alive for `'py`.
    #[inline]
    pub unsafe fn from_ptr(ptr: *mut PyObject) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self::from_non_null(ptr))
    }

    /// Wrap a pointer to an object.
    ///
    /// Safety: the GIL must be held for `'py` and the object must remain alive for `'py`.
    #[inline]
    pub unsafe fn from_non_null(ptr: NonNull<PyObject>) -> Self {
        ObjectRef {
            ptr,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn as_ptr(self) -> *mut PyObject {
        self.ptr.as_ptr()
    }

    /// Returns `true` if this is the `None` singleton.
    #[inline]
    pub fn is_none(self) -> bool {
        // Safety: the GIL is held for 'py
        unsafe { self.as_ptr() == ffi::Py_None() }
    }

    /// Returns `true` if `self` and `other` are the same object.
    #[inline]
    pub fn is(self, other: ObjectRef<'_>) -> bool {
        self.ptr == other.ptr
    }

    /// Returns `true` if this object is an instance of `ty` or one of its subtypes.
    #[inline]
    pub fn is_instance_of(self, ty: *mut ffi::PyTypeObject) -> bool {
        // Safety: the GIL is held for 'py
        unsafe { ffi::PyObject_TypeCheck(self.as_ptr(), ty) != 0 }
    }

    /// Returns `true` if this object is a tuple.
    #[inline]
    pub fn is_tuple(self) -> bool {
        unsafe { ffi::PyTuple_Check(self.as_ptr()) != 0 }
    }

    /// Returns `true` if this object is a dict.
    #[inline]
    pub fn is_dict(self) -> bool {
        unsafe { ffi::PyDict_Check(self.as_ptr()) != 0 }
    }
}

impl fmt::Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectRef").field(&self.ptr).finish()
    }
}
