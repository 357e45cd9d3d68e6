#![allow(dead_code)]

use std::{ffi::CString, ptr::NonNull};

use once_cell::sync::Lazy;
use pyargs::{ffi, object::ObjectRef};
use tracing_subscriber::filter::LevelFilter;

// Initializes the interpreter once and releases the GIL so every test thread can acquire it.
static INTERPRETER: Lazy<()> = Lazy::new(|| unsafe {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::DEBUG)
        .try_init();

    ffi::Py_InitializeEx(0);
    ffi::PyEval_SaveThread();
});

struct Gil(ffi::PyGILState_STATE);

impl Drop for Gil {
    fn drop(&mut self) {
        unsafe { ffi::PyGILState_Release(self.0) }
    }
}

/// Run `func` with the GIL held. Any exception left behind is cleared afterwards.
pub fn with_gil<R>(func: impl FnOnce() -> R) -> R {
    Lazy::force(&INTERPRETER);
    let _gil = Gil(unsafe { ffi::PyGILState_Ensure() });
    let result = func();
    unsafe { ffi::PyErr_Clear() };
    result
}

/// An owned reference to a Python object.
pub struct Owned(NonNull<ffi::PyObject>);

impl Owned {
    /// Take ownership of a new reference.
    pub unsafe fn new(ptr: *mut ffi::PyObject) -> Self {
        Owned(NonNull::new(ptr).expect("failed to create object"))
    }

    pub fn obj(&self) -> ObjectRef<'_> {
        unsafe { ObjectRef::from_non_null(self.0) }
    }

    pub fn as_ptr(&self) -> *mut ffi::PyObject {
        self.0.as_ptr()
    }

    pub fn refcnt(&self) -> isize {
        unsafe { ffi::Py_REFCNT(self.as_ptr()) }
    }

    fn into_ptr(self) -> *mut ffi::PyObject {
        let ptr = self.as_ptr();
        std::mem::forget(self);
        ptr
    }
}

impl Clone for Owned {
    fn clone(&self) -> Self {
        unsafe { ffi::Py_INCREF(self.as_ptr()) };
        Owned(self.0)
    }
}

impl Drop for Owned {
    fn drop(&mut self) {
        unsafe { ffi::Py_DECREF(self.as_ptr()) }
    }
}

pub fn int(value: i64) -> Owned {
    unsafe { Owned::new(ffi::PyLong_FromLongLong(value)) }
}

pub fn float(value: f64) -> Owned {
    unsafe { Owned::new(ffi::PyFloat_FromDouble(value)) }
}

pub fn complex(real: f64, imag: f64) -> Owned {
    unsafe { Owned::new(ffi::PyComplex_FromDoubles(real, imag)) }
}

pub fn boolean(value: bool) -> Owned {
    unsafe { Owned::new(ffi::PyBool_FromLong(value as _)) }
}

pub fn none() -> Owned {
    unsafe {
        let none = ffi::Py_None();
        ffi::Py_INCREF(none);
        Owned::new(none)
    }
}

pub fn string(value: &str) -> Owned {
    unsafe {
        Owned::new(ffi::PyUnicode_FromStringAndSize(
            value.as_ptr().cast(),
            value.len() as ffi::Py_ssize_t,
        ))
    }
}

/// A string with a single, possibly invalid, code point.
pub fn code_point(ordinal: u32) -> Owned {
    unsafe { Owned::new(ffi::PyUnicode_FromOrdinal(ordinal as _)) }
}

pub fn bytes(value: &[u8]) -> Owned {
    unsafe {
        Owned::new(ffi::PyBytes_FromStringAndSize(
            value.as_ptr().cast(),
            value.len() as ffi::Py_ssize_t,
        ))
    }
}

pub fn bytearray(value: &[u8]) -> Owned {
    unsafe {
        Owned::new(ffi::PyByteArray_FromStringAndSize(
            value.as_ptr().cast(),
            value.len() as ffi::Py_ssize_t,
        ))
    }
}

/// The current contents of a `bytearray`.
pub fn bytearray_contents(obj: &Owned) -> Vec<u8> {
    unsafe {
        let ptr = ffi::PyByteArray_AsString(obj.as_ptr());
        let len = ffi::PyByteArray_Size(obj.as_ptr());
        std::slice::from_raw_parts(ptr.cast::<u8>(), len as usize).to_vec()
    }
}

/// Resize a `bytearray`, which fails with a `BufferError` while a buffer view of it is alive.
pub fn resize_bytearray(obj: &Owned, len: usize) -> bool {
    unsafe { ffi::PyByteArray_Resize(obj.as_ptr(), len as ffi::Py_ssize_t) == 0 }
}

pub fn list(items: Vec<Owned>) -> Owned {
    unsafe {
        let list = Owned::new(ffi::PyList_New(items.len() as ffi::Py_ssize_t));
        for (i, item) in items.into_iter().enumerate() {
            ffi::PyList_SetItem(list.as_ptr(), i as ffi::Py_ssize_t, item.into_ptr());
        }
        list
    }
}

pub fn tuple(items: Vec<Owned>) -> Owned {
    unsafe {
        let tuple = Owned::new(ffi::PyTuple_New(items.len() as ffi::Py_ssize_t));
        for (i, item) in items.into_iter().enumerate() {
            ffi::PyTuple_SetItem(tuple.as_ptr(), i as ffi::Py_ssize_t, item.into_ptr());
        }
        tuple
    }
}

pub fn dict(items: Vec<(&str, Owned)>) -> Owned {
    unsafe {
        let dict = Owned::new(ffi::PyDict_New());
        for (key, value) in items {
            let key = CString::new(key).unwrap();
            assert_eq!(
                ffi::PyDict_SetItemString(dict.as_ptr(), key.as_ptr(), value.as_ptr()),
                0
            );
        }
        dict
    }
}

pub fn has_error() -> bool {
    unsafe { !ffi::PyErr_Occurred().is_null() }
}

/// Whether the current exception is an instance of `exc`.
pub fn error_is(exc: *mut ffi::PyObject) -> bool {
    unsafe { has_error() && ffi::PyErr_ExceptionMatches(exc) != 0 }
}

pub fn type_error() -> *mut ffi::PyObject {
    unsafe { ffi::PyExc_TypeError }
}

pub fn value_error() -> *mut ffi::PyObject {
    unsafe { ffi::PyExc_ValueError }
}

pub fn overflow_error() -> *mut ffi::PyObject {
    unsafe { ffi::PyExc_OverflowError }
}

pub fn unicode_error() -> *mut ffi::PyObject {
    unsafe { ffi::PyExc_UnicodeError }
}

pub fn buffer_error() -> *mut ffi::PyObject {
    unsafe { ffi::PyExc_BufferError }
}

pub fn system_error() -> *mut ffi::PyObject {
    unsafe { ffi::PyExc_SystemError }
}

pub fn clear_error() {
    unsafe { ffi::PyErr_Clear() }
}
