//! Bindings to the parts of the C API that are called directly.
//!
//! Everything else is used through [`pyo3_ffi`], which is reexported as [`crate::ffi`].

use std::ffi::{c_char, c_int};

use pyo3_ffi::PyObject;

use crate::types::raw::Slots;

extern "C" {
    // The `Py_ssize_t` variant is exported by every supported version, `PyArg_ParseTupleAndKeywords`
    // itself expects `int` lengths for the `#` format units unless `PY_SSIZE_T_CLEAN` was defined
    // when the caller was compiled.
    #[link_name = "_PyArg_ParseTupleAndKeywords_SizeT"]
    fn parse_tuple_and_keywords(
        args: *mut PyObject,
        kwargs: *mut PyObject,
        format: *const c_char,
        keywords: *const *const c_char,
        ...
    ) -> c_int;
}

/// Call the argument parser.
///
/// Every slot is passed, unused slots are null and ignored by the parser because the format
/// consumes fewer variadic arguments.
///
/// Safety: the GIL must be held, `args` must be a tuple, `kwargs` a dict or null, and the
/// non-null slots must match the format unit that consumes them.
pub(crate) unsafe fn parse(
    args: *mut PyObject,
    kwargs: *mut PyObject,
    format: *const c_char,
    keywords: *const *const c_char,
    slots: &Slots,
) -> bool {
    let [s0, s1, s2, s3, s4, s5, s6, s7, s8, s9, s10, s11, s12, s13, s14, s15, s16, s17, s18, s19, s20, s21, s22, s23, s24, s25, s26, s27, s28, s29, s30, s31] =
        *slots;

    parse_tuple_and_keywords(
        args, kwargs, format, keywords, s0, s1, s2, s3, s4, s5, s6, s7, s8, s9, s10, s11, s12,
        s13, s14, s15, s16, s17, s18, s19, s20, s21, s22, s23, s24, s25, s26, s27, s28, s29, s30,
        s31,
    ) != 0
}
