//! Matching arguments against a signature.
//!
//! A match attempt goes through the following steps:
//!
//!  1. Unless the unchecked variant is used, the positional arguments must be a tuple and the
//!     keyword arguments a dict or absent. Otherwise a `SystemError` is raised.
//!  2. The raw slots are initialized and the argument parser is called. If it rejects the
//!     arguments its exception is left in place.
//!  3. The raw slots are converted to values. If a conversion fails an exception is raised.
//!  4. The callback is called with the values.
//!  5. Every descriptor that needs cleanup releases its resources. This happens unconditionally:
//!     after a rejection by the parser, a failed conversion, a panicking callback or a successful
//!     call. Resources the parser has already released itself are null when this happens.
//!
//! A rejected match returns `false` or `None` with a Python exception set.

use std::ptr::null_mut;

use pyo3_ffi::PyObject;
use tracing::{debug, trace};

use super::{ArgList, Arguments, ExtractList};
use crate::{
    object::ObjectRef,
    sys,
    types::{
        callback::Callback,
        list::ToTuple,
        raw::{RawList, Slots},
    },
    MAX_SLOTS,
};

/// Owns the raw slots of a single match attempt and cleans them up when it's dropped.
struct RawGuard<'a, L: ArgList> {
    args: &'a L,
    raw: L::Raw,
}

impl<'a, L: ArgList> RawGuard<'a, L> {
    #[inline]
    fn new(args: &'a L) -> Self {
        let mut raw = L::Raw::zeroed();
        args.init(&mut raw);
        RawGuard { args, raw }
    }
}

impl<L: ArgList> Drop for RawGuard<'_, L> {
    fn drop(&mut self) {
        // Safety: the slots were initialized by `new`, anything the parser released on failure
        // has been nulled, and the guard is only dropped once.
        unsafe { self.args.clean(&mut self.raw) }
    }
}

impl<L: ArgList> Arguments<L> {
    /// Match the arguments and call `func` with their values if they're accepted.
    ///
    /// Returns `true` if the arguments were accepted and `func` was called. Otherwise a Python
    /// exception is set.
    #[inline]
    pub fn match_args<'py, F>(
        &self,
        args: ObjectRef<'py>,
        kwargs: Option<ObjectRef<'py>>,
        func: F,
    ) -> bool
    where
        L: ExtractList<'py>,
        F: Callback<L::Values>,
    {
        self.invoke(args, kwargs, func).is_some()
    }

    /// Match the arguments without checking that `args` is a tuple and `kwargs` a dict.
    ///
    /// Safety: `args` must be a tuple, `kwargs` must be a dict if it's provided.
    #[inline]
    pub unsafe fn match_args_unchecked<'py, F>(
        &self,
        args: ObjectRef<'py>,
        kwargs: Option<ObjectRef<'py>>,
        func: F,
    ) -> bool
    where
        L: ExtractList<'py>,
        F: Callback<L::Values>,
    {
        self.attempt::<false, _, _>(
            args.as_ptr(),
            kwargs.map_or(null_mut(), ObjectRef::as_ptr),
            |values| func.call(values),
        )
        .is_some()
    }

    /// Match the arguments and call `func` with their values if they're accepted, returning its
    /// result.
    ///
    /// Returns `None` with a Python exception set if the arguments are rejected.
    #[inline]
    pub fn invoke<'py, F>(
        &self,
        args: ObjectRef<'py>,
        kwargs: Option<ObjectRef<'py>>,
        func: F,
    ) -> Option<F::Output>
    where
        L: ExtractList<'py>,
        F: Callback<L::Values>,
    {
        // Safety: ObjectRef guarantees the GIL is held for 'py and the arguments are alive.
        unsafe {
            self.attempt::<true, _, _>(
                args.as_ptr(),
                kwargs.map_or(null_mut(), ObjectRef::as_ptr),
                |values| func.call(values),
            )
        }
    }

    /// Match the arguments and return their values as a tuple.
    ///
    /// Returns `None` with a Python exception set if the arguments are rejected.
    #[inline]
    pub fn parse<'py>(
        &self,
        args: ObjectRef<'py>,
        kwargs: Option<ObjectRef<'py>>,
    ) -> Option<<L::Values as ToTuple>::Tuple>
    where
        L: ExtractList<'py>,
        L::Values: ToTuple,
    {
        // Safety: ObjectRef guarantees the GIL is held for 'py and the arguments are alive.
        unsafe {
            self.attempt::<true, _, _>(
                args.as_ptr(),
                kwargs.map_or(null_mut(), ObjectRef::as_ptr),
                <L::Values as ToTuple>::into_tuple,
            )
        }
    }

    /// Match the arguments of a `METH_VARARGS | METH_KEYWORDS` function.
    ///
    /// Both pointers are checked, null `args` is rejected with a `SystemError`.
    ///
    /// Safety: the GIL must be held for `'py`, `args` and `kwargs` must be null or valid objects
    /// that outlive `'py`.
    #[inline]
    pub unsafe fn match_raw<'py, F>(
        &self,
        args: *mut PyObject,
        kwargs: *mut PyObject,
        func: F,
    ) -> bool
    where
        L: ExtractList<'py>,
        F: Callback<L::Values>,
    {
        self.attempt::<true, _, _>(args, kwargs, |values| func.call(values))
            .is_some()
    }

    /// Safety: the GIL must be held for `'py`, `args` and `kwargs` must be null or valid objects
    /// that outlive `'py`. If `CHECK` is false, `args` must be a tuple and `kwargs` null or a
    /// dict.
    unsafe fn attempt<'py, const CHECK: bool, R, F>(
        &self,
        args: *mut PyObject,
        kwargs: *mut PyObject,
        func: F,
    ) -> Option<R>
    where
        L: ExtractList<'py>,
        F: FnOnce(L::Values) -> R,
    {
        trace!(format = ?self.format(), checked = CHECK, "matching arguments");

        if CHECK && !valid_call(args, kwargs) {
            debug!("arguments are not a tuple and dict");
            pyo3_ffi::PyErr_BadInternalCall();
            return None;
        }

        let mut guard = RawGuard::new(&self.args);
        let mut slots: Slots = [null_mut(); MAX_SLOTS];
        guard.raw.collect_slots(&mut slots);

        let layout = self.layout();
        if !sys::parse(
            args,
            kwargs,
            layout.format_ptr(),
            layout.keywords_ptr(),
            &slots,
        ) {
            debug!(format = ?self.format(), "arguments rejected by parser");
            return None;
        }

        let values = match self.args.get(&mut guard.raw) {
            Ok(values) => values,
            Err(err) => {
                debug!(error = %err, "failed to extract argument");
                err.raise();
                return None;
            }
        };

        Some(func(values))
    }
}

#[inline]
unsafe fn valid_call(args: *mut PyObject, kwargs: *mut PyObject) -> bool {
    if args.is_null() || pyo3_ffi::PyTuple_Check(args) == 0 {
        return false;
    }

    kwargs.is_null() || pyo3_ffi::PyDict_Check(kwargs) != 0
}
