//! Overload resolution.
//!
//! An overload is a pair of a signature and a callback. [`dispatch_overloads`] tries a tuple
//! of overloads in order and calls the callback of the first one whose signature accepts the
//! arguments. Every overload is attempted at most once.
//!
//! The exception raised by a rejected attempt is cleared before the next one is made. If no
//! overload matches, the exception of the last attempt is left in place.
//!
//! ```no_run
//! use std::cell::Cell;
//!
//! use pyargs::{object::ObjectRef, prelude::*};
//!
//! fn area(args: ObjectRef<'_>, kwargs: Option<ObjectRef<'_>>) -> Option<f64> {
//!     let square = Arguments::new((arg_f64("side"),)).ok()?;
//!     let rect = Arguments::new((arg_f64("width"), arg_f64("height"))).ok()?;
//!
//!     let area = Cell::new(None);
//!     dispatch_overloads(
//!         args,
//!         kwargs,
//!         (
//!             (&square, |side: f64| area.set(Some(side * side))),
//!             (&rect, |w: f64, h: f64| area.set(Some(w * h))),
//!         ),
//!     );
//!     area.get()
//! }
//! ```

use tracing::debug;

use super::{Arguments, ExtractList};
use crate::{object::ObjectRef, types::callback::Callback};

/// A signature paired with the callback that's called if it matches.
pub trait Overload<'py> {
    /// Attempt to match the arguments, returns `true` if the callback was called.
    fn attempt(self, args: ObjectRef<'py>, kwargs: Option<ObjectRef<'py>>) -> bool;
}

impl<'a, 'py, L, F> Overload<'py> for (&'a Arguments<L>, F)
where
    L: ExtractList<'py>,
    F: Callback<L::Values>,
{
    #[inline]
    fn attempt(self, args: ObjectRef<'py>, kwargs: Option<ObjectRef<'py>>) -> bool {
        self.0.match_args(args, kwargs, self.1)
    }
}

/// A tuple of overloads, implemented for tuples of up to 12 overloads.
pub trait Overloads<'py> {
    /// Try every overload in order until one matches.
    fn dispatch(self, args: ObjectRef<'py>, kwargs: Option<ObjectRef<'py>>) -> bool;
}

macro_rules! impl_overloads {
    ($($t:ident),+) => {
        impl<'py, $($t: Overload<'py>),+> Overloads<'py> for ($($t,)+) {
            #[allow(non_snake_case)]
            fn dispatch(self, args: ObjectRef<'py>, kwargs: Option<ObjectRef<'py>>) -> bool {
                let ($($t,)+) = self;
                let mut index = 0usize;
                $(
                    if index > 0 {
                        debug!(overload = index - 1, "overload rejected arguments");
                        // Safety: ObjectRef guarantees the GIL is held for 'py.
                        unsafe { pyo3_ffi::PyErr_Clear() };
                    }

                    if $t.attempt(args, kwargs) {
                        return true;
                    }

                    index += 1;
                )+

                debug!(overloads = index, "no overload accepted arguments");
                false
            }
        }
    };
}

macro_rules! impl_overloads_all {
    () => {};
    ($head:ident $(, $tail:ident)*) => {
        impl_overloads!($head $(, $tail)*);
        impl_overloads_all!($($tail),*);
    };
}

impl_overloads_all!(A, B, C, D, E, F, G, H, I, J, K, L);

/// Call the callback of the first overload whose signature accepts the arguments.
///
/// Returns `false` with the exception of the last attempt set if no overload matches.
#[inline]
pub fn dispatch_overloads<'py, O>(
    args: ObjectRef<'py>,
    kwargs: Option<ObjectRef<'py>>,
    overloads: O,
) -> bool
where
    O: Overloads<'py>,
{
    overloads.dispatch(args, kwargs)
}
