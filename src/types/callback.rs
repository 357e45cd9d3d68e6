//! Functions that can be called with the values of a list.

use super::list::Nil;

/// A function that can be called with the elements of the list `Args` as its arguments.
///
/// This trait is implemented for every `FnOnce` that takes up to 16 arguments, the argument
/// types must match the element types of `Args` exactly. Because the types of the arguments are
/// not inferred from this bound, closures must annotate their parameters:
///
/// ```
/// use pyargs::{tlist, types::callback::Callback};
///
/// let sum = (|a: i32, b: f64| a as f64 + b).call(tlist![1, 2.5]);
/// assert_eq!(sum, 3.5);
/// ```
pub trait Callback<Args> {
    /// The return type of the function.
    type Output;

    /// Call the function.
    fn call(self, args: Args) -> Self::Output;
}

impl<F, R> Callback<Nil> for F
where
    F: FnOnce() -> R,
{
    type Output = R;

    #[inline]
    fn call(self, _: Nil) -> R {
        self()
    }
}

macro_rules! impl_callback {
    ($($t:ident),+) => {
        impl<Func, Ret, $($t),+> Callback<$crate::TList![$($t),+]> for Func
        where
            Func: FnOnce($($t),+) -> Ret,
        {
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn call(self, args: $crate::TList![$($t),+]) -> Ret {
                let $crate::tlist_pat![$($t),+] = args;
                self($($t),+)
            }
        }
    };
}

macro_rules! impl_callbacks {
    () => {};
    ($head:ident $(, $tail:ident)*) => {
        impl_callback!($head $(, $tail)*);
        impl_callbacks!($($tail),*);
    };
}

impl_callbacks!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
