//! Heterogeneous type lists.
//!
//! An argument signature is an ordered list of descriptors, each of which contributes some
//! raw slots and zero or one values. These lists are represented as nested [`Cons`] cells
//! terminated by [`Nil`], which lets the layouts of all descriptors be concatenated and split
//! again at compile time. The macros [`TList!`], [`tlist!`] and [`tlist_pat!`] can be used to
//! write the type, a value and a pattern of such a list without nesting them manually.
//!
//! [`TList!`]: crate::TList
//! [`tlist!`]: crate::tlist
//! [`tlist_pat!`]: crate::tlist_pat

/// The empty list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nil;

/// A list with at least one element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cons<H, T> {
    pub head: H,
    pub tail: T,
}

/// Trait implemented by [`Nil`] and [`Cons`].
pub trait TypeList: Sized {
    /// The number of elements in the list.
    const LEN: usize;
}

impl TypeList for Nil {
    const LEN: usize = 0;
}

impl<H, T: TypeList> TypeList for Cons<H, T> {
    const LEN: usize = 1 + T::LEN;
}

/// Append the list `R` to `Self`.
///
/// Concatenation preserves the order of both lists and `Nil` is its identity on either side.
pub trait Concat<R: TypeList>: TypeList {
    /// The elements of `Self` followed by the elements of `R`.
    type Output: TypeList;

    /// Concatenate two list values.
    fn concat(self, rhs: R) -> Self::Output;
}

impl<R: TypeList> Concat<R> for Nil {
    type Output = R;

    #[inline]
    fn concat(self, rhs: R) -> R {
        rhs
    }
}

impl<H, T, R> Concat<R> for Cons<H, T>
where
    T: Concat<R>,
    R: TypeList,
{
    type Output = Cons<H, T::Output>;

    #[inline]
    fn concat(self, rhs: R) -> Self::Output {
        Cons {
            head: self.head,
            tail: self.tail.concat(rhs),
        }
    }
}

/// The concatenation of `A` and `B`.
pub type Join<A, B> = <A as Concat<B>>::Output;

/// Convert a list to the tuple with the same elements.
///
/// This trait is implemented for lists of up to 16 elements.
pub trait ToTuple: TypeList {
    type Tuple;

    fn into_tuple(self) -> Self::Tuple;
}

impl ToTuple for Nil {
    type Tuple = ();

    #[inline]
    fn into_tuple(self) -> Self::Tuple {}
}

macro_rules! impl_to_tuple {
    ($($t:ident),+) => {
        impl<$($t),+> ToTuple for $crate::TList![$($t),+] {
            type Tuple = ($($t,)+);

            #[inline]
            #[allow(non_snake_case)]
            fn into_tuple(self) -> Self::Tuple {
                let $crate::tlist_pat![$($t),+] = self;
                ($($t,)+)
            }
        }
    };
}

macro_rules! impl_to_tuples {
    () => {};
    ($head:ident $(, $tail:ident)*) => {
        impl_to_tuple!($head $(, $tail)*);
        impl_to_tuples!($($tail),*);
    };
}

impl_to_tuples!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);

/// The type of a list with the given element types.
///
/// `TList![i32, f64]` is `Cons<i32, Cons<f64, Nil>>`.
#[macro_export]
macro_rules! TList {
    () => { $crate::types::list::Nil };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::types::list::Cons<$head, $crate::TList![$($tail),*]>
    };
}

/// Construct a list value from the given expressions.
#[macro_export]
macro_rules! tlist {
    () => { $crate::types::list::Nil };
    ($head:expr $(, $tail:expr)* $(,)?) => {
        $crate::types::list::Cons {
            head: $head,
            tail: $crate::tlist![$($tail),*],
        }
    };
}

/// Destructure a list value.
#[macro_export]
macro_rules! tlist_pat {
    () => { $crate::types::list::Nil };
    ($head:pat_param $(, $tail:pat_param)* $(,)?) => {
        $crate::types::list::Cons {
            head: $head,
            tail: $crate::tlist_pat![$($tail),*],
        }
    };
}
