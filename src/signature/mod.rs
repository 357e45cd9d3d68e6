//! Argument signatures.
//!
//! An [`Arguments`] owns an ordered list of argument descriptors and the format string and
//! keyword table computed from them. It's immutable after construction and can be shared between
//! threads, so it's typically created once and stored in a static:
//!
//! ```no_run
//! use once_cell::sync::Lazy;
//! use pyargs::prelude::*;
//!
//! static ARGS: Lazy<Arguments<TList![ArgI32, Optional, ArgF32]>> = Lazy::new(|| {
//!     Arguments::new((arg_i32("x"), optional(), arg_f32("y").with_default(5.0)))
//!         .expect("invalid signature")
//! });
//! ```
//!
//! The matching methods live in the [`matcher`] module, overload resolution in [`dispatch`].

pub mod dispatch;
pub mod layout;
pub mod matcher;

use std::ffi::CStr;

use tracing::debug;

use self::layout::{Layout, LayoutBuilder};
use crate::{
    arg::{Arg, Extract},
    error::{ArgsResult, ExtractError},
    private::Private,
    tlist,
    types::{
        list::{Concat, Cons, Join, Nil, TypeList},
        raw::{RawList, SplitRaw},
    },
    TList,
};

/// A list of argument descriptors.
///
/// This trait is implemented for [`Nil`] and for every [`Cons`] whose elements implement
/// [`Arg`]. The raw slots of all descriptors are stored in a single flat list, `Raw`.
pub trait ArgList: 'static {
    /// The raw slots of all descriptors, in order.
    type Raw: RawList;

    #[doc(hidden)]
    fn describe(&self, builder: &mut LayoutBuilder, _: Private) -> ArgsResult<()>;

    /// Prepare the raw slots of all descriptors.
    fn init(&self, raw: &mut Self::Raw);

    /// Release the resources of every descriptor that needs cleanup.
    ///
    /// Safety: the slots must have been initialized by `init` and passed to the argument parser,
    /// and `clean` must be called at most once after it returned.
    unsafe fn clean(&self, raw: &mut Self::Raw);
}

impl ArgList for Nil {
    type Raw = Nil;

    #[inline]
    fn describe(&self, _builder: &mut LayoutBuilder, _: Private) -> ArgsResult<()> {
        Ok(())
    }

    #[inline]
    fn init(&self, _raw: &mut Nil) {}

    #[inline]
    unsafe fn clean(&self, _raw: &mut Nil) {}
}

impl<A, T> ArgList for Cons<A, T>
where
    A: Arg,
    T: ArgList,
    A::Raw: SplitRaw<T::Raw>,
{
    type Raw = <A::Raw as SplitRaw<T::Raw>>::Joined;

    #[inline]
    fn describe(&self, builder: &mut LayoutBuilder, _: Private) -> ArgsResult<()> {
        builder.push(&self.head)?;
        self.tail.describe(builder, Private)
    }

    #[inline]
    fn init(&self, raw: &mut Self::Raw) {
        let (head, tail) = <A::Raw as SplitRaw<T::Raw>>::split_mut(raw);
        self.head.init(head);
        self.tail.init(tail);
    }

    #[inline]
    unsafe fn clean(&self, raw: &mut Self::Raw) {
        let (head, tail) = <A::Raw as SplitRaw<T::Raw>>::split_mut(raw);
        if A::HAS_CLEANUP {
            self.head.clean(head);
        }
        self.tail.clean(tail);
    }
}

/// A list of argument descriptors that can be converted to values borrowed for `'py`.
pub trait ExtractList<'py>: ArgList {
    /// The values of all descriptors, markers contribute nothing.
    type Values: TypeList;

    /// Convert the raw slots of all descriptors, in order.
    ///
    /// Safety: the argument parser must have succeeded, the GIL must be held for `'py` and the
    /// arguments must outlive `'py`.
    unsafe fn get(&self, raw: &mut Self::Raw) -> Result<Self::Values, ExtractError>;
}

impl<'py> ExtractList<'py> for Nil {
    type Values = Nil;

    #[inline]
    unsafe fn get(&self, _raw: &mut Nil) -> Result<Nil, ExtractError> {
        Ok(Nil)
    }
}

impl<'py, A, T> ExtractList<'py> for Cons<A, T>
where
    A: Extract<'py>,
    T: ExtractList<'py>,
    A::Raw: SplitRaw<T::Raw>,
    A::Value: Concat<T::Values>,
{
    type Values = Join<A::Value, T::Values>;

    #[inline]
    unsafe fn get(&self, raw: &mut Self::Raw) -> Result<Self::Values, ExtractError> {
        let (head, tail) = <A::Raw as SplitRaw<T::Raw>>::split_mut(raw);
        let value = self.head.get(head)?;
        let values = self.tail.get(tail)?;
        Ok(value.concat(values))
    }
}

/// Conversion of a tuple of descriptors into a list of descriptors.
///
/// Implemented for tuples of up to 20 descriptors.
pub trait IntoArgList {
    type List;

    fn into_arg_list(self) -> Self::List;
}

impl IntoArgList for () {
    type List = Nil;

    #[inline]
    fn into_arg_list(self) -> Nil {
        Nil
    }
}

macro_rules! impl_into_arg_list {
    ($($t:ident),+) => {
        impl<$($t: Arg),+> IntoArgList for ($($t,)+) {
            type List = TList![$($t),+];

            #[inline]
            #[allow(non_snake_case)]
            fn into_arg_list(self) -> Self::List {
                let ($($t,)+) = self;
                tlist![$($t),+]
            }
        }
    };
}

macro_rules! impl_into_arg_lists {
    () => {};
    ($head:ident $(, $tail:ident)*) => {
        impl_into_arg_list!($head $(, $tail)*);
        impl_into_arg_lists!($($tail),*);
    };
}

impl_into_arg_lists!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T);

/// An argument signature.
///
/// See the [module-level documentation](self) for an example.
pub struct Arguments<L> {
    args: L,
    layout: Layout,
}

impl<L: ArgList> Arguments<L> {
    /// Create a signature from a tuple of descriptors.
    ///
    /// Returns an error if the signature is rejected, see [`ArgsError`] for the reasons.
    ///
    /// [`ArgsError`]: crate::error::ArgsError
    pub fn new<T>(args: T) -> ArgsResult<Self>
    where
        T: IntoArgList<List = L>,
    {
        Self::from_list(args.into_arg_list())
    }

    /// Create a signature from a list of descriptors.
    pub fn from_list(args: L) -> ArgsResult<Self> {
        let mut builder = LayoutBuilder::new();
        args.describe(&mut builder, Private)?;
        let layout = builder.finish()?;
        debug_assert_eq!(layout.slot_count(), <L::Raw as TypeList>::LEN);

        debug!(
            format = ?layout.format(),
            keywords = layout.keywords().len(),
            slots = layout.slot_count(),
            "compiled argument signature"
        );

        Ok(Arguments { args, layout })
    }

    /// The format string passed to the argument parser.
    #[inline]
    pub fn format(&self) -> &CStr {
        self.layout.format()
    }

    /// The keyword table passed to the argument parser, without its terminator.
    #[inline]
    pub fn keywords(&self) -> impl ExactSizeIterator<Item = &CStr> + '_ {
        self.layout.keywords()
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The descriptors of this signature.
    #[inline]
    pub fn args(&self) -> &L {
        &self.args
    }
}

impl<L> std::fmt::Debug for Arguments<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
