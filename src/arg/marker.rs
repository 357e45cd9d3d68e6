//! Markers that separate groups of arguments.

use super::{Arg, ArgKind, Extract, Marker, RawRefs};
use crate::{error::ExtractError, types::list::Nil};

macro_rules! impl_marker {
    ($(#[$meta:meta])* $name:ident, $ctor:ident, $marker:expr, $fmt:literal) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name;

        $(#[$meta])*
        #[inline]
        pub const fn $ctor() -> $name {
            $name
        }

        unsafe impl Arg for $name {
            const FORMAT: &'static str = $fmt;
            const KIND: ArgKind = ArgKind::Marker($marker);
            type Raw = Nil;

            #[inline]
            fn init(&self, _raw: RawRefs<'_, Self>) {}
        }

        unsafe impl<'py> Extract<'py> for $name {
            type Value = Nil;

            #[inline]
            unsafe fn get(&self, _raw: RawRefs<'_, Self>) -> Result<Nil, ExtractError> {
                Ok(Nil)
            }
        }
    };
}

impl_marker!(
    /// The arguments that follow are optional.
    Optional,
    optional,
    Marker::Optional,
    "|"
);

impl_marker!(
    /// The arguments that follow are keyword-only, must appear after [`optional`].
    KwOnly,
    kw_only,
    Marker::KeywordOnly,
    "$"
);

impl_marker!(
    /// The arguments that precede this marker are positional-only.
    PosOnly,
    pos_only,
    Marker::PositionalOnly,
    ""
);
