//! Argument descriptors.
//!
//! A descriptor describes how a single argument is parsed: the format unit passed to the argument
//! parser, the raw slots that format unit writes to, and how those slots are converted to the
//! value handed to the callback. Descriptors also carry the keyword of the argument and its
//! default value, and release anything the argument parser allocated on their behalf.
//!
//! Markers are descriptors without slots and values that only contribute to the format string.
//! They separate required from optional arguments ([`optional`]), positional from keyword-only
//! arguments ([`kw_only`]), and mark all preceding arguments as positional-only ([`pos_only`]).
//!
//! Every descriptor implements [`Arg`], which describes its layout, and [`Extract`], which
//! converts the parsed slots to a value. Custom descriptors can be written by implementing both
//! traits, see the `cleanup` integration test for an example.

pub mod buffer;
pub mod encoded;
pub mod marker;
pub mod numeric;
pub mod object;
pub mod path;
pub mod string;
#[cfg(feature = "pyo3")]
pub mod wrappers;

pub use self::{
    marker::{kw_only, optional, pos_only, KwOnly, Optional, PosOnly},
    numeric::*,
};
use crate::{
    error::ExtractError,
    types::{list::TypeList, raw::RawList},
};

/// Mutable references to the raw slots of the descriptor `A`.
pub type RawRefs<'a, A> = <<A as Arg>::Raw as RawList>::RefsMut<'a>;

/// The structural markers that can appear in an argument signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// All following arguments are optional, `|`.
    Optional,
    /// All following arguments are keyword-only, `$`.
    KeywordOnly,
    /// All preceding arguments are positional-only. This marker has no format unit, the keywords
    /// of the preceding arguments are left empty instead.
    PositionalOnly,
}

/// Whether a descriptor produces a value or is a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Value,
    Marker(Marker),
}

/// The layout of an argument descriptor.
///
/// Safety: `FORMAT` must be a sequence of format units that consumes exactly the slots in `Raw`,
/// in order. Markers must have no slots.
pub unsafe trait Arg: 'static {
    /// The format units of this argument.
    const FORMAT: &'static str;

    /// Whether this descriptor produces a value.
    const KIND: ArgKind = ArgKind::Value;

    /// Whether `init` writes a default value the parser leaves in place if the argument is
    /// omitted.
    const HAS_DEFAULT: bool = false;

    /// Whether `clean` must be called after the argument has been parsed.
    const HAS_CLEANUP: bool = false;

    /// The slots written to by the argument parser.
    type Raw: RawList;

    /// The keyword of this argument, markers return an empty string.
    fn keyword(&self) -> &str {
        ""
    }

    /// Whether this argument can only be passed by position.
    fn is_positional_only(&self) -> bool {
        false
    }

    /// Prepare the raw slots before the argument parser is called.
    fn init(&self, raw: RawRefs<'_, Self>);

    /// Release everything the argument parser allocated for this argument.
    ///
    /// This is called after every call of the argument parser, whether it succeeded or not. If
    /// it failed, resources it released itself have been nulled and must be skipped.
    ///
    /// Safety: the slots must have been initialized by [`Arg::init`] and passed to the argument
    /// parser, and `clean` must be called at most once after it returned.
    unsafe fn clean(&self, _raw: RawRefs<'_, Self>) {}
}

/// Convert the raw slots of a parsed argument to its value.
///
/// The values of descriptors that borrow from the arguments, like [`ArgStr`], live for `'py`.
/// Descriptors that need cleanup copy their data instead, so no value outlives the resources
/// released by [`Arg::clean`].
///
/// Safety: `get` must only return values that are valid for `'py` given the raw slots written by
/// a successful call of the argument parser.
///
/// [`ArgStr`]: crate::arg::string::ArgStr
pub unsafe trait Extract<'py>: Arg {
    /// A list with the value of this argument, or `Nil` for markers.
    type Value: TypeList;

    /// Convert the raw slots.
    ///
    /// Safety: the argument parser must have succeeded, the GIL must be held for `'py` and the
    /// arguments must outlive `'py`.
    unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError>;
}

/// The keyword of an argument that produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Keyword {
    name: &'static str,
    positional_only: bool,
}

impl Keyword {
    #[inline]
    pub(crate) const fn new(name: &'static str) -> Self {
        Keyword {
            name,
            positional_only: false,
        }
    }

    #[inline]
    pub(crate) const fn positional_only(self) -> Self {
        Keyword {
            name: self.name,
            positional_only: true,
        }
    }

    #[inline]
    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) const fn is_positional_only(&self) -> bool {
        self.positional_only
    }
}

/// Implements the keyword-related parts of `Arg` and the `positional_only` builder method for a
/// descriptor with a `keyword: Keyword` field.
macro_rules! keyword_methods {
    () => {
        fn keyword(&self) -> &str {
            self.keyword.name()
        }

        fn is_positional_only(&self) -> bool {
            self.keyword.is_positional_only()
        }
    };
    (builder) => {
        /// Only accept this argument by position, its keyword is not passed to the argument
        /// parser.
        pub fn positional_only(mut self) -> Self {
            self.keyword = self.keyword.positional_only();
            self
        }
    };
}

pub(crate) use keyword_methods;
