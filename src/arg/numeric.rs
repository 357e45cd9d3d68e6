//! Numeric arguments.
//!
//! Every numeric descriptor supports a default value, which is used if the argument is optional
//! and omitted. The default of the default value is zero.
//!
//! The descriptors for the unsigned format units `B`, `H`, `I`, `k` and `K` follow the argument
//! parser in not checking for overflow, values that don't fit are truncated.

use std::ffi::{c_int, c_long, c_ulong};

use num_complex::Complex64;
use pyo3_ffi::Py_complex;

use super::{keyword_methods, Arg, Extract, Keyword, RawRefs};
use crate::{error::ExtractError, tlist, TList};

macro_rules! impl_numeric {
    (
        $(#[$meta:meta])*
        $name:ident, $ctor:ident, $fmt:literal, $ty:ty
    ) => {
        impl_numeric!(
            $(#[$meta])*
            $name, $ctor, $fmt, $ty, $ty,
            |value| value,
            |raw| Ok::<_, ExtractError>(raw)
        );
    };
    (
        $(#[$meta:meta])*
        $name:ident, $ctor:ident, $fmt:literal, $ty:ty, $raw:ty,
        |$value:ident| $to_raw:expr,
        |$raw_value:ident| $from_raw:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            keyword: Keyword,
            default: $ty,
        }

        impl $name {
            #[inline]
            pub fn new(keyword: &'static str) -> Self {
                $name {
                    keyword: Keyword::new(keyword),
                    default: Default::default(),
                }
            }

            /// Use `default` if the argument is omitted.
            #[inline]
            pub fn with_default(mut self, default: $ty) -> Self {
                self.default = default;
                self
            }

            keyword_methods!(builder);
        }

        #[doc = concat!("Create a new [`", stringify!($name), "`].")]
        #[inline]
        pub fn $ctor(keyword: &'static str) -> $name {
            $name::new(keyword)
        }

        unsafe impl Arg for $name {
            const FORMAT: &'static str = $fmt;
            const HAS_DEFAULT: bool = true;
            type Raw = TList![$raw];

            keyword_methods!();

            #[inline]
            fn init(&self, raw: RawRefs<'_, Self>) {
                let $value = self.default;
                *raw.head = $to_raw;
            }
        }

        unsafe impl<'py> Extract<'py> for $name {
            type Value = TList![$ty];

            #[inline]
            unsafe fn get(&self, raw: RawRefs<'_, Self>) -> Result<Self::Value, ExtractError> {
                let $raw_value = *raw.head;
                let value = $from_raw?;
                Ok(tlist![value])
            }
        }
    };
}

impl_numeric!(
    /// A non-negative integer that fits in an `unsigned char`, `b`.
    ArgU8, arg_u8, "b", u8
);

impl_numeric!(
    /// An integer converted to an `unsigned char` without overflow checking, `B`.
    ArgU8Unchecked, arg_u8_unchecked, "B", u8
);

impl_numeric!(
    /// A `short`, `h`.
    ArgI16, arg_i16, "h", i16
);

impl_numeric!(
    /// An `unsigned short` without overflow checking, `H`.
    ArgU16, arg_u16, "H", u16
);

impl_numeric!(
    /// An `int`, `i`.
    ArgI32, arg_i32, "i", i32
);

impl_numeric!(
    /// An `unsigned int` without overflow checking, `I`.
    ArgU32, arg_u32, "I", u32
);

impl_numeric!(
    /// A `long`, `l`.
    ArgLong, arg_long, "l", c_long
);

impl_numeric!(
    /// An `unsigned long` without overflow checking, `k`.
    ArgULong, arg_ulong, "k", c_ulong
);

impl_numeric!(
    /// A `long long`, `L`.
    ArgI64, arg_i64, "L", i64
);

impl_numeric!(
    /// An `unsigned long long` without overflow checking, `K`.
    ArgU64, arg_u64, "K", u64
);

impl_numeric!(
    /// A `Py_ssize_t`, `n`.
    ArgIsize, arg_isize, "n", isize
);

impl_numeric!(
    /// A `float`, `f`.
    ArgF32, arg_f32, "f", f32
);

impl_numeric!(
    /// A `double`, `d`.
    ArgF64, arg_f64, "d", f64
);

impl_numeric!(
    /// A `bytes` or `bytearray` object of length 1, converted to its only byte, `c`.
    ArgByteChar, arg_byte_char, "c", u8
);

impl_numeric!(
    /// The truth value of an arbitrary object, `p`.
    ArgBool, arg_bool, "p", bool, c_int,
    |value| value as c_int,
    |raw| Ok::<_, ExtractError>(raw != 0)
);

impl_numeric!(
    /// A `str` object of length 1, converted to its only character, `C`.
    ///
    /// Python strings can contain lone surrogates which are not valid `char`s, extracting these
    /// raises a `ValueError`.
    ArgChar, arg_char, "C", char, c_int,
    |value| value as c_int,
    |raw| char::from_u32(raw as u32).ok_or(ExtractError::InvalidChar(raw as u32))
);

impl_numeric!(
    /// A complex number, `D`.
    ArgComplex, arg_complex, "D", Complex64, Py_complex,
    |value| Py_complex { real: value.re, imag: value.im },
    |raw| Ok::<_, ExtractError>(Complex64::new(raw.real, raw.imag))
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::raw::RawList;

    fn round_trip<A>(arg: &A) -> <A as Extract<'static>>::Value
    where
        A: Extract<'static>,
    {
        let mut raw = A::Raw::zeroed();
        arg.init(raw.refs_mut());
        unsafe { arg.get(raw.refs_mut()).unwrap() }
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(round_trip(&arg_i32("x")).head, 0);
        assert_eq!(round_trip(&arg_f64("x")).head, 0.0);
        assert!(!round_trip(&arg_bool("x")).head);
    }

    #[test]
    fn default_is_written_by_init() {
        assert_eq!(round_trip(&arg_i64("x").with_default(-3)).head, -3);
        assert_eq!(round_trip(&arg_f32("x").with_default(5.0)).head, 5.0);
        assert!(round_trip(&arg_bool("x").with_default(true)).head);
        assert_eq!(round_trip(&arg_char("x").with_default('λ')).head, 'λ');

        let z = Complex64::new(1.0, -2.0);
        assert_eq!(round_trip(&arg_complex("x").with_default(z)).head, z);
    }

    #[test]
    fn surrogates_are_rejected() {
        let arg = arg_char("c");
        let mut raw = <ArgChar as Arg>::Raw::zeroed();
        raw.head = 0xd800;

        let err = unsafe { arg.get(raw.refs_mut()) }.unwrap_err();
        assert_eq!(err, ExtractError::InvalidChar(0xd800));
    }

    #[test]
    fn keyword_flags() {
        let arg = arg_u16("count");
        assert_eq!(arg.keyword(), "count");
        assert!(!arg.is_positional_only());
        assert!(arg.positional_only().is_positional_only());
        assert_eq!(ArgU16::FORMAT, "H");
    }
}
