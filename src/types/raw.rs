//! Raw slots filled in by CPython's argument parser.
//!
//! Every format unit consumes one or more variadic arguments. Most of these are pointers to
//! storage the parser writes to, but some are values the parser reads: the type object of `O!`,
//! the encoding name of `es` and `et`, and the converter function of `O&`. A [`RawSlot`] knows
//! which of the two it is, so the list of variadic arguments can be collected from a [`RawList`]
//! without any further information about the format.

use std::{
    ffi::{c_char, c_int, c_void, CStr},
    ptr::null_mut,
};

use pyo3_ffi::{PyObject, PyTypeObject, Py_buffer, Py_complex};

use super::list::{Cons, Nil, TypeList};
use crate::MAX_SLOTS;

/// The variadic arguments of a single call to the argument parser. Unused trailing entries are
/// null.
pub type Slots = [*mut c_void; MAX_SLOTS];

/// Signature of the converter functions used by the `O&` format unit.
pub type Converter = unsafe extern "C" fn(*mut PyObject, *mut c_void) -> c_int;

/// Storage for a single variadic argument of the argument parser.
///
/// Safety: `slot_ptr` must return the pointer the format unit this slot is used with expects,
/// and the storage it points to must have the layout the parser writes.
pub unsafe trait RawSlot: 'static {
    /// The value this slot has before `init` is called.
    fn zeroed() -> Self;

    /// The variadic argument passed to the parser for this slot.
    #[inline]
    fn slot_ptr(&mut self) -> *mut c_void {
        self as *mut Self as *mut c_void
    }
}

macro_rules! impl_raw_slot {
    ($($t:ty => $zero:expr),+ $(,)?) => {
        $(
            unsafe impl RawSlot for $t {
                #[inline]
                fn zeroed() -> Self {
                    $zero
                }
            }
        )+
    };
}

impl_raw_slot! {
    u8 => 0,
    i16 => 0,
    u16 => 0,
    i32 => 0,
    u32 => 0,
    i64 => 0,
    u64 => 0,
    isize => 0,
    f32 => 0.0,
    f64 => 0.0,
    Py_complex => Py_complex { real: 0.0, imag: 0.0 },
}

unsafe impl RawSlot for Py_buffer {
    #[inline]
    fn zeroed() -> Self {
        // Safety: Py_buffer only contains pointers and integers, an all-zero buffer is
        // the state PyBuffer_Release leaves behind.
        unsafe { std::mem::zeroed() }
    }
}

unsafe impl<T: 'static> RawSlot for *const T {
    #[inline]
    fn zeroed() -> Self {
        std::ptr::null()
    }
}

unsafe impl<T: 'static> RawSlot for *mut T {
    #[inline]
    fn zeroed() -> Self {
        null_mut()
    }
}

/// The type object read by the `O!` format unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct TypeToken(*mut PyTypeObject);

impl TypeToken {
    /// Wrap a pointer to a type object.
    pub const fn new(ty: *mut PyTypeObject) -> Self {
        TypeToken(ty)
    }

    /// The wrapped type object.
    pub const fn as_ptr(self) -> *mut PyTypeObject {
        self.0
    }
}

unsafe impl RawSlot for TypeToken {
    #[inline]
    fn zeroed() -> Self {
        TypeToken(null_mut())
    }

    #[inline]
    fn slot_ptr(&mut self) -> *mut c_void {
        self.0.cast()
    }
}

/// The encoding name read by the `es`, `et`, `es#` and `et#` format units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct EncodingToken(*const c_char);

impl EncodingToken {
    pub const fn new(name: &'static CStr) -> Self {
        EncodingToken(name.as_ptr())
    }
}

unsafe impl RawSlot for EncodingToken {
    #[inline]
    fn zeroed() -> Self {
        EncodingToken(std::ptr::null())
    }

    #[inline]
    fn slot_ptr(&mut self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

/// The converter function read by the `O&` format unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ConverterToken(Option<Converter>);

impl ConverterToken {
    pub const fn new(converter: Converter) -> Self {
        ConverterToken(Some(converter))
    }
}

unsafe impl RawSlot for ConverterToken {
    #[inline]
    fn zeroed() -> Self {
        ConverterToken(None)
    }

    #[inline]
    fn slot_ptr(&mut self) -> *mut c_void {
        match self.0 {
            Some(converter) => converter as *mut c_void,
            None => null_mut(),
        }
    }
}

/// A list of raw slots.
pub trait RawList: TypeList + 'static {
    /// A list of mutable references to the slots in this list.
    type RefsMut<'a>
    where
        Self: 'a;

    /// The list with every slot zeroed.
    fn zeroed() -> Self;

    /// Borrow every slot in this list.
    fn refs_mut<'a>(&'a mut self) -> Self::RefsMut<'a>
    where
        Self: 'a;

    /// Write the variadic argument of every slot in this list to the start of `slots`, which
    /// must have room for `Self::LEN` entries.
    fn collect_slots(&mut self, slots: &mut [*mut c_void]);
}

impl RawList for Nil {
    type RefsMut<'a> = Nil;

    #[inline]
    fn zeroed() -> Self {
        Nil
    }

    #[inline]
    fn refs_mut<'a>(&'a mut self) -> Self::RefsMut<'a>
    where
        Self: 'a,
    {
        Nil
    }

    #[inline]
    fn collect_slots(&mut self, _slots: &mut [*mut c_void]) {}
}

impl<H: RawSlot, T: RawList> RawList for Cons<H, T> {
    type RefsMut<'a> = Cons<&'a mut H, T::RefsMut<'a>>;

    #[inline]
    fn zeroed() -> Self {
        Cons {
            head: H::zeroed(),
            tail: T::zeroed(),
        }
    }

    #[inline]
    fn refs_mut<'a>(&'a mut self) -> Self::RefsMut<'a>
    where
        Self: 'a,
    {
        Cons {
            head: &mut self.head,
            tail: self.tail.refs_mut(),
        }
    }

    #[inline]
    fn collect_slots(&mut self, slots: &mut [*mut c_void]) {
        debug_assert!(slots.len() >= Self::LEN);
        if let Some((first, rest)) = slots.split_first_mut() {
            *first = self.head.slot_ptr();
            self.tail.collect_slots(rest);
        }
    }
}

/// Split the concatenation of `Self` and `R` back into its parts.
///
/// The raw slots of an argument signature are stored as a single flat list so their
/// addresses can be collected in order. Every descriptor only sees its own part of that list.
pub trait SplitRaw<R: RawList>: RawList {
    /// The slots of `Self` followed by the slots of `R`.
    type Joined: RawList;

    /// Borrow the slots of `Self` and the remaining slots separately.
    fn split_mut<'a>(joined: &'a mut Self::Joined) -> (Self::RefsMut<'a>, &'a mut R);
}

impl<R: RawList> SplitRaw<R> for Nil {
    type Joined = R;

    #[inline]
    fn split_mut<'a>(joined: &'a mut R) -> (Nil, &'a mut R) {
        (Nil, joined)
    }
}

impl<H, T, R> SplitRaw<R> for Cons<H, T>
where
    H: RawSlot,
    T: SplitRaw<R>,
    R: RawList,
{
    type Joined = Cons<H, T::Joined>;

    #[inline]
    fn split_mut<'a>(joined: &'a mut Self::Joined) -> (Self::RefsMut<'a>, &'a mut R) {
        let (tail, rest) = <T as SplitRaw<R>>::split_mut(&mut joined.tail);
        (
            Cons {
                head: &mut joined.head,
                tail,
            },
            rest,
        )
    }
}
