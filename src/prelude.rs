//! Reexports structs, traits and functions you're likely to need.

#[cfg(feature = "pyo3")]
pub use crate::arg::wrappers::{arg_any, arg_bound, ArgAny, ArgBound};
pub use crate::{
    arg::{
        buffer::{
            arg_byte_buffer, arg_opt_buffer, arg_str_buffer, arg_writable_buffer, ArgByteBuffer,
            ArgOptBuffer, ArgStrBuffer, ArgWritableBuffer, WritableBuffer,
        },
        encoded::{
            arg_encoded, arg_encoded_len, arg_encoded_text, arg_encoded_text_len, ArgEncoded,
            ArgEncodedLen, ArgEncodedText, ArgEncodedTextLen, Ascii, Encoding, Iso8859,
            Iso8859_1, Latin1, Utf16, Utf32, Utf8,
        },
        kw_only,
        numeric::*,
        object::{
            arg_byte_array_object, arg_bytes_object, arg_object, arg_typed, arg_unicode_object,
            ArgByteArrayObject, ArgBytesObject, ArgInstance, ArgObject, ArgTyped, ArgUnicodeObject,
            ByteArrayType, BytesType, DictType, FloatType, HostType, ListType, LongType,
            TupleType, UnicodeType,
        },
        optional,
        path::{arg_path, ArgPath},
        pos_only,
        string::{
            arg_bytes, arg_bytes_c_str, arg_c_str, arg_opt_c_str, arg_opt_str, arg_str,
            arg_string, ArgBytes, ArgBytesCStr, ArgCStr, ArgOptCStr, ArgOptStr, ArgStr, ArgString,
        },
        Arg, Extract, KwOnly, Optional, PosOnly,
    },
    error::{ArgsError, ArgsResult, ExtractError},
    object::ObjectRef,
    signature::{dispatch::dispatch_overloads, Arguments},
    tlist, tlist_pat,
    types::{
        callback::Callback,
        list::{Cons, Nil, ToTuple},
    },
    TList,
};
