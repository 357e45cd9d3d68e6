//! The format string and keyword table of an argument signature.
//!
//! Both are computed once when an [`Arguments`] is created, along with the position of every
//! descriptor in the raw slots and in the values passed to the callback.
//!
//! [`Arguments`]: crate::signature::Arguments

use std::ffi::{c_char, CStr, CString};

use rustc_hash::FxHashSet;

use crate::{
    arg::{Arg, ArgKind, Marker},
    error::{ArgsError, ArgsResult},
    types::list::TypeList,
    MAX_SLOTS,
};

/// Where a single descriptor ends up in the raw slots and the values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgLayout {
    format: &'static str,
    kind: ArgKind,
    raw_offset: usize,
    slot_count: usize,
    value_index: Option<usize>,
    keyword_index: Option<usize>,
}

impl ArgLayout {
    /// The format units of this descriptor.
    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    /// The index of the first raw slot of this descriptor.
    pub fn raw_offset(&self) -> usize {
        self.raw_offset
    }

    /// The number of raw slots of this descriptor.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// The index of the value of this descriptor, `None` for markers.
    pub fn value_index(&self) -> Option<usize> {
        self.value_index
    }

    /// The index of this descriptor in the keyword table, `None` for markers.
    pub fn keyword_index(&self) -> Option<usize> {
        self.keyword_index
    }
}

/// The compiled layout of an argument signature.
pub struct Layout {
    format: CString,
    keywords: Vec<CString>,
    // Null-terminated, points into `keywords`.
    keyword_ptrs: Vec<*const c_char>,
    args: Vec<ArgLayout>,
    slot_count: usize,
    value_count: usize,
}

// Safety: the pointers in keyword_ptrs point to the heap allocations owned by keywords, which are
// never mutated.
unsafe impl Send for Layout {}
unsafe impl Sync for Layout {}

impl Layout {
    /// The format string passed to the argument parser.
    pub fn format(&self) -> &CStr {
        &self.format
    }

    /// The keyword table without its terminator. Positional-only arguments have an empty keyword.
    pub fn keywords(&self) -> impl ExactSizeIterator<Item = &CStr> + '_ {
        self.keywords.iter().map(CString::as_c_str)
    }

    /// The descriptors of the signature in order.
    pub fn args(&self) -> &[ArgLayout] {
        &self.args
    }

    /// The total number of raw slots.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// The number of values passed to the callback.
    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub(crate) fn format_ptr(&self) -> *const c_char {
        self.format.as_ptr()
    }

    pub(crate) fn keywords_ptr(&self) -> *const *const c_char {
        self.keyword_ptrs.as_ptr()
    }
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout")
            .field("format", &self.format)
            .field("keywords", &self.keywords)
            .field("args", &self.args)
            .finish()
    }
}

/// Collects the layout of every descriptor and checks that the signature is valid.
pub struct LayoutBuilder {
    format: String,
    keywords: Vec<String>,
    seen: FxHashSet<String>,
    args: Vec<ArgLayout>,
    markers: Vec<Marker>,
    slot_count: usize,
    value_count: usize,
    named: bool,
}

impl LayoutBuilder {
    pub(crate) fn new() -> Self {
        LayoutBuilder {
            format: String::new(),
            keywords: Vec::new(),
            seen: FxHashSet::default(),
            args: Vec::new(),
            markers: Vec::new(),
            slot_count: 0,
            value_count: 0,
            named: false,
        }
    }

    pub(crate) fn push<A: Arg>(&mut self, arg: &A) -> ArgsResult<()> {
        let slot_count = <A::Raw as TypeList>::LEN;
        let (value_index, keyword_index) = match A::KIND {
            ArgKind::Marker(marker) => {
                debug_assert_eq!(slot_count, 0);
                self.push_marker(marker)?;
                (None, None)
            }
            ArgKind::Value => {
                let keyword_index = self.push_keyword(arg.keyword(), arg.is_positional_only())?;
                self.value_count += 1;
                (Some(self.value_count - 1), Some(keyword_index))
            }
        };

        self.args.push(ArgLayout {
            format: A::FORMAT,
            kind: A::KIND,
            raw_offset: self.slot_count,
            slot_count,
            value_index,
            keyword_index,
        });
        self.format.push_str(A::FORMAT);
        self.slot_count += slot_count;

        if self.slot_count > MAX_SLOTS {
            Err(ArgsError::TooManySlots {
                slots: self.slot_count,
                max: MAX_SLOTS,
            })?
        }

        Ok(())
    }

    fn push_marker(&mut self, marker: Marker) -> ArgsResult<()> {
        if self.markers.contains(&marker) {
            Err(ArgsError::RepeatedMarker(marker))?
        }

        let keyword_only = self.markers.contains(&Marker::KeywordOnly);
        match marker {
            Marker::Optional if keyword_only => Err(ArgsError::MarkerOrder)?,
            Marker::KeywordOnly if !self.markers.contains(&Marker::Optional) => {
                Err(ArgsError::MarkerOrder)?
            }
            Marker::PositionalOnly if keyword_only => Err(ArgsError::MarkerOrder)?,
            Marker::PositionalOnly => {
                for keyword in self.keywords.iter_mut() {
                    keyword.clear();
                }
                self.seen.clear();
                self.named = false;
            }
            _ => (),
        }

        self.markers.push(marker);
        Ok(())
    }

    fn push_keyword(&mut self, keyword: &str, positional_only: bool) -> ArgsResult<usize> {
        if positional_only || keyword.is_empty() {
            if self.named || self.markers.contains(&Marker::KeywordOnly) {
                Err(ArgsError::PositionalOnlyAfterKeyword(keyword.into()))?
            }

            self.keywords.push(String::new());
            return Ok(self.keywords.len() - 1);
        }

        if keyword.contains('\0') {
            Err(ArgsError::InvalidKeyword(keyword.into()))?
        }

        if !self.seen.insert(keyword.to_owned()) {
            Err(ArgsError::DuplicateKeyword(keyword.into()))?
        }

        self.named = true;
        self.keywords.push(keyword.into());
        Ok(self.keywords.len() - 1)
    }

    pub(crate) fn finish(self) -> ArgsResult<Layout> {
        let format = CString::new(self.format)
            .map_err(|e| ArgsError::InvalidFormat(lossy(e.into_vec())))?;
        let keywords = self
            .keywords
            .into_iter()
            .map(|keyword| {
                CString::new(keyword).map_err(|e| ArgsError::InvalidKeyword(lossy(e.into_vec())))
            })
            .collect::<ArgsResult<Vec<_>>>()?;

        let keyword_ptrs = keywords
            .iter()
            .map(|keyword| keyword.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();

        Ok(Layout {
            format,
            keywords,
            keyword_ptrs,
            args: self.args,
            slot_count: self.slot_count,
            value_count: self.value_count,
        })
    }
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}
