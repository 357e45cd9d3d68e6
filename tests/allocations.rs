//! Counts the buffers the `es` and `et` format units allocate with `PyMem_Malloc` to check that
//! every one of them is freed exactly once. The allocator hook is process-wide, so this file
//! contains a single test.

mod util;

use std::{ffi::c_void, sync::Mutex};

use pyargs::{
    ffi::{self, PyMemAllocatorDomain, PyMemAllocatorEx},
    prelude::*,
};
use util::*;

// The parser allocates one byte more than the encoded length, nothing else the interpreter does
// during a match allocates a block of this size.
const ENCODED_LEN: usize = 4097;
const TRACKED_SIZE: usize = ENCODED_LEN + 1;

struct Tracker {
    allocated: usize,
    live: Vec<usize>,
}

static TRACKER: Mutex<Tracker> = Mutex::new(Tracker {
    allocated: 0,
    live: Vec::new(),
});

fn allocated(ptr: *mut c_void, size: usize) {
    if !ptr.is_null() && size == TRACKED_SIZE {
        let mut tracker = TRACKER.lock().unwrap();
        tracker.allocated += 1;
        tracker.live.push(ptr as usize);
    }
}

fn freed(ptr: *mut c_void) {
    let mut tracker = TRACKER.lock().unwrap();
    if let Some(pos) = tracker.live.iter().position(|&p| p == ptr as usize) {
        tracker.live.swap_remove(pos);
    }
}

fn counts() -> (usize, usize) {
    let tracker = TRACKER.lock().unwrap();
    (tracker.allocated, tracker.live.len())
}

/// Safety: `ctx` must be the context installed by `install_hook`.
unsafe fn original<'a>(ctx: *mut c_void) -> &'a PyMemAllocatorEx {
    &*ctx.cast::<PyMemAllocatorEx>()
}

extern "C" fn hooked_malloc(ctx: *mut c_void, size: usize) -> *mut c_void {
    let ptr = unsafe {
        let original = original(ctx);
        (original.malloc.unwrap())(original.ctx, size)
    };
    allocated(ptr, size);
    ptr
}

extern "C" fn hooked_calloc(ctx: *mut c_void, nelem: usize, elsize: usize) -> *mut c_void {
    let ptr = unsafe {
        let original = original(ctx);
        (original.calloc.unwrap())(original.ctx, nelem, elsize)
    };
    allocated(ptr, nelem.saturating_mul(elsize));
    ptr
}

extern "C" fn hooked_realloc(ctx: *mut c_void, ptr: *mut c_void, new_size: usize) -> *mut c_void {
    let new_ptr = unsafe {
        let original = original(ctx);
        (original.realloc.unwrap())(original.ctx, ptr, new_size)
    };
    if !new_ptr.is_null() {
        freed(ptr);
        allocated(new_ptr, new_size);
    }
    new_ptr
}

extern "C" fn hooked_free(ctx: *mut c_void, ptr: *mut c_void) {
    freed(ptr);
    unsafe {
        let original = original(ctx);
        (original.free.unwrap())(original.ctx, ptr)
    }
}

/// Wrap the allocator of the `PyMem` domain, returns the allocator that was replaced. It's
/// leaked because the hook keeps using it.
///
/// Safety: the GIL must be held.
unsafe fn install_hook() -> *mut PyMemAllocatorEx {
    let mut original = PyMemAllocatorEx {
        ctx: std::ptr::null_mut(),
        malloc: None,
        calloc: None,
        realloc: None,
        free: None,
    };
    ffi::PyMem_GetAllocator(PyMemAllocatorDomain::PYMEM_DOMAIN_MEM, &mut original);

    let original = Box::into_raw(Box::new(original));

    let mut hook = PyMemAllocatorEx {
        ctx: original.cast(),
        malloc: Some(hooked_malloc),
        calloc: Some(hooked_calloc),
        realloc: Some(hooked_realloc),
        free: Some(hooked_free),
    };
    ffi::PyMem_SetAllocator(PyMemAllocatorDomain::PYMEM_DOMAIN_MEM, &mut hook);
    original
}

#[test]
fn encoded_buffers_are_freed_once() {
    with_gil(|| unsafe {
        let original = install_hook();
        let text = "a".repeat(ENCODED_LEN);

        let args = Arguments::new((
            arg_encoded::<Utf8>("a"),
            arg_encoded_text_len::<Latin1>("b"),
            arg_i32("c"),
        ))
        .unwrap();

        let input = tuple(vec![string(&text), string(&text), int(1)]);
        let (a, b, c) = args.parse(input.obj(), None).unwrap();
        assert_eq!((a.len(), b.len(), c), (ENCODED_LEN, ENCODED_LEN, 1));
        assert_eq!(counts(), (2, 0));

        // Both buffers are allocated before the parser rejects the last argument.
        let input = tuple(vec![string(&text), string(&text), string("not an int")]);
        assert!(args.parse(input.obj(), None).is_none());
        assert!(error_is(type_error()));
        clear_error();
        assert_eq!(counts(), (4, 0));

        let args = Arguments::new((arg_encoded_len::<Utf8>("a"), arg_char("b"))).unwrap();
        let input = tuple(vec![string(&text), code_point(0xdfff)]);
        assert!(args.parse(input.obj(), None).is_none());
        assert!(error_is(value_error()));
        clear_error();
        assert_eq!(counts(), (5, 0));

        ffi::PyMem_SetAllocator(PyMemAllocatorDomain::PYMEM_DOMAIN_MEM, original);
    });
}
