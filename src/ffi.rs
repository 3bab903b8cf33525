//! Documentation for the C API.
//!
//! Functions that operate on a context take a pointer from [swiz_new_context].
//! Configuration and transform functions return `0` on success or the code of a [SwizzleError].
//! Use [swiz_get_error_message] to get a message for a code.
//! Null pointers are never dereferenced and report [SwizzleError::NullPointer] instead.
//!
//! Buffers from [swiz_alloc_swizzled_data] or [swiz_alloc_unswizzled_data]
//! must be released with [swiz_free_data] using the size of the buffer.
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ffi::c_char;
use core::ptr::{null_mut, slice_from_raw_parts_mut};

use crate::{Platform, SwizzleContext, SwizzleError};

const SWIZ_OK: u32 = 0;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

fn error_code(result: Result<(), SwizzleError>) -> u32 {
    match result {
        Ok(()) => SWIZ_OK,
        Err(error) => error.code(),
    }
}

/// Returns a null terminated version string like `"0.1.0"`.
#[no_mangle]
pub extern "C" fn swiz_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

/// See [crate::version_as_int].
#[no_mangle]
pub extern "C" fn swiz_get_version_as_int() -> u32 {
    crate::version_as_int()
}

/// Returns a null terminated message for `error`.
/// Unrecognized codes return `"Unexpected error."`.
#[no_mangle]
pub extern "C" fn swiz_get_error_message(error: u32) -> *const c_char {
    crate::error_message_with_nul(error).as_ptr() as *const c_char
}

/// Creates a new context with default values.
/// The context should be freed with [swiz_free_context].
#[no_mangle]
pub extern "C" fn swiz_new_context() -> *mut SwizzleContext {
    Box::into_raw(Box::new(SwizzleContext::new()))
}

/// Frees a context created by [swiz_new_context].
///
/// # Safety
/// `context` must be null or a pointer returned by [swiz_new_context] that has not already been freed.
#[no_mangle]
pub unsafe extern "C" fn swiz_free_context(context: *mut SwizzleContext) {
    if !context.is_null() {
        drop(Box::from_raw(context));
    }
}

/// Resets all values for `context` to their defaults. See [SwizzleContext::init].
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_init(context: *mut SwizzleContext) {
    if let Some(context) = context.as_mut() {
        context.init();
    }
}

unsafe fn with_context<F>(context: *mut SwizzleContext, f: F) -> u32
where
    F: FnOnce(&mut SwizzleContext) -> Result<(), SwizzleError>,
{
    match context.as_mut() {
        Some(context) => error_code(f(context)),
        None => SwizzleError::NullPointer.code(),
    }
}

/// See [SwizzleContext::set_platform].
/// `platform` should be `1` for PS4 or `2` for Switch.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_set_platform(
    context: *mut SwizzleContext,
    platform: u32,
) -> u32 {
    with_context(context, |c| c.set_platform(Platform::from_raw(platform)))
}

/// See [SwizzleContext::set_texture_size].
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_set_texture_size(
    context: *mut SwizzleContext,
    width: i32,
    height: i32,
) -> u32 {
    with_context(context, |c| c.set_texture_size(width, height))
}

/// See [SwizzleContext::set_block_info].
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_set_block_info(
    context: *mut SwizzleContext,
    block_width: i32,
    block_height: i32,
    block_data_size: i32,
) -> u32 {
    with_context(context, |c| {
        c.set_block_info(block_width, block_height, block_data_size)
    })
}

/// See [SwizzleContext::set_has_mips].
/// Any non zero value enables mipmaps.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_set_has_mips(
    context: *mut SwizzleContext,
    has_mips: u32,
) -> u32 {
    with_context(context, |c| {
        c.set_has_mips(has_mips != 0);
        // Report any error recorded by earlier calls.
        c.last_error().map_or(Ok(()), Err)
    })
}

/// See [SwizzleContext::set_array_size].
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_set_array_size(
    context: *mut SwizzleContext,
    array_size: i32,
) -> u32 {
    with_context(context, |c| c.set_array_size(array_size))
}

/// See [SwizzleContext::set_gobs_height].
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_set_gobs_height(
    context: *mut SwizzleContext,
    gobs_height: i32,
) -> u32 {
    with_context(context, |c| c.set_gobs_height(gobs_height))
}

/// Returns the code of the last recorded error or `0` if there is no error.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_context_get_last_error(context: *const SwizzleContext) -> u32 {
    match context.as_ref() {
        Some(context) => context.last_error().map_or(SWIZ_OK, |e| e.code()),
        None => SwizzleError::NullPointer.code(),
    }
}

/// See [SwizzleContext::swizzled_size]. Returns `0` for a null `context`.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_get_swizzled_size(context: *mut SwizzleContext) -> usize {
    context.as_mut().map_or(0, |c| c.swizzled_size())
}

/// See [SwizzleContext::unswizzled_size]. Returns `0` for a null `context`.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_get_unswizzled_size(context: *mut SwizzleContext) -> usize {
    context.as_mut().map_or(0, |c| c.unswizzled_size())
}

fn into_raw_data(data: Result<Vec<u8>, SwizzleError>) -> *mut u8 {
    match data {
        Ok(data) => Box::into_raw(data.into_boxed_slice()) as *mut u8,
        Err(_) => null_mut(),
    }
}

/// Allocates a zeroed buffer with [swiz_get_swizzled_size] many bytes.
/// Returns null and records the error on `context` if the allocation fails.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_alloc_swizzled_data(context: *mut SwizzleContext) -> *mut u8 {
    context
        .as_mut()
        .map_or(null_mut(), |c| into_raw_data(c.alloc_swizzled_data()))
}

/// Allocates a zeroed buffer with [swiz_get_unswizzled_size] many bytes.
/// Returns null and records the error on `context` if the allocation fails.
///
/// # Safety
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_alloc_unswizzled_data(context: *mut SwizzleContext) -> *mut u8 {
    context
        .as_mut()
        .map_or(null_mut(), |c| into_raw_data(c.alloc_unswizzled_data()))
}

/// Frees a buffer returned by [swiz_alloc_swizzled_data] or [swiz_alloc_unswizzled_data].
///
/// # Safety
/// `data` must be null or a buffer from this library that has not already been freed.
/// `size` must be the size of the buffer at the time it was allocated.
#[no_mangle]
pub unsafe extern "C" fn swiz_free_data(data: *mut u8, size: usize) {
    if !data.is_null() {
        drop(Box::from_raw(slice_from_raw_parts_mut(data, size)));
    }
}

unsafe fn transform<const DESWIZZLE: bool>(
    source: *const u8,
    destination: *mut u8,
    context: *mut SwizzleContext,
) -> u32 {
    let context = match context.as_mut() {
        Some(context) => context,
        None => return SwizzleError::NullPointer.code(),
    };

    let swizzled_size = context.swizzled_size();
    let unswizzled_size = context.unswizzled_size();
    if let Some(error) = context.last_error() {
        return error.code();
    }

    if source.is_null() || destination.is_null() {
        context.record_error(SwizzleError::NullPointer);
        return SwizzleError::NullPointer.code();
    }

    let (source_size, destination_size) = if DESWIZZLE {
        (swizzled_size, unswizzled_size)
    } else {
        (unswizzled_size, swizzled_size)
    };
    let source = core::slice::from_raw_parts(source, source_size);
    let destination = core::slice::from_raw_parts_mut(destination, destination_size);

    if DESWIZZLE {
        error_code(context.unswizzle(source, destination))
    } else {
        error_code(context.swizzle(source, destination))
    }
}

/// Swizzles `data` into `swizzled_data`. See [SwizzleContext::swizzle].
///
/// # Safety
/// `data` must have at least [swiz_get_unswizzled_size] many bytes,
/// and `swizzled_data` must have at least [swiz_get_swizzled_size] many bytes.
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_do_swizzle(
    data: *const u8,
    swizzled_data: *mut u8,
    context: *mut SwizzleContext,
) -> u32 {
    transform::<false>(data, swizzled_data, context)
}

/// Unswizzles `swizzled_data` into `data`. See [SwizzleContext::unswizzle].
///
/// # Safety
/// `swizzled_data` must have at least [swiz_get_swizzled_size] many bytes,
/// and `data` must have at least [swiz_get_unswizzled_size] many bytes.
/// `context` must be null or a valid pointer returned by [swiz_new_context].
#[no_mangle]
pub unsafe extern "C" fn swiz_do_unswizzle(
    swizzled_data: *const u8,
    data: *mut u8,
    context: *mut SwizzleContext,
) -> u32 {
    transform::<true>(swizzled_data, data, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr::null;
    use core::ffi::CStr;

    fn configured_context(platform: u32) -> *mut SwizzleContext {
        let context = swiz_new_context();
        unsafe {
            assert_eq!(SWIZ_OK, swiz_context_set_platform(context, platform));
            assert_eq!(SWIZ_OK, swiz_context_set_texture_size(context, 16, 32));
            assert_eq!(SWIZ_OK, swiz_context_set_block_info(context, 4, 4, 16));
        }
        context
    }

    #[test]
    fn version() {
        let version = unsafe { CStr::from_ptr(swiz_get_version()) };
        assert_eq!(crate::version(), version.to_str().unwrap());
        assert_eq!(crate::version_as_int(), swiz_get_version_as_int());
    }

    #[test]
    fn error_messages() {
        let message = |code| unsafe { CStr::from_ptr(swiz_get_error_message(code)) };
        assert_eq!("Success.", message(0).to_str().unwrap());
        assert_eq!("Unexpected error.", message(100).to_str().unwrap());
        assert_eq!(
            "Null pointer error.",
            message(SwizzleError::NullPointer.code()).to_str().unwrap()
        );
    }

    #[test]
    fn null_context() {
        unsafe {
            let null_context = null_mut();
            assert_eq!(
                SwizzleError::NullPointer.code(),
                swiz_context_set_platform(null_context, 1)
            );
            assert_eq!(
                SwizzleError::NullPointer.code(),
                swiz_context_get_last_error(null())
            );
            assert_eq!(0, swiz_get_swizzled_size(null_context));
            assert!(swiz_alloc_swizzled_data(null_context).is_null());
            assert_eq!(
                SwizzleError::NullPointer.code(),
                swiz_do_swizzle(null(), null_mut(), null_context)
            );
            swiz_context_init(null_context);
            swiz_free_context(null_context);
            swiz_free_data(null_mut(), 0);
        }
    }

    #[test]
    fn swizzle_null_data() {
        let context = configured_context(2);
        unsafe {
            let mut data = [0u8; 512];
            assert_eq!(
                SwizzleError::NullPointer.code(),
                swiz_do_swizzle(null(), data.as_mut_ptr(), context)
            );
            assert_eq!(
                SwizzleError::NullPointer.code(),
                swiz_do_unswizzle(data.as_ptr(), null_mut(), context)
            );
            assert_eq!(
                SwizzleError::NullPointer.code(),
                swiz_context_get_last_error(context)
            );
            swiz_free_context(context);
        }
    }

    #[test]
    fn unknown_platform() {
        let context = swiz_new_context();
        unsafe {
            assert_eq!(
                SwizzleError::UnknownPlatform.code(),
                swiz_context_set_platform(context, 3)
            );
            assert_eq!(0, swiz_get_swizzled_size(context));
            assert_eq!(0, swiz_get_unswizzled_size(context));
            assert!(swiz_alloc_unswizzled_data(context).is_null());
            swiz_free_context(context);
        }
    }

    #[test]
    fn alloc_and_swizzle() {
        let context = configured_context(2);
        unsafe {
            swiz_context_set_has_mips(context, 0);
            let size = swiz_get_swizzled_size(context);
            assert_eq!(512, size);
            assert_eq!(512, swiz_get_unswizzled_size(context));

            let data = swiz_alloc_unswizzled_data(context);
            let swizzled = swiz_alloc_swizzled_data(context);
            assert!(!data.is_null() && !swizzled.is_null());

            for i in 0..size {
                *data.add(i) = (i / 16) as u8;
            }
            assert_eq!(SWIZ_OK, swiz_do_swizzle(data, swizzled, context));
            assert_eq!(4, *swizzled.add(16));

            let unswizzled = swiz_alloc_unswizzled_data(context);
            assert_eq!(SWIZ_OK, swiz_do_unswizzle(swizzled, unswizzled, context));
            assert_eq!(
                core::slice::from_raw_parts(data, size),
                core::slice::from_raw_parts(unswizzled, size)
            );

            swiz_free_data(data, size);
            swiz_free_data(swizzled, size);
            swiz_free_data(unswizzled, size);
            swiz_free_context(context);
        }
    }

    #[test]
    fn init_clears_error() {
        let context = configured_context(1);
        unsafe {
            assert_eq!(
                SwizzleError::InvalidArraySize.code(),
                swiz_context_set_array_size(context, 0)
            );
            assert_eq!(
                SwizzleError::InvalidArraySize.code(),
                swiz_context_set_has_mips(context, 1)
            );
            swiz_context_init(context);
            assert_eq!(SWIZ_OK, swiz_context_get_last_error(context));
            swiz_free_context(context);
        }
    }
}
