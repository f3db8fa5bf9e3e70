//! C FFI bindings for kvgrid-core
//!
//! Exposes a loaded table session as an opaque handle for C/C++ hosts.
//! Every function accepts null and answers with null, zero or false.

use kvgrid_core::{Cell, TableFile};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// Opaque handle to a table session
pub struct KvTableFile {
    inner: TableFile,
}

fn into_handle(session: TableFile) -> *mut KvTableFile {
    Box::into_raw(Box::new(KvTableFile { inner: session }))
}

unsafe fn cell_at<'a>(handle: *const KvTableFile, row: usize, col: usize) -> Option<&'a Cell> {
    if handle.is_null() {
        return None;
    }
    (*handle).inner.table().cell(row, col)
}

fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Load a table file
///
/// # Safety
/// - `path` must be a valid C string
/// - Returns null on error
#[no_mangle]
pub unsafe extern "C" fn kv_open(path: *const c_char) -> *mut KvTableFile {
    if path.is_null() {
        return ptr::null_mut();
    }

    let path = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    let mut session = TableFile::new();
    match session.load(path) {
        Ok(_) => into_handle(session),
        Err(_) => ptr::null_mut(),
    }
}

/// Load the bundled default table
///
/// # Safety
/// - Caller must free the returned handle with `kv_free`
#[no_mangle]
pub unsafe extern "C" fn kv_open_default() -> *mut KvTableFile {
    let mut session = TableFile::new();
    match session.load_default() {
        Ok(_) => into_handle(session),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a table session
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default` or null
#[no_mangle]
pub unsafe extern "C" fn kv_free(handle: *mut KvTableFile) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Get the number of rows
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default`
#[no_mangle]
pub unsafe extern "C" fn kv_row_count(handle: *const KvTableFile) -> usize {
    if handle.is_null() {
        return 0;
    }
    (*handle).inner.table().row_count()
}

/// Get the number of columns (the first row's length)
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default`
#[no_mangle]
pub unsafe extern "C" fn kv_col_count(handle: *const KvTableFile) -> usize {
    if handle.is_null() {
        return 0;
    }
    (*handle).inner.table().column_count()
}

/// Get a cell key
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default`
/// - Returns null if row or col is out of bounds
/// - Caller must free the returned string with `kv_free_string`
#[no_mangle]
pub unsafe extern "C" fn kv_cell_key(
    handle: *const KvTableFile,
    row: usize,
    col: usize,
) -> *mut c_char {
    cell_at(handle, row, col)
        .map(|c| to_c_string(&c.key))
        .unwrap_or(ptr::null_mut())
}

/// Get a cell value
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default`
/// - Returns null if row or col is out of bounds
/// - Caller must free the returned string with `kv_free_string`
#[no_mangle]
pub unsafe extern "C" fn kv_cell_value(
    handle: *const KvTableFile,
    row: usize,
    col: usize,
) -> *mut c_char {
    cell_at(handle, row, col)
        .map(|c| to_c_string(&c.value))
        .unwrap_or(ptr::null_mut())
}

/// Whether the session holds the default table
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default`
#[no_mangle]
pub unsafe extern "C" fn kv_is_default(handle: *const KvTableFile) -> bool {
    !handle.is_null() && (*handle).inner.is_default()
}

/// Save the table to `path`
///
/// # Safety
/// - `handle` must be a valid pointer returned by `kv_open`/`kv_open_default`
/// - `path` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn kv_save(handle: *mut KvTableFile, path: *const c_char) -> bool {
    if handle.is_null() || path.is_null() {
        return false;
    }

    match CStr::from_ptr(path).to_str() {
        Ok(path) => (*handle).inner.save(path).is_ok(),
        Err(_) => false,
    }
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a kv_* function or null
#[no_mangle]
pub unsafe extern "C" fn kv_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
