//! FFI layer for host applications.
//!
//! This module provides C-compatible functions that can be called from Dart,
//! Swift, Kotlin or any other language with a C FFI. All records cross the
//! boundary as JSON strings.
//!
//! # Memory Management
//!
//! - Strings returned by `syncmerge_*` functions are allocated by Rust
//! - Caller must free them with `syncmerge_string_free`
//! - Engine pointers must be freed with `syncmerge_engine_free`
//!
//! # Error Handling
//!
//! Functions return JSON with either:
//! - `{"ok": <result>}` on success
//! - `{"error": "<message>"}` on failure

use crate::{merge, resolve, MergeConfig, MergeEngine, UnionFields};
use serde_json::Value;
use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// Result wrapper for FFI responses.
#[derive(serde::Serialize)]
#[serde(untagged)]
enum FfiResult<T: serde::Serialize> {
    Ok { ok: T },
    Err { error: String },
}

impl<T: serde::Serialize> FfiResult<T> {
    fn ok(value: T) -> Self {
        FfiResult::Ok { ok: value }
    }

    fn err(message: impl Into<String>) -> Self {
        FfiResult::Err {
            error: message.into(),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization failed: {}"}}"#, e))
    }
}

impl<T: serde::Serialize> From<crate::error::Result<T>> for FfiResult<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => FfiResult::ok(value),
            Err(e) => FfiResult::err(e.to_string()),
        }
    }
}

/// Convert a Rust string to a C string pointer.
/// Caller must free with `syncmerge_string_free`.
fn to_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        // Serialized JSON escapes NUL, so this only guards against misuse.
        Err(_) => CString::from(c"{\"error\":\"string contained null bytes\"}").into_raw(),
    }
}

/// Convert a C string pointer to a Rust string.
/// Returns None if pointer is null or invalid UTF-8.
unsafe fn from_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Parse a JSON argument, naming it in the error message.
unsafe fn parse_json(ptr: *const c_char, name: &str) -> Result<Value, String> {
    let raw = from_c_string(ptr).ok_or_else(|| format!("invalid {} JSON", name))?;
    serde_json::from_str(&raw).map_err(|e| format!("parse error in {}: {}", name, e))
}

/// Parse both record arguments, or produce the error response.
unsafe fn parse_pair(
    local_json: *const c_char,
    remote_json: *const c_char,
) -> Result<(Value, Value), *mut c_char> {
    let local = parse_json(local_json, "local")
        .map_err(|e| to_c_string(FfiResult::<()>::err(e).to_json()))?;
    let remote = parse_json(remote_json, "remote")
        .map_err(|e| to_c_string(FfiResult::<()>::err(e).to_json()))?;
    Ok((local, remote))
}

// ============================================================================
// Engine Lifecycle
// ============================================================================

/// Create a new engine.
///
/// # Arguments
/// - `config_json`: JSON string of MergeConfig, or null for the defaults
///
/// # Returns
/// Pointer to MergeEngine, or null if the configuration does not parse.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string or null
/// - Caller must free the returned pointer with `syncmerge_engine_free`
#[no_mangle]
pub unsafe extern "C" fn syncmerge_engine_new(config_json: *const c_char) -> *mut MergeEngine {
    let config = if config_json.is_null() {
        MergeConfig::default()
    } else {
        let config_str = match from_c_string(config_json) {
            Some(s) => s,
            None => return ptr::null_mut(),
        };
        match serde_json::from_str(&config_str) {
            Ok(c) => c,
            Err(_) => return ptr::null_mut(),
        }
    };

    Box::into_raw(Box::new(MergeEngine::new(config)))
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be a valid pointer from `syncmerge_engine_new`
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn syncmerge_engine_free(engine: *mut MergeEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Free a string allocated by the engine.
///
/// # Safety
/// - `s` must be a valid pointer from a `syncmerge_*` function
/// - Must not be called twice on the same pointer
#[no_mangle]
pub unsafe extern "C" fn syncmerge_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ============================================================================
// Engine Operations
// ============================================================================

/// Resolve two records by last-write-wins.
///
/// # Returns
/// JSON string: `{"ok": {"resolution": "localWins" | "remoteWins", "winner": <record>}}`
/// or `{"error": "message"}`
///
/// # Safety
/// - `engine` must be a valid pointer from `syncmerge_engine_new` or null
/// - `local_json` and `remote_json` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `syncmerge_string_free`
#[no_mangle]
pub unsafe extern "C" fn syncmerge_engine_resolve_conflict(
    engine: *const MergeEngine,
    local_json: *const c_char,
    remote_json: *const c_char,
) -> *mut c_char {
    let engine = match engine.as_ref() {
        Some(e) => e,
        None => return to_c_string(FfiResult::<()>::err("null engine pointer").to_json()),
    };

    let (local, remote) = match parse_pair(local_json, remote_json) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    to_c_string(FfiResult::from(engine.resolve(&local, &remote)).to_json())
}

/// Merge two records field by field, unioning the configured set fields.
///
/// # Returns
/// JSON string: `{"ok": <merged record>}` or `{"error": "message"}`
///
/// # Safety
/// - `engine` must be a valid pointer from `syncmerge_engine_new` or null
/// - `local_json` and `remote_json` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `syncmerge_string_free`
#[no_mangle]
pub unsafe extern "C" fn syncmerge_engine_merge_member_data(
    engine: *const MergeEngine,
    local_json: *const c_char,
    remote_json: *const c_char,
) -> *mut c_char {
    let engine = match engine.as_ref() {
        Some(e) => e,
        None => return to_c_string(FfiResult::<()>::err("null engine pointer").to_json()),
    };

    let (local, remote) = match parse_pair(local_json, remote_json) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    to_c_string(FfiResult::from(engine.merge_member_data(&local, &remote)).to_json())
}

// ============================================================================
// Stateless Shortcuts
// ============================================================================

/// Resolve two records with the default configuration.
///
/// # Returns
/// JSON string: `{"ok": <winning record>}` or `{"error": "message"}`
///
/// # Safety
/// - `local_json` and `remote_json` must be valid null-terminated C strings or null
/// - Caller must free the returned string with `syncmerge_string_free`
#[no_mangle]
pub unsafe extern "C" fn syncmerge_resolve_conflict(
    local_json: *const c_char,
    remote_json: *const c_char,
) -> *mut c_char {
    let (local, remote) = match parse_pair(local_json, remote_json) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    to_c_string(FfiResult::from(resolve::resolve_conflict(&local, &remote)).to_json())
}

/// Merge two records, unioning `union_fields_json` (a JSON array of field
/// names) or `["skills"]` when null.
///
/// # Returns
/// JSON string: `{"ok": <merged record>}` or `{"error": "message"}`
///
/// # Safety
/// - All arguments must be valid null-terminated C strings; `union_fields_json` may be null
/// - Caller must free the returned string with `syncmerge_string_free`
#[no_mangle]
pub unsafe extern "C" fn syncmerge_merge_member_data(
    local_json: *const c_char,
    remote_json: *const c_char,
    union_fields_json: *const c_char,
) -> *mut c_char {
    let (local, remote) = match parse_pair(local_json, remote_json) {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    let union_fields = if union_fields_json.is_null() {
        UnionFields::default()
    } else {
        let fields_str = match from_c_string(union_fields_json) {
            Some(s) => s,
            None => return to_c_string(FfiResult::<()>::err("invalid union fields JSON").to_json()),
        };
        match serde_json::from_str(&fields_str) {
            Ok(fields) => fields,
            Err(e) => {
                return to_c_string(
                    FfiResult::<()>::err(format!("parse error in union fields: {}", e)).to_json(),
                )
            }
        }
    };

    to_c_string(
        FfiResult::from(merge::merge_member_data_with(&local, &remote, &union_fields)).to_json(),
    )
}

// ============================================================================
// Utilities
// ============================================================================

/// Get the engine version.
///
/// # Returns
/// Static string pointer (do not free)
#[no_mangle]
pub extern "C" fn syncmerge_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
