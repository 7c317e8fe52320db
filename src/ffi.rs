//! FFI interface for host interop
//!
//! Provides C-compatible functions for running a detection pass from a
//! host that owns the document (browser shell, native app).
//! All structured data crosses the boundary as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;
use tracing::warn;

use crate::detection::{run_pass, DetectionRequest, PassStatus, ProductRecord};
use crate::report::format_report;
use crate::tree::Page;
use crate::{DetectError, Result};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via free_detection_result
#[repr(C)]
pub struct DetectionResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the pass failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// JSON body of a detection result
#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub records: Vec<ProductRecord>,
    pub status: PassStatus,
    /// Number of highlight requests made by the pass
    pub highlights: usize,
}

/// Detect products in an HTML document.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON-serialized DetectionRequest (null-terminated), or null for defaults
///
/// # Returns
/// DetectionResultFFI whose json_ptr always carries a DetectionResponse; error_ptr is
/// set as well when the inputs could not be read
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_detection_result`
#[no_mangle]
pub unsafe extern "C" fn detect_products_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> DetectionResultFFI {
    let response = read_html(html_ptr, html_len).and_then(|html| {
        let request = read_request(request_json)?;
        let page = Page::from_html(&html, &request.layout);
        Ok(respond(&page, &request))
    });
    finish(response)
}

/// Detect products in a JSON layout snapshot (see `SnapshotNode`).
///
/// # Safety
/// - `snapshot_json` must be a valid null-terminated C string
/// - `request_json` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_detection_result`
#[no_mangle]
pub unsafe extern "C" fn detect_products_snapshot(
    snapshot_json: *const c_char,
    request_json: *const c_char,
) -> DetectionResultFFI {
    let response = read_cstr(snapshot_json, "Snapshot JSON").and_then(|snapshot| {
        let snapshot = snapshot.ok_or(DetectError::NullPointer("Snapshot JSON"))?;
        let request = read_request(request_json)?;
        let page = Page::from_snapshot_json(snapshot)?;
        Ok(respond(&page, &request))
    });
    finish(response)
}

/// Render a JSON array of records as the plain-text report.
///
/// # Safety
/// - `records_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_detection_result`
#[no_mangle]
pub unsafe extern "C" fn format_report_ffi(records_json: *const c_char) -> DetectionResultFFI {
    let report = read_cstr(records_json, "Records JSON").and_then(|json| {
        let json = json.ok_or(DetectError::NullPointer("Records JSON"))?;
        let records: Vec<ProductRecord> =
            serde_json::from_str(json).map_err(DetectError::InvalidRecords)?;
        Ok(format_report(&records))
    });

    match report.and_then(|text| CString::new(text).map_err(|_| DetectError::NulByte)) {
        Ok(cstr) => DetectionResultFFI {
            json_ptr: cstr.into_raw(),
            error_ptr: ptr::null_mut(),
        },
        Err(e) => DetectionResultFFI {
            json_ptr: ptr::null_mut(),
            error_ptr: make_cstring(&e.to_string()),
        },
    }
}

/// Free a DetectionResultFFI returned by this library
///
/// # Safety
/// - `result` must have been returned by one of the functions above
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_detection_result(result: DetectionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn respond(page: &Page, request: &DetectionRequest) -> DetectionResponse {
    let outcome = run_pass(page, &request.config);
    DetectionResponse {
        records: outcome.records,
        status: outcome.status,
        highlights: outcome.highlights.len(),
    }
}

// Serialize a response; failures become an error-status response plus error_ptr
fn finish(response: Result<DetectionResponse>) -> DetectionResultFFI {
    let (response, error) = match response {
        Ok(r) => (r, None),
        Err(e) => {
            warn!(error = %e, "detection pass rejected");
            let message = e.to_string();
            (
                DetectionResponse {
                    records: Vec::new(),
                    status: PassStatus::Error {
                        message: message.clone(),
                    },
                    highlights: 0,
                },
                Some(message),
            )
        }
    };

    let json = serde_json::to_string(&response)
        .map_err(DetectError::Serialize)
        .and_then(|json| CString::new(json).map_err(|_| DetectError::NulByte));

    match json {
        Ok(cstr) => DetectionResultFFI {
            json_ptr: cstr.into_raw(),
            error_ptr: error.map(|m| make_cstring(&m)).unwrap_or(ptr::null_mut()),
        },
        Err(e) => DetectionResultFFI {
            json_ptr: ptr::null_mut(),
            error_ptr: make_cstring(&e.to_string()),
        },
    }
}

unsafe fn read_html(html_ptr: *const c_char, html_len: usize) -> Result<String> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok(String::new());
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice)
        .map(str::to_string)
        .map_err(|_| DetectError::InvalidUtf8("HTML content"))
}

unsafe fn read_cstr<'a>(ptr: *const c_char, what: &'static str) -> Result<Option<&'a str>> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(Some)
        .map_err(|_| DetectError::InvalidUtf8(what))
}

// A null request means default configuration
unsafe fn read_request(request_json: *const c_char) -> Result<DetectionRequest> {
    match read_cstr(request_json, "request JSON")? {
        Some(json) => serde_json::from_str(json).map_err(DetectError::InvalidRequest),
        None => Ok(DetectionRequest::default()),
    }
}

// Helper to create an owned C string for error messages
fn make_cstring(msg: &str) -> *mut c_char {
    CString::new(msg)
        .or_else(|_| CString::new(msg.replace('\0', "")))
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    unsafe fn take_json(result: DetectionResultFFI) -> (Option<Value>, Option<String>) {
        let json = (!result.json_ptr.is_null()).then(|| {
            let s = CStr::from_ptr(result.json_ptr).to_str().unwrap();
            serde_json::from_str(s).unwrap()
        });
        let error = (!result.error_ptr.is_null())
            .then(|| CStr::from_ptr(result.error_ptr).to_string_lossy().into_owned());
        free_detection_result(result);
        (json, error)
    }

    #[test]
    fn test_detect_html_ffi() {
        let html = r#"
        <html><body>
            <div style="width: 300px; height: 200px">
                <img src="a.jpg" width="120" height="120">
                <h2>Wireless Mouse</h2>
                <span>$19.99</span>
            </div>
        </body></html>
        "#;
        let request = CString::new(r#"{"config": {"baseUrl": "https://shop.example/"}}"#).unwrap();

        let (json, error) = unsafe {
            take_json(detect_products_html(
                html.as_ptr() as *const c_char,
                html.len(),
                request.as_ptr(),
            ))
        };
        let json = json.unwrap();
        assert!(error.is_none());
        assert_eq!(json["status"]["status"], "success");
        assert_eq!(json["status"]["count"], 1);
        assert_eq!(json["highlights"], 3);
        assert_eq!(json["records"][0]["title"], "Wireless Mouse");
        assert_eq!(json["records"][0]["imageUrl"], "https://shop.example/a.jpg");
    }

    #[test]
    fn test_detect_html_ffi_empty_input() {
        let (json, error) = unsafe { take_json(detect_products_html(ptr::null(), 0, ptr::null())) };
        assert!(error.is_none());
        assert_eq!(json.unwrap()["status"]["status"], "no_products");
    }

    #[test]
    fn test_detect_html_ffi_bad_request() {
        let html = "<p>$1.00</p>";
        let request = CString::new("{ nope").unwrap();
        let (json, error) = unsafe {
            take_json(detect_products_html(
                html.as_ptr() as *const c_char,
                html.len(),
                request.as_ptr(),
            ))
        };
        assert!(error.unwrap().starts_with("Failed to parse request JSON"));
        assert_eq!(json.unwrap()["status"]["status"], "error");
    }

    #[test]
    fn test_detect_html_ffi_deep_nesting() {
        let depth = 5_000;
        let html = format!(
            "<html><body>{}<span>$1.00</span>{}</body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let (json, error) = unsafe {
            take_json(detect_products_html(
                html.as_ptr() as *const c_char,
                html.len(),
                ptr::null(),
            ))
        };
        assert!(error.is_none());
        assert_eq!(json.unwrap()["status"]["status"], "no_products");
    }

    #[test]
    fn test_detect_snapshot_ffi() {
        let snapshot = CString::new(
            r#"{"tag": "body", "width": 1280, "height": 3000, "children": [
                {"tag": "div", "width": 300, "height": 200, "children": [
                    {"tag": "img", "width": 120, "height": 120, "attrs": {"src": "a.jpg"}},
                    {"tag": "h2", "text": "Wireless Mouse", "width": 280, "height": 30},
                    {"tag": "span", "text": "$19.99", "width": 60, "height": 20}
                ]}
            ]}"#,
        )
        .unwrap();

        let (json, _) = unsafe { take_json(detect_products_snapshot(snapshot.as_ptr(), ptr::null())) };
        let json = json.unwrap();
        assert_eq!(json["records"][0]["price"], "$19.99");
        assert_eq!(json["records"][0]["imageUrl"], "a.jpg");

        let (json, error) = unsafe { take_json(detect_products_snapshot(ptr::null(), ptr::null())) };
        assert_eq!(error.as_deref(), Some("Snapshot JSON is null"));
        assert_eq!(json.unwrap()["status"]["status"], "error");
    }

    #[test]
    fn test_format_report_ffi() {
        let records = CString::new(
            r#"[{"title": "Wireless Mouse", "price": "$19.99", "imageUrl": "a.jpg"}]"#,
        )
        .unwrap();
        let result = unsafe { format_report_ffi(records.as_ptr()) };
        let text = unsafe { CStr::from_ptr(result.json_ptr).to_str().unwrap().to_string() };
        unsafe { free_detection_result(result) };
        assert_eq!(text, "Title: Wireless Mouse\nImage: a.jpg\nPrice: $19.99\n\n");
    }
}
