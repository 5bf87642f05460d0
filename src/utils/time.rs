//! Dual-target clock access.

/// Current time in milliseconds since the UNIX epoch (WASM compatible).
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Current time in seconds since the UNIX epoch.
pub fn now_secs() -> u64 {
    now_millis() / 1000
}
