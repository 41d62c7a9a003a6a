//! Utility functions.

use std::ffi;

/// Converts a Rust string into a C string, rejecting interior NUL bytes.
pub fn c_string(s: &str) -> Option<ffi::CString> {
    match ffi::CString::new(s) {
        Ok(cstring) => Some(cstring),
        Err(_) => {
            warn!("{:?} contains a NUL byte and cannot be passed to the driver", s);
            None
        }
    }
}

/// Trims a driver info log buffer down to the bytes actually written.
pub fn info_log(mut buf: Vec<u8>, written: i32) -> String {
    buf.truncate(written.max(0) as usize);
    while buf.last() == Some(&0) {
        buf.pop();
    }
    String::from_utf8_lossy(&buf).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_written_length() {
        let buf = b"0:1(1): error: bad\n\0garbage".to_vec();
        assert_eq!(info_log(buf, 19), "0:1(1): error: bad");
    }

    #[test]
    fn c_string_rejects_interior_nul() {
        assert!(c_string("u_MVP").is_some());
        assert!(c_string("u_\0MVP").is_none());
    }
}
