//! Shared utility functions for output formatting

use chrono::{Local, TimeZone};

use crate::entry::Timestamp;

/// Placeholder for a name character that should not reach the terminal.
pub const PLACEHOLDER: char = '?';

/// Display form of a file name. Control characters and bytes that are not
/// valid UTF-8 become `?` unless `raw` is set. The name itself is left
/// untouched.
pub fn display_name(name: &[u8], raw: bool) -> Vec<u8> {
    if raw {
        return name.to_vec();
    }

    let mut out = String::with_capacity(name.len());
    for chunk in name.utf8_chunks() {
        out.extend(
            chunk
                .valid()
                .chars()
                .map(|c| if c.is_control() { PLACEHOLDER } else { c }),
        );
        out.extend(std::iter::repeat_n(PLACEHOLDER, chunk.invalid().len()));
    }
    out.into_bytes()
}

/// `month day hour:minute` in local time, or `???` if the timestamp cannot
/// be represented.
pub fn format_time(ts: Timestamp) -> String {
    Local
        .timestamp_opt(ts.secs, ts.nanos)
        .earliest()
        .map(|dt| dt.format("%b %e %H:%M").to_string())
        .unwrap_or_else(|| "???".to_string())
}

/// Split a device number into `(major, minor)`.
pub fn device_numbers(rdev: u64) -> (u64, u64) {
    let dev = rdev as libc::dev_t;
    (libc::major(dev) as u64, libc::minor(dev) as u64)
}
