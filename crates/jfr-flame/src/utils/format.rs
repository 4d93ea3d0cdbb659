//! Human-readable formatting of byte sizes and durations.

const BYTE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count, e.g. `1536` -> `"1.50 KiB"`
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[unit])
}

/// Format nanoseconds with the largest unit that keeps the value >= 1
pub fn format_nanos(nanos: u64) -> String {
    const MICRO: u64 = 1_000;
    const MILLI: u64 = 1_000_000;
    const SECOND: u64 = 1_000_000_000;

    if nanos >= SECOND {
        format!("{:.2} s", nanos as f64 / SECOND as f64)
    } else if nanos >= MILLI {
        format!("{:.2} ms", nanos as f64 / MILLI as f64)
    } else if nanos >= MICRO {
        format!("{:.2} us", nanos as f64 / MICRO as f64)
    } else {
        format!("{} ns", nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn test_format_nanos() {
        assert_eq!(format_nanos(999), "999 ns");
        assert_eq!(format_nanos(1_500), "1.50 us");
        assert_eq!(format_nanos(2_000_000), "2.00 ms");
        assert_eq!(format_nanos(3_250_000_000), "3.25 s");
    }
}
