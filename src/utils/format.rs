//! Display helpers for wallet addresses and byte counts.

/// Abbreviate `text` to its first `firsts` and last `lasts` characters.
///
/// Inputs shorter than `firsts + lasts` pass through unchanged. Empty input
/// yields an empty string so callers can feed optional values directly.
pub fn short_text(text: &str, firsts: usize, lasts: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() > firsts + lasts {
        let head: String = chars[..firsts].iter().collect();
        let tail: String = chars[chars.len() - lasts..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        text.to_string()
    }
}

/// Abbreviate a wallet address for display, e.g. `0x1234...cdef`.
pub fn shorten_address(address: &str) -> String {
    short_text(address, 6, 4)
}

/// Format a byte count as a human readable size.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_address() {
        assert_eq!(shorten_address("0x1234567890abcdef"), "0x1234...cdef");
        assert_eq!(shorten_address(""), "");
        // Short values pass through untouched
        assert_eq!(shorten_address("0x1234"), "0x1234");
        assert_eq!(shorten_address("0x12345678ab"), "0x1234...78ab");
    }

    #[test]
    fn test_short_text_custom_bounds() {
        assert_eq!(short_text("abcdefghijklmnop", 3, 2), "abc...op");
        assert_eq!(short_text("abcde", 3, 2), "abcde");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1048576), "1 MB");
        assert_eq!(format_file_size(5_368_709_120), "5 GB");
    }
}
