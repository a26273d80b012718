const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human-readable size with binary units and two decimals: `1536 -> "1.50 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = (bytes.ilog(1024) as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{value:.2} {}", UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::format_file_size;

    #[test]
    fn zero_is_special_cased() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn below_one_kib_stays_in_bytes() {
        assert_eq!(format_file_size(1), "1.00 Bytes");
        assert_eq!(format_file_size(1023), "1023.00 Bytes");
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(1_500_000), "1.43 MB");
    }

    #[test]
    fn largest_unit_absorbs_huge_values() {
        assert_eq!(format_file_size(1024u64.pow(5)), "1024.00 TB");
    }
}
