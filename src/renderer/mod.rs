pub mod md;
pub mod text;

/// Format a number with thousand separators (raw integers, no abbreviation)
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped_rev = String::new();

    // Insert commas every three digits, starting from the right
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped_rev.push(',');
        }
        grouped_rev.push(ch);
    }

    grouped_rev.chars().rev().collect()
}

/// Like `format_number` for the decimal strings the API returns; unparsable
/// values are passed through.
pub fn format_count_str(raw: &str) -> String {
    raw.parse::<u64>()
        .map(format_number)
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_count_str() {
        assert_eq!(format_count_str("98765"), "98,765");
        assert_eq!(format_count_str("n/a"), "n/a");
    }
}
