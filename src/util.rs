use std::time::Duration;

/// Seconds with two decimals, e.g. `12.34 s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let hundredths = elapsed.as_millis() / 10;
    format!("{}.{:02} s", hundredths / 100, hundredths % 100)
}

/// Width in columns of the widest number on a board with `cell_count` cells
pub fn number_width(cell_count: u32) -> usize {
    cell_count.max(1).to_string().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "0.00 s");
        assert_eq!(format_elapsed(Duration::from_millis(9)), "0.00 s");
        assert_eq!(format_elapsed(Duration::from_millis(1234)), "1.23 s");
        assert_eq!(format_elapsed(Duration::from_millis(61_050)), "61.05 s");
    }

    #[test]
    fn test_number_width() {
        assert_eq!(number_width(9), 1);
        assert_eq!(number_width(25), 2);
        assert_eq!(number_width(100), 3);
        assert_eq!(number_width(0), 1);
    }
}
