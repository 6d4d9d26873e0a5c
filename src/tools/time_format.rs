/// 將秒數格式化為 HH:MM:SS
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };

    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00");
        assert_eq!(format_timestamp(67.0), "00:01:07");
        assert_eq!(format_timestamp(3661.9), "01:01:01");
        assert_eq!(format_timestamp(90000.0), "25:00:00");
    }

    #[test]
    fn test_format_timestamp_degenerate_input() {
        assert_eq!(format_timestamp(-5.0), "00:00:00");
        assert_eq!(format_timestamp(f64::NAN), "00:00:00");
    }
}
