pub mod api;
pub mod models;

/// Format of `scores.created_at`, e.g. `Mon, 19 Oct 2026 10:04:05 UTC`.
pub const SCORE_TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Render a timestamp the way scores store it.
pub fn format_score_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format(SCORE_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn score_timestamp_is_rfc1123_style() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 10, 19, 9, 5, 3).unwrap();
        assert_eq!(format_score_timestamp(at), "Mon, 19 Oct 2026 09:05:03 UTC");
    }
}
