//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current time as an ISO-8601 string (UTC, millisecond precision)
    fn now_iso8601(&self) -> String;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_iso8601(&self) -> String {
        now_iso8601()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock at the given Unix timestamp (milliseconds)
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: DateTime::from_timestamp_millis(fixed_time_millis).unwrap_or_default(),
        }
    }
}

impl Clock for FixedClock {
    fn now_iso8601(&self) -> String {
        to_iso8601(self.fixed_time)
    }
}

/// Get the current time as an ISO-8601 string, e.g. `2025-08-06T08:01:00.000Z`
pub fn now_iso8601() -> String {
    to_iso8601(Utc::now())
}

/// Format a UTC datetime the same way JavaScript's `Date.toISOString` does
pub fn to_iso8601(datetime: DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render an ISO-8601 timestamp as a local wall-clock time such as `8:01 AM`.
///
/// Returns `None` if the timestamp cannot be parsed.
pub fn format_clock_time(timestamp: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(
        parsed
            .with_timezone(&Local)
            .format("%-I:%M %p")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_utc_timestamp() {
        // テスト項目: SystemClock が UTC の ISO-8601 文字列を返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_iso8601();

        // then (期待する結果):
        assert!(timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&timestamp).is_ok());
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // テスト項目: FixedClock が固定されたタイムスタンプを返す
        // given (前提条件):
        // 2023-01-01 00:00:00.123 UTC in milliseconds
        let clock = FixedClock::new(1672531200123);

        // when (操作):
        let timestamp1 = clock.now_iso8601();
        let timestamp2 = clock.now_iso8601();

        // then (期待する結果):
        assert_eq!(timestamp1, "2023-01-01T00:00:00.123Z");
        assert_eq!(timestamp1, timestamp2);
    }

    #[test]
    fn test_format_clock_time_with_valid_timestamp() {
        // テスト項目: 有効なタイムスタンプが時:分 AM/PM 形式に変換される
        // given (前提条件):
        let timestamp = "2025-08-06T08:01:00Z";

        // when (操作):
        let result = format_clock_time(timestamp);

        // then (期待する結果):
        let formatted = result.expect("timestamp should parse");
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"));
        assert!(formatted.contains(':'));
    }

    #[test]
    fn test_format_clock_time_with_invalid_timestamp() {
        // テスト項目: 不正なタイムスタンプは None を返す
        // given (前提条件):
        let timestamp = "yesterday";

        // when (操作):
        let result = format_clock_time(timestamp);

        // then (期待する結果):
        assert!(result.is_none());
    }
}
