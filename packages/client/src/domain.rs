//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use std::time::Duration;

use crate::error::ClientError;

/// Maximum number of reconnection attempts before giving up
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Base delay between reconnection attempts; attempt `n` waits `n` times this
pub const RECONNECT_BASE_DELAY: Duration = Duration::from_millis(2000);

/// Check if the client should exit immediately based on the error type.
///
/// # Arguments
///
/// * `error` - The client error to check
///
/// # Returns
///
/// `true` if the error requires immediate exit (e.g., InvalidUser),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUser(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of reconnection attempts already made
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Delay before reconnection attempt `attempt` (1-indexed).
pub fn reconnect_delay(attempt: u32) -> Duration {
    RECONNECT_BASE_DELAY * attempt
}

/// A user name is usable when it is not blank.
pub fn validate_user(user: &str) -> Result<String, ClientError> {
    let trimmed = user.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUser(user.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_with_invalid_user() {
        // テスト項目: InvalidUser エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::InvalidUser("".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_invalid_user() {
        // テスト項目: InvalidUser エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::InvalidUser(" ".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, MAX_RECONNECT_ATTEMPTS);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let results: Vec<bool> = (0..MAX_RECONNECT_ATTEMPTS)
            .map(|attempt| should_attempt_reconnect(&error, attempt, MAX_RECONNECT_ATTEMPTS))
            .collect();

        // then (期待する結果):
        assert!(results.iter().all(|r| *r));
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_reconnect_delay_grows_linearly() {
        // テスト項目: 再接続の待ち時間は 2000ms × 試行回数
        // given (前提条件):
        let attempts = [1, 2, 5];

        // when (操作):
        let delays: Vec<Duration> = attempts.iter().map(|a| reconnect_delay(*a)).collect();

        // then (期待する結果):
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(2000),
                Duration::from_millis(4000),
                Duration::from_millis(10000),
            ]
        );
    }

    #[test]
    fn test_validate_user() {
        // テスト項目: 空白のみのユーザー名は拒否され、前後の空白は除去される
        // given (前提条件):

        // when (操作):
        let valid = validate_user("  Alice ");
        let blank = validate_user("   ");

        // then (期待する結果):
        assert_eq!(valid.unwrap(), "Alice");
        assert!(matches!(blank, Err(ClientError::InvalidUser(_))));
    }
}
