//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Leave the chat
    Quit,
    /// Announce that we are typing
    Typing,
    /// Send a chat message (followed by a typing-stop)
    Send(String),
    /// Blank line
    Ignore,
}

pub fn parse_input(line: &str) -> InputAction {
    let line = line.trim();
    match line {
        "" => InputAction::Ignore,
        "/quit" => InputAction::Quit,
        "/typing" => InputAction::Typing,
        text => InputAction::Send(text.to_string()),
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected name will be rejected again, so there is no point retrying.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::NameRejected { .. })
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> ClientError {
        ClientError::NameRejected {
            name: "alice".to_string(),
            reason: "Name taken".to_string(),
        }
    }

    #[test]
    fn test_parse_input_commands() {
        // テスト項目: /quit と /typing がコマンドとして解釈される
        // given (前提条件):
        let lines = ["/quit", "  /typing  "];

        // when (操作):
        let actions: Vec<InputAction> = lines.iter().map(|line| parse_input(line)).collect();

        // then (期待する結果):
        assert_eq!(actions, vec![InputAction::Quit, InputAction::Typing]);
    }

    #[test]
    fn test_parse_input_plain_text_is_message() {
        // テスト項目: コマンド以外の行は前後の空白を除いたメッセージになる
        // given (前提条件):
        let line = "  hello there ";

        // when (操作):
        let action = parse_input(line);

        // then (期待する結果):
        assert_eq!(action, InputAction::Send("hello there".to_string()));
    }

    #[test]
    fn test_parse_input_blank_line_is_ignored() {
        // テスト項目: 空行は何も送信しない
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let action = parse_input(line);

        // then (期待する結果):
        assert_eq!(action, InputAction::Ignore);
    }

    #[test]
    fn test_should_exit_immediately_with_name_rejected() {
        // テスト項目: NameRejected エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = rejected();

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
    fn test_should_attempt_reconnect_with_name_rejected() {
        // テスト項目: NameRejected エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = rejected();

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
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
}
