//! JSON codec for protocol frames and queue payloads.

use thiserror::Error;

use crate::domain::{ChatMessage, IncomingEvent, OutgoingEvent};

use super::websocket::{ChatMessageDto, IncomingMessage, OutgoingMessage};

/// Frame and payload codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Decode one client text frame.
pub fn decode_incoming(text: &str) -> Result<IncomingEvent, ProtocolError> {
    serde_json::from_str::<IncomingMessage>(text)
        .map(IncomingEvent::from)
        .map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Encode one mailbox event as a text frame.
pub fn encode_outgoing(event: OutgoingEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(&OutgoingMessage::from(event))
        .map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Serialize a chat message as a queue body.
pub fn encode_chat_message(message: &ChatMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(&ChatMessageDto::from(message))
        .map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Parse a queue body back into a chat message.
pub fn decode_chat_message(body: &str) -> Result<ChatMessage, ProtocolError> {
    let dto = serde_json::from_str::<ChatMessageDto>(body)
        .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    ChatMessage::try_from(dto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, MessageId};
    use natter_shared::time::{Clock, FixedClock};
    use serde_json::{Value, json};

    fn sample_message() -> ChatMessage {
        ChatMessage::new(
            MessageId::new("20230101000000.000-carol".to_string()).unwrap(),
            DisplayName::parse("carol").unwrap(),
            "hello world".to_string(),
            FixedClock::new(1672531200000).now(),
        )
    }

    #[test]
    fn test_decode_each_incoming_tag() {
        // テスト項目: 4 種類の受信フレームがそれぞれのイベントに復号される
        // given (前提条件):
        let frames = [
            (
                r#"{"type":"SET_NAME","name":"alice"}"#,
                IncomingEvent::SetName {
                    name: "alice".to_string(),
                },
            ),
            (
                r#"{"type":"MESSAGE","text":"hi"}"#,
                IncomingEvent::Message {
                    text: "hi".to_string(),
                },
            ),
            (r#"{"type":"TYPING_START"}"#, IncomingEvent::TypingStart),
            (r#"{"type":"TYPING_STOP"}"#, IncomingEvent::TypingStop),
        ];

        // when (操作) / then (期待する結果):
        for (frame, expected) in frames {
            assert_eq!(decode_incoming(frame), Ok(expected));
        }
    }

    #[test]
    fn test_decode_tolerates_missing_payload_and_extra_fields() {
        // テスト項目: name 欠落は空文字、未知のフィールドは無視される
        // given (前提条件):
        let without_name = r#"{"type":"SET_NAME"}"#;
        let with_extra = r#"{"type":"TYPING_START","since":12}"#;

        // when (操作):
        let first = decode_incoming(without_name);
        let second = decode_incoming(with_extra);

        // then (期待する結果):
        assert_eq!(
            first,
            Ok(IncomingEvent::SetName {
                name: String::new()
            })
        );
        assert_eq!(second, Ok(IncomingEvent::TypingStart));
    }

    #[test]
    fn test_decode_rejects_malformed_frames() {
        // テスト項目: JSON でない・未知の type・type 欠落のフレームはエラーになる
        // given (前提条件):
        let frames = ["not json", r#"{"type":"DANCE"}"#, r#"{"name":"alice"}"#, "[]"];

        // when (操作) / then (期待する結果):
        for frame in frames {
            assert!(
                matches!(decode_incoming(frame), Err(ProtocolError::Malformed(_))),
                "frame should be rejected: {}",
                frame
            );
        }
    }

    #[test]
    fn test_encode_outgoing_frames() {
        // テスト項目: 送信イベントが type 付きの JSON オブジェクトに符号化される
        // given (前提条件):
        let cases = [
            (OutgoingEvent::NameAccepted, json!({"type": "NAME_ACCEPTED"})),
            (
                OutgoingEvent::name_taken(),
                json!({"type": "NAME_REJECTED", "reason": "Name taken"}),
            ),
            (
                OutgoingEvent::UserList {
                    users: vec!["alice".to_string(), "bob".to_string()],
                },
                json!({"type": "USER_LIST", "users": ["alice", "bob"]}),
            ),
            (
                OutgoingEvent::Typing { users: vec![] },
                json!({"type": "TYPING", "typing": []}),
            ),
        ];

        // when (操作) / then (期待する結果):
        for (event, expected) in cases {
            let encoded = encode_outgoing(event).unwrap();
            let value: Value = serde_json::from_str(&encoded).unwrap();
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn test_encode_message_frame_nests_chat_message() {
        // テスト項目: MESSAGE フレームに id/user/text/timestamp を持つ message が入る
        // given (前提条件):
        let event = OutgoingEvent::Message {
            message: sample_message(),
        };

        // when (操作):
        let encoded = encode_outgoing(event).unwrap();

        // then (期待する結果):
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "MESSAGE",
                "message": {
                    "id": "20230101000000.000-carol",
                    "user": "carol",
                    "text": "hello world",
                    "timestamp": "2023-01-01T00:00:00Z"
                }
            })
        );
    }

    #[test]
    fn test_queue_payload_exposes_text_field() {
        // テスト項目: キューに送るペイロードに text フィールドが含まれ、元に戻せる
        // given (前提条件):
        let message = sample_message();

        // when (操作):
        let body = encode_chat_message(&message).unwrap();

        // then (期待する結果):
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["text"], "hello world");
        assert_eq!(decode_chat_message(&body), Ok(message));
        assert!(matches!(
            decode_chat_message("{}"),
            Err(ProtocolError::Malformed(_))
        ));
    }
}
