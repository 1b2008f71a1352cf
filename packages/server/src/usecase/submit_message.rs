//! UseCase: チャットメッセージの送信
//!
//! 名前を持つ接続からのメッセージだけを受け付ける。全員 (送信者を含む) に
//! MESSAGE を配信した後、キューへの送信は別タスクで行い制御ループを待たせない。

use crate::domain::{ChatMessage, ConnectionId, OutgoingEvent};

use super::hub::Hub;

impl Hub {
    pub(super) fn submit_message(&mut self, connection_id: ConnectionId, text: String) {
        let Some(author) = self.state.identity(&connection_id).cloned() else {
            tracing::debug!(
                "Dropping message from unnamed connection '{}'",
                connection_id
            );
            return;
        };

        let sent_at = self.clock.now();
        let id = self.message_ids.next(sent_at, &author);
        let message = ChatMessage::new(id, author, text, sent_at);
        tracing::info!("Message '{}' from '{}'", message.id(), message.author());

        self.broadcast(OutgoingEvent::Message {
            message: message.clone(),
        });

        let publisher = self.publisher.clone();
        tokio::spawn(async move {
            let id = message.id().clone();
            if let Err(e) = publisher.publish(message).await {
                tracing::warn!("Failed to publish message '{}': {}", id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        domain::{ConnectionId, IncomingEvent, OutgoingEvent},
        usecase::hub::{Hub, HubCommand, test_support::*},
    };

    fn send(hub: &mut Hub, connection_id: ConnectionId, event: IncomingEvent) {
        let _ = hub.apply(HubCommand::Dispatch {
            connection_id,
            event,
        });
    }

    fn message(text: &str) -> IncomingEvent {
        IncomingEvent::Message {
            text: text.to_string(),
        }
    }

    fn set_name(name: &str) -> IncomingEvent {
        IncomingEvent::SetName {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_message_reaches_everyone_and_is_published_once() {
        // テスト項目: 名前付き接続のメッセージは送信者を含む全員に届き、キューへ 1 回だけ送られる
        // given (前提条件):
        let (mut hub, mut published) = recording_hub(false);
        let (alice, mut alice_rx) = connect(&mut hub, 8);
        let (_anonymous, mut anonymous_rx) = connect(&mut hub, 8);
        send(&mut hub, alice, set_name("alice"));
        drain(&mut alice_rx);
        drain(&mut anonymous_rx);

        // when (操作):
        send(&mut hub, alice, message("hi"));

        // then (期待する結果):
        for rx in [&mut alice_rx, &mut anonymous_rx] {
            match drain(rx).as_slice() {
                [OutgoingEvent::Message { message }] => {
                    assert_eq!(message.author().as_str(), "alice");
                    assert_eq!(message.text(), "hi");
                    assert_eq!(message.id().as_str(), "20230101000000.123-alice");
                }
                other => panic!("expected one MESSAGE, got {:?}", other),
            }
        }
        let sent = tokio::time::timeout(Duration::from_secs(1), published.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sent.text(), "hi");
        tokio::task::yield_now().await;
        assert!(published.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_message_from_unnamed_connection_is_dropped() {
        // テスト項目: 名前を持たない接続のメッセージは配信もキュー送信もされない
        // given (前提条件):
        let (mut hub, mut published) = recording_hub(false);
        let (anonymous, mut anonymous_rx) = connect(&mut hub, 8);
        let (bob, mut bob_rx) = connect(&mut hub, 8);
        send(&mut hub, bob, set_name("bob"));
        drain(&mut anonymous_rx);
        drain(&mut bob_rx);

        // when (操作):
        send(&mut hub, anonymous, message("hello?"));

        // then (期待する結果):
        tokio::task::yield_now().await;
        assert!(drain(&mut anonymous_rx).is_empty());
        assert!(drain(&mut bob_rx).is_empty());
        assert!(published.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_messages_in_same_millisecond_get_distinct_ids() {
        // テスト項目: 同じ時刻・同じ送信者のメッセージにも重複しない ID が振られる
        // given (前提条件):
        let (mut hub, _published) = recording_hub(false);
        let (alice, mut alice_rx) = connect(&mut hub, 8);
        send(&mut hub, alice, set_name("alice"));
        drain(&mut alice_rx);

        // when (操作):
        send(&mut hub, alice, message("one"));
        send(&mut hub, alice, message("two"));

        // then (期待する結果):
        let ids: Vec<String> = drain(&mut alice_rx)
            .into_iter()
            .filter_map(|event| match event {
                OutgoingEvent::Message { message } => Some(message.id().as_str().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_interleaved_authors_in_same_millisecond_get_distinct_ids() {
        // テスト項目: 同じ時刻に複数の送信者が交互に送っても ID が重複しない
        // given (前提条件):
        let (mut hub, _published) = recording_hub(false);
        let (alice, mut alice_rx) = connect(&mut hub, 16);
        let (bob, mut bob_rx) = connect(&mut hub, 16);
        send(&mut hub, alice, set_name("alice"));
        send(&mut hub, bob, set_name("bob"));
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作):
        send(&mut hub, alice, message("one"));
        send(&mut hub, bob, message("two"));
        send(&mut hub, alice, message("three"));

        // then (期待する結果):
        let ids: Vec<String> = drain(&mut bob_rx)
            .into_iter()
            .filter_map(|event| match event {
                OutgoingEvent::Message { message } => Some(message.id().as_str().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                "20230101000000.123-alice".to_string(),
                "20230101000000.123-bob".to_string(),
                "20230101000000.123-alice-1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_affect_broadcast() {
        // テスト項目: キュー送信が失敗しても配信は取り消されず、ハブは処理を続ける
        // given (前提条件):
        let (mut hub, mut published) = recording_hub(true);
        let (alice, mut alice_rx) = connect(&mut hub, 8);
        send(&mut hub, alice, set_name("alice"));
        drain(&mut alice_rx);

        // when (操作):
        send(&mut hub, alice, message("first"));
        let _ = tokio::time::timeout(Duration::from_secs(1), published.recv()).await;
        send(&mut hub, alice, message("second"));

        // then (期待する結果):
        let texts: Vec<String> = drain(&mut alice_rx)
            .into_iter()
            .filter_map(|event| match event {
                OutgoingEvent::Message { message } => Some(message.text().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["first".to_string(), "second".to_string()]);
    }
}
