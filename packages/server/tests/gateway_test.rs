//! Integration tests for the chat gateway: a real server on an ephemeral
//! port, driven over WebSocket and HTTP.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use natter_server::{config::ServerConfig, runner::serve};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Helper struct to manage the server lifecycle
struct TestServer {
    addr: std::net::SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            serve(listener, ServerConfig::default(), async move {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
        });
        TestServer {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> Client {
        let (client, _) = connect_async(self.ws_url()).await.unwrap();
        client
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            tokio::time::timeout(Duration::from_secs(5), task)
                .await
                .unwrap()
                .unwrap();
        }
    }
}

async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .unwrap();
}

async fn set_name(client: &mut Client, name: &str) {
    send_json(client, json!({"type": "SET_NAME", "name": name})).await;
}

/// Next text frame as JSON
async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Skip frames until one of the given type arrives
async fn next_of_type(client: &mut Client, kind: &str) -> Value {
    loop {
        let value = next_json(client).await;
        if value["type"] == kind {
            return value;
        }
    }
}

async fn named_client(server: &TestServer, name: &str) -> Client {
    let mut client = server.connect().await;
    set_name(&mut client, name).await;
    assert_eq!(next_json(&mut client).await, json!({"type": "NAME_ACCEPTED"}));
    next_of_type(&mut client, "USER_LIST").await;
    client
}

#[tokio::test]
async fn test_alice_scenario() {
    // テスト項目: 名前取得・重複拒否・全員へのメッセージ配信が一連の流れで動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut other = server.connect().await;

    // when (操作):
    set_name(&mut alice, "alice").await;

    // then (期待する結果):
    assert_eq!(next_json(&mut alice).await, json!({"type": "NAME_ACCEPTED"}));
    assert_eq!(
        next_json(&mut alice).await,
        json!({"type": "USER_LIST", "users": ["alice"]})
    );
    assert_eq!(
        next_json(&mut other).await,
        json!({"type": "USER_LIST", "users": ["alice"]})
    );

    // when (操作):
    set_name(&mut other, "alice").await;

    // then (期待する結果):
    assert_eq!(
        next_json(&mut other).await,
        json!({"type": "NAME_REJECTED", "reason": "Name taken"})
    );

    // when (操作):
    send_json(&mut alice, json!({"type": "MESSAGE", "text": "hi"})).await;

    // then (期待する結果):
    for client in [&mut alice, &mut other] {
        let event = next_json(client).await;
        assert_eq!(event["type"], "MESSAGE");
        assert_eq!(event["message"]["user"], "alice");
        assert_eq!(event["message"]["text"], "hi");
        assert!(event["message"]["id"].as_str().unwrap().ends_with("-alice"));
        assert!(event["message"]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_typing_start_and_stop_are_broadcast() {
    // テスト項目: TYPING_START/TYPING_STOP で入力中リストが更新され全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = named_client(&server, "alice").await;
    let mut bob = named_client(&server, "bob").await;
    next_of_type(&mut alice, "USER_LIST").await;

    // when (操作):
    send_json(&mut bob, json!({"type": "TYPING_START"})).await;
    let started = next_of_type(&mut alice, "TYPING").await;
    send_json(&mut bob, json!({"type": "TYPING_STOP"})).await;
    let stopped = next_of_type(&mut alice, "TYPING").await;

    // then (期待する結果):
    assert_eq!(started, json!({"type": "TYPING", "typing": ["bob"]}));
    assert_eq!(stopped, json!({"type": "TYPING", "typing": []}));

    server.stop().await;
}

#[tokio::test]
async fn test_disconnect_removes_name_from_user_list() {
    // テスト項目: 切断した接続の名前が USER_LIST と TYPING から消える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = named_client(&server, "alice").await;
    let mut bob = named_client(&server, "bob").await;
    next_of_type(&mut alice, "USER_LIST").await;
    send_json(&mut bob, json!({"type": "TYPING_START"})).await;
    next_of_type(&mut alice, "TYPING").await;

    // when (操作):
    bob.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        next_json(&mut alice).await,
        json!({"type": "USER_LIST", "users": ["alice"]})
    );
    assert_eq!(
        next_json(&mut alice).await,
        json!({"type": "TYPING", "typing": []})
    );

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_alive() {
    // テスト項目: 解釈できないフレームは破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = server.connect().await;

    // when (操作):
    client.send(Message::text("not json")).await.unwrap();
    send_json(&mut client, json!({"type": "DANCE"})).await;
    set_name(&mut client, "carol").await;

    // then (期待する結果):
    assert_eq!(next_json(&mut client).await, json!({"type": "NAME_ACCEPTED"}));

    server.stop().await;
}

#[tokio::test]
async fn test_message_from_unnamed_connection_is_not_delivered() {
    // テスト項目: 名前を持たない接続のメッセージは誰にも配信されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = named_client(&server, "alice").await;
    let mut anonymous = server.connect().await;

    // when (操作):
    send_json(&mut anonymous, json!({"type": "MESSAGE", "text": "psst"})).await;
    send_json(&mut alice, json!({"type": "MESSAGE", "text": "hello"})).await;

    // then (期待する結果):
    let event = next_of_type(&mut alice, "MESSAGE").await;
    assert_eq!(event["message"]["text"], "hello");

    server.stop().await;
}

#[tokio::test]
async fn test_healthz_returns_empty_ok() {
    // テスト項目: /healthz が 200 と空のボディを返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::get(server.http_url("/healthz")).await.unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "");

    server.stop().await;
}

#[tokio::test]
async fn test_history_contains_sent_message() {
    // テスト項目: 送信したメッセージがキュー経由で保存され /history から取得できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = named_client(&server, "alice").await;

    // when (操作):
    send_json(&mut alice, json!({"type": "MESSAGE", "text": "remember me"})).await;
    next_of_type(&mut alice, "MESSAGE").await;

    // then (期待する結果):
    let mut history = Vec::new();
    for _ in 0..50 {
        history = reqwest::get(server.http_url("/history"))
            .await
            .unwrap()
            .json::<Vec<Value>>()
            .await
            .unwrap();
        if !history.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["user"], "alice");
    assert_eq!(history[0]["text"], "remember me");

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_open_connections() {
    // テスト項目: サーバーのシャットダウンで開いている接続が閉じられる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = named_client(&server, "dave").await;

    // when (操作):
    server.stop().await;

    // then (期待する結果):
    let closed = tokio::time::timeout(RECV_TIMEOUT, async {
        while let Some(frame) = client.next().await {
            if matches!(frame, Ok(Message::Close(_)) | Err(_)) {
                break;
            }
        }
    })
    .await;
    assert!(closed.is_ok());
}
