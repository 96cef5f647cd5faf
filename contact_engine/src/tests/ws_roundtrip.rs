// @file: contact_engine/src/tests/ws_roundtrip.rs
// @description: Real WebSocket clients against the accept loop on a loopback port.
// @author: LAS.

use std::net::SocketAddr;
use std::time::Duration;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use url::Url;
use crate::api::connection_manager::ConnectionManager;
use crate::api::ws_server::serve;
use crate::core::models::{MessageType, WsMessage};


const WS_PATH: &str = "/ws";
const WAIT: Duration = Duration::from_secs(5);

async fn spawn_server(manager: ConnectionManager) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, manager, WS_PATH.to_string()));
    addr
}

async fn wait_for_count(manager: &ConnectionManager, expected: usize) {
    timeout(WAIT, async {
        while manager.connection_count() != expected {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection count never settled");
}

fn decode(frame: Message) -> WsMessage {
    match frame {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected text frame, got {:?}", other),
    }
}


//
// ROUNDTRIPS
//

#[tokio::test]
async fn test_client_ping_is_answered_with_pong() {
    let manager = ConnectionManager::default();
    let addr = spawn_server(manager.clone()).await;

    let url = Url::parse(&format!("ws://{}{}", addr, WS_PATH)).unwrap();
    let (mut client, _) = connect_async(url).await.unwrap();
    wait_for_count(&manager, 1).await;

    client.send(Message::Text(r#"{"Type":"Ping"}"#.to_string())).await.unwrap();
    let reply = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();

    assert_eq!(decode(reply).kind, MessageType::Pong);
}

#[tokio::test]
async fn test_broadcast_reaches_client_and_close_unregisters() {
    let manager = ConnectionManager::default();
    let addr = spawn_server(manager.clone()).await;

    let url = Url::parse(&format!("ws://{}{}", addr, WS_PATH)).unwrap();
    let (mut client, _) = connect_async(url).await.unwrap();
    wait_for_count(&manager, 1).await;

    let delivered = manager.broadcast(&WsMessage::info("hello")).await;
    assert_eq!(delivered, 1);

    let frame = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();
    let received = decode(frame);
    assert_eq!(received.kind, MessageType::Info);
    assert_eq!(received.message.as_deref(), Some("hello"));

    client.close(None).await.unwrap();
    wait_for_count(&manager, 0).await;
}

#[tokio::test]
async fn test_client_close_is_answered_with_close_frame() {
    let manager = ConnectionManager::default();
    let addr = spawn_server(manager.clone()).await;

    let url = Url::parse(&format!("ws://{}{}", addr, WS_PATH)).unwrap();
    let (mut client, _) = connect_async(url).await.unwrap();
    wait_for_count(&manager, 1).await;

    client.send(Message::Close(None)).await.unwrap();

    // #1. Server completes the handshake instead of dropping the TCP stream
    let reply = timeout(WAIT, client.next()).await.unwrap();
    assert!(
        matches!(reply, Some(Ok(Message::Close(_)))),
        "expected close reply, got {:?}",
        reply
    );
    let tail = timeout(WAIT, client.next()).await.unwrap();
    assert!(tail.is_none(), "expected clean end of stream, got {:?}", tail);

    wait_for_count(&manager, 0).await;
}

#[tokio::test]
async fn test_wrong_path_is_rejected() {
    let manager = ConnectionManager::default();
    let addr = spawn_server(manager.clone()).await;

    let url = Url::parse(&format!("ws://{}/elsewhere", addr)).unwrap();

    match connect_async(url).await {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 404),
        Err(other) => panic!("unexpected handshake error: {}", other),
        Ok(_) => panic!("handshake on the wrong path succeeded"),
    }
    assert_eq!(manager.connection_count(), 0);
}
