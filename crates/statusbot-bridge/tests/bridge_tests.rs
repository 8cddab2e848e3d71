// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge client against an in-process fake bridge.

use std::future::Future;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use statusbot_bridge::BridgeConnector;
use statusbot_core::types::{
    ConnectionState, DisconnectReason, InboundEvent, Jid, MediaKind, MediaRef, MessageId,
    MessageKey, SessionCredentials,
};
use statusbot_core::{PluginAdapter, StatusBotError, Transport, TransportConnector};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

type Socket = WebSocketStream<TcpStream>;

/// Accepts one client and hands its socket to `script`. Returns the URL.
async fn fake_bridge<F, Fut>(script: F) -> String
where
    F: FnOnce(Socket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let socket = accept_async(tcp).await.unwrap();
        script(socket).await;
    });
    format!("ws://{addr}")
}

async fn next_request(socket: &mut Socket) -> Value {
    loop {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
            Some(Ok(_)) => continue,
            other => panic!("client went away: {other:?}"),
        }
    }
}

async fn send_json(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
}

async fn respond(socket: &mut Socket, request: &Value, data: Value) {
    send_json(
        socket,
        json!({"type": "response", "id": request["id"], "ok": true, "data": data}),
    )
    .await;
}

/// Answers the `connect` handshake and forwards it to the test.
async fn accept_connect(socket: &mut Socket, seen: &mpsc::UnboundedSender<Value>) {
    let connect = next_request(socket).await;
    respond(socket, &connect, Value::Null).await;
    let _ = seen.send(connect);
}

fn connector(url: String) -> BridgeConnector {
    BridgeConnector::new(url, Duration::from_secs(2))
}

fn key() -> MessageKey {
    MessageKey {
        remote_jid: Jid::new("status@broadcast"),
        id: MessageId("S1".into()),
        from_me: false,
        participant: Some(Jid::new("333@s.whatsapp.net")),
    }
}

#[tokio::test]
async fn session_carries_credentials_events_and_sends() {
    let (seen_tx, mut seen) = mpsc::unbounded_channel();
    let url = fake_bridge(move |mut socket| async move {
        accept_connect(&mut socket, &seen_tx).await;
        send_json(
            &mut socket,
            json!({"type": "event", "event": "connection_update", "connection": "open"}),
        )
        .await;
        send_json(
            &mut socket,
            json!({
                "type": "event",
                "event": "message",
                "message": {
                    "key": {"remote_jid": "111@s.whatsapp.net", "id": "M0"},
                    "payload": {"type": "text", "text": ".ping"}
                }
            }),
        )
        .await;
        let send = next_request(&mut socket).await;
        respond(&mut socket, &send, json!({"message_id": "M1"})).await;
        let _ = seen_tx.send(send);
        // Keep the socket open until the client is done.
        let _ = socket.next().await;
    })
    .await;

    let credentials = SessionCredentials {
        registered: true,
        material: json!({"noise": "k"}),
    };
    let mut session = connector(url).connect(Some(credentials)).await.unwrap();

    let connect = seen.recv().await.unwrap();
    assert_eq!(connect["op"], "connect");
    assert_eq!(connect["credentials"]["registered"], true);

    assert!(matches!(
        session.events.recv().await,
        Some(InboundEvent::ConnectionChange { update }) if update.state == Some(ConnectionState::Open)
    ));
    assert!(matches!(
        session.events.recv().await,
        Some(InboundEvent::ChatMessage { message }) if message.text() == Some(".ping")
    ));

    let id = session
        .transport
        .send_text(&Jid::new("111@s.whatsapp.net"), "pong")
        .await
        .unwrap();
    assert_eq!(id, MessageId("M1".into()));

    let send = seen.recv().await.unwrap();
    assert_eq!(send["op"], "send_text");
    assert_eq!(send["text"], "pong");
    session.transport.shutdown().await.unwrap();
}

#[tokio::test]
async fn download_decodes_media_and_maps_failures() {
    let (seen_tx, _seen) = mpsc::unbounded_channel();
    let url = fake_bridge(move |mut socket| async move {
        accept_connect(&mut socket, &seen_tx).await;

        let first = next_request(&mut socket).await;
        respond(&mut socket, &first, json!({"media": "aGVsbG8="})).await;

        let second = next_request(&mut socket).await;
        send_json(
            &mut socket,
            json!({"type": "response", "id": second["id"], "ok": false, "error": "media expired"}),
        )
        .await;
        let _ = socket.next().await;
    })
    .await;

    let session = connector(url).connect(None).await.unwrap();
    let media = MediaRef {
        kind: MediaKind::Image,
        handle: json!({"direct_path": "/v/t62"}),
        mime_type: None,
        caption: None,
    };

    assert_eq!(session.transport.download_media(&media).await.unwrap(), b"hello");
    match session.transport.download_media(&media).await {
        Err(StatusBotError::Download { message, .. }) => assert_eq!(message, "media expired"),
        other => panic!("expected download error, got {other:?}"),
    }
}

#[tokio::test]
async fn socket_close_fails_pending_and_reports_lost_connection() {
    let (seen_tx, _seen) = mpsc::unbounded_channel();
    let url = fake_bridge(move |mut socket| async move {
        accept_connect(&mut socket, &seen_tx).await;
        // Read the next request, then hang up without answering.
        let _ = next_request(&mut socket).await;
        let _ = socket.close(None).await;
    })
    .await;

    let mut session = connector(url).connect(None).await.unwrap();
    let result = session.transport.mark_read(&key()).await;
    assert!(matches!(result, Err(StatusBotError::Transport { .. })));

    let event = tokio::time::timeout(Duration::from_secs(2), session.events.recv())
        .await
        .unwrap();
    assert!(matches!(
        event,
        Some(InboundEvent::ConnectionChange { update })
            if update.state == Some(ConnectionState::Closed(DisconnectReason::ConnectionLost))
    ));

    // Later requests fail fast.
    assert!(session.transport.mark_read(&key()).await.is_err());
}

#[tokio::test]
async fn unanswered_request_times_out() {
    let (seen_tx, _seen) = mpsc::unbounded_channel();
    let url = fake_bridge(move |mut socket| async move {
        accept_connect(&mut socket, &seen_tx).await;
        let _ = next_request(&mut socket).await;
        let _ = socket.next().await;
    })
    .await;

    let session = BridgeConnector::new(url, Duration::from_millis(200))
        .connect(None)
        .await
        .unwrap();
    let result = session
        .transport
        .send_reaction(&Jid::new("status@broadcast"), &key(), "❤️")
        .await;
    assert!(matches!(result, Err(StatusBotError::Timeout { .. })));
}

#[tokio::test]
async fn connect_to_missing_bridge_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = connector(format!("ws://{addr}")).connect(None).await;
    assert!(matches!(result, Err(StatusBotError::Transport { .. })));
}
