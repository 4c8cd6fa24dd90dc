// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel client for the Thousand authority over WebSocket (JSON text
//! frames), plus tool-facing adapters (drain port + reconnect backoff).
//!
//! [`connect`] spawns one connection task on the current tokio runtime and
//! hands back a [`ChannelHandle`] for sending and an event receiver for
//! status changes and decoded messages. Sends made before the socket opens
//! wait in an outbox and go out in call order right after the open.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use thousand_proto::{decode_server_message, encode_client_message, ClientMessage, ServerMessage, WireError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

pub mod backoff;
pub mod tool;

/// Connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelState {
    /// Dialing the authority.
    Connecting,
    /// Socket open; sends go straight out.
    Open,
    /// Close requested, handshake in progress.
    Closing,
    /// No connection.
    #[default]
    Closed,
}

/// Connection status as reported to the UI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelStatus {
    /// Lifecycle state.
    pub state: ChannelState,
    /// Most recent transport error on this connection, if any.
    pub last_error: Option<String>,
}

impl ChannelStatus {
    fn new(state: ChannelState, last_error: Option<String>) -> Self {
        Self { state, last_error }
    }
}

/// Something the connection task reports.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelEvent {
    /// The status changed (or an error occurred).
    Status(ChannelStatus),
    /// A decoded inbound message of a known type.
    Message(ServerMessage),
}

/// Errors surfaced to senders.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The handle was closed; the message was not sent.
    #[error("channel closed")]
    Closed,
    /// The message could not be encoded.
    #[error(transparent)]
    Wire(#[from] WireError),
}

enum Command {
    Send(String),
    Close,
}

/// Sending half of a connection. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ChannelHandle {
    commands: UnboundedSender<Command>,
    closed: Arc<AtomicBool>,
}

impl core::fmt::Debug for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Command::Send(text) => write!(f, "Send({} bytes)", text.len()),
            Command::Close => f.write_str("Close"),
        }
    }
}

impl ChannelHandle {
    /// Queue a message. Before the socket opens it waits in the outbox.
    ///
    /// After [`close`](Self::close) this returns [`ChannelError::Closed`]
    /// and nothing is sent.
    pub fn send(&self, msg: &ClientMessage) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        let text = encode_client_message(msg)?;
        self.commands
            .send(Command::Send(text))
            .map_err(|_| ChannelError::Closed)
    }

    /// Close the connection. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            let _ = self.commands.send(Command::Close);
        }
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Texts waiting for the socket to open, in call order.
#[derive(Debug, Default)]
struct Outbox {
    pending: VecDeque<String>,
}

impl Outbox {
    fn push(&mut self, text: String) {
        self.pending.push_back(text);
    }

    fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.pending.drain(..)
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Dial `url` on the current tokio runtime.
///
/// Returns immediately. The first event is always
/// `Status(Connecting)`. Must be called from within a runtime.
pub fn connect(url: &str) -> (ChannelHandle, UnboundedReceiver<ChannelEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel();
    let handle = ChannelHandle {
        commands: cmd_tx,
        closed: Arc::new(AtomicBool::new(false)),
    };
    tokio::spawn(run(url.to_owned(), cmd_rx, evt_tx));
    (handle, evt_rx)
}

struct Reporter {
    events: UnboundedSender<ChannelEvent>,
}

impl Reporter {
    fn status(&self, state: ChannelState, last_error: Option<String>) {
        match &last_error {
            Some(err) => warn!(?state, error = %err, "channel status"),
            None => info!(?state, "channel status"),
        }
        let _ = self
            .events
            .send(ChannelEvent::Status(ChannelStatus::new(state, last_error)));
    }

    fn message(&self, msg: ServerMessage) -> bool {
        self.events.send(ChannelEvent::Message(msg)).is_ok()
    }

    fn gone(&self) -> bool {
        self.events.is_closed()
    }
}

async fn run(
    url: String,
    mut commands: UnboundedReceiver<Command>,
    events: UnboundedSender<ChannelEvent>,
) {
    let report = Reporter { events };
    report.status(ChannelState::Connecting, None);

    let mut outbox = Outbox::default();
    let dial = connect_async(url.as_str());
    tokio::pin!(dial);
    let mut ws = loop {
        tokio::select! {
            res = &mut dial => match res {
                Ok((ws, _)) => break ws,
                Err(err) => {
                    report.status(ChannelState::Closed, Some(err.to_string()));
                    return;
                }
            },
            cmd = commands.recv() => match cmd {
                Some(Command::Send(text)) => outbox.push(text),
                Some(Command::Close) | None => {
                    debug!(dropped = outbox.len(), "closed before open");
                    report.status(ChannelState::Closed, None);
                    return;
                }
            },
        }
    };

    report.status(ChannelState::Open, None);
    let flushed = outbox.len();
    for text in outbox.drain() {
        if let Err(err) = ws.send(Message::text(text)).await {
            report.status(ChannelState::Closed, Some(err.to_string()));
            return;
        }
    }
    if flushed > 0 {
        debug!(flushed, "outbox flushed");
    }

    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(Command::Send(text)) => {
                    if let Err(err) = ws.send(Message::text(text)).await {
                        report.status(ChannelState::Closed, Some(err.to_string()));
                        return;
                    }
                }
                Some(Command::Close) | None => {
                    report.status(ChannelState::Closing, None);
                    let outcome = ws.close(None).await.err().map(|e| e.to_string());
                    report.status(ChannelState::Closed, outcome);
                    return;
                }
            },
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode_server_message(&text) {
                    Ok(ServerMessage::Unknown) => debug!("ignoring unknown message type"),
                    Ok(msg) => {
                        if !report.message(msg) {
                            let _ = ws.close(None).await;
                            return;
                        }
                    }
                    Err(err) => warn!(error = %err, "dropping undecodable frame"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    report.status(ChannelState::Closed, None);
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    report.status(ChannelState::Closed, Some(err.to_string()));
                    return;
                }
            },
        }
        if report.gone() {
            let _ = ws.close(None).await;
            return;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;
    use thousand_proto::LegalAction;
    use tokio::net::TcpListener;
    use tokio::time::timeout;
    use tokio_tungstenite::accept_async;

    async fn next_status(rx: &mut UnboundedReceiver<ChannelEvent>) -> ChannelStatus {
        loop {
            match timeout(Duration::from_secs(5), rx.recv()).await.unwrap() {
                Some(ChannelEvent::Status(status)) => return status,
                Some(ChannelEvent::Message(_)) => {}
                None => panic!("event stream ended"),
            }
        }
    }

    #[tokio::test]
    async fn queued_sends_flush_once_in_order_after_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (handle, mut events) = connect(&format!("ws://{addr}"));
        handle.send(&ClientMessage::JoinSession).unwrap();
        handle
            .send(&ClientMessage::StartGame {
                ruleset: "classic".into(),
            })
            .unwrap();
        handle.send(&ClientMessage::RequestState).unwrap();

        let (stream, _) = listener.accept().await.unwrap();
        let mut server = accept_async(stream).await.unwrap();

        let mut received = Vec::new();
        while received.len() < 3 {
            let frame = timeout(Duration::from_secs(5), server.next())
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            if let Message::Text(text) = frame {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                received.push(value["type"].as_str().unwrap().to_owned());
            }
        }
        assert_eq!(received, ["join_session", "start_game", "request_state"]);

        // Nothing is sent twice.
        let extra = timeout(Duration::from_millis(150), server.next()).await;
        assert!(extra.is_err(), "unexpected extra frame: {extra:?}");

        assert_eq!(next_status(&mut events).await.state, ChannelState::Connecting);
        assert_eq!(next_status(&mut events).await.state, ChannelState::Open);
        handle.close();
    }

    #[tokio::test]
    async fn inbound_state_is_decoded_and_unknown_is_dropped() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (handle, mut events) = connect(&format!("ws://{addr}"));

        let (stream, _) = listener.accept().await.unwrap();
        let mut server = accept_async(stream).await.unwrap();
        server
            .send(Message::text(r#"{"type":"pong"}"#))
            .await
            .unwrap();
        server.send(Message::text("{not json")).await.unwrap();
        server
            .send(Message::text(
                r#"{"type":"state","state":{"meta":{"playerId":1}},"events":[]}"#,
            ))
            .await
            .unwrap();

        let msg = loop {
            match timeout(Duration::from_secs(5), events.recv()).await.unwrap() {
                Some(ChannelEvent::Message(msg)) => break msg,
                Some(ChannelEvent::Status(_)) => {}
                None => panic!("event stream ended"),
            }
        };
        let ServerMessage::State { state, .. } = msg else {
            panic!("expected state, got {msg:?}");
        };
        assert_eq!(state.meta.player_id, 1);
        handle.close();
    }

    #[tokio::test]
    async fn close_is_idempotent_and_later_sends_are_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (handle, mut events) = connect(&format!("ws://{addr}"));
        let (stream, _) = listener.accept().await.unwrap();
        let _server = accept_async(stream).await.unwrap();

        assert_eq!(next_status(&mut events).await.state, ChannelState::Connecting);
        assert_eq!(next_status(&mut events).await.state, ChannelState::Open);

        handle.close();
        handle.close();
        assert!(handle.is_closed());
        assert!(matches!(
            handle.send(&ClientMessage::action(LegalAction::Pass)),
            Err(ChannelError::Closed)
        ));
        assert_eq!(next_status(&mut events).await.state, ChannelState::Closing);
        assert_eq!(next_status(&mut events).await.state, ChannelState::Closed);
    }

    #[tokio::test]
    async fn failed_dial_reports_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let (_handle, mut events) = connect(&format!("ws://{addr}"));
        assert_eq!(next_status(&mut events).await.state, ChannelState::Connecting);
        let status = next_status(&mut events).await;
        assert_eq!(status.state, ChannelState::Closed);
        assert!(status.last_error.is_some());
    }
}
