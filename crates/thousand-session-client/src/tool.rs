// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tool-facing helpers: a thin port over the channel so frame-driven UIs can
//! drain events once per frame without touching async plumbing.

use thousand_proto::{ClientMessage, ServerMessage};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{ChannelError, ChannelEvent, ChannelHandle, ChannelState, ChannelStatus};

/// Abstract session port so UIs can be tested without a socket.
pub trait SessionPort {
    /// Drain up to `max` pending events.
    fn drain_events(&mut self, max: usize) -> Vec<ChannelEvent>;
    /// Send a message to the authority.
    fn send(&mut self, msg: &ClientMessage) -> Result<(), ChannelError>;
    /// Last known status.
    fn status(&self) -> &ChannelStatus;
}

/// Port backed by a live [`ChannelHandle`] and its event receiver.
#[derive(Debug, Default)]
pub struct ChannelSession {
    handle: Option<ChannelHandle>,
    events: Option<UnboundedReceiver<ChannelEvent>>,
    status: ChannelStatus,
}

impl ChannelSession {
    /// Session with no connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh connection, closing any previous one.
    pub fn set_channel(&mut self, handle: ChannelHandle, events: UnboundedReceiver<ChannelEvent>) {
        self.close();
        self.handle = Some(handle);
        self.events = Some(events);
        self.status = ChannelStatus {
            state: ChannelState::Connecting,
            last_error: None,
        };
    }

    /// Dial `url` and install the result. Requires a tokio runtime.
    pub fn connect(&mut self, url: &str) {
        let (handle, events) = crate::connect(url);
        self.set_channel(handle, events);
    }

    /// Close the current connection, if any. Idempotent.
    pub fn close(&mut self) {
        if let Some(handle) = &self.handle {
            handle.close();
        }
    }

    /// Whether the channel is open.
    pub fn is_open(&self) -> bool {
        self.status.state == ChannelState::Open
    }

    /// Drain pending events, routing messages and status changes to the
    /// callbacks in arrival order. Returns the number of events handled.
    pub fn pump<M, S>(&mut self, mut on_message: M, mut on_status: S) -> usize
    where
        M: FnMut(ServerMessage),
        S: FnMut(&ChannelStatus),
    {
        let events = self.drain_events(usize::MAX);
        let handled = events.len();
        for event in events {
            match event {
                ChannelEvent::Message(msg) => on_message(msg),
                ChannelEvent::Status(status) => on_status(&status),
            }
        }
        handled
    }
}

impl SessionPort for ChannelSession {
    fn drain_events(&mut self, max: usize) -> Vec<ChannelEvent> {
        let mut out = Vec::new();
        let Some(rx) = self.events.as_mut() else {
            return out;
        };
        while out.len() < max {
            match rx.try_recv() {
                Ok(event) => {
                    if let ChannelEvent::Status(status) = &event {
                        self.status = status.clone();
                    }
                    out.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.events = None;
                    if self.status.state != ChannelState::Closed {
                        self.status.state = ChannelState::Closed;
                        out.push(ChannelEvent::Status(self.status.clone()));
                    }
                    break;
                }
            }
        }
        out
    }

    fn send(&mut self, msg: &ClientMessage) -> Result<(), ChannelError> {
        match &self.handle {
            Some(handle) => handle.send(msg),
            None => Err(ChannelError::Closed),
        }
    }

    fn status(&self) -> &ChannelStatus {
        &self.status
    }
}
