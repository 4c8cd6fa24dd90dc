// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel messages in both directions, plus client-side action ids.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::ActionIntent;
use crate::view::GameView;

/// Informational notice attached to a state message. Never drives animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorityEvent {
    /// Event tag (`bid_made`, `trick_won`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form payload.
    #[serde(default)]
    pub data: Value,
}

/// Error body of an inbound `error` message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorView {
    /// Machine-readable code (`bad_request`, `apply_failed`, ...).
    #[serde(default)]
    pub code: String,
    /// Human-readable explanation.
    #[serde(default)]
    pub message: String,
}

/// Authority → client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A full snapshot with optional notices.
    State {
        /// The snapshot.
        state: Box<GameView>,
        /// Notices produced while reaching this snapshot.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        events: Vec<AuthorityEvent>,
    },
    /// The authority rejected something; the last snapshot stays valid.
    Error {
        /// Error body.
        error: ErrorView,
    },
    /// Any message type this client does not handle.
    #[serde(other)]
    Unknown,
}

/// Client → authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Claim a seat in the session.
    JoinSession,
    /// Start a new game with the named ruleset.
    StartGame {
        /// Ruleset name.
        ruleset: String,
    },
    /// Ask for the current snapshot.
    RequestState,
    /// Attempt a gameplay action.
    PlayerAction {
        /// Correlation id, unique per message.
        #[serde(rename = "actionId")]
        action_id: ActionId,
        /// The action being attempted.
        action: ActionIntent,
    },
}

impl ClientMessage {
    /// Wrap an intent with a freshly generated [`ActionId`].
    pub fn action(action: ActionIntent) -> Self {
        Self::PlayerAction {
            action_id: ActionId::generate(),
            action,
        }
    }
}

static ACTION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque correlation id for an outbound action.
///
/// Format is `<unix millis hex>-<process counter>-<random hex>`. The counter
/// makes ids unique within a process even when the clock stalls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Issue a new id. Never returns the same value twice in one process.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = ACTION_SEQ.fetch_add(1, Ordering::Relaxed);
        let salt: u32 = rand::random();
        Self(format!("{millis:x}-{seq}-{salt:08x}"))
    }

    /// Borrow the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn action_ids_are_unique() {
        let ids: HashSet<ActionId> = (0..1_000).map(|_| ActionId::generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn action_id_has_three_parts() {
        let id = ActionId::generate();
        assert_eq!(id.as_str().split('-').count(), 3);
    }

    #[test]
    fn action_helper_wraps_intent() {
        let msg = ClientMessage::action(crate::LegalAction::TakeKitty);
        assert!(matches!(
            msg,
            ClientMessage::PlayerAction {
                action: crate::LegalAction::TakeKitty,
                ..
            }
        ));
    }
}
