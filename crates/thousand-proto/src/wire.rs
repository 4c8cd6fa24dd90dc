// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON text framing for the table channel.
//!
//! One WebSocket text frame carries exactly one message object whose `type`
//! field selects the variant. Inbound types this client does not know decode
//! to [`ServerMessage::Unknown`] so the caller can ignore them.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{ClientMessage, ServerMessage};

/// Wire encode/decode failure.
#[derive(Debug, Error)]
pub enum WireError {
    /// The frame was not valid JSON or did not match the message schema.
    #[error("malformed {kind} message: {source}")]
    Malformed {
        /// Message `type` field if it could be read.
        kind: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
    /// Outbound serialisation failed.
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct TypeProbe {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Decode one inbound text frame.
///
/// Unknown `type` values are not an error; they decode to
/// [`ServerMessage::Unknown`].
pub fn decode_server_message(text: &str) -> Result<ServerMessage, WireError> {
    let value: Value = serde_json::from_str(text).map_err(|source| WireError::Malformed {
        kind: "<unparsed>".into(),
        source,
    })?;
    let kind = TypeProbe::deserialize(&value)
        .ok()
        .and_then(|p| p.kind)
        .unwrap_or_default();
    match kind.as_str() {
        "state" | "error" => {
            serde_json::from_value(value).map_err(|source| WireError::Malformed { kind, source })
        }
        _ => Ok(ServerMessage::Unknown),
    }
}

/// Encode one outbound message as a text frame.
pub fn encode_client_message(msg: &ClientMessage) -> Result<String, WireError> {
    Ok(serde_json::to_string(msg)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::{ActionId, LegalAction};

    #[test]
    fn state_message_decodes_with_events() {
        let text = r#"{"type":"state","state":{"meta":{"playerId":0}},
            "events":[{"type":"bid_made","data":{"player":1,"bid":105}}]}"#;
        let msg = decode_server_message(text).unwrap();
        let ServerMessage::State { events, .. } = &msg else {
            panic!("expected state, got {msg:?}");
        };
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "bid_made");
        assert_eq!(events[0].data["bid"], 105);
    }

    #[test]
    fn error_message_decodes() {
        let text = r#"{"type":"error","error":{"code":"apply_failed","message":"not your turn"}}"#;
        match decode_server_message(text).unwrap() {
            ServerMessage::Error { error } => {
                assert_eq!(error.code, "apply_failed");
                assert_eq!(error.message, "not your turn");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_and_untyped_messages_are_noops() {
        assert_eq!(
            decode_server_message(r#"{"type":"pong","at":3}"#).unwrap(),
            ServerMessage::Unknown
        );
        assert_eq!(
            decode_server_message(r#"{"hello":"world"}"#).unwrap(),
            ServerMessage::Unknown
        );
    }

    #[test]
    fn garbage_is_reported() {
        assert!(matches!(
            decode_server_message("not json"),
            Err(WireError::Malformed { .. })
        ));
        assert!(matches!(
            decode_server_message(r#"{"type":"state","state":"oops"}"#),
            Err(WireError::Malformed { ref kind, .. }) if kind == "state"
        ));
    }

    #[test]
    fn outbound_shapes_match_authority() {
        let join = encode_client_message(&ClientMessage::JoinSession).unwrap();
        assert_eq!(join, r#"{"type":"join_session"}"#);
        let start = encode_client_message(&ClientMessage::StartGame {
            ruleset: "classic".into(),
        })
        .unwrap();
        assert_eq!(start, r#"{"type":"start_game","ruleset":"classic"}"#);
        let action = encode_client_message(&ClientMessage::PlayerAction {
            action_id: ActionId::from("a-1"),
            action: LegalAction::Pass,
        })
        .unwrap();
        assert_eq!(
            action,
            r#"{"type":"player_action","actionId":"a-1","action":{"type":"pass"}}"#
        );
    }
}
