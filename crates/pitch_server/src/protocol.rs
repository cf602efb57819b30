//! JSON messages exchanged over the relay socket.
//!
//! Every frame is a text frame holding one object:
//!
//! ```text
//! -> {"event":"move_circle","data":{"id":"p7","left":120,"top":80}}
//! <- {"event":"update_circle","data":{"id":"p7","left":120,"top":80}}
//! -> {"event":"path_draw","data":[[10,10],[40,25]]}
//! <- {"event":"path_draw","data":[[10,10],[40,25]]}
//! ```
//!
//! `data` is opaque to the server and forwarded untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Inbound (board -> server)
// ============================================================================

/// Events a board may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientEventKind {
    /// A marker was dragged.
    MoveCircle,
    /// A stroke was drawn on the board.
    PathDraw,
}

/// One inbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    /// What happened.
    pub event: ClientEventKind,
    /// Payload, `null` when absent.
    #[serde(default)]
    pub data: Value,
}

// ============================================================================
// Outbound (server -> other boards)
// ============================================================================

/// Events the server pushes to peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerEventKind {
    /// Another board moved a marker.
    UpdateCircle,
    /// Another board drew a stroke.
    PathDraw,
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEvent {
    /// What happened.
    pub event: ServerEventKind,
    /// Payload as received from the originating board.
    pub data: Value,
}

impl From<ClientEventKind> for ServerEventKind {
    fn from(kind: ClientEventKind) -> Self {
        match kind {
            ClientEventKind::MoveCircle => Self::UpdateCircle,
            ClientEventKind::PathDraw => Self::PathDraw,
        }
    }
}

impl From<ClientEvent> for ServerEvent {
    fn from(event: ClientEvent) -> Self {
        Self {
            event: event.event.into(),
            data: event.data,
        }
    }
}
