//! Real-time event relay between connected boards.
//!
//! Every peer gets a receiver on one broadcast channel. Messages carry the
//! sender's id so each peer can drop its own echoes. A slow peer that falls
//! more than the channel capacity behind skips the missed events and keeps
//! going.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::protocol::{ClientEvent, ServerEvent};
use crate::AppState;

/// Identifies one connected board for the lifetime of its socket.
pub type PeerId = u64;

/// Default broadcast capacity.
pub const DEFAULT_RELAY_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct Relayed {
    from: PeerId,
    text: Arc<str>,
}

/// Fan-out hub shared by all sockets.
#[derive(Debug)]
pub struct RelayHub {
    tx: broadcast::Sender<Relayed>,
    next_peer: AtomicU64,
    peers: AtomicUsize,
}

impl RelayHub {
    /// Create a hub buffering up to `capacity` events per peer.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            next_peer: AtomicU64::new(1),
            peers: AtomicUsize::new(0),
        }
    }

    /// Register a new peer.
    pub fn join(self: &Arc<Self>) -> Peer {
        let id = self.next_peer.fetch_add(1, Ordering::Relaxed);
        let rx = self.tx.subscribe();
        self.peers.fetch_add(1, Ordering::Relaxed);
        Peer {
            id,
            hub: Arc::clone(self),
            rx,
        }
    }

    /// Number of peers currently connected.
    pub fn peer_count(&self) -> usize {
        self.peers.load(Ordering::Relaxed)
    }

    /// Forward an event from `from` to every other peer.
    ///
    /// Returns the number of other peers it was queued for.
    pub fn publish(&self, from: PeerId, event: ClientEvent) -> usize {
        let outbound = ServerEvent::from(event);
        let text = match serde_json::to_string(&outbound) {
            Ok(text) => text,
            Err(err) => {
                warn!(peer = from, %err, "Dropping event that failed to serialize");
                return 0;
            }
        };
        debug!(peer = from, event = ?outbound.event, "Relaying event");
        self.tx
            .send(Relayed {
                from,
                text: text.into(),
            })
            .map_or(0, |receivers| receivers.saturating_sub(1))
    }
}

impl Default for RelayHub {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_CAPACITY)
    }
}

/// One connected board's view of the hub.
#[derive(Debug)]
pub struct Peer {
    id: PeerId,
    hub: Arc<RelayHub>,
    rx: broadcast::Receiver<Relayed>,
}

impl Peer {
    /// This peer's id.
    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Next serialized event from another peer.
    ///
    /// Returns `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        loop {
            match self.rx.recv().await {
                Ok(relayed) if relayed.from == self.id => continue,
                Ok(relayed) => return Some(relayed.text),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(peer = self.id, skipped, "Peer lagged behind the relay");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Peer {
    fn drop(&mut self) {
        self.hub.peers.fetch_sub(1, Ordering::Relaxed);
    }
}

/// `GET /ws`: upgrade and relay board events.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let hub = Arc::clone(&state.hub);
    ws.on_upgrade(move |socket| serve_peer(socket, hub))
}

async fn serve_peer(socket: WebSocket, hub: Arc<RelayHub>) {
    let mut peer = hub.join();
    let id = peer.id();
    info!(peer = id, peers = hub.peer_count(), "Board connected");

    let (mut sink, mut stream) = socket.split();

    let mut outbound = tokio::spawn(async move {
        while let Some(text) = peer.recv().await {
            if sink.send(Message::Text(text.to_string())).await.is_err() {
                break;
            }
        }
    });

    let inbound_hub = Arc::clone(&hub);
    let mut inbound = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        inbound_hub.publish(id, event);
                    }
                    Err(err) => debug!(peer = id, %err, "Ignoring malformed message"),
                },
                Message::Close(_) => break,
                Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut outbound => inbound.abort(),
        _ = &mut inbound => outbound.abort(),
    }

    info!(peer = id, "Board disconnected");
}
