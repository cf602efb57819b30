//! HTTP handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use pitch_core::analysis::{analyze, TacticalReport};
use pitch_core::jitter::RngJitter;
use pitch_core::point::Snapshot;

use crate::advisor::AdvisorError;
use crate::coach;
use crate::error::ApiError;
use crate::AppState;

/// Body of `/ai/analyze` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Board read.
    #[serde(flatten)]
    pub report: TacticalReport,
    /// One-line remark from the coach.
    pub coach_comment: String,
}

/// Body of `/api/chat` requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// What the user typed.
    #[serde(default)]
    pub message: String,
}

/// Body of `/api/chat` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Coach's answer.
    pub reply: String,
}

/// Body of `/healthz` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"`.
    pub status: String,
    /// Crate name.
    pub service: String,
    /// Whether a completion API key is configured.
    pub advisor_configured: bool,
    /// Connected relay peers.
    pub peers: usize,
}

fn invalid_body(err: serde_json::Error) -> ApiError {
    ApiError::bad_request(format!("invalid JSON body: {err}"))
}

/// Parse a JSON body. An empty body, or JSON that is not an object,
/// yields `T::default()`.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(invalid_body)?;
    if !value.is_object() {
        debug!(kind = json_kind(&value), "Non-object body, using defaults");
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(invalid_body)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `POST /ai/analyze` and `POST /ai/analyze-tactical`.
pub async fn analyze_board(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let snapshot: Snapshot = parse_body(&body)?;
    let report = {
        let mut jitter = RngJitter::thread_local();
        analyze(&snapshot, &state.library, &mut jitter)
    };

    let fallback = coach::default_remark(&report.detected_formation, report.phase);
    let coach_comment = match &state.advisor {
        None => fallback,
        Some(advisor) => {
            let request = coach::remark_request(&report.detected_formation, report.phase);
            match advisor.complete(request).await {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => fallback,
                Err(err) => {
                    warn!(%err, "Coach remark unavailable, using the default");
                    fallback
                }
            }
        }
    };

    Ok(Json(AnalyzeResponse {
        report,
        coach_comment,
    }))
}

/// `POST /api/chat`.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, ApiError> {
    let request: ChatRequest = parse_body(&body)?;
    let Some(advisor) = &state.advisor else {
        return Err(ApiError::chat_unavailable(coach::CHAT_UNCONFIGURED_REPLY));
    };

    let reply = match advisor.complete(coach::chat_request(&request.message)).await {
        Ok(text) if text.is_empty() => coach::CHAT_EMPTY_REPLY.to_string(),
        Ok(text) => text,
        // An error reply carries no choices either.
        Err(err @ AdvisorError::Status { .. }) => {
            warn!(%err, "Chat completion rejected");
            coach::CHAT_EMPTY_REPLY.to_string()
        }
        Err(err) => {
            warn!(%err, "Chat completion failed");
            coach::CHAT_FAILED_REPLY.to_string()
        }
    };
    Ok(Json(ChatReply { reply }))
}

/// `GET /healthz`.
pub async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        advisor_configured: state.advisor.is_some(),
        peers: state.hub.peer_count(),
    })
}
