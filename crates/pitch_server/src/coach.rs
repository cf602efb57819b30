//! The coach persona: prompts and canned lines.

use pitch_core::phase::Phase;

use crate::advisor::CompletionRequest;

/// Chat reply when the completion call fails.
pub const CHAT_FAILED_REPLY: &str =
    "The boss didn't answer... probably still arguing with the referee.";

/// Chat reply when the completion comes back empty.
pub const CHAT_EMPTY_REPLY: &str = "The boss has no time for small talk.";

/// Chat reply when no API key is configured.
pub const CHAT_UNCONFIGURED_REPLY: &str = "Internal error: OPENROUTER_KEY is not configured.";

const REMARK_SYSTEM: &str = "You are a legendary Portuguese football coach, blunt and sarcastic. \
     Talk tactics in a few sentences.";

const CHAT_SYSTEM: &str = "You are a legendary Portuguese football coach: sarcastic, confident \
     and direct. You won titles at Porto, Chelsea, Inter, Real Madrid and Manchester United. \
     Speak with authority and irony, always as if you were the center of attention.";

/// Remark used when no advisor answers.
pub fn default_remark(formation: &str, phase: Phase) -> String {
    format!("The opponent plays a {formation} and we are in the {phase} phase.")
}

/// Prompt for a short remark on an analyzed board.
pub fn remark_request(formation: &str, phase: Phase) -> CompletionRequest {
    let shape = if phase == Phase::Defense {
        "pushed all the way up"
    } else {
        "sitting deep"
    };
    CompletionRequest {
        system: REMARK_SYSTEM.to_string(),
        user: format!(
            "The opposing team is {shape} and plays a {formation}. Our team has to react \
             tactically. Comment like a sarcastic Portuguese coach."
        ),
        max_tokens: 80,
        temperature: 0.8,
    }
}

/// Prompt for a free-form chat message.
pub fn chat_request(message: &str) -> CompletionRequest {
    CompletionRequest {
        system: CHAT_SYSTEM.to_string(),
        user: message.to_string(),
        max_tokens: 200,
        temperature: 0.9,
    }
}
