//! Inbound operator commands
//!
//! Commands arrive as named events, `{"event": "...", "data": ...}`, with
//! payload-less commands omitting `data`. Anything that fails to decode is
//! dropped by the hub before it reaches the processor.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{constants, state::Screen, timer::TimerValue};

/// Rejects text that is empty once surrounding whitespace is removed
fn not_blank(value: &str) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("must not be blank"))
    } else {
        Ok(())
    }
}

/// Payload of `question-update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionUpdate {
    /// The question text
    #[garde(length(max = constants::question::MAX_TEXT_LENGTH), custom(|v, _| not_blank(v)))]
    pub text: String,
    /// The answer options, exactly four
    #[garde(
        length(min = constants::question::OPTION_COUNT, max = constants::question::OPTION_COUNT),
        inner(length(max = constants::question::MAX_OPTION_LENGTH), custom(|v, _| not_blank(v)))
    )]
    pub options: Vec<String>,
}

/// Commands sent by the operator (or any connected client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum IncomingCommand {
    /// Install a new question, discarding the previous one
    QuestionUpdate(QuestionUpdate),
    /// Reveal the options and start the countdown
    ShowOptions,
    /// Lock in the contestant's pick
    PickAnswer(usize),
    /// Announce the correct answer
    MarkCorrect(usize),
    /// Mark an option as wrong
    MarkWrong(usize),
    /// Refill the countdown before it starts
    ResetTimer,
    /// Change the countdown length before it starts
    ChangeTimer(TimerValue),
    /// Pause the countdown, stopping its cue
    PauseTimer,
    /// Resume a paused countdown
    ContinueTimer,
    /// Pause the countdown without touching audio
    FreezeTimer,
    /// Clear the question and go idle
    RemoveQuestion,
    /// Relay an audio cue to every display
    PlayAudio(String),
    /// Switch every display to a screen
    SetScreen(Screen),
    /// Ask for a timer resync for the sender only
    GetTimer,
    /// Relay lifeline status
    UpdateLifelines(serde_json::Value),
    /// Relay fifty-fifty hidden options
    #[serde(rename = "apply-5050")]
    Apply5050(serde_json::Value),
    /// Relay the featured lifeline
    ShowSpecificLifeline(serde_json::Value),
    /// Relay the question number
    UpdateQuestionNumber(serde_json::Value),
}

impl IncomingCommand {
    /// Decodes a command from its JSON wire form
    ///
    /// # Errors
    ///
    /// Returns the decoding error for unknown event names, malformed
    /// payloads, or payloads of the wrong type (e.g. a negative index).
    pub fn from_message(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }

    /// The wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuestionUpdate(_) => "question-update",
            Self::ShowOptions => "show-options",
            Self::PickAnswer(_) => "pick-answer",
            Self::MarkCorrect(_) => "mark-correct",
            Self::MarkWrong(_) => "mark-wrong",
            Self::ResetTimer => "reset-timer",
            Self::ChangeTimer(_) => "change-timer",
            Self::PauseTimer => "pause-timer",
            Self::ContinueTimer => "continue-timer",
            Self::FreezeTimer => "freeze-timer",
            Self::RemoveQuestion => "remove-question",
            Self::PlayAudio(_) => "play-audio",
            Self::SetScreen(_) => "set-screen",
            Self::GetTimer => "get-timer",
            Self::UpdateLifelines(_) => "update-lifelines",
            Self::Apply5050(_) => "apply-5050",
            Self::ShowSpecificLifeline(_) => "show-specific-lifeline",
            Self::UpdateQuestionNumber(_) => "update-question-number",
        }
    }
}
