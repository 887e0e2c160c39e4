//! Outbound events
//!
//! Every change a display has to render is expressed as one of these named
//! events. Live updates and late-join snapshots use exactly the same event
//! types, so a display needs a single reducer for both.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    constants::question::OPTION_COUNT,
    state::{AuxiliaryKind, Screen},
    timer::{TimerStatus, TimerValue},
};

/// Audio cue names understood by displays
pub mod audio {
    /// An answer was locked in
    pub const LOCK: &str = "lock";
    /// The correct answer was confirmed
    pub const CORRECT: &str = "correct";
    /// A wrong answer was confirmed
    pub const WRONG: &str = "wrong";
}

/// Full question announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    /// The question text
    pub text: String,
    /// The answer options
    pub options: [String; OPTION_COUNT],
    /// Countdown reading at the time of sending
    pub timer: TimerValue,
    /// Countdown upper bound
    pub max_timer: TimerValue,
    /// Whether the options are revealed
    pub show_options: bool,
}

/// A wrong pick next to the correct answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPayload {
    /// The option that was picked
    pub selected_index: usize,
    /// The option that was correct
    pub correct_index: usize,
}

/// Countdown reading with audio cue instructions
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerUpdate {
    /// Seconds left
    pub current: TimerValue,
    /// Countdown upper bound
    pub max: TimerValue,
    /// Whether the countdown cue should (re)start
    pub audio_trigger: bool,
    /// Offset into the countdown cue, absent for unlimited timers
    pub start_position: Option<i64>,
}

/// Bare countdown reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerReading {
    /// Seconds left
    pub current: TimerValue,
    /// Countdown upper bound
    pub max: TimerValue,
}

/// Countdown lifecycle announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatePayload {
    /// Current lifecycle
    pub state: TimerStatus,
}

/// Stop the local countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreezePayload {
    /// Whether to stop the countdown cue
    pub trigger_audio: bool,
}

/// Restart the local countdown
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfreezePayload {
    /// Whether to restart the countdown cue
    pub trigger_audio: bool,
    /// Offset into the countdown cue
    pub audio_offset: Option<i64>,
}

/// Events sent from the core to displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutgoingEvent {
    /// Install a question, discarding any highlight
    DisplayQuestion(QuestionPayload),
    /// Reveal the answer options and start the local countdown
    ShowOptions,
    /// Highlight a picked option
    HighlightAnswer(usize),
    /// Style an option as correct
    MarkCorrect(usize),
    /// Style an option as wrong
    MarkWrong(usize),
    /// Show a wrong pick together with the correct answer
    ShowCorrectAnswer(RevealPayload),
    /// Remove all highlighting
    ResetHighlights,
    /// Set the countdown reading, possibly restarting its cue
    UpdateTimer(TimerUpdate),
    /// Set the countdown reading
    CurrentTimer(TimerReading),
    /// Announce the countdown lifecycle
    TimerState(TimerStatePayload),
    /// Stop the local countdown
    FreezeTimer(FreezePayload),
    /// Restart the local countdown
    UnfreezeTimer(UnfreezePayload),
    /// Remove the question
    ClearQuestion,
    /// Play an audio cue
    TriggerAudio(String),
    /// Switch screens
    ChangeScreen(Screen),
    /// Relayed lifeline status
    UpdateLifelines(serde_json::Value),
    /// Relayed fifty-fifty hidden options
    #[serde(rename = "apply-5050")]
    Apply5050(serde_json::Value),
    /// Relayed featured lifeline
    ShowSpecificLifeline(serde_json::Value),
    /// Relayed question number
    UpdateQuestionNumber(serde_json::Value),
}

impl OutgoingEvent {
    /// Wraps a relayed payload in the event of the matching kind
    pub fn auxiliary(kind: AuxiliaryKind, payload: serde_json::Value) -> Self {
        match kind {
            AuxiliaryKind::UpdateLifelines => Self::UpdateLifelines(payload),
            AuxiliaryKind::Apply5050 => Self::Apply5050(payload),
            AuxiliaryKind::ShowSpecificLifeline => Self::ShowSpecificLifeline(payload),
            AuxiliaryKind::UpdateQuestionNumber => Self::UpdateQuestionNumber(payload),
        }
    }

    /// Shorthand for a `timer-state` event
    pub fn timer_state(state: TimerStatus) -> Self {
        Self::TimerState(TimerStatePayload { state })
    }

    /// Shorthand for a `trigger-audio` event
    pub fn audio(key: &str) -> Self {
        Self::TriggerAudio(key.to_owned())
    }

    /// The wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::DisplayQuestion(_) => "display-question",
            Self::ShowOptions => "show-options",
            Self::HighlightAnswer(_) => "highlight-answer",
            Self::MarkCorrect(_) => "mark-correct",
            Self::MarkWrong(_) => "mark-wrong",
            Self::ShowCorrectAnswer(_) => "show-correct-answer",
            Self::ResetHighlights => "reset-highlights",
            Self::UpdateTimer(_) => "update-timer",
            Self::CurrentTimer(_) => "current-timer",
            Self::TimerState(_) => "timer-state",
            Self::FreezeTimer(_) => "freeze-timer",
            Self::UnfreezeTimer(_) => "unfreeze-timer",
            Self::ClearQuestion => "clear-question",
            Self::TriggerAudio(_) => "trigger-audio",
            Self::ChangeScreen(_) => "change-screen",
            Self::UpdateLifelines(_) => "update-lifelines",
            Self::Apply5050(_) => "apply-5050",
            Self::ShowSpecificLifeline(_) => "show-specific-lifeline",
            Self::UpdateQuestionNumber(_) => "update-question-number",
        }
    }

    /// Converts the event to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
