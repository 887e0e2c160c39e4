//! The single shared record of presentation state
//!
//! Everything a display must agree on lives in [`Store`]: the installed
//! question, the countdown, the highlighted answer, the revealed correct
//! answer and the current screen. Only the command processor mutates it;
//! the snapshot builder and the hub read it.

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

use crate::{
    config::Options,
    constants::question::OPTION_COUNT,
    timer::{TimerState, TimerValue},
};

/// The question currently on display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionState {
    /// The question text
    pub text: String,
    /// The four answer options, in display order
    pub options: [String; OPTION_COUNT],
    /// Whether the answer options have been revealed
    pub options_visible: bool,
}

/// How the highlighted option is styled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    /// Nothing highlighted
    #[default]
    None,
    /// The contestant's locked-in pick
    Selected,
    /// Marked as the correct answer
    Correct,
    /// Marked as a wrong answer
    Wrong,
}

/// The highlighted option and its styling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightState {
    /// Index of the highlighted option
    pub index: Option<usize>,
    /// Styling of the highlight
    pub kind: HighlightKind,
}

impl HighlightState {
    /// A highlight of `kind` on option `index`
    pub fn new(index: usize, kind: HighlightKind) -> Self {
        Self {
            index: Some(index),
            kind,
        }
    }

    /// The index, if the highlight is of the given kind
    pub fn index_if(&self, kind: HighlightKind) -> Option<usize> {
        self.index.filter(|_| self.kind == kind)
    }
}

/// The correct answer as announced by the operator
///
/// Tracked apart from [`HighlightState`] because the highlighted pick can
/// differ from the correct answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    /// Index of the correct option, once marked
    pub correct_index: Option<usize>,
}

/// Top-level screens a display can show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Show logo
    #[default]
    Logo,
    /// Question and options
    Question,
    /// Lifeline overview
    Lifeline,
    /// Prize ladder and progress
    Status,
    /// Nothing at all
    Blank,
}

/// Presentation payloads relayed verbatim to displays
///
/// Each kind keeps only its latest payload so late joiners can be brought
/// up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuxiliaryKind {
    /// Which lifelines have been used
    UpdateLifelines,
    /// Options hidden by the fifty-fifty lifeline
    #[serde(rename = "apply-5050")]
    Apply5050,
    /// The lifeline currently featured on screen
    ShowSpecificLifeline,
    /// The running question number
    UpdateQuestionNumber,
}

impl AuxiliaryKind {
    /// Whether the payload only makes sense for the current question
    pub fn is_per_question(self) -> bool {
        matches!(self, Self::Apply5050 | Self::ShowSpecificLifeline)
    }
}

/// Current screen plus relayed presentation payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenState {
    /// The screen being shown
    pub current: Screen,
    /// Latest payload of each auxiliary kind
    pub auxiliary: EnumMap<AuxiliaryKind, Option<serde_json::Value>>,
}

/// The process-wide presentation record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Installed question, absent while idle
    pub question: Option<QuestionState>,
    /// Countdown for the installed question
    pub timer: TimerState,
    /// Highlighted option
    pub highlight: HighlightState,
    /// Announced correct answer
    pub reveal: RevealState,
    /// Screen and relayed payloads
    pub screen: ScreenState,
}

impl Store {
    /// Creates an idle store from the session options
    pub fn new(options: &Options) -> Self {
        Self {
            question: None,
            timer: TimerState::new(options.initial_timer),
            highlight: HighlightState::default(),
            reveal: RevealState::default(),
            screen: ScreenState {
                current: options.initial_screen,
                auxiliary: EnumMap::default(),
            },
        }
    }

    /// Whether the answer options of the installed question are showing
    pub fn options_visible(&self) -> bool {
        self.question.as_ref().is_some_and(|q| q.options_visible)
    }

    /// Countdown length currently configured
    pub fn timer_duration(&self) -> TimerValue {
        self.timer.duration()
    }

    /// Clears question-scoped state and stops the countdown
    ///
    /// The configured countdown length survives; everything else about the
    /// previous question is discarded.
    pub fn reset_question_scope(&mut self) {
        self.timer.stop();
        self.highlight = HighlightState::default();
        self.reveal = RevealState::default();
    }
}
