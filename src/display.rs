//! Display-side view model
//!
//! A display keeps no state of its own beyond what the event stream tells
//! it. [`DisplayView`] is that state: it applies outbound events one at a
//! time, in order, exactly as a display does. Audio cues are side effects
//! and leave the view untouched.

use enum_map::EnumMap;
use serde::Serialize;

use crate::{
    constants::question::OPTION_COUNT,
    event::OutgoingEvent,
    state::{AuxiliaryKind, HighlightKind, HighlightState, Screen},
    timer::{TimerStatus, TimerValue},
};

/// What one display is currently rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayView {
    /// Question text, empty when idle
    pub text: String,
    /// Answer options, empty when idle
    pub options: [String; OPTION_COUNT],
    /// Whether the options are revealed
    pub show_options: bool,
    /// Countdown reading as last received
    pub timer: TimerValue,
    /// Countdown upper bound as last received
    pub max_timer: TimerValue,
    /// Whether the local countdown is stopped
    pub timer_frozen: bool,
    /// Countdown lifecycle as last announced
    pub timer_state: TimerStatus,
    /// Highlighted option and its styling
    pub highlight: HighlightState,
    /// Correct answer shown next to a wrong pick
    pub correct_answer: Option<usize>,
    /// Screen being shown
    pub screen: Screen,
    /// Relayed presentation payloads
    pub auxiliary: EnumMap<AuxiliaryKind, Option<serde_json::Value>>,
}

impl Default for DisplayView {
    fn default() -> Self {
        Self {
            text: String::new(),
            options: Default::default(),
            show_options: false,
            timer: TimerValue::Finite(0),
            max_timer: TimerValue::Finite(0),
            timer_frozen: true,
            timer_state: TimerStatus::Stopped,
            highlight: HighlightState::default(),
            correct_answer: None,
            screen: Screen::default(),
            auxiliary: EnumMap::default(),
        }
    }
}

impl DisplayView {
    /// Applies one event
    pub fn apply(&mut self, event: &OutgoingEvent) {
        match event {
            OutgoingEvent::DisplayQuestion(question) => {
                self.text.clone_from(&question.text);
                self.options.clone_from(&question.options);
                self.show_options = question.show_options;
                self.timer = question.timer;
                self.max_timer = question.max_timer;
                self.timer_frozen = true;
                self.clear_highlight();
            }
            OutgoingEvent::ShowOptions => {
                self.show_options = true;
                self.timer_frozen = false;
            }
            OutgoingEvent::HighlightAnswer(index) => {
                self.set_highlight(*index, HighlightKind::Selected);
            }
            OutgoingEvent::MarkCorrect(index) => {
                self.set_highlight(*index, HighlightKind::Correct);
            }
            OutgoingEvent::MarkWrong(index) => {
                self.set_highlight(*index, HighlightKind::Wrong);
            }
            OutgoingEvent::ShowCorrectAnswer(reveal) => {
                self.highlight = HighlightState::new(reveal.selected_index, HighlightKind::Selected);
                self.correct_answer = Some(reveal.correct_index);
            }
            OutgoingEvent::ResetHighlights => self.clear_highlight(),
            OutgoingEvent::UpdateTimer(update) => {
                self.timer = update.current;
                self.max_timer = update.max;
            }
            OutgoingEvent::CurrentTimer(reading) => {
                self.timer = reading.current;
                self.max_timer = reading.max;
            }
            OutgoingEvent::TimerState(payload) => self.timer_state = payload.state,
            OutgoingEvent::FreezeTimer(_) => self.timer_frozen = true,
            OutgoingEvent::UnfreezeTimer(_) => self.timer_frozen = false,
            OutgoingEvent::ClearQuestion => {
                let fresh = Self::default();
                self.text = fresh.text;
                self.options = fresh.options;
                self.show_options = false;
                self.timer = fresh.timer;
                self.max_timer = fresh.max_timer;
                self.timer_frozen = true;
                self.clear_highlight();
                for (kind, payload) in &mut self.auxiliary {
                    if kind.is_per_question() {
                        *payload = None;
                    }
                }
            }
            OutgoingEvent::TriggerAudio(_) => {}
            OutgoingEvent::ChangeScreen(screen) => {
                if self.screen != *screen {
                    self.auxiliary[AuxiliaryKind::ShowSpecificLifeline] = None;
                }
                self.screen = *screen;
            }
            OutgoingEvent::UpdateLifelines(payload) => {
                self.auxiliary[AuxiliaryKind::UpdateLifelines] = Some(payload.clone());
            }
            OutgoingEvent::Apply5050(payload) => {
                self.auxiliary[AuxiliaryKind::Apply5050] = Some(payload.clone());
            }
            OutgoingEvent::ShowSpecificLifeline(payload) => {
                self.auxiliary[AuxiliaryKind::ShowSpecificLifeline] = Some(payload.clone());
            }
            OutgoingEvent::UpdateQuestionNumber(payload) => {
                self.auxiliary[AuxiliaryKind::UpdateQuestionNumber] = Some(payload.clone());
            }
        }
    }

    /// Applies a run of events in order
    pub fn apply_all<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a OutgoingEvent>,
    {
        for event in events {
            self.apply(event);
        }
    }

    fn set_highlight(&mut self, index: usize, kind: HighlightKind) {
        self.highlight = HighlightState::new(index, kind);
        self.correct_answer = None;
    }

    fn clear_highlight(&mut self) {
        self.highlight = HighlightState::default();
        self.correct_answer = None;
    }
}
