//! Command validation and state transitions
//!
//! [`CommandProcessor`] is the only writer of the [`Store`]. Each command is
//! checked against the current state; if every guard passes the transition
//! is applied in full and the resulting events are returned, otherwise the
//! command is dropped without touching anything.
//!
//! Per question the presentation moves through
//! `Idle -> Set -> OptionsShown -> AnswerSelected -> Revealed`. A
//! `question-update` re-enters `Set` from any state and `remove-question`
//! returns to `Idle`.

use garde::Validate;
use thiserror::Error;
use tracing::debug;

use crate::{
    clock::Timestamp,
    command::{IncomingCommand, QuestionUpdate},
    config::Options,
    constants::question::OPTION_COUNT,
    event::{FreezePayload, OutgoingEvent, RevealPayload, UnfreezePayload, audio},
    snapshot,
    state::{
        AuxiliaryKind, HighlightKind, HighlightState, QuestionState, RevealState, Screen, Store,
    },
    timer::{self, TimerStatus},
};

/// Why a command was dropped
#[derive(Error, Debug)]
pub enum Rejection {
    /// The command needs an installed question
    #[error("no question is installed")]
    NoQuestion,
    /// The option index is not one of the four options
    #[error("option index {0} is out of range")]
    IndexOutOfRange(usize),
    /// A correct answer has already been announced
    #[error("the correct answer was already revealed")]
    AlreadyRevealed,
    /// The question payload failed validation
    #[error("invalid question: {0}")]
    InvalidQuestion(#[from] garde::Report),
    /// The question did not carry exactly four options
    #[error("expected four options, got {0}")]
    OptionCount(usize),
    /// The countdown was not in a state that allows the transition
    #[error(transparent)]
    Timer(#[from] timer::Error),
}

/// Events produced by one accepted command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Events for every connected observer, in order
    pub broadcast: Vec<OutgoingEvent>,
    /// Events for the sender only, in order
    pub reply: Vec<OutgoingEvent>,
}

impl Dispatch {
    fn broadcast(broadcast: Vec<OutgoingEvent>) -> Self {
        Self {
            broadcast,
            reply: Vec::new(),
        }
    }

    fn reply(reply: Vec<OutgoingEvent>) -> Self {
        Self {
            broadcast: Vec::new(),
            reply,
        }
    }

    /// Whether nothing is to be sent
    pub fn is_empty(&self) -> bool {
        self.broadcast.is_empty() && self.reply.is_empty()
    }
}

/// Owner and sole writer of the presentation state
#[derive(Debug, Clone, Default)]
pub struct CommandProcessor {
    store: Store,
}

fn check_index(index: usize) -> Result<usize, Rejection> {
    if index < OPTION_COUNT {
        Ok(index)
    } else {
        Err(Rejection::IndexOutOfRange(index))
    }
}

impl CommandProcessor {
    /// Creates a processor over an idle store
    pub fn new(options: &Options) -> Self {
        Self {
            store: Store::new(options),
        }
    }

    /// Read-only view of the state
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Applies a command, dropping it silently if it is not allowed
    ///
    /// Rejections are logged and result in an empty [`Dispatch`].
    pub fn process(&mut self, command: IncomingCommand, now: Timestamp) -> Dispatch {
        let name = command.name();
        match self.try_process(command, now) {
            Ok(dispatch) => {
                debug!(
                    command = name,
                    broadcast = dispatch.broadcast.len(),
                    reply = dispatch.reply.len(),
                    "command applied"
                );
                dispatch
            }
            Err(rejection) => {
                debug!(command = name, reason = %rejection, "command rejected");
                Dispatch::default()
            }
        }
    }

    /// Applies a command, reporting why it was refused
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] for the first guard that fails. The state is
    /// left untouched in that case.
    pub fn try_process(
        &mut self,
        command: IncomingCommand,
        now: Timestamp,
    ) -> Result<Dispatch, Rejection> {
        match command {
            IncomingCommand::QuestionUpdate(question) => self.question_update(question, now),
            IncomingCommand::ShowOptions => self.show_options(now),
            IncomingCommand::PickAnswer(index) => self.pick_answer(index, now),
            IncomingCommand::MarkCorrect(index) => self.mark_correct(index),
            IncomingCommand::MarkWrong(index) => self.mark_wrong(index),
            IncomingCommand::ResetTimer => self.reset_timer(now),
            IncomingCommand::ChangeTimer(value) => self.change_timer(value, now),
            IncomingCommand::PauseTimer => self.pause_timer(true, now),
            IncomingCommand::FreezeTimer => self.pause_timer(false, now),
            IncomingCommand::ContinueTimer => self.continue_timer(now),
            IncomingCommand::RemoveQuestion => Ok(self.remove_question(now)),
            IncomingCommand::PlayAudio(key) => {
                Ok(Dispatch::broadcast(vec![OutgoingEvent::TriggerAudio(key)]))
            }
            IncomingCommand::SetScreen(screen) => Ok(self.set_screen(screen)),
            IncomingCommand::GetTimer => {
                let mut reply = snapshot::timer_sync(&self.store.timer, now, false, None);
                reply.push(OutgoingEvent::timer_state(self.store.timer.status()));
                Ok(Dispatch::reply(reply))
            }
            IncomingCommand::UpdateLifelines(payload) => {
                Ok(self.relay(AuxiliaryKind::UpdateLifelines, payload))
            }
            IncomingCommand::Apply5050(payload) => Ok(self.relay(AuxiliaryKind::Apply5050, payload)),
            IncomingCommand::ShowSpecificLifeline(payload) => {
                Ok(self.relay(AuxiliaryKind::ShowSpecificLifeline, payload))
            }
            IncomingCommand::UpdateQuestionNumber(payload) => {
                Ok(self.relay(AuxiliaryKind::UpdateQuestionNumber, payload))
            }
        }
    }

    fn require_question(&self) -> Result<(), Rejection> {
        if self.store.question.is_some() {
            Ok(())
        } else {
            Err(Rejection::NoQuestion)
        }
    }

    fn question_update(
        &mut self,
        question: QuestionUpdate,
        now: Timestamp,
    ) -> Result<Dispatch, Rejection> {
        question.validate()?;

        let QuestionUpdate { text, options } = question;
        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|options: Vec<String>| Rejection::OptionCount(options.len()))?;

        self.store.reset_question_scope();
        self.store.question = Some(QuestionState {
            text,
            options,
            options_visible: false,
        });

        let mut events = Vec::with_capacity(3);
        events.extend(snapshot::question_event(&self.store, now));
        events.push(OutgoingEvent::ResetHighlights);
        events.push(OutgoingEvent::timer_state(TimerStatus::Stopped));

        Ok(Dispatch::broadcast(events))
    }

    fn show_options(&mut self, now: Timestamp) -> Result<Dispatch, Rejection> {
        let Some(question) = self.store.question.as_mut() else {
            return Err(Rejection::NoQuestion);
        };

        self.store.timer.start(now)?;
        question.options_visible = true;

        let offset = timer::audio_offset(self.store.timer.duration());

        let mut events = vec![OutgoingEvent::ShowOptions];
        events.extend(snapshot::timer_sync(&self.store.timer, now, true, offset));
        events.push(OutgoingEvent::timer_state(TimerStatus::Running));

        Ok(Dispatch::broadcast(events))
    }

    fn pick_answer(&mut self, index: usize, now: Timestamp) -> Result<Dispatch, Rejection> {
        self.require_question()?;
        let index = check_index(index)?;

        self.store.highlight = HighlightState::new(index, HighlightKind::Selected);
        self.store.reveal = RevealState::default();

        let mut events = vec![
            OutgoingEvent::ResetHighlights,
            OutgoingEvent::HighlightAnswer(index),
            OutgoingEvent::audio(audio::LOCK),
        ];

        // A pick while the countdown is stopped or paused leaves it alone.
        if self.store.timer.pause(now).is_ok() {
            events.extend(self.paused_events(false, now));
        }

        Ok(Dispatch::broadcast(events))
    }

    fn mark_correct(&mut self, index: usize) -> Result<Dispatch, Rejection> {
        self.require_question()?;
        let index = check_index(index)?;

        self.store.reveal.correct_index = Some(index);

        let events = match self.store.highlight.index_if(HighlightKind::Selected) {
            Some(selected) if selected != index => vec![
                OutgoingEvent::ResetHighlights,
                OutgoingEvent::ShowCorrectAnswer(RevealPayload {
                    selected_index: selected,
                    correct_index: index,
                }),
                OutgoingEvent::audio(audio::WRONG),
            ],
            _ => {
                self.store.highlight = HighlightState::new(index, HighlightKind::Correct);
                vec![
                    OutgoingEvent::ResetHighlights,
                    OutgoingEvent::MarkCorrect(index),
                    OutgoingEvent::audio(audio::CORRECT),
                ]
            }
        };

        Ok(Dispatch::broadcast(events))
    }

    fn mark_wrong(&mut self, index: usize) -> Result<Dispatch, Rejection> {
        self.require_question()?;
        let index = check_index(index)?;

        if self.store.reveal.correct_index.is_some() {
            return Err(Rejection::AlreadyRevealed);
        }

        self.store.highlight = HighlightState::new(index, HighlightKind::Wrong);

        Ok(Dispatch::broadcast(vec![
            OutgoingEvent::ResetHighlights,
            OutgoingEvent::MarkWrong(index),
            OutgoingEvent::audio(audio::WRONG),
        ]))
    }

    fn reset_timer(&mut self, now: Timestamp) -> Result<Dispatch, Rejection> {
        self.store.timer.rewind()?;

        Ok(Dispatch::broadcast(snapshot::timer_sync(
            &self.store.timer,
            now,
            false,
            None,
        )))
    }

    fn change_timer(
        &mut self,
        value: timer::TimerValue,
        now: Timestamp,
    ) -> Result<Dispatch, Rejection> {
        self.store.timer.set_duration(value)?;

        let mut events = snapshot::timer_sync(&self.store.timer, now, false, None);
        events.push(OutgoingEvent::timer_state(self.store.timer.status()));

        Ok(Dispatch::broadcast(events))
    }

    fn pause_timer(&mut self, trigger_audio: bool, now: Timestamp) -> Result<Dispatch, Rejection> {
        self.store.timer.pause(now)?;

        Ok(Dispatch::broadcast(self.paused_events(trigger_audio, now)))
    }

    fn paused_events(&self, trigger_audio: bool, now: Timestamp) -> Vec<OutgoingEvent> {
        let mut events = vec![
            OutgoingEvent::FreezeTimer(FreezePayload { trigger_audio }),
            OutgoingEvent::timer_state(TimerStatus::Paused),
        ];
        events.extend(snapshot::timer_sync(&self.store.timer, now, false, None));
        events
    }

    fn continue_timer(&mut self, now: Timestamp) -> Result<Dispatch, Rejection> {
        self.store.timer.resume(now)?;

        let offset = timer::audio_offset(self.store.timer.remaining(now));

        let mut events = vec![OutgoingEvent::UnfreezeTimer(UnfreezePayload {
            trigger_audio: true,
            audio_offset: offset,
        })];
        events.extend(snapshot::timer_sync(&self.store.timer, now, true, offset));
        events.push(OutgoingEvent::timer_state(TimerStatus::Running));

        Ok(Dispatch::broadcast(events))
    }

    fn remove_question(&mut self, now: Timestamp) -> Dispatch {
        self.store.question = None;
        self.store.reset_question_scope();
        for (kind, payload) in &mut self.store.screen.auxiliary {
            if kind.is_per_question() {
                *payload = None;
            }
        }

        Dispatch::broadcast(vec![
            OutgoingEvent::ClearQuestion,
            OutgoingEvent::ResetHighlights,
            snapshot::idle_reading(&self.store.timer, now),
            OutgoingEvent::timer_state(TimerStatus::Stopped),
        ])
    }

    fn set_screen(&mut self, screen: Screen) -> Dispatch {
        // The featured lifeline belongs to the screen it was shown on.
        if self.store.screen.current != screen {
            self.store.screen.auxiliary[AuxiliaryKind::ShowSpecificLifeline] = None;
        }
        self.store.screen.current = screen;

        Dispatch::broadcast(vec![OutgoingEvent::ChangeScreen(screen)])
    }

    fn relay(&mut self, kind: AuxiliaryKind, payload: serde_json::Value) -> Dispatch {
        self.store.screen.auxiliary[kind] = Some(payload.clone());

        Dispatch::broadcast(vec![OutgoingEvent::auxiliary(kind, payload)])
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{
        event::{TimerReading, TimerUpdate},
        state::Screen,
        timer::TimerValue,
    };

    fn at(secs: u64) -> Timestamp {
        Timestamp::from_millis(secs * 1000)
    }

    fn question(text: &str) -> IncomingCommand {
        IncomingCommand::QuestionUpdate(QuestionUpdate {
            text: text.to_owned(),
            options: ["A", "B", "C", "D"].map(str::to_owned).to_vec(),
        })
    }

    fn processor_with_question() -> CommandProcessor {
        let mut processor = CommandProcessor::default();
        assert!(!processor.process(question("Q1"), at(0)).is_empty());
        processor
    }

    fn running_processor() -> CommandProcessor {
        let mut processor = processor_with_question();
        assert!(
            !processor
                .process(IncomingCommand::ShowOptions, at(0))
                .is_empty()
        );
        processor
    }

    #[test]
    fn test_question_update_installs_question() {
        let mut processor = CommandProcessor::default();
        let dispatch = processor.process(question("Q1"), at(0));

        let stored = processor.store().question.as_ref().unwrap();
        assert_eq!(stored.text, "Q1");
        assert_eq!(stored.options, ["A", "B", "C", "D"].map(str::to_owned));
        assert!(!stored.options_visible);

        assert_eq!(dispatch.broadcast.len(), 3);
        assert!(matches!(
            &dispatch.broadcast[0],
            OutgoingEvent::DisplayQuestion(payload)
                if payload.text == "Q1"
                    && payload.timer == TimerValue::Finite(30)
                    && payload.max_timer == TimerValue::Finite(30)
                    && !payload.show_options
        ));
        assert_eq!(dispatch.broadcast[1], OutgoingEvent::ResetHighlights);
        assert_eq!(
            dispatch.broadcast[2],
            OutgoingEvent::timer_state(TimerStatus::Stopped)
        );
        assert!(dispatch.reply.is_empty());
    }

    #[test]
    fn test_invalid_question_is_dropped() {
        let mut processor = processor_with_question();
        let before = processor.store().clone();

        let blank = IncomingCommand::QuestionUpdate(QuestionUpdate {
            text: "  ".to_owned(),
            options: ["A", "B", "C", "D"].map(str::to_owned).to_vec(),
        });
        assert!(processor.process(blank, at(1)).is_empty());

        let short = IncomingCommand::QuestionUpdate(QuestionUpdate {
            text: "Q2".to_owned(),
            options: vec!["A".to_owned(), "B".to_owned()],
        });
        assert!(matches!(
            processor.try_process(short, at(1)),
            Err(Rejection::InvalidQuestion(_))
        ));

        assert_eq!(processor.store(), &before);
    }

    #[test]
    fn test_question_update_discards_previous_question() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::PickAnswer(1), at(3));
        processor.process(IncomingCommand::MarkCorrect(2), at(4));

        processor.process(question("Q2"), at(5));

        let store = processor.store();
        assert_eq!(store.question.as_ref().unwrap().text, "Q2");
        assert_eq!(store.highlight, HighlightState::default());
        assert_eq!(store.reveal, RevealState::default());
        assert_eq!(store.timer.status(), TimerStatus::Stopped);
        assert!(store.timer.started_at().is_none());
    }

    #[test]
    fn test_show_options_starts_timer() {
        let mut processor = processor_with_question();
        let dispatch = processor.process(IncomingCommand::ShowOptions, at(2));

        assert!(processor.store().options_visible());
        assert_eq!(processor.store().timer.started_at(), Some(at(2)));
        assert_eq!(processor.store().timer.status(), TimerStatus::Running);

        assert_eq!(
            dispatch.broadcast,
            vec![
                OutgoingEvent::ShowOptions,
                OutgoingEvent::UpdateTimer(TimerUpdate {
                    current: TimerValue::Finite(30),
                    max: TimerValue::Finite(30),
                    audio_trigger: true,
                    start_position: Some(29),
                }),
                OutgoingEvent::CurrentTimer(TimerReading {
                    current: TimerValue::Finite(30),
                    max: TimerValue::Finite(30),
                }),
                OutgoingEvent::UnfreezeTimer(UnfreezePayload {
                    trigger_audio: false,
                    audio_offset: None,
                }),
                OutgoingEvent::timer_state(TimerStatus::Running),
            ]
        );
    }

    #[test]
    fn test_show_options_twice_does_not_restart() {
        let mut processor = running_processor();
        let second = processor.process(IncomingCommand::ShowOptions, at(7));

        assert!(second.is_empty());
        assert_eq!(processor.store().timer.started_at(), Some(at(0)));
    }

    #[test]
    fn test_show_options_without_question() {
        let mut processor = CommandProcessor::default();

        assert!(matches!(
            processor.try_process(IncomingCommand::ShowOptions, at(0)),
            Err(Rejection::NoQuestion)
        ));
        assert_eq!(processor.store().timer.status(), TimerStatus::Stopped);
    }

    #[test]
    fn test_pick_then_mark_same_answer() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::PickAnswer(2), at(5));
        let dispatch = processor.process(IncomingCommand::MarkCorrect(2), at(6));

        assert_eq!(
            processor.store().highlight,
            HighlightState::new(2, HighlightKind::Correct)
        );
        assert_eq!(
            dispatch.broadcast,
            vec![
                OutgoingEvent::ResetHighlights,
                OutgoingEvent::MarkCorrect(2),
                OutgoingEvent::audio(audio::CORRECT),
            ]
        );
        assert!(
            !dispatch
                .broadcast
                .iter()
                .any(|e| matches!(e, OutgoingEvent::ShowCorrectAnswer(_)))
        );
    }

    #[test]
    fn test_pick_then_mark_other_answer_reveals() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::PickAnswer(1), at(5));
        let dispatch = processor.process(IncomingCommand::MarkCorrect(2), at(6));

        assert_eq!(
            processor.store().highlight,
            HighlightState::new(1, HighlightKind::Selected)
        );
        assert_eq!(processor.store().reveal.correct_index, Some(2));
        assert_eq!(
            dispatch.broadcast,
            vec![
                OutgoingEvent::ResetHighlights,
                OutgoingEvent::ShowCorrectAnswer(RevealPayload {
                    selected_index: 1,
                    correct_index: 2,
                }),
                OutgoingEvent::audio(audio::WRONG),
            ]
        );
    }

    #[test]
    fn test_pick_answer_pauses_running_timer() {
        let mut processor = running_processor();
        let dispatch = processor.process(IncomingCommand::PickAnswer(3), at(5));

        assert_eq!(processor.store().timer.status(), TimerStatus::Paused);
        assert_eq!(processor.store().timer.paused_at(), Some(at(5)));
        assert_eq!(
            &dispatch.broadcast[..4],
            &[
                OutgoingEvent::ResetHighlights,
                OutgoingEvent::HighlightAnswer(3),
                OutgoingEvent::audio(audio::LOCK),
                OutgoingEvent::FreezeTimer(FreezePayload {
                    trigger_audio: false
                }),
            ]
        );
        assert!(dispatch.broadcast.contains(&OutgoingEvent::CurrentTimer(TimerReading {
            current: TimerValue::Finite(25),
            max: TimerValue::Finite(30),
        })));
    }

    #[test]
    fn test_pick_answer_while_paused_keeps_pause() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::PauseTimer, at(4));
        let dispatch = processor.process(IncomingCommand::PickAnswer(0), at(9));

        assert_eq!(processor.store().timer.paused_at(), Some(at(4)));
        assert_eq!(dispatch.broadcast.len(), 3);
    }

    #[test]
    fn test_pick_answer_clears_reveal() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::MarkCorrect(1), at(2));
        processor.process(IncomingCommand::PickAnswer(0), at(3));

        assert_eq!(processor.store().reveal, RevealState::default());
    }

    #[test]
    fn test_index_out_of_range() {
        let mut processor = running_processor();
        let before = processor.store().clone();

        for command in [
            IncomingCommand::PickAnswer(4),
            IncomingCommand::MarkCorrect(7),
            IncomingCommand::MarkWrong(OPTION_COUNT),
        ] {
            assert!(matches!(
                processor.try_process(command, at(1)),
                Err(Rejection::IndexOutOfRange(_))
            ));
        }
        assert_eq!(processor.store(), &before);
    }

    #[test]
    fn test_answers_need_question() {
        let mut processor = CommandProcessor::default();

        assert!(
            processor
                .process(IncomingCommand::PickAnswer(0), at(0))
                .is_empty()
        );
        assert!(
            processor
                .process(IncomingCommand::MarkCorrect(0), at(0))
                .is_empty()
        );
        assert!(matches!(
            processor.try_process(IncomingCommand::MarkWrong(0), at(0)),
            Err(Rejection::NoQuestion)
        ));
        assert_eq!(processor.store().highlight, HighlightState::default());
        assert_eq!(processor.store().reveal, RevealState::default());
    }

    #[test]
    fn test_mark_correct_without_selection() {
        let mut processor = running_processor();
        let dispatch = processor.process(IncomingCommand::MarkCorrect(0), at(1));

        assert_eq!(
            processor.store().highlight,
            HighlightState::new(0, HighlightKind::Correct)
        );
        assert_eq!(dispatch.broadcast[1], OutgoingEvent::MarkCorrect(0));
    }

    #[test]
    fn test_mark_wrong() {
        let mut processor = running_processor();
        let dispatch = processor.process(IncomingCommand::MarkWrong(3), at(1));

        assert_eq!(
            processor.store().highlight,
            HighlightState::new(3, HighlightKind::Wrong)
        );
        assert_eq!(
            dispatch.broadcast,
            vec![
                OutgoingEvent::ResetHighlights,
                OutgoingEvent::MarkWrong(3),
                OutgoingEvent::audio(audio::WRONG),
            ]
        );
    }

    #[test]
    fn test_mark_wrong_after_reveal_is_dropped() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::MarkCorrect(2), at(1));

        assert!(matches!(
            processor.try_process(IncomingCommand::MarkWrong(1), at(2)),
            Err(Rejection::AlreadyRevealed)
        ));
        assert_eq!(
            processor.store().highlight,
            HighlightState::new(2, HighlightKind::Correct)
        );
    }

    #[test]
    fn test_mark_correct_after_mark_wrong_overrides() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::MarkWrong(1), at(1));
        processor.process(IncomingCommand::MarkCorrect(1), at(2));

        assert_eq!(
            processor.store().highlight,
            HighlightState::new(1, HighlightKind::Correct)
        );
    }

    #[test]
    fn test_change_timer_only_before_start() {
        let mut processor = processor_with_question();
        let dispatch = processor.process(IncomingCommand::ChangeTimer(45.into()), at(0));

        assert_eq!(processor.store().timer.duration(), TimerValue::Finite(45));
        assert_eq!(processor.store().timer.max(), TimerValue::Finite(45));
        assert_eq!(
            dispatch.broadcast.last(),
            Some(&OutgoingEvent::timer_state(TimerStatus::Stopped))
        );

        processor.process(IncomingCommand::ShowOptions, at(1));
        let before = processor.store().clone();
        assert!(matches!(
            processor.try_process(IncomingCommand::ChangeTimer(45.into()), at(2)),
            Err(Rejection::Timer(timer::Error::AlreadyStarted))
        ));
        assert_eq!(processor.store(), &before);
    }

    #[test]
    fn test_change_timer_persists_across_questions() {
        let mut processor = CommandProcessor::default();
        processor.process(IncomingCommand::ChangeTimer(TimerValue::Unlimited), at(0));
        let dispatch = processor.process(question("Q1"), at(1));

        assert!(matches!(
            &dispatch.broadcast[0],
            OutgoingEvent::DisplayQuestion(payload)
                if payload.timer == TimerValue::Unlimited
        ));
    }

    #[test]
    fn test_reset_timer() {
        let mut processor = processor_with_question();
        let dispatch = processor.process(IncomingCommand::ResetTimer, at(0));
        assert_eq!(
            dispatch.broadcast[0],
            OutgoingEvent::UpdateTimer(TimerUpdate {
                current: TimerValue::Finite(30),
                max: TimerValue::Finite(30),
                audio_trigger: false,
                start_position: Some(29),
            })
        );

        processor.process(IncomingCommand::ShowOptions, at(0));
        assert!(
            processor
                .process(IncomingCommand::ResetTimer, at(3))
                .is_empty()
        );
    }

    #[test]
    fn test_pause_and_continue() {
        let mut processor = running_processor();

        let paused = processor.process(IncomingCommand::PauseTimer, at(10));
        assert_eq!(
            &paused.broadcast[..2],
            &[
                OutgoingEvent::FreezeTimer(FreezePayload {
                    trigger_audio: true
                }),
                OutgoingEvent::timer_state(TimerStatus::Paused),
            ]
        );
        assert!(
            processor
                .process(IncomingCommand::PauseTimer, at(11))
                .is_empty()
        );

        let resumed = processor.process(IncomingCommand::ContinueTimer, at(40));
        assert_eq!(
            resumed.broadcast[0],
            OutgoingEvent::UnfreezeTimer(UnfreezePayload {
                trigger_audio: true,
                audio_offset: Some(39),
            })
        );
        assert_eq!(
            resumed.broadcast.last(),
            Some(&OutgoingEvent::timer_state(TimerStatus::Running))
        );
        assert_eq!(
            processor.store().timer.remaining(at(40)),
            TimerValue::Finite(20)
        );
        assert!(
            processor
                .process(IncomingCommand::ContinueTimer, at(41))
                .is_empty()
        );
    }

    #[test]
    fn test_freeze_timer_is_silent_pause() {
        let mut processor = running_processor();
        let dispatch = processor.process(IncomingCommand::FreezeTimer, at(3));

        assert_eq!(
            dispatch.broadcast[0],
            OutgoingEvent::FreezeTimer(FreezePayload {
                trigger_audio: false
            })
        );
        assert_eq!(processor.store().timer.status(), TimerStatus::Paused);
    }

    #[test]
    fn test_timer_commands_before_start_are_dropped() {
        let mut processor = processor_with_question();

        assert!(
            processor
                .process(IncomingCommand::PauseTimer, at(1))
                .is_empty()
        );
        assert!(
            processor
                .process(IncomingCommand::ContinueTimer, at(1))
                .is_empty()
        );
        assert!(
            processor
                .process(IncomingCommand::FreezeTimer, at(1))
                .is_empty()
        );
    }

    #[test]
    fn test_remove_question() {
        let mut processor = running_processor();
        processor.process(IncomingCommand::PickAnswer(1), at(2));
        processor.process(IncomingCommand::Apply5050(serde_json::json!([0, 2])), at(2));
        processor.process(
            IncomingCommand::UpdateLifelines(serde_json::json!({ "50-50": true })),
            at(2),
        );

        let dispatch = processor.process(IncomingCommand::RemoveQuestion, at(3));

        let store = processor.store();
        assert!(store.question.is_none());
        assert_eq!(store.highlight, HighlightState::default());
        assert_eq!(store.timer.status(), TimerStatus::Stopped);
        assert_eq!(store.timer.remaining(at(3)), TimerValue::Finite(30));
        assert!(store.screen.auxiliary[AuxiliaryKind::Apply5050].is_none());
        assert!(store.screen.auxiliary[AuxiliaryKind::UpdateLifelines].is_some());
        assert_eq!(
            dispatch.broadcast,
            vec![
                OutgoingEvent::ClearQuestion,
                OutgoingEvent::ResetHighlights,
                OutgoingEvent::CurrentTimer(TimerReading {
                    current: TimerValue::Finite(30),
                    max: TimerValue::Finite(30),
                }),
                OutgoingEvent::timer_state(TimerStatus::Stopped),
            ]
        );
    }

    #[test]
    fn test_set_screen_and_play_audio() {
        let mut processor = CommandProcessor::default();

        let screen = processor.process(IncomingCommand::SetScreen(Screen::Status), at(0));
        assert_eq!(processor.store().screen.current, Screen::Status);
        assert_eq!(
            screen.broadcast,
            vec![OutgoingEvent::ChangeScreen(Screen::Status)]
        );

        let before = processor.store().clone();
        let audio = processor.process(IncomingCommand::PlayAudio("intro".to_owned()), at(0));
        assert_eq!(
            audio.broadcast,
            vec![OutgoingEvent::TriggerAudio("intro".to_owned())]
        );
        assert_eq!(processor.store(), &before);
    }

    #[test]
    fn test_screen_change_drops_featured_lifeline() {
        let mut processor = CommandProcessor::default();
        let featured = serde_json::json!("Phone a friend");
        processor.process(IncomingCommand::SetScreen(Screen::Lifeline), at(0));
        processor.process(IncomingCommand::ShowSpecificLifeline(featured.clone()), at(0));
        processor.process(IncomingCommand::UpdateLifelines(serde_json::json!([1])), at(0));

        processor.process(IncomingCommand::SetScreen(Screen::Lifeline), at(1));
        assert_eq!(
            processor.store().screen.auxiliary[AuxiliaryKind::ShowSpecificLifeline],
            Some(featured)
        );

        let dispatch = processor.process(IncomingCommand::SetScreen(Screen::Status), at(2));
        assert_eq!(
            dispatch.broadcast,
            vec![OutgoingEvent::ChangeScreen(Screen::Status)]
        );
        assert!(processor.store().screen.auxiliary[AuxiliaryKind::ShowSpecificLifeline].is_none());
        assert!(processor.store().screen.auxiliary[AuxiliaryKind::UpdateLifelines].is_some());
    }

    #[test]
    fn test_get_timer_replies_to_sender_only() {
        let mut processor = running_processor();
        let dispatch = processor.process(IncomingCommand::GetTimer, at(12));

        assert!(dispatch.broadcast.is_empty());
        assert_eq!(
            dispatch.reply[1],
            OutgoingEvent::CurrentTimer(TimerReading {
                current: TimerValue::Finite(18),
                max: TimerValue::Finite(30),
            })
        );
        assert_eq!(
            dispatch.reply.last(),
            Some(&OutgoingEvent::timer_state(TimerStatus::Running))
        );
    }

    #[test]
    fn test_relay_keeps_latest_payload() {
        let mut processor = CommandProcessor::default();
        processor.process(
            IncomingCommand::UpdateQuestionNumber(serde_json::json!({ "questionNumber": 1 })),
            at(0),
        );
        let dispatch = processor.process(
            IncomingCommand::UpdateQuestionNumber(serde_json::json!({ "questionNumber": 2 })),
            at(0),
        );

        assert_eq!(
            processor.store().screen.auxiliary[AuxiliaryKind::UpdateQuestionNumber],
            Some(serde_json::json!({ "questionNumber": 2 }))
        );
        assert_eq!(
            dispatch.broadcast,
            vec![OutgoingEvent::UpdateQuestionNumber(
                serde_json::json!({ "questionNumber": 2 })
            )]
        );
    }
}
