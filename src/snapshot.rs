//! Late-join resynchronization
//!
//! A display that connects (or reconnects) at an arbitrary moment receives a
//! short ordered run of the same events used for live updates, computed from
//! the current [`Store`] alone. Displays apply events as a sequential
//! reducer, so the order below matters:
//!
//! 1. the question (or `clear-question` and the countdown reading when idle)
//! 2. `show-options` and a timer resync, if the options are showing
//! 3. the highlight matching the current highlight kind
//! 4. the reveal, if the correct answer differs from the highlighted pick
//! 5. the current screen, followed by the relayed presentation payloads
//! 6. the countdown lifecycle
//!
//! Applying the run to a display that is already up to date changes nothing.

use crate::{
    clock::Timestamp,
    event::{
        FreezePayload, OutgoingEvent, QuestionPayload, RevealPayload, TimerReading, TimerUpdate,
        UnfreezePayload,
    },
    state::{HighlightKind, Store},
    timer::{self, TimerState},
};

/// The `display-question` event for the installed question, if any
///
/// The countdown fields reflect the timer at `now` rather than the values at
/// install time, so timer changes made before the options are shown carry
/// over to late joiners.
pub fn question_event(store: &Store, now: Timestamp) -> Option<OutgoingEvent> {
    let question = store.question.as_ref()?;

    Some(OutgoingEvent::DisplayQuestion(QuestionPayload {
        text: question.text.clone(),
        options: question.options.clone(),
        timer: store.timer.remaining(now),
        max_timer: store.timer.max(),
        show_options: question.options_visible,
    }))
}

/// Events that bring one display's countdown in line with `timer`
///
/// Sends the reading (with cue instructions), the bare reading, and finally
/// whether the local countdown should be frozen or running. The cue offset
/// defaults to the one matching the current reading.
pub fn timer_sync(
    timer: &TimerState,
    now: Timestamp,
    trigger_audio: bool,
    audio_offset: Option<i64>,
) -> Vec<OutgoingEvent> {
    let current = timer.remaining(now);
    let max = timer.max();

    let hold = if timer.is_paused() {
        OutgoingEvent::FreezeTimer(FreezePayload {
            trigger_audio: false,
        })
    } else {
        OutgoingEvent::UnfreezeTimer(UnfreezePayload {
            trigger_audio: false,
            audio_offset: None,
        })
    };

    vec![
        OutgoingEvent::UpdateTimer(TimerUpdate {
            current,
            max,
            audio_trigger: trigger_audio,
            start_position: audio_offset.or_else(|| timer::audio_offset(current)),
        }),
        OutgoingEvent::CurrentTimer(TimerReading { current, max }),
        hold,
    ]
}

/// The bare countdown reading sent alongside `clear-question`
///
/// Timer commands are accepted while idle, so an idle display still tracks
/// the configured reading.
pub fn idle_reading(timer: &TimerState, now: Timestamp) -> OutgoingEvent {
    OutgoingEvent::CurrentTimer(TimerReading {
        current: timer.remaining(now),
        max: timer.max(),
    })
}

/// Builds the ordered event run that reproduces `store` on a fresh display
pub fn build(store: &Store, now: Timestamp) -> Vec<OutgoingEvent> {
    let mut events = Vec::new();

    match question_event(store, now) {
        Some(question) => events.push(question),
        None => {
            events.push(OutgoingEvent::ClearQuestion);
            events.push(idle_reading(&store.timer, now));
        }
    }

    if store.options_visible() {
        events.push(OutgoingEvent::ShowOptions);
        events.extend(timer_sync(&store.timer, now, false, None));
    }

    if let Some(index) = store.highlight.index {
        match store.highlight.kind {
            HighlightKind::Selected => events.push(OutgoingEvent::HighlightAnswer(index)),
            HighlightKind::Correct => events.push(OutgoingEvent::MarkCorrect(index)),
            HighlightKind::Wrong => events.push(OutgoingEvent::MarkWrong(index)),
            HighlightKind::None => {}
        }

        if let Some(correct_index) = store.reveal.correct_index.filter(|c| *c != index) {
            events.push(OutgoingEvent::ShowCorrectAnswer(RevealPayload {
                selected_index: index,
                correct_index,
            }));
        }
    }

    events.push(OutgoingEvent::ChangeScreen(store.screen.current));
    events.extend(
        store
            .screen
            .auxiliary
            .iter()
            .filter_map(|(kind, payload)| {
                payload
                    .as_ref()
                    .map(|payload| OutgoingEvent::auxiliary(kind, payload.clone()))
            }),
    );

    events.push(OutgoingEvent::timer_state(store.timer.status()));

    events
}
