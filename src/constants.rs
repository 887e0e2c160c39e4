//! Configuration constants for the quiz display core
//!
//! This module contains the fixed limits and presentation values shared
//! by the command processor, the timer engine and the observer registry.

/// Question limits
pub mod question {
    /// Number of answer options every question carries
    pub const OPTION_COUNT: usize = 4;
    /// Maximum length of the question text in bytes
    pub const MAX_TEXT_LENGTH: usize = 1000;
    /// Maximum length of a single answer option in bytes
    pub const MAX_OPTION_LENGTH: usize = 300;
}

/// Countdown timer values
pub mod timer {
    /// Duration in seconds a fresh session starts with
    pub const DEFAULT_SECONDS: u32 = 30;
    /// Largest finite duration accepted in [`crate::config::Options`]
    pub const MAX_SECONDS: u32 = 3600;
    /// Base for the countdown audio cue offset
    ///
    /// The cue is a fixed-length track whose final second lines up with
    /// a remaining time of zero.
    pub const AUDIO_CUE_SECONDS: i64 = 59;
}

/// Observer limits
pub mod observers {
    /// Maximum number of simultaneously connected observers
    pub const MAX_OBSERVER_COUNT: usize = 1000;
}
