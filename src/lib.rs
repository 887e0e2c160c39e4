//! # Quizcast
//!
//! Server-authoritative state synchronization for a live quiz show. A
//! control panel drives the presentation through commands; every connected
//! display mirrors the resulting state through an ordered event stream, and
//! a display that joins late is brought up to date from a snapshot built out
//! of the current state alone.
//!
//! The core is transport agnostic: connections are reached through the
//! [`session::Tunnel`] trait and time through the [`clock::Clock`] trait.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]

pub mod clock;
pub mod command;
pub mod config;
pub mod constants;
pub mod display;
pub mod event;
pub mod hub;
pub mod observers;
pub mod processor;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod timer;

pub use command::IncomingCommand;
pub use event::OutgoingEvent;
pub use hub::Hub;
pub use processor::{CommandProcessor, Dispatch};
pub use state::Store;
pub use timer::{TimerStatus, TimerValue};
