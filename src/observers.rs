//! Connected observer registry and event fan-out
//!
//! This module tracks which observers (control panels and displays) are
//! currently connected and delivers events to all of them, or to a single
//! one, through their tunnels.

use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;

use crate::{constants, event::OutgoingEvent, session::Tunnel};

/// Handle of one observer connection
///
/// The transport mints one per connection and passes it back with every
/// frame from that connection. A reconnecting display gets a fresh handle.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct Id(Uuid);

impl Id {
    /// Mints a handle for a new connection
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    /// Reads back a handle from its logged or serialized form
    ///
    /// # Errors
    ///
    /// Fails when the text is not a UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// Why a connection could not be registered
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The maximum number of simultaneous observers is reached
    #[error("maximum number of observers reached")]
    MaximumObservers,
    /// The ID is already registered
    #[error("observer is already connected")]
    AlreadyConnected,
}

/// The set of currently connected observers
#[derive(Debug, Default)]
pub struct Observers {
    connected: BTreeSet<Id>,
}

impl Observers {
    /// Registers a newly connected observer
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyConnected`] if the ID is registered already,
    /// or [`Error::MaximumObservers`] if the registry is full.
    pub fn add(&mut self, id: Id) -> Result<(), Error> {
        if self.connected.contains(&id) {
            return Err(Error::AlreadyConnected);
        }

        if self.connected.len() >= constants::observers::MAX_OBSERVER_COUNT {
            return Err(Error::MaximumObservers);
        }

        self.connected.insert(id);

        Ok(())
    }

    /// Forgets an observer, returning whether it was registered
    pub fn remove(&mut self, id: Id) -> bool {
        self.connected.remove(&id)
    }

    /// Whether the observer is registered
    pub fn contains(&self, id: Id) -> bool {
        self.connected.contains(&id)
    }

    /// Number of registered observers
    pub fn count(&self) -> usize {
        self.connected.len()
    }

    /// Registered observers paired with their live tunnels
    ///
    /// Observers whose tunnel can no longer be found are skipped.
    pub fn vec<T: Tunnel, F: Fn(Id) -> Option<T>>(&self, tunnel_finder: F) -> Vec<(Id, T)> {
        self.connected
            .iter()
            .filter_map(|id| tunnel_finder(*id).map(|tunnel| (*id, tunnel)))
            .collect_vec()
    }

    /// Sends a run of events to every registered observer
    ///
    /// # Arguments
    ///
    /// * `events` - The events to broadcast, in order
    /// * `tunnel_finder` - Function to retrieve the tunnel for an observer
    pub fn announce<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &self,
        events: &[OutgoingEvent],
        tunnel_finder: F,
    ) {
        if events.is_empty() {
            return;
        }

        for (_, tunnel) in self.vec(tunnel_finder) {
            tunnel.send_events(events);
        }
    }

    /// Sends a run of events to one observer
    ///
    /// # Arguments
    ///
    /// * `events` - The events to send, in order
    /// * `id` - The receiving observer
    /// * `tunnel_finder` - Function to retrieve the tunnel for the observer
    pub fn send<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &self,
        events: &[OutgoingEvent],
        id: Id,
        tunnel_finder: F,
    ) {
        if events.is_empty() {
            return;
        }

        let Some(tunnel) = tunnel_finder(id) else {
            return;
        };

        tunnel.send_events(events);
    }

    /// Closes an observer's tunnel and forgets it
    pub fn close<T: Tunnel, F: Fn(Id) -> Option<T>>(&mut self, id: Id, tunnel_finder: F) {
        if let Some(tunnel) = tunnel_finder(id) {
            tunnel.close();
        }
        self.connected.remove(&id);
    }
}
