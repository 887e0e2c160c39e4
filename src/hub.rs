//! Connection handling
//!
//! [`Hub`] ties the pieces together for a transport: it registers observers
//! as they connect and sends each one a snapshot, runs inbound commands
//! through the processor, and fans the resulting events out. All calls take
//! `&mut self`, so commands and connections are handled strictly one after
//! another and every observer sees broadcasts in the same global order.

use std::fmt::Debug;

use tracing::{debug, info};

use crate::{
    clock::Clock,
    command::IncomingCommand,
    config::{self, Options},
    observers::{self, Id, Observers},
    processor::CommandProcessor,
    session::Tunnel,
    snapshot,
    state::Store,
};

/// A presentation session shared by all connected observers
pub struct Hub<C> {
    /// Owner of the presentation state
    processor: CommandProcessor,
    /// Currently connected observers
    observers: Observers,
    /// Source of timestamps for the timer engine
    clock: C,
}

impl<C> Debug for Hub<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("store", self.processor.store())
            .field("observers", &self.observers.count())
            .finish_non_exhaustive()
    }
}

impl<C: Clock> Hub<C> {
    /// Creates an idle session
    ///
    /// # Errors
    ///
    /// Returns [`config::Error::Invalid`] if the options fail validation.
    pub fn new(options: Options, clock: C) -> Result<Self, config::Error> {
        let options = options.validated()?;

        Ok(Self {
            processor: CommandProcessor::new(&options),
            observers: Observers::default(),
            clock,
        })
    }

    /// Read-only view of the presentation state
    pub fn store(&self) -> &Store {
        self.processor.store()
    }

    /// The connected observers
    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Registers a new observer and brings it up to date
    ///
    /// The snapshot goes to the joining observer only.
    ///
    /// # Errors
    ///
    /// Returns an [`observers::Error`] if the observer cannot be registered;
    /// nothing is sent in that case.
    pub fn connect<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &mut self,
        id: Id,
        tunnel_finder: F,
    ) -> Result<(), observers::Error> {
        self.observers.add(id)?;

        info!(observer = %id, observers = self.observers.count(), "observer connected");

        self.resync(id, tunnel_finder);

        Ok(())
    }

    /// Resends the full snapshot to one observer
    pub fn resync<T: Tunnel, F: Fn(Id) -> Option<T>>(&self, id: Id, tunnel_finder: F) {
        let events = snapshot::build(self.processor.store(), self.clock.now());
        self.observers.send(&events, id, tunnel_finder);
    }

    /// Forgets an observer whose connection dropped
    pub fn disconnect(&mut self, id: Id) {
        if self.observers.remove(id) {
            info!(observer = %id, observers = self.observers.count(), "observer disconnected");
        }
    }

    /// Drops an observer from the core side, closing its tunnel
    pub fn kick<T: Tunnel, F: Fn(Id) -> Option<T>>(&mut self, id: Id, tunnel_finder: F) {
        self.observers.close(id, tunnel_finder);
        info!(observer = %id, observers = self.observers.count(), "observer closed");
    }

    /// Handles a command sent by a connected observer
    ///
    /// Broadcast events go to every observer (the sender included); reply
    /// events go to the sender only. Commands from unknown senders are
    /// ignored.
    pub fn receive_message<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &mut self,
        sender: Id,
        command: IncomingCommand,
        tunnel_finder: F,
    ) {
        if !self.observers.contains(sender) {
            debug!(observer = %sender, command = command.name(), "command from unknown observer");
            return;
        }

        let dispatch = self.processor.process(command, self.clock.now());

        self.observers.announce(&dispatch.broadcast, &tunnel_finder);
        self.observers.send(&dispatch.reply, sender, &tunnel_finder);
    }

    /// Decodes and handles a raw command frame
    ///
    /// Frames that do not decode are dropped.
    pub fn receive_text<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &mut self,
        sender: Id,
        text: &str,
        tunnel_finder: F,
    ) {
        match IncomingCommand::from_message(text) {
            Ok(command) => self.receive_message(sender, command, tunnel_finder),
            Err(error) => {
                debug!(observer = %sender, %error, "undecodable command dropped");
            }
        }
    }
}
