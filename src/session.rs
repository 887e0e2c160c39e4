//! Observer channel abstraction
//!
//! This module defines the trait for tunneling events from the core to a
//! connected observer. The tunnel abstraction keeps the core independent
//! of the transport actually carrying the events (WebSockets, Socket.IO
//! bridges, in-process channels in tests).

use super::event::OutgoingEvent;

/// Trait for sending events through a communication tunnel
///
/// Sends are fire-and-forget: a tunnel whose peer stalled or vanished simply
/// drops the event, and the observer catches up through a fresh snapshot
/// when it reconnects.
pub trait Tunnel {
    /// Sends one event to the observer
    ///
    /// # Arguments
    ///
    /// * `event` - The event to send
    fn send_event(&self, event: &OutgoingEvent);

    /// Sends a run of events to the observer, preserving order
    ///
    /// # Arguments
    ///
    /// * `events` - The events to send
    fn send_events(&self, events: &[OutgoingEvent]) {
        for event in events {
            self.send_event(event);
        }
    }

    /// Closes the communication tunnel
    ///
    /// This method should be called when the observer is being dropped by
    /// the core rather than by the transport.
    fn close(self);
}
