//=========================================================================
// Diagnostics
//=========================================================================
//
// Optional side channel for the singleton lifecycle.
//
// Architecture:
//   Slot<T> ──trace()/warn()──> log facade  "[frame][TYPENAME] message"
//          └─publish()────────> crossbeam Sender ──> subscriber Receivers
//
// Nothing here affects lifecycle semantics: traces can be disabled and
// subscribers can lag or disconnect without blocking the host.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::singleton::short_type_name;
use crate::core::text::RichText;

//=== Module Declarations =================================================

mod event;

#[cfg(test)]
pub(crate) mod capture;

//=== Public API ==========================================================

pub use event::LifecycleEvent;

//=== Diagnostics =========================================================

/// Trace formatting and lifecycle event fan-out.
pub struct Diagnostics {
    trace_all: bool,
    rich_text: bool,
    event_capacity: usize,
    subscribers: Vec<Sender<LifecycleEvent>>,
}

impl Diagnostics {
    pub(crate) fn new(trace_all: bool, rich_text: bool, event_capacity: usize) -> Self {
        Self {
            trace_all,
            rich_text,
            event_capacity,
            subscribers: Vec::new(),
        }
    }

    /// True when trace lines are forced on for every singleton.
    pub fn trace_all(&self) -> bool {
        self.trace_all
    }

    pub fn rich_text(&self) -> bool {
        self.rich_text
    }

    /// Number of live subscribers (pruned lazily on publish).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    //--- Trace Lines ------------------------------------------------------

    /// Formats `[frame][TYPENAME] message`, bolded in rich-text mode.
    pub fn format_line(&self, frame: u64, type_name: &str, message: fmt::Arguments<'_>) -> String {
        format_line(self.rich_text, frame, type_name, message)
    }

    /// Emits an info line if tracing is enabled for the instance or globally.
    pub(crate) fn trace(
        &self,
        instance_enabled: bool,
        frame: u64,
        type_name: &str,
        message: fmt::Arguments<'_>,
    ) {
        if instance_enabled || self.trace_all {
            info!("{}", self.format_line(frame, type_name, message));
        }
    }

    /// Emits a warning line unconditionally.
    pub(crate) fn warn(&self, frame: u64, type_name: &str, message: fmt::Arguments<'_>) {
        warn!("{}", self.format_line(frame, type_name, message));
    }

    //--- Event Fan-out ----------------------------------------------------

    /// Opens a bounded receiver for lifecycle events.
    pub(crate) fn subscribe(&mut self) -> Receiver<LifecycleEvent> {
        let (tx, rx) = bounded(self.event_capacity);
        self.subscribers.push(tx);
        rx
    }

    /// Sends the event to every subscriber without blocking.
    ///
    /// Full queues drop the event; disconnected subscribers are removed.
    pub(crate) fn publish(&mut self, event: LifecycleEvent) {
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                warn!("Lifecycle subscriber queue full, dropped: {}", dropped);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

//=== Line Format =========================================================

/// `[frame][TYPENAME] message`, wrapped in `<b>` markup when `rich_text` is set.
pub(crate) fn format_line(
    rich_text: bool,
    frame: u64,
    type_name: &str,
    message: fmt::Arguments<'_>,
) -> String {
    let line = format!(
        "[{}][{}] {}",
        frame,
        short_type_name(type_name).to_uppercase(),
        message
    );

    if rich_text {
        line.bold()
    } else {
        line
    }
}

//=========================================================================
// Tests
//=========================================================================
