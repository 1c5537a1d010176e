//! Outbound notifications emitted by controls.
//!
//! Every control carries a [`Signals`] list. Observers see two kinds of events:
//!
//! - [`Signal::ValueChanged`] after every mutation, including each drag frame
//! - [`Signal::EditEnded`] once per committed gesture
//!
//! Event handlers also return a [`Response`] that mirrors what was emitted while
//! the event was processed, for hosts that prefer polling over callbacks.

use std::fmt;

/// Notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    ValueChanged,
    EditEnded,
}

/// Pointer cursor the host should show over the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    ResizeHorizontal,
    Crosshair,
    Grab,
}

/// Outcome of handing one event to a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
    /// The control used the event.
    pub consumed: bool,
    /// At least one `ValueChanged` was emitted.
    pub value_changed: bool,
    /// An `EditEnded` was emitted.
    pub edit_ended: bool,
    /// The control asks the host to show its context actions.
    pub menu_requested: bool,
    pub cursor: CursorHint,
}

impl Response {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn with_cursor(mut self, cursor: CursorHint) -> Self {
        self.cursor = cursor;
        self
    }
}

type Listener = Box<dyn FnMut(Signal)>;

/// Observer list plus the per-event record used to build a [`Response`].
#[derive(Default)]
pub struct Signals {
    listeners: Vec<Listener>,
    value_changed: bool,
    edit_ended: bool,
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signals")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Observers are called in registration order.
    pub fn connect(&mut self, listener: impl FnMut(Signal) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn disconnect_all(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, signal: Signal) {
        match signal {
            Signal::ValueChanged => self.value_changed = true,
            Signal::EditEnded => self.edit_ended = true,
        }
        for listener in &mut self.listeners {
            listener(signal);
        }
    }

    /// Forget what was emitted so far. Called when an event starts.
    pub fn begin(&mut self) {
        self.value_changed = false;
        self.edit_ended = false;
    }

    /// Build the response for the event that just finished.
    pub fn finish(&mut self, consumed: bool) -> Response {
        let response = Response {
            consumed,
            value_changed: self.value_changed,
            edit_ended: self.edit_ended,
            ..Default::default()
        };
        self.begin();
        response
    }
}
