//! Dialog seams for immediate mode.
//!
//! egui cannot block inside an event handler, so a dialog request is recorded
//! during the frame and answered by a window on a later frame.

use dialkit_core::picker::{ConfirmPicker, ModalPicker, PickResult};

/// Records what the control asked for and cancels for now.
#[derive(Debug, Clone, Default)]
pub struct DeferredPicker<T> {
    requested: Option<T>,
}

impl<T: Clone> DeferredPicker<T> {
    pub fn new() -> Self {
        Self { requested: None }
    }

    /// Current value of the last request, if any.
    pub fn take_request(&mut self) -> Option<T> {
        self.requested.take()
    }
}

impl<T: Clone> ModalPicker<T> for DeferredPicker<T> {
    fn pick(&mut self, current: &T) -> PickResult<T> {
        self.requested = Some(current.clone());
        PickResult::Cancelled
    }
}

/// Answer already known, e.g. once the user picked in a window.
#[derive(Debug, Clone)]
pub struct Answer<T>(pub T);

impl<T: Clone> ModalPicker<T> for Answer<T> {
    fn pick(&mut self, _current: &T) -> PickResult<T> {
        PickResult::Confirmed(self.0.clone())
    }
}

impl ConfirmPicker for Answer<bool> {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

/// Yes/no question recorded for a later window.
#[derive(Debug, Clone, Default)]
pub struct DeferredConfirm {
    message: Option<String>,
}

impl DeferredConfirm {
    pub fn take_request(&mut self) -> Option<String> {
        self.message.take()
    }
}

impl ConfirmPicker for DeferredConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.message = Some(message.to_string());
        false
    }
}
