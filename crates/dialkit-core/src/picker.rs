//! Synchronous dialog seams. The host decides how a dialog is shown.

/// Outcome of a modal dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum PickResult<T> {
    Confirmed(T),
    Cancelled,
}

impl<T> PickResult<T> {
    pub fn confirmed(self) -> Option<T> {
        match self {
            Self::Confirmed(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// Lets the user choose a new value, starting from `current`.
pub trait ModalPicker<T> {
    fn pick(&mut self, current: &T) -> PickResult<T>;
}

/// Yes/no question.
pub trait ConfirmPicker {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Closures work as pickers, which keeps tests and simple hosts short.
impl<T, F: FnMut(&T) -> PickResult<T>> ModalPicker<T> for F {
    fn pick(&mut self, current: &T) -> PickResult<T> {
        self(current)
    }
}

/// Fixed answer, e.g. for hosts that never ask.
impl ConfirmPicker for bool {
    fn confirm(&mut self, _message: &str) -> bool {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_picker() {
        let mut double = |v: &i32| PickResult::Confirmed(v * 2);
        assert_eq!(double.pick(&4), PickResult::Confirmed(8));
        assert_eq!(PickResult::<i32>::Cancelled.confirmed(), None);
    }

    #[test]
    fn test_fixed_confirm() {
        assert!(true.confirm("Clear?"));
        assert!(!false.confirm("Clear?"));
    }
}
