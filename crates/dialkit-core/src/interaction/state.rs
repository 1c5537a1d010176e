//! Interaction state definitions.

use kurbo::Point;

/// Pointer phase of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase<R> {
    /// Pointer is elsewhere.
    #[default]
    Idle,
    /// Pointer is over the widget, possibly over one of its regions.
    Hovered(Option<R>),
    /// A button went down on a region. Moves are captured from here on.
    Pressed(R),
    /// The pointer moved since the press.
    Dragging(R),
}

impl<R: Copy> Phase<R> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Moves belong to this control until release.
    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Pressed(_) | Self::Dragging(_))
    }

    pub fn region(&self) -> Option<R> {
        match *self {
            Self::Idle => None,
            Self::Hovered(r) => r,
            Self::Pressed(r) | Self::Dragging(r) => Some(r),
        }
    }
}

/// Value and pointer position recorded when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor<V> {
    pub value: V,
    pub pointer: Point,
}

/// What a release ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release<R, V> {
    pub region: R,
    pub anchor: Option<DragAnchor<V>>,
    /// The pointer moved between press and release.
    pub dragged: bool,
}

/// Inline editor buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEdit {
    text: String,
}

impl TextEdit {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_helpers() {
        let idle: Phase<u8> = Phase::default();
        assert!(idle.is_idle());
        assert!(!idle.is_captured());
        assert_eq!(Phase::Hovered(Some(3_u8)).region(), Some(3));
        assert_eq!(Phase::<u8>::Hovered(None).region(), None);
        assert!(Phase::Pressed(1_u8).is_captured());
        assert!(Phase::Dragging(1_u8).is_captured());
    }

    #[test]
    fn test_text_edit_buffer() {
        let mut edit = TextEdit::new("12");
        edit.push_str(".5");
        assert_eq!(edit.text(), "12.5");
        edit.backspace();
        assert_eq!(edit.into_text(), "12.");
    }
}
