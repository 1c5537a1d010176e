//! Bar-chart style editor of a short vector of unit values.

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::input::{MouseButton, PointerEvent};
use crate::interaction::Interaction;
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::truncate_label;

#[derive(Debug)]
pub struct VectorEditor {
    label: String,
    values: Vec<f64>,
    /// Regions are value indices.
    interaction: Interaction<usize, f64>,
    style: Rc<Style>,
    signals: Signals,
}

impl VectorEditor {
    /// Values are clamped to `[0, 1]`.
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        let label = label.into();
        log::trace!("Vector editor '{}' created with {} values", label, values.len());
        Self {
            label,
            values: clamp_unit(values),
            interaction: Interaction::new(),
            style: Rc::new(Style::default()),
            signals: Signals::new(),
        }
    }

    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn display_label(&self) -> String {
        truncate_label(&self.label, self.style.global.max_label_len)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn set_values(&mut self, values: Vec<f64>) {
        self.interaction.set_hovered(None);
        self.values = clamp_unit(values);
        self.signals.emit(Signal::ValueChanged);
        self.signals.emit(Signal::EditEnded);
    }

    /// Index being edited, if any.
    pub fn active_index(&self) -> Option<usize> {
        self.interaction
            .is_captured()
            .then(|| self.interaction.hovered())
            .flatten()
    }

    pub fn is_hovered(&self) -> bool {
        self.interaction.is_hovered()
    }

    pub fn signals_mut(&mut self) -> &mut Signals {
        &mut self.signals
    }

    pub fn rect(&self) -> Rect {
        self.interaction.bounds()
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.interaction.regions_mut().reset(rect);
    }

    pub fn value_area(&self) -> Rect {
        self.rect().inset(-self.style.global.padding)
    }

    /// Screen position of one value. A single value sits in the middle.
    pub fn index_to_screen(&self, index: usize) -> Option<Point> {
        let v = *self.values.get(index)?;
        let a = self.value_area();
        let n = self.values.len();
        let t = if n > 1 { index as f64 / (n - 1) as f64 } else { 0.5 };
        Some(Point::new(a.x0 + t * a.width(), a.y0 + (1.0 - v) * a.height()))
    }

    /// Nearest index for a horizontal position, clamped to the valid range.
    pub fn screen_to_index(&self, x: f64) -> Option<usize> {
        let last = self.values.len().checked_sub(1)?;
        let a = self.value_area();
        let t = if a.width() > 0.0 { (x - a.x0) / a.width() } else { 0.0 };
        let index = (t * last as f64).round().clamp(0.0, last as f64);
        Some(index as usize)
    }

    pub fn screen_to_value(&self, y: f64) -> f64 {
        let a = self.value_area();
        if a.height() <= 0.0 {
            return 0.0;
        }
        (1.0 - (y - a.y0) / a.height()).clamp(0.0, 1.0)
    }

    fn write(&mut self, index: usize, y: f64) {
        let v = self.screen_to_value(y);
        if let Some(slot) = self.values.get_mut(index) {
            *slot = v;
            self.signals.emit(Signal::ValueChanged);
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Response {
        self.signals.begin();
        let consumed = match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } if self.rect().contains(position) => match self.screen_to_index(position.x) {
                Some(index) => {
                    self.interaction.press(index, None);
                    self.write(index, position.y);
                    true
                }
                None => false,
            },
            PointerEvent::Move { position } => match self.active_index() {
                Some(index) => {
                    self.write(index, position.y);
                    true
                }
                None => {
                    self.interaction.hover(position);
                    false
                }
            },
            PointerEvent::Up { position, .. } => match self.interaction.release(Some(position)) {
                Some(_) => {
                    self.signals.emit(Signal::EditEnded);
                    true
                }
                None => false,
            },
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let cursor = if self.interaction.is_captured() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        };
        self.signals.finish(consumed).with_cursor(cursor)
    }

    pub fn focus_lost(&mut self) -> Response {
        self.signals.begin();
        let consumed = self.interaction.focus_lost().is_some();
        if consumed {
            self.signals.emit(Signal::EditEnded);
        }
        self.signals.finish(consumed)
    }
}

fn clamp_unit(values: Vec<f64>) -> Vec<f64> {
    values
        .into_iter()
        .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::testing::{count, record};

    /// Value area (4, 4) to (104, 104).
    fn editor() -> VectorEditor {
        let mut e = VectorEditor::new("vec", vec![0.0, 0.5, 1.0, 0.25, 0.75]);
        e.set_rect(Rect::new(0.0, 0.0, 108.0, 108.0));
        e
    }

    #[test]
    fn test_index_and_value_mapping() {
        let e = editor();
        assert_eq!(e.screen_to_index(4.0), Some(0));
        assert_eq!(e.screen_to_index(40.0), Some(1));
        assert_eq!(e.screen_to_index(100.0), Some(4));
        assert_eq!(e.screen_to_index(-300.0), Some(0));
        assert_eq!(e.screen_to_index(900.0), Some(4));
        assert!((e.screen_to_value(29.0) - 0.75).abs() < 1e-12);
        assert_eq!(e.screen_to_value(-10.0), 1.0);
        assert_eq!(e.index_to_screen(1), Some(Point::new(29.0, 54.0)));
        assert_eq!(e.index_to_screen(5), None);

        let empty = VectorEditor::new("vec", Vec::new());
        assert_eq!(empty.screen_to_index(10.0), None);
    }

    #[test]
    fn test_press_drag_release() {
        let mut e = editor();
        let log = record(e.signals_mut());
        let r = e.handle_pointer(&PointerEvent::Down {
            position: Point::new(29.0, 79.0),
            button: MouseButton::Left,
        });
        assert!(r.value_changed && !r.edit_ended);
        assert!((e.values()[1] - 0.25).abs() < 1e-12);
        assert_eq!(e.active_index(), Some(1));

        // Moving sideways keeps editing the pressed index.
        e.handle_pointer(&PointerEvent::Move {
            position: Point::new(90.0, 4.0),
        });
        assert!((e.values()[1] - 1.0).abs() < 1e-12);
        assert!((e.values()[4] - 0.75).abs() < 1e-12);

        let r = e.handle_pointer(&PointerEvent::Up {
            position: Point::new(90.0, 4.0),
            button: MouseButton::Left,
        });
        assert!(r.edit_ended);
        assert_eq!(e.active_index(), None);
        assert_eq!(count(&log, Signal::ValueChanged), 2);
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_hover_does_not_edit() {
        let mut e = editor();
        let r = e.handle_pointer(&PointerEvent::Move {
            position: Point::new(29.0, 79.0),
        });
        assert!(!r.value_changed);
        assert!(e.is_hovered());
        assert!((e.values()[1] - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_values_clamps_and_notifies() {
        let mut e = editor();
        let r = {
            e.signals_mut().begin();
            e.set_values(vec![-1.0, 0.5, 2.0, f64::NAN]);
            e.signals_mut().finish(true)
        };
        assert!(r.value_changed && r.edit_ended);
        assert_eq!(e.values(), &[0.0, 0.5, 1.0, 0.0]);
    }

    #[test]
    fn test_focus_lost_ends_edit() {
        let mut e = editor();
        e.handle_pointer(&PointerEvent::Down {
            position: Point::new(29.0, 79.0),
            button: MouseButton::Left,
        });
        assert!(e.focus_lost().edit_ended);
        assert_eq!(e.active_index(), None);
    }
}
