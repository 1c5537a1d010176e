//! Paintable scalar field with an optional stroke-angle layer.

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::error::ConstructionResult;
use crate::field::{Brush, BrushMode, FieldPair};
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::interaction::{DragAnchor, Interaction};
use crate::picker::ConfirmPicker;
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::truncate_label;

pub const DEFAULT_FIELD_WIDTH: usize = 512;
pub const DEFAULT_FIELD_HEIGHT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRegion {
    Image,
}

/// State of the stroke in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stroke {
    button: MouseButton,
    previous: (i64, i64),
}

#[derive(Debug)]
pub struct FieldCanvas {
    label: String,
    fields: FieldPair,
    brush: Brush,
    interaction: Interaction<FieldRegion, Point>,
    style: Rc<Style>,
    allow_angle_mode: bool,
    angle_mode: bool,
    ctrl_held: bool,
    shift_held: bool,
    stroke: Option<Stroke>,
    signals: Signals,
}

impl FieldCanvas {
    pub fn new(label: impl Into<String>, width: usize, height: usize) -> Self {
        let label = label.into();
        log::trace!("Field canvas '{}' created: {}x{}", label, width, height);
        Self {
            label,
            fields: FieldPair::new(width, height),
            brush: Brush::default(),
            interaction: Interaction::new(),
            style: Rc::new(Style::default()),
            allow_angle_mode: false,
            angle_mode: false,
            ctrl_held: false,
            shift_held: false,
            stroke: None,
            signals: Signals::new(),
        }
    }

    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self.relayout();
        self
    }

    pub fn with_brush(mut self, brush: Brush) -> Self {
        self.brush = brush;
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

    pub fn fields(&self) -> &FieldPair {
        &self.fields
    }

    pub fn field_width(&self) -> usize {
        self.fields.width()
    }

    pub fn field_height(&self) -> usize {
        self.fields.height()
    }

    pub fn field_data(&self) -> &[f32] {
        self.fields.value().data()
    }

    pub fn field_angle_data(&self) -> &[f32] {
        self.fields.angle().data()
    }

    /// Replace the value grid. Fails without touching the field when the data
    /// length is not `width * height`.
    pub fn set_field_data(&mut self, width: usize, height: usize, data: Vec<f32>) -> ConstructionResult<()> {
        if let Err(err) = self.fields.set_value_data(width, height, data) {
            log::warn!("Field canvas '{}': {}", self.label, err);
            return Err(err);
        }
        self.signals.emit(Signal::ValueChanged);
        Ok(())
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_brush_radius(&mut self, radius: usize) {
        self.brush.set_radius(radius);
    }

    pub fn set_brush_strength(&mut self, strength: f64) {
        self.brush.set_strength(strength);
    }

    pub fn allow_angle_mode(&self) -> bool {
        self.allow_angle_mode
    }

    pub fn set_allow_angle_mode(&mut self, allow: bool) {
        self.allow_angle_mode = allow;
        if !allow {
            self.angle_mode = false;
        }
    }

    /// The painter shows the angle layer instead of the values.
    pub fn angle_mode(&self) -> bool {
        self.angle_mode
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn signals_mut(&mut self) -> &mut Signals {
        &mut self.signals
    }

    /// Overlay text for the brush, if a modifier is held.
    pub fn brush_hint(&self) -> Option<String> {
        if self.ctrl_held {
            Some(format!("Strength: {:.3}", self.brush.strength()))
        } else if self.shift_held {
            Some("Smoothing".to_string())
        } else {
            None
        }
    }

    pub fn rect(&self) -> Rect {
        self.interaction.bounds()
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.interaction.regions_mut().reset(rect);
        self.relayout();
    }

    fn relayout(&mut self) {
        let image = self.compute_image_rect();
        self.interaction.regions_mut().set(FieldRegion::Image, image);
    }

    fn compute_image_rect(&self) -> Rect {
        let gap = self.style.global.radius;
        let rect = self.rect();
        let image = rect.inset(-gap);
        if image.width() > 0.0 && image.height() > 0.0 {
            image
        } else {
            rect
        }
    }

    /// Area the grid is drawn into.
    pub fn image_rect(&self) -> Rect {
        self.interaction
            .regions()
            .rect(FieldRegion::Image)
            .unwrap_or_else(|| self.compute_image_rect())
    }

    /// Grid cell under a widget position. May lie off the grid.
    pub fn cell_at(&self, position: Point) -> (i64, i64) {
        let image = self.image_rect();
        let sx = if image.width() > 0.0 {
            self.fields.width() as f64 / image.width()
        } else {
            0.0
        };
        let sy = if image.height() > 0.0 {
            self.fields.height() as f64 / image.height()
        } else {
            0.0
        };
        (
            ((position.x - image.x0) * sx).floor() as i64,
            ((position.y - image.y0) * sy).floor() as i64,
        )
    }

    pub fn is_on_image(&self, position: Point) -> bool {
        self.image_rect().contains(position)
    }

    /// Zero both layers.
    pub fn clear(&mut self) {
        self.fields.clear();
        log::debug!("Field canvas '{}' cleared", self.label);
        self.signals.emit(Signal::ValueChanged);
        self.signals.emit(Signal::EditEnded);
    }

    /// Ask first, then clear.
    pub fn request_clear(&mut self, confirm: &mut dyn ConfirmPicker) -> Response {
        self.signals.begin();
        if confirm.confirm("Clear the canvas?") {
            self.clear();
        }
        self.signals.finish(true)
    }

    pub fn handle_key(&mut self, event: KeyEvent, confirm: &mut dyn ConfirmPicker) -> Response {
        match event {
            KeyEvent::Pressed(Key::Ctrl) | KeyEvent::Released(Key::Ctrl) => {
                self.ctrl_held = matches!(event, KeyEvent::Pressed(_));
                Response::ignored()
            }
            KeyEvent::Pressed(Key::Shift) | KeyEvent::Released(Key::Shift) => {
                self.shift_held = matches!(event, KeyEvent::Pressed(_));
                Response::ignored()
            }
            KeyEvent::Pressed(Key::Tab) if self.allow_angle_mode => {
                self.angle_mode = !self.angle_mode;
                log::debug!("Field canvas '{}' angle mode: {}", self.label, self.angle_mode);
                Response {
                    consumed: true,
                    ..Response::default()
                }
            }
            KeyEvent::Pressed(Key::Char('c' | 'C')) => self.request_clear(confirm),
            _ => Response::ignored(),
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent, modifiers: Modifiers) -> Response {
        self.signals.begin();
        let modifiers = Modifiers {
            ctrl: modifiers.ctrl || self.ctrl_held,
            shift: modifiers.shift || self.shift_held,
            ..modifiers
        };
        let consumed = match *event {
            PointerEvent::Down { position, button } if button != MouseButton::Middle => {
                self.on_press(position, button, modifiers)
            }
            PointerEvent::Move { position } => self.on_move(position, modifiers),
            PointerEvent::Up { position, .. } => match self.interaction.release(Some(position)) {
                Some(_) => {
                    self.stroke = None;
                    self.signals.emit(Signal::EditEnded);
                    true
                }
                None => false,
            },
            PointerEvent::Scroll { position, delta } => self.on_wheel(position, delta.y, modifiers),
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let cursor = match self.interaction.hovered() {
            Some(FieldRegion::Image) => CursorHint::Crosshair,
            None => CursorHint::Default,
        };
        self.signals.finish(consumed).with_cursor(cursor)
    }

    fn on_press(&mut self, position: Point, button: MouseButton, modifiers: Modifiers) -> bool {
        if !self.rect().contains(position) {
            return false;
        }
        self.interaction.hover(position);
        let cell = self.cell_at(position);
        self.interaction.press(
            FieldRegion::Image,
            Some(DragAnchor {
                value: position,
                pointer: position,
            }),
        );
        // First application of a stroke has no direction.
        self.stroke = Some(Stroke {
            button,
            previous: cell,
        });
        self.paint_at(cell, modifiers);
        true
    }

    fn on_move(&mut self, position: Point, modifiers: Modifiers) -> bool {
        if self.stroke.is_none() {
            return self.interaction.hover(position).is_some();
        }
        self.interaction.drag_to(position);
        let cell = self.cell_at(position);
        self.paint_at(cell, modifiers);
        true
    }

    fn paint_at(&mut self, cell: (i64, i64), modifiers: Modifiers) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        let mode = if modifiers.shift {
            BrushMode::Smooth
        } else if stroke.button == MouseButton::Left {
            BrushMode::Add
        } else {
            BrushMode::Subtract
        };
        let previous = stroke.previous;
        if mode != BrushMode::Smooth {
            stroke.previous = cell;
        }
        self.brush.apply(
            &mut self.fields,
            mode,
            cell,
            previous,
            self.style.canvas.brush_avg_radius,
            self.allow_angle_mode,
        );
        self.signals.emit(Signal::ValueChanged);
    }

    fn on_wheel(&mut self, position: Point, delta_y: f64, modifiers: Modifiers) -> bool {
        if !self.is_on_image(position) || delta_y == 0.0 {
            return false;
        }
        let up = delta_y > 0.0;
        if modifiers.ctrl {
            self.brush.scroll_strength(up, self.style.canvas.brush_strength_tick);
        } else {
            self.brush.scroll_radius(up);
        }
        true
    }

    pub fn focus_lost(&mut self) -> Response {
        self.signals.begin();
        self.ctrl_held = false;
        self.shift_held = false;
        let consumed = self.interaction.focus_lost().is_some();
        if self.stroke.take().is_some() {
            self.signals.emit(Signal::EditEnded);
        }
        self.signals.finish(consumed)
    }
}

impl Default for FieldCanvas {
    fn default() -> Self {
        Self::new("", DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::testing::{count, record};
    use kurbo::Vec2;

    /// 4x4 grid drawn at one cell per pixel, image starting at (4, 4).
    fn canvas() -> FieldCanvas {
        let mut c = FieldCanvas::new("f", 4, 4).with_brush(Brush::new(1, 1.0));
        c.set_rect(Rect::new(0.0, 0.0, 12.0, 12.0));
        c
    }

    fn value(c: &FieldCanvas, x: usize, y: usize) -> f32 {
        c.field_data()[y * c.field_width() + x]
    }

    fn down(button: MouseButton, x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button,
        }
    }

    #[test]
    fn test_geometry() {
        let c = canvas();
        assert_eq!(c.image_rect(), Rect::new(4.0, 4.0, 8.0, 8.0));
        assert_eq!(c.cell_at(Point::new(6.5, 6.5)), (2, 2));
        assert_eq!(c.cell_at(Point::new(4.0, 7.9)), (0, 3));
        assert_eq!(c.cell_at(Point::new(2.0, 2.0)), (-2, -2));
    }

    #[test]
    fn test_paint_scenario() {
        let mut c = canvas();
        let log = record(c.signals_mut());
        let r = c.handle_pointer(&down(MouseButton::Left, 6.5, 6.5), Modifiers::NONE);
        assert!(r.value_changed);
        assert!((value(&c, 2, 2) - 1.0).abs() < 1e-6);
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3), (1, 1), (3, 3), (0, 0)] {
            assert_eq!(value(&c, x, y), 0.0);
        }
        let r = c.handle_pointer(
            &PointerEvent::Up {
                position: Point::new(6.5, 6.5),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        );
        assert!(r.edit_ended);
        assert_eq!(count(&log, Signal::EditEnded), 1);
        assert!(!c.is_drawing());
    }

    #[test]
    fn test_secondary_button_subtracts() {
        let mut c = canvas();
        c.set_field_data(4, 4, vec![0.5; 16]).unwrap();
        c.handle_pointer(&down(MouseButton::Right, 6.5, 6.5), Modifiers::NONE);
        assert_eq!(value(&c, 2, 2), 0.0);
        assert_eq!(value(&c, 0, 0), 0.5);
    }

    #[test]
    fn test_stroke_paints_along_moves() {
        let mut c = canvas();
        c.handle_pointer(&down(MouseButton::Left, 4.5, 4.5), Modifiers::NONE);
        let r = c.handle_pointer(
            &PointerEvent::Move {
                position: Point::new(5.5, 4.5),
            },
            Modifiers::NONE,
        );
        assert!(r.value_changed);
        assert!((value(&c, 1, 0) - 1.0).abs() < 1e-6);
        // Stroke went +x: angle 0.5 at the second cell.
        assert!((c.field_angle_data()[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_held_shift_smooths() {
        let mut c = canvas().with_brush(Brush::new(2, 1.0));
        c.set_field_data(4, 4, (0..16).map(|i| if i == 10 { 1.0 } else { 0.0 }).collect())
            .unwrap();
        c.handle_key(KeyEvent::Pressed(Key::Shift), &mut true);
        assert_eq!(c.brush_hint().as_deref(), Some("Smoothing"));
        c.handle_pointer(&down(MouseButton::Left, 6.5, 6.5), Modifiers::NONE);
        assert!((value(&c, 2, 2) - 1.0 / 9.0).abs() < 1e-6);
        let total: f32 = c.field_data().iter().sum();
        assert!(total < 1.0 + 1e-6);
        c.handle_key(KeyEvent::Released(Key::Shift), &mut true);
        assert!(c.brush_hint().is_none());
    }

    #[test]
    fn test_shift_smooths_angle_layer_when_allowed() {
        let spike = || (0..16).map(|i| if i == 10 { 1.0 } else { 0.0 }).collect::<Vec<f32>>();
        let mut c = canvas().with_brush(Brush::new(2, 1.0));
        c.set_allow_angle_mode(true);
        c.set_field_data(4, 4, spike()).unwrap();
        *c.fields.split_mut().1.at_mut(2, 2).unwrap() = 1.0;
        c.handle_key(KeyEvent::Pressed(Key::Shift), &mut true);
        c.handle_pointer(&down(MouseButton::Left, 6.5, 6.5), Modifiers::NONE);
        assert!((c.field_angle_data()[10] - 1.0 / 9.0).abs() < 1e-6);
        assert!((c.field_angle_data()[10] - c.field_data()[10]).abs() < 1e-6);

        // Without angle mode the angle layer is left alone.
        let mut c = canvas().with_brush(Brush::new(2, 1.0));
        c.set_field_data(4, 4, spike()).unwrap();
        *c.fields.split_mut().1.at_mut(2, 2).unwrap() = 1.0;
        c.handle_key(KeyEvent::Pressed(Key::Shift), &mut true);
        c.handle_pointer(&down(MouseButton::Left, 6.5, 6.5), Modifiers::NONE);
        assert_eq!(c.field_angle_data()[10], 1.0);
    }

    #[test]
    fn test_wheel_adjusts_brush() {
        let mut c = canvas().with_brush(Brush::new(16, 0.05));
        let wheel = |dy: f64| PointerEvent::Scroll {
            position: Point::new(6.0, 6.0),
            delta: Vec2::new(0.0, dy),
        };
        let r = c.handle_pointer(&wheel(1.0), Modifiers::NONE);
        assert!(r.consumed && !r.value_changed);
        assert_eq!(c.brush().radius(), 18);
        c.handle_pointer(&wheel(-1.0), Modifiers::CTRL);
        assert!((c.brush().strength() - 0.04).abs() < 1e-12);

        // Held Ctrl counts too.
        c.handle_key(KeyEvent::Pressed(Key::Ctrl), &mut true);
        c.handle_pointer(&wheel(1.0), Modifiers::NONE);
        assert!((c.brush().strength() - 0.05).abs() < 1e-12);
        assert_eq!(c.brush_hint().as_deref(), Some("Strength: 0.050"));
    }

    #[test]
    fn test_clear_asks_first() {
        let mut c = canvas();
        c.set_field_data(4, 4, vec![0.5; 16]).unwrap();
        let log = record(c.signals_mut());
        let r = c.handle_key(KeyEvent::Pressed(Key::Char('c')), &mut false);
        assert!(!r.value_changed);
        assert_eq!(value(&c, 0, 0), 0.5);

        let r = c.handle_key(KeyEvent::Pressed(Key::Char('c')), &mut true);
        assert!(r.value_changed && r.edit_ended);
        assert!(c.field_data().iter().all(|v| *v == 0.0));
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_tab_toggles_angle_mode_when_allowed() {
        let mut c = canvas();
        assert!(!c.handle_key(KeyEvent::Pressed(Key::Tab), &mut true).consumed);
        assert!(!c.angle_mode());
        c.set_allow_angle_mode(true);
        c.handle_key(KeyEvent::Pressed(Key::Tab), &mut true);
        assert!(c.angle_mode());
        c.set_allow_angle_mode(false);
        assert!(!c.angle_mode());
    }

    #[test]
    fn test_set_field_data_size_mismatch() {
        let mut c = canvas();
        assert!(c.set_field_data(8, 8, vec![0.0; 10]).is_err());
        assert_eq!(c.field_width(), 4);
        assert!(c.set_field_data(8, 2, vec![0.25; 16]).is_ok());
        assert_eq!((c.field_width(), c.field_height()), (8, 2));
        assert_eq!(c.field_angle_data().len(), 16);
    }

    #[test]
    fn test_defaults() {
        let c = FieldCanvas::default();
        assert_eq!((c.field_width(), c.field_height()), (512, 256));
        assert_eq!(c.brush().radius(), 32);
        assert!((c.brush().strength() - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_focus_lost_ends_stroke() {
        let mut c = canvas();
        c.handle_pointer(&down(MouseButton::Left, 6.5, 6.5), Modifiers::NONE);
        assert!(c.focus_lost().edit_ended);
        assert!(!c.is_drawing());
        // A move after focus loss paints nothing.
        let r = c.handle_pointer(
            &PointerEvent::Move {
                position: Point::new(4.5, 4.5),
            },
            Modifiers::NONE,
        );
        assert!(!r.value_changed);
    }
}
