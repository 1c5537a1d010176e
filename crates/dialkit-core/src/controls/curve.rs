//! Editor for a [`CurveModel`] that publishes N evenly spaced samples.

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::curve::{CurveModel, Interpolation};
use crate::input::{MouseButton, PointerEvent};
use crate::interaction::{DragAnchor, Interaction};
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::truncate_label;

#[derive(Debug)]
pub struct CurveEditor {
    label: String,
    model: CurveModel,
    values: Vec<f64>,
    sample_count: usize,
    /// Regions are control point indices.
    interaction: Interaction<usize, Point>,
    style: Rc<Style>,
    /// Points changed since the last press.
    mutated: bool,
    signals: Signals,
}

impl CurveEditor {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let style = Rc::new(Style::default());
        let model = CurveModel::new();
        let sample_count = style.curve.sample_count;
        log::trace!("Curve editor '{}' created", label);
        Self {
            label,
            values: model.resample(sample_count),
            model,
            sample_count,
            interaction: Interaction::new(),
            style,
            mutated: false,
            signals: Signals::new(),
        }
    }

    /// Takes the sample count from the style as well.
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.sample_count = style.curve.sample_count;
        self.style = style;
        self.values = self.model.resample(self.sample_count);
        self
    }

    pub fn with_sample_count(mut self, n: usize) -> Self {
        self.sample_count = n;
        self.values = self.model.resample(n);
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.model.set_interpolation(interpolation);
        self.values = self.model.resample(self.sample_count);
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

    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    pub fn points(&self) -> &[Point] {
        self.model.points()
    }

    /// Sampled output.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn interpolation(&self) -> Interpolation {
        self.model.interpolation()
    }

    pub fn hovered_point(&self) -> Option<usize> {
        self.interaction.hovered()
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
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

    /// Drawing area: the rect minus the padding on every side.
    pub fn plot_rect(&self) -> Rect {
        self.rect().inset(-self.style.global.padding)
    }

    pub fn set_sample_count(&mut self, n: usize) {
        self.sample_count = n;
        self.update_values();
        self.signals.emit(Signal::EditEnded);
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.model.set_interpolation(interpolation);
        log::debug!("Curve editor '{}': {:?} interpolation", self.label, interpolation);
        self.update_values();
        self.signals.emit(Signal::EditEnded);
    }

    pub fn set_smooth_interpolation(&mut self, smooth: bool) {
        self.set_interpolation(if smooth {
            Interpolation::CatmullRom
        } else {
            Interpolation::Linear
        });
    }

    /// Back to the two default endpoints.
    pub fn clear_points(&mut self) {
        self.interaction.set_hovered(None);
        self.model.reset();
        self.update_values();
    }

    /// Replace the control points. See [`CurveModel::from_points`].
    pub fn set_points(&mut self, points: impl IntoIterator<Item = Point>) {
        self.interaction.set_hovered(None);
        let interpolation = self.model.interpolation();
        self.model = CurveModel::from_points(points).with_interpolation(interpolation);
        self.update_values();
    }

    /// Override the sampled output. The sample count follows its length.
    pub fn set_values(&mut self, values: Vec<f64>) {
        self.sample_count = values.len();
        self.values = values;
    }

    /// Curve space to widget pixels. y grows upwards.
    pub fn point_to_screen(&self, p: Point) -> Point {
        let area = self.plot_rect();
        Point::new(area.x0 + p.x * area.width(), area.y0 + (1.0 - p.y) * area.height())
    }

    /// Widget pixels to curve space, clamped to the unit square.
    pub fn screen_to_point(&self, position: Point) -> Point {
        let area = self.plot_rect();
        let x = if area.width() > 0.0 {
            (position.x - area.x0) / area.width()
        } else {
            0.0
        };
        let y = if area.height() > 0.0 {
            1.0 - (position.y - area.y0) / area.height()
        } else {
            0.0
        };
        Point::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
    }

    /// Screen positions of the sampling points, for painters.
    pub fn sample_positions(&self) -> Vec<Point> {
        let n = self.values.len();
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                self.point_to_screen(Point::new(t, v))
            })
            .collect()
    }

    /// First point within the hit radius of `position`.
    pub fn hit_test(&self, position: Point) -> Option<usize> {
        let radius = 2.0 * self.style.global.radius;
        self.model
            .find_near(position, radius, |p| self.point_to_screen(p))
    }

    fn update_values(&mut self) {
        self.values = self.model.resample(self.sample_count);
        self.signals.emit(Signal::ValueChanged);
    }

    fn update_hover(&mut self, position: Point) -> bool {
        if self.interaction.is_captured() {
            return true;
        }
        if !self.rect().contains(position) {
            self.interaction.leave();
            return false;
        }
        let hit = self.hit_test(position);
        self.interaction.set_hovered(hit);
        true
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Response {
        self.signals.begin();
        let consumed = match *event {
            PointerEvent::Move { position } => self.on_move(position),
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.on_left_press(position),
            PointerEvent::Down {
                position,
                button: MouseButton::Right,
            } => self.on_right_press(position),
            PointerEvent::Up { position, .. } => {
                let released = self.interaction.release(None).is_some();
                self.update_hover(position);
                let mutated = std::mem::take(&mut self.mutated);
                if mutated {
                    self.signals.emit(Signal::EditEnded);
                }
                released || mutated
            }
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let cursor = if self.interaction.is_dragging() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        };
        self.signals.finish(consumed).with_cursor(cursor)
    }

    fn on_left_press(&mut self, position: Point) -> bool {
        if !self.rect().contains(position) {
            return false;
        }
        self.mutated = false;
        match self.hit_test(position) {
            Some(index) => {
                let anchor = DragAnchor {
                    value: self.model.points()[index],
                    pointer: position,
                };
                self.interaction.press(index, Some(anchor));
            }
            None => {
                let index = self.model.insert(self.screen_to_point(position));
                self.mutated = true;
                self.update_values();
                self.interaction.set_hovered(Some(index));
            }
        }
        true
    }

    fn on_right_press(&mut self, position: Point) -> bool {
        if self.interaction.is_captured() || !self.rect().contains(position) {
            return false;
        }
        let Some(index) = self.hit_test(position) else {
            return false;
        };
        self.interaction.set_hovered(None);
        if self.model.remove(index).is_none() {
            // Endpoints stay.
            return false;
        }
        self.mutated = true;
        self.update_values();
        true
    }

    fn on_move(&mut self, position: Point) -> bool {
        let Some((index, _, _)) = self.interaction.drag_to(position) else {
            return self.update_hover(position);
        };
        let target = self.screen_to_point(position);
        if let Some(new_index) = self.model.move_point(index, target) {
            self.interaction.retarget(new_index);
            self.mutated = true;
            self.update_values();
        }
        true
    }

    pub fn focus_lost(&mut self) -> Response {
        self.signals.begin();
        let released = self.interaction.focus_lost().is_some();
        let mutated = std::mem::take(&mut self.mutated);
        if mutated {
            self.signals.emit(Signal::EditEnded);
        }
        self.signals.finish(released || mutated)
    }
}
