//! Canvas of free 2D points, each carrying a z weight in `[0, 1]`.

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::interaction::{DragAnchor, Interaction};
use crate::mapping::{Domain, Linear, PointerMapper};
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::truncate_label;

/// Parallel coordinate arrays. Indices are only meaningful until the next
/// mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// `(x, y, z)` of one point.
    pub fn get(&self, index: usize) -> Option<(f64, f64, f64)> {
        Some((*self.x.get(index)?, *self.y.get(index)?, *self.z.get(index)?))
    }

    fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    fn remove(&mut self, index: usize) -> Option<(f64, f64, f64)> {
        let point = self.get(index)?;
        self.x.remove(index);
        self.y.remove(index);
        self.z.remove(index);
        Some(point)
    }
}

pub struct PointCanvas {
    label: String,
    points: PointSet,
    x_domain: Domain,
    y_domain: Domain,
    interaction: Interaction<usize, Point>,
    mapper: PointerMapper<Linear>,
    style: Rc<Style>,
    connected_points: bool,
    draw_z_value: bool,
    signals: Signals,
}

impl std::fmt::Debug for PointCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointCanvas")
            .field("label", &self.label)
            .field("points", &self.points.len())
            .field("x_domain", &self.x_domain)
            .field("y_domain", &self.y_domain)
            .finish()
    }
}

impl PointCanvas {
    pub fn new(label: impl Into<String>, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        let label = label.into();
        let style = Rc::new(Style::default());
        log::trace!("Point canvas '{}' created", label);
        Self {
            label,
            points: PointSet::default(),
            x_domain: ordered_domain(xmin, xmax),
            y_domain: ordered_domain(ymin, ymax),
            interaction: Interaction::new(),
            mapper: mapper_for(&style),
            style,
            connected_points: false,
            draw_z_value: false,
            signals: Signals::new(),
        }
    }

    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.mapper = mapper_for(&style);
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

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn points_x(&self) -> &[f64] {
        self.points.x()
    }

    pub fn points_y(&self) -> &[f64] {
        self.points.y()
    }

    pub fn points_z(&self) -> &[f64] {
        self.points.z()
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.x_domain.vmin,
            self.x_domain.vmax,
            self.y_domain.vmin,
            self.y_domain.vmax,
        )
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

    pub fn connected_points(&self) -> bool {
        self.connected_points
    }

    /// Painter hint: draw segments between consecutive points.
    pub fn set_connected_points(&mut self, connected: bool) {
        self.connected_points = connected;
    }

    pub fn draw_z_value(&self) -> bool {
        self.draw_z_value
    }

    /// Painter hint: show z as an arc around each point.
    pub fn set_draw_z_value(&mut self, draw: bool) {
        self.draw_z_value = draw;
    }

    pub fn rect(&self) -> Rect {
        self.interaction.bounds()
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.interaction.regions_mut().reset(rect);
    }

    /// Replace every point. z is reset to 1. Extra coordinates on the longer
    /// side are dropped.
    pub fn set_points(&mut self, x: &[f64], y: &[f64]) {
        if x.len() != y.len() {
            log::warn!(
                "Point canvas '{}': {} x values for {} y values",
                self.label,
                x.len(),
                y.len()
            );
        }
        self.interaction.set_hovered(None);
        self.points = PointSet::default();
        for (&px, &py) in x.iter().zip(y) {
            self.points
                .push(self.x_domain.clamp(px), self.y_domain.clamp(py), 1.0);
        }
        self.signals.emit(Signal::ValueChanged);
    }

    /// Replace one axis. The length must match the current point count.
    pub fn set_points_x(&mut self, x: &[f64]) -> bool {
        let domain = self.x_domain;
        self.set_axis(x, |points| &mut points.x, |v| domain.clamp(v))
    }

    pub fn set_points_y(&mut self, y: &[f64]) -> bool {
        let domain = self.y_domain;
        self.set_axis(y, |points| &mut points.y, |v| domain.clamp(v))
    }

    pub fn set_points_z(&mut self, z: &[f64]) -> bool {
        self.set_axis(z, |points| &mut points.z, |v| v.clamp(0.0, 1.0))
    }

    fn set_axis(
        &mut self,
        values: &[f64],
        axis: impl Fn(&mut PointSet) -> &mut Vec<f64>,
        clamp: impl Fn(f64) -> f64,
    ) -> bool {
        if values.len() != self.points.len() {
            log::warn!(
                "Point canvas '{}': expected {} values, got {}",
                self.label,
                self.points.len(),
                values.len()
            );
            return false;
        }
        let target = axis(&mut self.points);
        for (slot, v) in target.iter_mut().zip(values) {
            *slot = clamp(*v);
        }
        self.signals.emit(Signal::ValueChanged);
        true
    }

    /// Change the axis bounds. Points are clamped into the new box.
    pub fn set_bounds(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {
        self.x_domain = ordered_domain(xmin, xmax);
        self.y_domain = ordered_domain(ymin, ymax);
        let (xd, yd) = (self.x_domain, self.y_domain);
        let mut changed = false;
        for (x, y) in self.points.x.iter_mut().zip(self.points.y.iter_mut()) {
            let (cx, cy) = (xd.clamp(*x), yd.clamp(*y));
            changed |= cx != *x || cy != *y;
            *x = cx;
            *y = cy;
        }
        if changed {
            self.signals.emit(Signal::ValueChanged);
        }
    }

    /// Append a point with z = 1.
    pub fn add_point(&mut self, x: f64, y: f64) -> usize {
        self.points
            .push(self.x_domain.clamp(x), self.y_domain.clamp(y), 1.0);
        self.signals.emit(Signal::ValueChanged);
        self.points.len() - 1
    }

    /// Remove one point. Hover is cleared before the index goes stale.
    pub fn remove_point(&mut self, index: usize) -> bool {
        self.interaction.set_hovered(None);
        let removed = self.points.remove(index).is_some();
        if removed {
            self.signals.emit(Signal::ValueChanged);
        }
        removed
    }

    /// Point label in the `"(x, y)"` or `"(x, y, z)"` form.
    pub fn value_text(&self, index: usize) -> Option<String> {
        let (x, y, z) = self.points.get(index)?;
        Some(if self.draw_z_value {
            format!("({x:.2}, {y:.2}, {z:.2})")
        } else {
            format!("({x:.2}, {y:.2})")
        })
    }

    /// Value space to widget pixels. y grows upwards.
    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        let rect = self.rect();
        let rx = fraction(x, &self.x_domain);
        let ry = fraction(y, &self.y_domain);
        Point::new(rect.x0 + rx * rect.width(), rect.y0 + (1.0 - ry) * rect.height())
    }

    pub fn from_screen(&self, position: Point) -> (f64, f64) {
        let rect = self.rect();
        let rx = if rect.width() > 0.0 {
            (position.x - rect.x0) / rect.width()
        } else {
            0.0
        };
        let ry = if rect.height() > 0.0 {
            1.0 - (position.y - rect.y0) / rect.height()
        } else {
            0.0
        };
        (
            self.x_domain.vmin + rx * (self.x_domain.vmax - self.x_domain.vmin),
            self.y_domain.vmin + ry * (self.y_domain.vmax - self.y_domain.vmin),
        )
    }

    /// Last point whose hit square contains `position`.
    pub fn hit_test(&self, position: Point) -> Option<usize> {
        let r = self.style.canvas.point_radius;
        (0..self.points.len()).rev().find(|&k| {
            let center = self.to_screen(self.points.x[k], self.points.y[k]);
            Rect::new(center.x - r, center.y - r, center.x + r, center.y + r).contains(position)
        })
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

    pub fn handle_pointer(&mut self, event: &PointerEvent, modifiers: Modifiers) -> Response {
        self.signals.begin();
        let consumed = match *event {
            PointerEvent::Move { position } => self.on_move(position, modifiers),
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                self.update_hover(position);
                match self.hovered_point().and_then(|k| self.points.get(k).map(|p| (k, p))) {
                    Some((k, (x, y, _))) => {
                        let anchor = DragAnchor {
                            value: Point::new(x, y),
                            pointer: position,
                        };
                        self.interaction.press(k, Some(anchor));
                        true
                    }
                    None => false,
                }
            }
            PointerEvent::Down {
                position,
                button: MouseButton::Right,
            } => {
                self.update_hover(position);
                match self.hovered_point() {
                    Some(k) if !self.interaction.is_captured() => {
                        if self.remove_point(k) {
                            self.signals.emit(Signal::EditEnded);
                        }
                        true
                    }
                    _ => false,
                }
            }
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => match self.interaction.release(None) {
                Some(_) => {
                    self.update_hover(position);
                    self.signals.emit(Signal::EditEnded);
                    true
                }
                None => false,
            },
            PointerEvent::DoubleClick {
                position,
                button: MouseButton::Left,
            } => self.on_double_click(position),
            PointerEvent::Scroll { position, delta } => self.on_wheel(position, delta.y, modifiers),
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let cursor = if self.interaction.is_captured() {
            CursorHint::Crosshair
        } else {
            CursorHint::Default
        };
        self.signals.finish(consumed).with_cursor(cursor)
    }

    fn on_move(&mut self, position: Point, modifiers: Modifiers) -> bool {
        let Some((k, anchor, offset)) = self.interaction.drag_to(position) else {
            return self.update_hover(position);
        };
        let rect = self.rect();
        let x = self
            .mapper
            .drag(anchor.value.x, offset.x, rect.width(), &self.x_domain, modifiers);
        // Screen y points down.
        let y = self
            .mapper
            .drag(anchor.value.y, -offset.y, rect.height(), &self.y_domain, modifiers);
        if k < self.points.len() {
            self.points.x[k] = self.x_domain.clamp(x);
            self.points.y[k] = self.y_domain.clamp(y);
            self.signals.emit(Signal::ValueChanged);
        }
        true
    }

    fn on_double_click(&mut self, position: Point) -> bool {
        if !self.rect().contains(position) || self.hit_test(position).is_some() {
            return false;
        }
        let (x, y) = self.from_screen(position);
        let index = self.add_point(x, y);
        // Focus the new point.
        self.interaction.set_hovered(Some(index));
        self.signals.emit(Signal::EditEnded);
        true
    }

    fn on_wheel(&mut self, position: Point, delta_y: f64, modifiers: Modifiers) -> bool {
        self.update_hover(position);
        let Some(k) = self.hovered_point() else {
            return false;
        };
        if delta_y == 0.0 || k >= self.points.len() {
            return false;
        }
        let mut diff = self.style.canvas.wheel_diff;
        if modifiers.ctrl {
            diff /= self.style.canvas.wheel_multiplier_fine_tuning;
        }
        let step = if delta_y > 0.0 { diff } else { -diff };
        self.points.z[k] = (self.points.z[k] + step).clamp(0.0, 1.0);
        self.signals.emit(Signal::ValueChanged);
        self.signals.emit(Signal::EditEnded);
        true
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

fn mapper_for(style: &Style) -> PointerMapper<Linear> {
    PointerMapper::new(Linear, &style.slider).with_fine_tuning(style.canvas.ppu_multiplier_fine_tuning)
}

fn ordered_domain(lo: f64, hi: f64) -> Domain {
    let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
    Domain::new(lo, hi, true)
}

fn fraction(v: f64, domain: &Domain) -> f64 {
    let span = domain.vmax - domain.vmin;
    if span > 0.0 { (v - domain.vmin) / span } else { 0.5 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::testing::{count, record};
    use kurbo::Vec2;

    fn press(button: MouseButton, p: Point) -> PointerEvent {
        PointerEvent::Down { position: p, button }
    }

    /// 100 x 100 px over the unit square: 100 px per unit.
    fn canvas() -> PointCanvas {
        let mut c = PointCanvas::new("pts", 0.0, 1.0, 0.0, 1.0);
        c.set_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        c.set_points(&[0.2, 0.5, 0.8], &[0.2, 0.5, 0.8]);
        c
    }

    #[test]
    fn test_screen_mapping() {
        let c = canvas();
        assert_eq!(c.to_screen(0.5, 0.25), Point::new(50.0, 75.0));
        let (x, y) = c.from_screen(Point::new(50.0, 75.0));
        assert!((x - 0.5).abs() < 1e-12 && (y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_right_click_removes_hovered_point() {
        let mut c = canvas();
        let log = record(c.signals_mut());
        let p = c.to_screen(0.5, 0.5);
        c.handle_pointer(&PointerEvent::Move { position: p }, Modifiers::NONE);
        assert_eq!(c.hovered_point(), Some(1));

        let r = c.handle_pointer(&press(MouseButton::Right, p), Modifiers::NONE);
        assert!(r.value_changed && r.edit_ended);
        assert_eq!(c.points().len(), 2);
        assert_eq!(c.hovered_point(), None);
        assert_eq!(c.points_x(), &[0.2, 0.8]);
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_last_point_wins_hit_test() {
        let mut c = canvas();
        c.set_points(&[0.5, 0.52], &[0.5, 0.5]);
        assert_eq!(c.hit_test(Point::new(51.0, 50.0)), Some(1));
        assert_eq!(c.hit_test(Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_drag_point() {
        let mut c = canvas();
        let log = record(c.signals_mut());
        let p = c.to_screen(0.2, 0.2);
        c.handle_pointer(&press(MouseButton::Left, p), Modifiers::NONE);
        let r = c.handle_pointer(
            &PointerEvent::Move {
                position: p + Vec2::new(10.0, -20.0),
            },
            Modifiers::NONE,
        );
        assert!(r.value_changed);
        assert_eq!(r.cursor, CursorHint::Crosshair);
        let (x, y, _) = c.points().get(0).unwrap();
        assert!((x - 0.3).abs() < 1e-12);
        assert!((y - 0.4).abs() < 1e-12);

        // Hover stays on the dragged point even over another one.
        c.handle_pointer(
            &PointerEvent::Move {
                position: c.to_screen(0.5, 0.5),
            },
            Modifiers::NONE,
        );
        assert_eq!(c.hovered_point(), Some(0));

        let r = c.handle_pointer(
            &PointerEvent::Up {
                position: c.to_screen(0.5, 0.5),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        );
        assert!(r.edit_ended);
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_drag_clamps_and_fine_tunes() {
        let mut c = canvas();
        let p = c.to_screen(0.8, 0.8);
        c.handle_pointer(&press(MouseButton::Left, p), Modifiers::NONE);
        c.handle_pointer(
            &PointerEvent::Move {
                position: p + Vec2::new(500.0, -500.0),
            },
            Modifiers::NONE,
        );
        assert_eq!(c.points().get(2), Some((1.0, 1.0, 1.0)));
        c.handle_pointer(
            &PointerEvent::Move {
                position: p + Vec2::new(-50.0, 0.0),
            },
            Modifiers::CTRL,
        );
        let (x, _, _) = c.points().get(2).unwrap();
        assert!((x - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_double_click_adds_point() {
        let mut c = canvas();
        let r = c.handle_pointer(
            &PointerEvent::DoubleClick {
                position: Point::new(30.0, 60.0),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        );
        assert!(r.value_changed && r.edit_ended);
        assert_eq!(c.points().len(), 4);
        assert_eq!(c.hovered_point(), Some(3));
        let (x, y, z) = c.points().get(3).unwrap();
        assert!((x - 0.3).abs() < 1e-12 && (y - 0.4).abs() < 1e-12);
        assert!((z - 1.0).abs() < f64::EPSILON);

        // On an existing point: nothing.
        let r = c.handle_pointer(
            &PointerEvent::DoubleClick {
                position: c.to_screen(0.5, 0.5),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        );
        assert!(!r.consumed);
        assert_eq!(c.points().len(), 4);
    }

    #[test]
    fn test_wheel_changes_z() {
        let mut c = canvas();
        let p = c.to_screen(0.5, 0.5);
        let wheel = |dy: f64| PointerEvent::Scroll {
            position: p,
            delta: Vec2::new(0.0, dy),
        };
        let r = c.handle_pointer(&wheel(-1.0), Modifiers::NONE);
        assert!(r.value_changed && r.edit_ended);
        assert!((c.points_z()[1] - 0.95).abs() < 1e-12);
        c.handle_pointer(&wheel(-1.0), Modifiers::CTRL);
        assert!((c.points_z()[1] - 0.945).abs() < 1e-12);
        for _ in 0..5 {
            c.handle_pointer(&wheel(1.0), Modifiers::NONE);
        }
        assert!((c.points_z()[1] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_setters_clamp() {
        let mut c = canvas();
        assert!(c.set_points_x(&[-1.0, 0.5, 2.0]));
        assert_eq!(c.points_x(), &[0.0, 0.5, 1.0]);
        assert!(c.set_points_z(&[0.5, 1.5, -0.5]));
        assert_eq!(c.points_z(), &[0.5, 1.0, 0.0]);
        assert!(!c.set_points_y(&[0.1]));

        c.set_bounds(0.0, 0.5, 0.0, 0.5);
        assert_eq!(c.points_x(), &[0.0, 0.5, 0.5]);
        assert_eq!(c.points_y(), &[0.2, 0.5, 0.5]);
    }

    #[test]
    fn test_value_text() {
        let mut c = canvas();
        assert_eq!(c.value_text(0).as_deref(), Some("(0.20, 0.20)"));
        c.set_draw_z_value(true);
        assert_eq!(c.value_text(0).as_deref(), Some("(0.20, 0.20, 1.00)"));
        assert_eq!(c.value_text(9), None);
    }

    #[test]
    fn test_focus_lost_ends_drag() {
        let mut c = canvas();
        let p = c.to_screen(0.2, 0.2);
        c.handle_pointer(&press(MouseButton::Left, p), Modifiers::NONE);
        assert!(c.focus_lost().edit_ended);
        assert!(!c.is_dragging());
    }
}
