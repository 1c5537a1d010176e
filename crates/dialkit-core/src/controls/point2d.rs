//! Single draggable point inside a 2D box.

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::input::{MouseButton, PointerEvent};
use crate::interaction::{DragAnchor, Interaction};
use crate::mapping::Domain;
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::truncate_label;

/// Extra grab tolerance around the drawn point, in pixels.
const GRAB_MARGIN: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Point2DRegion {
    Point,
}

#[derive(Debug)]
pub struct Point2DSelector {
    label: String,
    x_domain: Domain,
    y_domain: Domain,
    value: Point,
    interaction: Interaction<Point2DRegion, Point>,
    style: Rc<Style>,
    show_value: bool,
    signals: Signals,
}

impl Point2DSelector {
    /// Starts at the center of the bounds.
    pub fn new(label: impl Into<String>, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        let label = label.into();
        let x_domain = ordered(xmin, xmax);
        let y_domain = ordered(ymin, ymax);
        log::trace!("Point selector '{}' created", label);
        Self {
            label,
            value: Point::new(
                0.5 * (x_domain.vmin + x_domain.vmax),
                0.5 * (y_domain.vmin + y_domain.vmax),
            ),
            x_domain,
            y_domain,
            interaction: Interaction::new(),
            style: Rc::new(Style::default()),
            show_value: true,
            signals: Signals::new(),
        }
    }

    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self.relayout();
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

    pub fn value(&self) -> Point {
        self.value
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.x_domain.vmin,
            self.x_domain.vmax,
            self.y_domain.vmin,
            self.y_domain.vmax,
        )
    }

    /// Clamped into the bounds. Returns whether the point moved.
    pub fn set_value(&mut self, value: Point) -> bool {
        if value.x.is_nan() || value.y.is_nan() {
            return false;
        }
        let clamped = Point::new(self.x_domain.clamp(value.x), self.y_domain.clamp(value.y));
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        self.relayout();
        self.signals.emit(Signal::ValueChanged);
        true
    }

    pub fn value_text(&self) -> String {
        format!("({:.3}, {:.3})", self.value.x, self.value.y)
    }

    pub fn show_value(&self) -> bool {
        self.show_value
    }

    /// Painter hint: print the coordinates under the box.
    pub fn set_show_value(&mut self, show: bool) {
        self.show_value = show;
    }

    pub fn is_point_hovered(&self) -> bool {
        self.interaction.hovered() == Some(Point2DRegion::Point)
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
        self.relayout();
    }

    pub fn area(&self) -> Rect {
        self.rect().inset(-self.style.global.padding)
    }

    /// Screen position of the zero axes, when zero lies strictly inside the bounds.
    pub fn zero_axes(&self) -> (Option<f64>, Option<f64>) {
        let a = self.area();
        let x = (self.x_domain.vmin < 0.0 && self.x_domain.vmax > 0.0)
            .then(|| a.x0 + fraction(0.0, &self.x_domain) * a.width());
        let y = (self.y_domain.vmin < 0.0 && self.y_domain.vmax > 0.0)
            .then(|| a.y1 - fraction(0.0, &self.y_domain) * a.height());
        (x, y)
    }

    pub fn to_screen(&self, value: Point) -> Point {
        let a = self.area();
        Point::new(
            a.x0 + fraction(value.x, &self.x_domain) * a.width(),
            a.y1 - fraction(value.y, &self.y_domain) * a.height(),
        )
    }

    pub fn from_screen(&self, position: Point) -> Point {
        let a = self.area();
        let nx = if a.width() > 0.0 { (position.x - a.x0) / a.width() } else { 0.5 };
        let ny = if a.height() > 0.0 {
            1.0 - (position.y - a.y0) / a.height()
        } else {
            0.5
        };
        Point::new(
            self.x_domain.vmin + nx * (self.x_domain.vmax - self.x_domain.vmin),
            self.y_domain.vmin + ny * (self.y_domain.vmax - self.y_domain.vmin),
        )
    }

    /// Hover square around the point.
    fn relayout(&mut self) {
        let r = self.style.canvas.point_radius;
        let center = self.to_screen(self.value);
        self.interaction.regions_mut().set(
            Point2DRegion::Point,
            Rect::new(center.x - r, center.y - r, center.x + r, center.y + r),
        );
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Response {
        self.signals.begin();
        let consumed = match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                let grab = self.style.canvas.point_radius + GRAB_MARGIN;
                if position.distance(self.to_screen(self.value)) < grab {
                    let anchor = DragAnchor {
                        value: self.value,
                        pointer: position,
                    };
                    self.interaction.press(Point2DRegion::Point, Some(anchor));
                    true
                } else {
                    false
                }
            }
            PointerEvent::Move { position } => {
                if self.interaction.drag_to(position).is_some() {
                    let a = self.area();
                    let clamped = Point::new(position.x.clamp(a.x0, a.x1), position.y.clamp(a.y0, a.y1));
                    self.set_value(self.from_screen(clamped));
                    true
                } else {
                    self.interaction.hover(position);
                    false
                }
            }
            PointerEvent::Up { position, .. } => match self.interaction.release(Some(position)) {
                Some(release) => {
                    if release.dragged {
                        self.signals.emit(Signal::EditEnded);
                    }
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
        let release = self.interaction.focus_lost();
        if release.as_ref().is_some_and(|r| r.dragged) {
            self.signals.emit(Signal::EditEnded);
        }
        self.signals.finish(release.is_some())
    }
}

fn ordered(lo: f64, hi: f64) -> Domain {
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

    /// Box (-1, 1)² over the area (4, 4) to (104, 104).
    fn selector() -> Point2DSelector {
        let mut s = Point2DSelector::new("xy", -1.0, 1.0, -1.0, 1.0);
        s.set_rect(Rect::new(0.0, 0.0, 108.0, 108.0));
        s
    }

    fn down(position: Point) -> PointerEvent {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_starts_centered() {
        let s = Point2DSelector::new("xy", 2.0, 0.0, 0.0, 10.0);
        assert_eq!(s.value(), Point::new(1.0, 5.0));
        assert_eq!(s.bounds(), (0.0, 2.0, 0.0, 10.0));
        assert_eq!(s.value_text(), "(1.000, 5.000)");
    }

    #[test]
    fn test_mapping_and_axes() {
        let s = selector();
        assert_eq!(s.to_screen(Point::new(0.0, 0.0)), Point::new(54.0, 54.0));
        assert_eq!(s.to_screen(Point::new(1.0, 1.0)), Point::new(104.0, 4.0));
        let v = s.from_screen(Point::new(79.0, 79.0));
        assert!((v.x - 0.5).abs() < 1e-12 && (v.y + 0.5).abs() < 1e-12);
        assert_eq!(s.zero_axes(), (Some(54.0), Some(54.0)));

        let positive = Point2DSelector::new("xy", 0.0, 1.0, 0.0, 1.0);
        assert_eq!(positive.zero_axes(), (None, None));
    }

    #[test]
    fn test_grab_tolerance() {
        let mut s = selector();
        // 9 px away: inside point_radius + 3.
        assert!(s.handle_pointer(&down(Point::new(63.0, 54.0))).consumed);
        s.focus_lost();
        assert!(!s.handle_pointer(&down(Point::new(65.0, 54.0))).consumed);
    }

    #[test]
    fn test_drag_clamps_to_area() {
        let mut s = selector();
        let log = record(s.signals_mut());
        s.handle_pointer(&down(Point::new(54.0, 54.0)));
        let r = s.handle_pointer(&PointerEvent::Move {
            position: Point::new(79.0, 29.0),
        });
        assert!(r.value_changed);
        let v = s.value();
        assert!((v.x - 0.5).abs() < 1e-12 && (v.y - 0.5).abs() < 1e-12);

        s.handle_pointer(&PointerEvent::Move {
            position: Point::new(500.0, 500.0),
        });
        assert_eq!(s.value(), Point::new(1.0, -1.0));
        assert!(s.is_point_hovered());

        let r = s.handle_pointer(&PointerEvent::Up {
            position: Point::new(500.0, 500.0),
            button: MouseButton::Left,
        });
        assert!(r.edit_ended);
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_click_without_drag_is_silent() {
        let mut s = selector();
        s.handle_pointer(&down(Point::new(54.0, 54.0)));
        let r = s.handle_pointer(&PointerEvent::Up {
            position: Point::new(54.0, 54.0),
            button: MouseButton::Left,
        });
        assert!(r.consumed && !r.edit_ended);
    }

    #[test]
    fn test_set_value_clamps() {
        let mut s = selector();
        assert!(s.set_value(Point::new(3.0, -0.25)));
        assert_eq!(s.value(), Point::new(1.0, -0.25));
        assert!(!s.set_value(Point::new(3.0, -0.25)));
        assert!(!s.set_value(Point::new(f64::NAN, 0.0)));
    }

    #[test]
    fn test_hover_follows_point() {
        let mut s = selector();
        s.handle_pointer(&PointerEvent::Move {
            position: Point::new(56.0, 52.0),
        });
        assert!(s.is_point_hovered());
        s.set_value(Point::new(1.0, 1.0));
        s.handle_pointer(&PointerEvent::Move {
            position: Point::new(56.0, 52.0),
        });
        assert!(!s.is_point_hovered());
    }
}
