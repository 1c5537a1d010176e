//! Hover/press/drag/release state machine shared by the controls.
//!
//! Each control owns an [`Interaction`] parameterized by its own region type
//! (bar, buttons, handles...) and by the value type it snapshots when a drag
//! starts. The state machine only tracks *where* the pointer is and *what* was
//! grabbed. Value arithmetic stays in the control.
//!
//! Text editing is orthogonal: a control may have an open inline editor
//! whatever its pointer phase is.

mod regions;
mod state;

pub use regions::HitRegions;
pub use state::{DragAnchor, Phase, Release, TextEdit};

use kurbo::{Point, Rect, Vec2};

/// Pointer state of one control.
#[derive(Debug, Clone)]
pub struct Interaction<R, V> {
    regions: HitRegions<R>,
    phase: Phase<R>,
    anchor: Option<DragAnchor<V>>,
    text_edit: Option<TextEdit>,
}

impl<R: Copy + PartialEq, V: Copy> Default for Interaction<R, V> {
    fn default() -> Self {
        Self {
            regions: HitRegions::default(),
            phase: Phase::Idle,
            anchor: None,
            text_edit: None,
        }
    }
}

impl<R: Copy + PartialEq, V: Copy> Interaction<R, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &HitRegions<R> {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut HitRegions<R> {
        &mut self.regions
    }

    pub fn bounds(&self) -> Rect {
        self.regions.bounds()
    }

    pub fn phase(&self) -> Phase<R> {
        self.phase
    }

    /// Region under the pointer, or the grabbed region while captured.
    pub fn hovered(&self) -> Option<R> {
        self.phase.region()
    }

    /// Pointer is over the widget (or captured by it).
    pub fn is_hovered(&self) -> bool {
        !self.phase.is_idle()
    }

    pub fn is_captured(&self) -> bool {
        self.phase.is_captured()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn anchor(&self) -> Option<&DragAnchor<V>> {
        self.anchor.as_ref()
    }

    /// Recompute hover from a pointer position. Frozen while captured.
    pub fn hover(&mut self, position: Point) -> Option<R> {
        if self.is_captured() {
            return self.hovered();
        }
        self.phase = if self.regions.contains(position) {
            Phase::Hovered(self.regions.hit(position))
        } else {
            Phase::Idle
        };
        self.hovered()
    }

    /// Clear every hover flag. A captured pointer stays captured.
    pub fn leave(&mut self) {
        if !self.is_captured() {
            self.phase = Phase::Idle;
        }
    }

    /// Force hover to a region, e.g. to focus a freshly added point.
    pub fn set_hovered(&mut self, region: Option<R>) {
        if !self.is_captured() {
            self.phase = Phase::Hovered(region);
        }
    }

    /// Capture the pointer on `region`. An anchor makes the press draggable.
    pub fn press(&mut self, region: R, anchor: Option<DragAnchor<V>>) {
        self.phase = Phase::Pressed(region);
        self.anchor = anchor;
    }

    /// Pointer moved while captured. Returns the grabbed region, the baseline and
    /// the total pointer offset from it.
    pub fn drag_to(&mut self, position: Point) -> Option<(R, DragAnchor<V>, Vec2)> {
        let region = match self.phase {
            Phase::Pressed(r) | Phase::Dragging(r) => r,
            _ => return None,
        };
        let anchor = self.anchor?;
        self.phase = Phase::Dragging(region);
        Some((region, anchor, position - anchor.pointer))
    }

    /// Keep the capture but point it at another region, e.g. after the grabbed
    /// item moved to a new index.
    pub fn retarget(&mut self, region: R) {
        self.phase = match self.phase {
            Phase::Pressed(_) => Phase::Pressed(region),
            Phase::Dragging(_) => Phase::Dragging(region),
            other => other,
        };
    }

    /// End a capture. Hover is re-derived from `position` when given.
    pub fn release(&mut self, position: Option<Point>) -> Option<Release<R, V>> {
        let (region, dragged) = match self.phase {
            Phase::Pressed(r) => (r, false),
            Phase::Dragging(r) => (r, true),
            _ => return None,
        };
        let anchor = self.anchor.take();
        self.phase = Phase::Idle;
        if let Some(position) = position {
            self.hover(position);
        }
        Some(Release {
            region,
            anchor,
            dragged,
        })
    }

    /// Window or keyboard focus went away: implicit release, editor closed.
    pub fn focus_lost(&mut self) -> Option<Release<R, V>> {
        self.text_edit = None;
        let release = self.release(None);
        self.phase = Phase::Idle;
        release
    }

    pub fn begin_text_edit(&mut self, text: impl Into<String>) {
        self.text_edit = Some(TextEdit::new(text));
    }

    pub fn is_text_editing(&self) -> bool {
        self.text_edit.is_some()
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEdit> {
        self.text_edit.as_mut()
    }

    /// Close the editor and hand back its text.
    pub fn end_text_edit(&mut self) -> Option<String> {
        self.text_edit.take().map(TextEdit::into_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Part {
        Bar,
        Button,
    }

    fn machine() -> Interaction<Part, f64> {
        let mut m = Interaction::new();
        m.regions_mut().reset(Rect::new(0.0, 0.0, 100.0, 20.0));
        m.regions_mut().set(Part::Button, Rect::new(80.0, 0.0, 100.0, 20.0));
        m.regions_mut().set(Part::Bar, Rect::new(0.0, 0.0, 80.0, 20.0));
        m
    }

    #[test]
    fn test_hover_transitions() {
        let mut m = machine();
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.hover(Point::new(10.0, 10.0)), Some(Part::Bar));
        assert_eq!(m.hover(Point::new(90.0, 10.0)), Some(Part::Button));
        assert!(m.is_hovered());
        m.leave();
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.hover(Point::new(200.0, 10.0)), None);
        assert!(!m.is_hovered());
    }

    #[test]
    fn test_drag_uses_baseline() {
        let mut m = machine();
        m.hover(Point::new(10.0, 10.0));
        m.press(
            Part::Bar,
            Some(DragAnchor {
                value: 5.0,
                pointer: Point::new(10.0, 10.0),
            }),
        );
        assert!(m.is_captured());
        assert!(!m.is_dragging());

        let (_, anchor, delta) = m.drag_to(Point::new(30.0, 10.0)).unwrap();
        assert!((anchor.value - 5.0).abs() < f64::EPSILON);
        assert!((delta.x - 20.0).abs() < f64::EPSILON);
        assert!(m.is_dragging());

        // Offsets stay relative to the press, not the previous move.
        let (_, _, delta) = m.drag_to(Point::new(35.0, 10.0)).unwrap();
        assert!((delta.x - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hover_frozen_while_captured() {
        let mut m = machine();
        m.press(
            Part::Bar,
            Some(DragAnchor {
                value: 0.0,
                pointer: Point::ZERO,
            }),
        );
        assert_eq!(m.hover(Point::new(90.0, 10.0)), Some(Part::Bar));
        m.leave();
        assert!(m.is_captured());
    }

    #[test]
    fn test_release_rederives_hover() {
        let mut m = machine();
        m.press(Part::Button, None);
        assert!(m.drag_to(Point::new(10.0, 10.0)).is_none());
        let release = m.release(Some(Point::new(10.0, 10.0))).unwrap();
        assert_eq!(release.region, Part::Button);
        assert!(!release.dragged);
        assert_eq!(m.hovered(), Some(Part::Bar));
        assert!(m.release(None).is_none());
    }

    #[test]
    fn test_focus_lost_is_implicit_release() {
        let mut m = machine();
        m.begin_text_edit("1.5");
        m.press(
            Part::Bar,
            Some(DragAnchor {
                value: 1.0,
                pointer: Point::ZERO,
            }),
        );
        m.drag_to(Point::new(4.0, 0.0));
        let release = m.focus_lost().unwrap();
        assert!(release.dragged);
        assert!(!m.is_captured());
        assert!(!m.is_text_editing());
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn test_text_edit_lifecycle() {
        let mut m = machine();
        m.begin_text_edit("2");
        m.text_edit_mut().unwrap().set_text("3.25");
        assert_eq!(m.text_edit().unwrap().text(), "3.25");
        assert_eq!(m.end_text_edit().as_deref(), Some("3.25"));
        assert!(m.end_text_edit().is_none());
    }
}
