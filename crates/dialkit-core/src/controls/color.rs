//! Color swatch and multi-stop gradient editor.
//!
//! Both hand color selection to a [`ModalPicker`] supplied by the host for the
//! duration of the event.

use std::rc::Rc;

use kurbo::{Point, Rect};
use peniko::Color;

use crate::input::{MouseButton, PointerEvent};
use crate::interaction::Interaction;
use crate::picker::ModalPicker;
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::truncate_label;

/// Margin between the widget edge and the gradient bar.
const BAR_MARGIN: f64 = 10.0;
/// Room under the bar for the stop markers.
const BAR_BOTTOM: f64 = 20.0;
/// Side of a stop marker.
const STOP_SIZE: f64 = 10.0;
/// Gap between the bar and the markers.
const STOP_OFFSET: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchRegion {
    Swatch,
}

/// Single color swatch. A left click opens the picker.
#[derive(Debug)]
pub struct ColorPicker {
    label: String,
    color: Color,
    interaction: Interaction<SwatchRegion, ()>,
    style: Rc<Style>,
    signals: Signals,
}

impl ColorPicker {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        log::trace!("Color picker '{}' created", label);
        Self {
            label,
            color: Color::from_rgb8(160, 160, 164),
            interaction: Interaction::new(),
            style: Rc::new(Style::default()),
            signals: Signals::new(),
        }
    }

    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
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

    pub fn color(&self) -> Color {
        self.color
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
        self.interaction.regions_mut().set(SwatchRegion::Swatch, rect);
    }

    /// Returns whether the color changed. A change fires both signals.
    pub fn set_color(&mut self, color: Color) -> bool {
        if color == self.color {
            return false;
        }
        self.color = color;
        self.signals.emit(Signal::ValueChanged);
        self.signals.emit(Signal::EditEnded);
        true
    }

    /// Ask the picker for a new color. Cancelling changes nothing.
    pub fn pick(&mut self, picker: &mut dyn ModalPicker<Color>) -> bool {
        match picker.pick(&self.color).confirmed() {
            Some(color) => self.set_color(color),
            None => false,
        }
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent, picker: &mut dyn ModalPicker<Color>) -> Response {
        self.signals.begin();
        let consumed = match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } if self.rect().contains(position) => {
                self.pick(picker);
                true
            }
            PointerEvent::Move { position } => {
                self.interaction.hover(position);
                false
            }
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let cursor = if self.interaction.is_hovered() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        };
        self.signals.finish(consumed).with_cursor(cursor)
    }
}

/// Color at a position along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self {
            position: if position.is_nan() { 0.0 } else { position.clamp(0.0, 1.0) },
            color,
        }
    }
}

/// Built-in gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Grayscale,
    Magma,
    Viridis,
    Terrain,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Self::Grayscale, Self::Magma, Self::Viridis, Self::Terrain];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "Grayscale",
            Self::Magma => "Magma",
            Self::Viridis => "Viridis",
            Self::Terrain => "Terrain",
        }
    }

    pub fn stops(&self) -> Vec<ColorStop> {
        let table: &[(f64, u8, u8, u8)] = match self {
            Self::Grayscale => {
                return vec![ColorStop::new(0.0, Color::BLACK), ColorStop::new(1.0, Color::WHITE)];
            }
            Self::Magma => &MAGMA,
            Self::Viridis => &VIRIDIS,
            Self::Terrain => &TERRAIN,
        };
        table
            .iter()
            .map(|&(position, r, g, b)| ColorStop::new(position, Color::from_rgb8(r, g, b)))
            .collect()
    }
}

const MAGMA: [(f64, u8, u8, u8); 5] = [
    (0.0, 0, 0, 4),
    (0.25, 81, 18, 124),
    (0.5, 183, 55, 121),
    (0.75, 252, 137, 97),
    (1.0, 252, 253, 191),
];

const VIRIDIS: [(f64, u8, u8, u8); 5] = [
    (0.0, 68, 1, 84),
    (0.25, 59, 82, 139),
    (0.5, 33, 145, 140),
    (0.75, 94, 201, 98),
    (1.0, 253, 231, 37),
];

const TERRAIN: [(f64, u8, u8, u8); 5] = [
    (0.0, 51, 51, 153),
    (0.15, 0, 153, 255),
    (0.25, 0, 204, 102),
    (0.5, 255, 255, 153),
    (1.0, 255, 255, 255),
];

/// Gradient bar with draggable stops underneath.
#[derive(Debug)]
pub struct GradientEditor {
    label: String,
    /// Sorted by position, never fewer than two.
    stops: Vec<ColorStop>,
    selected: Option<usize>,
    /// Regions are stop indices, captured while a stop is dragged.
    interaction: Interaction<usize, f64>,
    style: Rc<Style>,
    signals: Signals,
}

impl GradientEditor {
    /// Black to white.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        log::trace!("Gradient editor '{}' created", label);
        Self {
            label,
            stops: Preset::Grayscale.stops(),
            selected: None,
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

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn selected_stop(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_captured()
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

    pub fn bar_rect(&self) -> Rect {
        let r = self.rect();
        Rect::new(r.x0 + BAR_MARGIN, r.y0 + BAR_MARGIN, r.x1 - BAR_MARGIN, r.y1 - BAR_BOTTOM)
    }

    /// Marker square under the bar.
    pub fn stop_rect(&self, stop: &ColorStop) -> Rect {
        let bar = self.bar_rect();
        let x = bar.x0 + stop.position * bar.width();
        let y = bar.y1 + STOP_OFFSET;
        let half = 0.5 * STOP_SIZE;
        Rect::new(x - half, y, x + half, y + STOP_SIZE)
    }

    /// First stop whose marker contains `position`.
    pub fn stop_at(&self, position: Point) -> Option<usize> {
        self.stops
            .iter()
            .position(|s| self.stop_rect(s).contains(position))
    }

    /// Replace every stop. Fewer than two stops are rejected.
    pub fn set_stops(&mut self, stops: impl IntoIterator<Item = ColorStop>) -> bool {
        let mut stops: Vec<ColorStop> = stops.into_iter().map(|s| ColorStop::new(s.position, s.color)).collect();
        if stops.len() < 2 {
            log::warn!(
                "Gradient editor '{}': needs at least 2 stops, got {}",
                self.label,
                stops.len()
            );
            return false;
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        self.stops = stops;
        self.selected = None;
        self.signals.emit(Signal::ValueChanged);
        true
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        log::debug!("Gradient editor '{}': preset {}", self.label, preset.name());
        self.set_stops(preset.stops());
        self.signals.emit(Signal::EditEnded);
    }

    /// Linear blend between the surrounding stops. Outside the stops the end
    /// colors hold.
    pub fn sample(&self, t: f64) -> Color {
        sample_stops(&self.stops, t)
    }

    /// Insert a stop keeping the order. Returns its index.
    fn place(&mut self, stop: ColorStop) -> usize {
        let index = self.stops.partition_point(|s| s.position <= stop.position);
        self.stops.insert(index, stop);
        index
    }

    /// New white stop at a unit position. Returns its index.
    pub fn insert_stop(&mut self, position: f64) -> usize {
        let index = self.place(ColorStop::new(position, Color::WHITE));
        self.selected = Some(index);
        self.signals.emit(Signal::ValueChanged);
        index
    }

    /// Refuses when only two stops remain.
    pub fn remove_stop(&mut self, index: usize) -> Option<ColorStop> {
        if self.stops.len() <= 2 || index >= self.stops.len() {
            return None;
        }
        let removed = self.stops.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        self.signals.emit(Signal::ValueChanged);
        Some(removed)
    }

    /// Move a stop and return its new index.
    pub fn move_stop(&mut self, index: usize, position: f64) -> Option<usize> {
        if index >= self.stops.len() {
            return None;
        }
        let mut stop = self.stops.remove(index);
        stop.position = ColorStop::new(position, stop.color).position;
        let new_index = self.place(stop);
        if self.selected == Some(index) {
            self.selected = Some(new_index);
        }
        self.signals.emit(Signal::ValueChanged);
        Some(new_index)
    }

    pub fn set_stop_color(&mut self, index: usize, color: Color) -> bool {
        match self.stops.get_mut(index) {
            Some(stop) if stop.color != color => {
                stop.color = color;
                self.signals.emit(Signal::ValueChanged);
                true
            }
            _ => false,
        }
    }

    fn bar_fraction(&self, x: f64) -> f64 {
        let bar = self.bar_rect();
        if bar.width() > 0.0 {
            ((x - bar.x0) / bar.width()).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// `picker` serves double-clicks on a stop.
    pub fn handle_pointer(&mut self, event: &PointerEvent, picker: &mut dyn ModalPicker<Color>) -> Response {
        self.signals.begin();
        let mut menu_requested = false;
        let consumed = match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => match self.stop_at(position) {
                Some(index) => {
                    self.selected = Some(index);
                    self.interaction.press(index, None);
                    true
                }
                None => false,
            },
            PointerEvent::Down {
                position,
                button: MouseButton::Right,
            } => match self.stop_at(position) {
                Some(index) => {
                    if self.remove_stop(index).is_some() {
                        self.signals.emit(Signal::EditEnded);
                    }
                    true
                }
                None => {
                    // Presets.
                    menu_requested = self.rect().contains(position);
                    menu_requested
                }
            },
            PointerEvent::Move { position } => {
                let grabbed = self
                    .interaction
                    .is_captured()
                    .then(|| self.interaction.hovered())
                    .flatten();
                match grabbed {
                    Some(index) => {
                        let fraction = self.bar_fraction(position.x);
                        if let Some(new_index) = self.move_stop(index, fraction) {
                            self.interaction.retarget(new_index);
                        }
                        true
                    }
                    None => {
                        self.interaction.hover(position);
                        false
                    }
                }
            }
            PointerEvent::Up { position, .. } => match self.interaction.release(Some(position)) {
                Some(_) => {
                    self.signals.emit(Signal::EditEnded);
                    true
                }
                None => false,
            },
            PointerEvent::DoubleClick {
                position,
                button: MouseButton::Left,
            } => self.on_double_click(position, picker),
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let cursor = if self.interaction.is_captured() {
            CursorHint::ResizeHorizontal
        } else {
            CursorHint::Default
        };
        let mut response = self.signals.finish(consumed).with_cursor(cursor);
        response.menu_requested = menu_requested;
        response
    }

    fn on_double_click(&mut self, position: Point, picker: &mut dyn ModalPicker<Color>) -> bool {
        // The first click of the pair may have grabbed the stop.
        self.interaction.release(None);
        if let Some(index) = self.stop_at(position) {
            self.selected = Some(index);
            let current = self.stops[index].color;
            if let Some(color) = picker.pick(&current).confirmed() {
                if self.set_stop_color(index, color) {
                    self.signals.emit(Signal::EditEnded);
                }
            }
            return true;
        }
        if !self.bar_rect().contains(position) {
            return false;
        }
        self.insert_stop(self.bar_fraction(position.x));
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

/// Blend over sorted stops.
pub fn sample_stops(stops: &[ColorStop], t: f64) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::TRANSPARENT;
    };
    if t <= first.position {
        return first.color;
    }
    if t >= last.position {
        return last.color;
    }
    let upper = stops.partition_point(|s| s.position <= t).min(stops.len() - 1);
    let (a, b) = (stops[upper - 1], stops[upper]);
    let span = b.position - a.position;
    let u = if span > 0.0 { ((t - a.position) / span) as f32 } else { 0.0 };
    let (ca, cb) = (a.color.components, b.color.components);
    Color::new(std::array::from_fn(|i| ca[i] + u * (cb[i] - ca[i])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::PickResult;
    use crate::signals::testing::{count, record};

    fn red() -> Color {
        Color::from_rgb8(255, 0, 0)
    }

    fn approx(a: Color, b: Color) -> bool {
        a.components
            .iter()
            .zip(b.components.iter())
            .all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_color_pick_confirm_and_cancel() {
        let mut c = ColorPicker::new("tint");
        let log = record(c.signals_mut());
        let mut cancel = |_: &Color| PickResult::Cancelled;
        assert!(!c.pick(&mut cancel));
        assert!(log.borrow().is_empty());

        let mut choose = |_: &Color| PickResult::Confirmed(red());
        assert!(c.pick(&mut choose));
        assert_eq!(c.color(), red());
        assert_eq!(count(&log, Signal::ValueChanged), 1);
        assert_eq!(count(&log, Signal::EditEnded), 1);

        // Same color again: no change.
        assert!(!c.pick(&mut choose));
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_color_click_opens_picker() {
        let mut c = ColorPicker::new("tint");
        c.set_rect(Rect::new(0.0, 0.0, 100.0, 24.0));
        let mut asked = 0;
        let mut picker = |current: &Color| {
            asked += 1;
            PickResult::Confirmed(current.with_alpha(0.5))
        };
        let r = c.handle_pointer(
            &PointerEvent::Down {
                position: Point::new(10.0, 10.0),
                button: MouseButton::Left,
            },
            &mut picker,
        );
        assert!(r.consumed && r.value_changed && r.edit_ended);
        let r = c.handle_pointer(
            &PointerEvent::Down {
                position: Point::new(200.0, 10.0),
                button: MouseButton::Left,
            },
            &mut picker,
        );
        assert!(!r.consumed);
        assert_eq!(asked, 1);
    }

    /// Bar from (10, 10) to (110, 30), markers at y 35 to 45.
    fn gradient() -> GradientEditor {
        let mut g = GradientEditor::new("ramp");
        g.set_rect(Rect::new(0.0, 0.0, 120.0, 50.0));
        g
    }

    fn never(_: &Color) -> PickResult<Color> {
        PickResult::Cancelled
    }

    #[test]
    fn test_sample_blends() {
        let g = gradient();
        assert!(approx(g.sample(0.0), Color::BLACK));
        assert!(approx(g.sample(1.0), Color::WHITE));
        assert!(approx(g.sample(0.5), Color::new([0.5, 0.5, 0.5, 1.0])));
        assert!(approx(g.sample(-3.0), Color::BLACK));
    }

    #[test]
    fn test_double_click_inserts_white_stop() {
        let mut g = gradient();
        g.set_stops([ColorStop::new(0.0, Color::BLACK), ColorStop::new(1.0, Color::BLACK)]);
        let log = record(g.signals_mut());
        let r = g.handle_pointer(
            &PointerEvent::DoubleClick {
                position: Point::new(35.0, 20.0),
                button: MouseButton::Left,
            },
            &mut never,
        );
        assert!(r.value_changed && r.edit_ended);
        assert_eq!(g.stops().len(), 3);
        assert_eq!(g.selected_stop(), Some(1));
        assert!((g.stops()[1].position - 0.25).abs() < 1e-12);
        assert_eq!(g.stops()[1].color, Color::WHITE);
        assert_eq!(count(&log, Signal::EditEnded), 1);
    }

    #[test]
    fn test_double_click_on_stop_picks_color() {
        let mut g = gradient();
        let mut choose = |_: &Color| PickResult::Confirmed(red());
        let r = g.handle_pointer(
            &PointerEvent::DoubleClick {
                position: Point::new(110.0, 40.0),
                button: MouseButton::Left,
            },
            &mut choose,
        );
        assert!(r.edit_ended);
        assert_eq!(g.stops()[1].color, red());

        let r = g.handle_pointer(
            &PointerEvent::DoubleClick {
                position: Point::new(10.0, 40.0),
                button: MouseButton::Left,
            },
            &mut never,
        );
        assert!(r.consumed && !r.edit_ended);
        assert_eq!(g.stops()[0].color, Color::BLACK);
    }

    #[test]
    fn test_drag_resorts_and_follows_stop() {
        let mut g = gradient();
        g.set_stops([
            ColorStop::new(0.0, Color::BLACK),
            ColorStop::new(0.5, red()),
            ColorStop::new(1.0, Color::WHITE),
        ]);
        g.handle_pointer(
            &PointerEvent::Down {
                position: Point::new(10.0, 40.0),
                button: MouseButton::Left,
            },
            &mut never,
        );
        // Drag the black stop past the red one.
        g.handle_pointer(
            &PointerEvent::Move {
                position: Point::new(80.0, 40.0),
            },
            &mut never,
        );
        assert_eq!(g.stops()[0].color, red());
        assert_eq!(g.stops()[1].color, Color::BLACK);
        assert_eq!(g.selected_stop(), Some(1));

        // Clamped at the right end.
        g.handle_pointer(
            &PointerEvent::Move {
                position: Point::new(500.0, 40.0),
            },
            &mut never,
        );
        assert_eq!(g.stops()[2].color, Color::BLACK);
        assert!((g.stops()[2].position - 1.0).abs() < f64::EPSILON);

        let r = g.handle_pointer(
            &PointerEvent::Up {
                position: Point::new(500.0, 40.0),
                button: MouseButton::Left,
            },
            &mut never,
        );
        assert!(r.edit_ended);
        assert!(!g.is_dragging());
    }

    #[test]
    fn test_keeps_two_stops() {
        let mut g = gradient();
        let right = |p: Point| PointerEvent::Down {
            position: p,
            button: MouseButton::Right,
        };
        let r = g.handle_pointer(&right(Point::new(10.0, 40.0)), &mut never);
        assert!(r.consumed && !r.value_changed);
        assert_eq!(g.stops().len(), 2);
        assert!(!g.set_stops([ColorStop::new(0.5, red())]));

        g.insert_stop(0.5);
        let r = g.handle_pointer(&right(Point::new(60.0, 40.0)), &mut never);
        assert!(r.edit_ended);
        assert_eq!(g.stops().len(), 2);

        let r = g.handle_pointer(&right(Point::new(60.0, 20.0)), &mut never);
        assert!(r.menu_requested);
    }

    #[test]
    fn test_presets_replace_stops() {
        let mut g = gradient();
        for preset in Preset::ALL {
            g.apply_preset(preset);
            assert!(g.stops().len() >= 2);
            assert!(g.stops().windows(2).all(|w| w[0].position <= w[1].position));
            assert_eq!(g.stops(), preset.stops().as_slice());
        }
        g.apply_preset(Preset::Viridis);
        assert!(approx(g.sample(0.0), Color::from_rgb8(68, 1, 84)));
    }
}
