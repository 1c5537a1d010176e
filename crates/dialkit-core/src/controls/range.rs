//! Two-handle range slider with an optional histogram overlay.

use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::interaction::{DragAnchor, Interaction, Release};
use crate::mapping::{Domain, Linear, PointerMapper};
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::spline::{HistogramBins, autorange_bounds, density_profile};
use crate::style::Style;
use crate::value::{DEFAULT_PRECISION, RangeHandle, RangeOrdering, RangeValue, truncate_label};

/// Hit regions of a range slider, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeRegion {
    Lower,
    Upper,
    OnOff,
    Reset,
    ResetUnit,
    Autorange,
    /// Span between the handles. Hover only.
    Range,
}

impl RangeRegion {
    fn handle(self) -> Option<RangeHandle> {
        match self {
            Self::Lower => Some(RangeHandle::Lower),
            Self::Upper => Some(RangeHandle::Upper),
            _ => None,
        }
    }
}

/// Supplies histogram bins on demand.
pub type HistogramFn = Box<dyn FnMut() -> HistogramBins>;

/// Buttons along the top row, right to left.
const BUTTONS: [RangeRegion; 4] = [
    RangeRegion::OnOff,
    RangeRegion::Reset,
    RangeRegion::Autorange,
    RangeRegion::ResetUnit,
];

pub struct RangeSlider {
    label: String,
    value: RangeValue,
    mapper: PointerMapper<Linear>,
    interaction: Interaction<RangeRegion, f64>,
    style: Rc<Style>,
    enabled: bool,
    autorange: bool,
    bins: HistogramBins,
    histogram_fn: Option<HistogramFn>,
    precision: usize,
    signals: Signals,
}

impl fmt::Debug for RangeSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSlider")
            .field("label", &self.label)
            .field("value", &self.value)
            .field("enabled", &self.enabled)
            .field("autorange", &self.autorange)
            .field("bins", &self.bins.len())
            .field("has_histogram_fn", &self.histogram_fn.is_some())
            .finish()
    }
}

impl RangeSlider {
    pub fn new(label: impl Into<String>, value0: f64, value1: f64, vmin: f64, vmax: f64) -> Self {
        let label = label.into();
        let style = Rc::new(Style::default());
        let value = RangeValue::new(value0, value1, vmin, vmax);
        log::trace!(
            "Range slider '{}' created: [{}, {}] in [{}, {}]",
            label,
            value.value0(),
            value.value1(),
            value.vmin(),
            value.vmax()
        );
        Self {
            label,
            value,
            mapper: PointerMapper::new(Linear, &style.slider),
            interaction: Interaction::new(),
            style,
            enabled: true,
            autorange: false,
            bins: HistogramBins::default(),
            histogram_fn: None,
            precision: DEFAULT_PRECISION,
            signals: Signals::new(),
        }
    }

    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.mapper = PointerMapper::new(Linear, &style.slider);
        self.style = style;
        self.relayout();
        self
    }

    /// Ordering applied when a handle is dragged.
    pub fn with_ordering(mut self, ordering: RangeOrdering) -> Self {
        self.value = self.value.with_ordering(ordering);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
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

    pub fn range(&self) -> &RangeValue {
        &self.value
    }

    pub fn value(&self, handle: RangeHandle) -> f64 {
        self.value.get(handle)
    }

    pub fn value0(&self) -> f64 {
        self.value.value0()
    }

    pub fn value1(&self) -> f64 {
        self.value.value1()
    }

    pub fn vmin(&self) -> f64 {
        self.value.vmin()
    }

    pub fn vmax(&self) -> f64 {
        self.value.vmax()
    }

    pub fn value_text(&self, handle: RangeHandle) -> String {
        format!("{:.*}", self.precision, self.value.get(handle))
    }

    pub fn interaction(&self) -> &Interaction<RangeRegion, f64> {
        &self.interaction
    }

    pub fn signals_mut(&mut self) -> &mut Signals {
        &mut self.signals
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle the whole control. Always reported as a finished edit.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Range slider '{}' enabled: {}", self.label, enabled);
        self.signals.emit(Signal::EditEnded);
    }

    pub fn is_autorange(&self) -> bool {
        self.autorange
    }

    /// Switch auto-range and refresh the bins.
    pub fn set_autorange(&mut self, autorange: bool) {
        self.autorange = autorange;
        log::debug!("Range slider '{}' autorange: {}", self.label, autorange);
        self.refresh_bins();
    }

    /// Set one value from the host, honoring the configured ordering.
    pub fn set_value(&mut self, handle: RangeHandle, value: f64) -> bool {
        let changed = self.value.set(handle, value);
        if changed {
            self.relayout();
            self.signals.emit(Signal::ValueChanged);
        }
        changed
    }

    /// Set both values against the outer bounds only. A change counts as a
    /// finished edit.
    pub fn force_values(&mut self, value0: f64, value1: f64) -> bool {
        let changed = self.value.force(value0, value1);
        if changed {
            self.relayout();
            self.signals.emit(Signal::ValueChanged);
            self.signals.emit(Signal::EditEnded);
        }
        changed
    }

    /// Replace the outer bounds. Values are re-clamped.
    pub fn set_bounds(&mut self, vmin: f64, vmax: f64) {
        if self.value.set_bounds(vmin, vmax) {
            self.signals.emit(Signal::ValueChanged);
        }
        self.relayout();
    }

    /// Install the bin supplier and refresh right away.
    pub fn set_histogram_fn(&mut self, histogram_fn: impl FnMut() -> HistogramBins + 'static) {
        self.histogram_fn = Some(Box::new(histogram_fn));
        self.refresh_bins();
    }

    pub fn clear_histogram_fn(&mut self) {
        self.histogram_fn = None;
        self.refresh_bins();
    }

    pub fn bins(&self) -> &HistogramBins {
        &self.bins
    }

    /// Pull fresh bins. With auto-range on, the bounds widen to cover them.
    pub fn refresh_bins(&mut self) {
        let Some(histogram_fn) = self.histogram_fn.as_mut() else {
            self.bins.clear();
            return;
        };
        self.bins = histogram_fn();
        if !self.bins.is_consistent() {
            if !self.bins.is_empty() {
                log::warn!(
                    "Range slider '{}': ignoring {} bin centers with {} masses",
                    self.label,
                    self.bins.x.len(),
                    self.bins.y.len()
                );
            }
            self.bins.clear();
            return;
        }
        if self.autorange {
            if let Some((vmin, vmax)) =
                autorange_bounds(&self.bins, self.value.value0(), self.value.value1())
            {
                self.set_bounds(vmin, vmax);
                self.force_values(self.value.value0(), self.value.value1());
            }
        }
    }

    /// Density overlay heights, one per sample across the bar.
    pub fn density(&self, samples: usize) -> Vec<f64> {
        density_profile(&self.bins, self.value.vmin(), self.value.vmax(), samples)
    }

    pub fn rect(&self) -> Rect {
        self.interaction.bounds()
    }

    pub fn region_rect(&self, region: RangeRegion) -> Option<Rect> {
        self.interaction.regions().rect(region)
    }

    /// Bar area: everything above the bottom text row.
    pub fn bar_rect(&self) -> Rect {
        let rect = self.rect();
        let row = self.style.slider.row_height.min(rect.height()).max(0.0);
        Rect::new(rect.x0, rect.y0, rect.x1, rect.y1 - row)
    }

    /// Pixel position of a value along the bar.
    pub fn handle_position(&self, handle: RangeHandle) -> Point {
        let bar = self.bar_rect();
        let (r0, r1) = self.value.fractions();
        let r = match handle {
            RangeHandle::Lower => r0,
            RangeHandle::Upper => r1,
        };
        Point::new(bar.x0 + r * bar.width(), bar.y1)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.interaction.regions_mut().reset(rect);
        self.relayout();
    }

    fn relayout(&mut self) {
        let rect = self.rect();
        let bar = self.bar_rect();
        let row = bar.y1 - rect.y0;
        let button_height = self.style.slider.row_height.min(row.max(0.0));
        let button_width = self.style.slider.button_width;
        let margin = self.style.slider.padding_h;
        let radius = self.style.range.handle_radius;
        let lower = self.handle_position(RangeHandle::Lower);
        let upper = self.handle_position(RangeHandle::Upper);

        let regions = self.interaction.regions_mut();
        regions.reset(rect);
        // One pixel of slack around the handles.
        let handle_rect = |p: Point| Rect::from_center_size(p, (2.0 * radius, 2.0 * radius)).inflate(1.0, 1.0);
        regions.set(RangeRegion::Lower, handle_rect(lower));
        regions.set(RangeRegion::Upper, handle_rect(upper));
        for (i, region) in BUTTONS.iter().enumerate() {
            let x1 = rect.x1 - margin - i as f64 * button_width;
            regions.set(
                *region,
                Rect::new(x1 - button_width, rect.y0, x1, rect.y0 + button_height),
            );
        }
        regions.set(
            RangeRegion::Range,
            Rect::from_points(Point::new(lower.x, bar.y0), Point::new(upper.x, bar.y1)),
        );
    }

    fn domain(&self) -> Domain {
        Domain::new(self.value.vmin(), self.value.vmax(), true)
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent, modifiers: Modifiers) -> Response {
        self.signals.begin();
        let consumed = match *event {
            PointerEvent::Move { position } => self.on_move(position, modifiers),
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.on_press(position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => match self.interaction.release(Some(position)) {
                Some(release) => {
                    self.on_release(release);
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
        let cursor = match self.interaction.hovered() {
            Some(RangeRegion::Lower | RangeRegion::Upper) if self.enabled => CursorHint::ResizeHorizontal,
            _ => CursorHint::Default,
        };
        self.signals.finish(consumed).with_cursor(cursor)
    }

    fn on_move(&mut self, position: Point, modifiers: Modifiers) -> bool {
        if let Some((region, anchor, offset)) = self.interaction.drag_to(position) {
            if let Some(handle) = region.handle() {
                let target = self.mapper.drag(
                    anchor.value,
                    offset.x,
                    self.bar_rect().width(),
                    &self.domain(),
                    modifiers,
                );
                self.set_value(handle, target);
            }
            return true;
        }
        self.interaction.hover(position).is_some()
    }

    fn on_press(&mut self, position: Point) -> bool {
        let Some(region) = self.interaction.hover(position) else {
            return false;
        };
        if region == RangeRegion::OnOff {
            self.set_enabled(!self.enabled);
        }
        if !self.enabled {
            return true;
        }
        let anchor = region.handle().map(|handle| DragAnchor {
            value: self.value.get(handle),
            pointer: position,
        });
        self.interaction.press(region, anchor);
        match region {
            RangeRegion::Reset => {
                let (v0, v1) = self.value.init();
                self.force_values(v0, v1);
            }
            RangeRegion::ResetUnit => {
                self.force_values(0.0, 1.0);
            }
            RangeRegion::Autorange => self.set_autorange(!self.autorange),
            _ => {}
        }
        true
    }

    fn on_release(&mut self, release: Release<RangeRegion, f64>) {
        let (Some(handle), Some(anchor)) = (release.region.handle(), release.anchor) else {
            return;
        };
        if self.value.get(handle) != anchor.value {
            log::debug!(
                "Range slider '{}' committed [{}, {}]",
                self.label,
                self.value.value0(),
                self.value.value1()
            );
            self.signals.emit(Signal::EditEnded);
        }
    }

    pub fn focus_lost(&mut self) -> Response {
        self.signals.begin();
        let release = self.interaction.focus_lost();
        let consumed = release.is_some();
        if let Some(release) = release {
            self.on_release(release);
        }
        self.signals.finish(consumed)
    }
}
