//! Scalar slider with optional minus/plus buttons.
//!
//! One type covers float, integer and logarithmic sliders. The value type is a
//! [`Scalar`] and the drag arithmetic comes from a [`MappingPolicy`].

use std::rc::Rc;

use kurbo::{Point, Rect};

use crate::error::ConstructionResult;
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::interaction::{DragAnchor, Interaction, Release};
use crate::mapping::{Domain, Linear, Log, MappingPolicy, PointerMapper, StepDirection};
use crate::random::SplitMix64;
use crate::signals::{CursorHint, Response, Signal, Signals};
use crate::style::Style;
use crate::value::{DEFAULT_PRECISION, HistoryRing, Scalar, ScalarValue, truncate_label};

/// Hit regions of a slider, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderRegion {
    Minus,
    Plus,
    Bar,
}

/// Entry of the slider's context menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextAction<T> {
    /// Uniform pick inside the bounds. Only offered for bounded sliders.
    Randomize,
    Reset,
    /// Jump back to a committed value from history.
    SetTo(T),
}

/// Slider over a scalar value.
#[derive(Debug)]
pub struct ScalarSlider<T: Scalar, P: MappingPolicy> {
    label: String,
    value: ScalarValue<T>,
    mapper: PointerMapper<P>,
    interaction: Interaction<SliderRegion, T>,
    history: HistoryRing<T>,
    style: Rc<Style>,
    rng: SplitMix64,
    precision: usize,
    buttons: bool,
    signals: Signals,
}

pub type SliderFloat = ScalarSlider<f64, Linear>;
pub type SliderInt = ScalarSlider<i64, Linear>;
pub type SliderFloatLog = ScalarSlider<f64, Log>;

impl<T: Scalar> ScalarSlider<T, Linear> {
    /// Linear slider. Swapped bounds are reordered and `init` is clamped.
    pub fn new(label: impl Into<String>, init: T, vmin: T, vmax: T) -> Self {
        Self::build(label.into(), ScalarValue::new(init, vmin, vmax), Linear)
    }
}

impl ScalarSlider<f64, Log> {
    /// Logarithmic slider. Both bounds must be strictly positive.
    pub fn new(label: impl Into<String>, init: f64, vmin: f64, vmax: f64) -> ConstructionResult<Self> {
        let policy = Log::new(vmin, vmax)?;
        Ok(Self::build(label.into(), ScalarValue::new(init, vmin, vmax), policy))
    }
}

impl<T: Scalar, P: MappingPolicy> ScalarSlider<T, P> {
    fn build(label: String, value: ScalarValue<T>, policy: P) -> Self {
        let style = Rc::new(Style::default());
        log::trace!(
            "Slider '{}' created: {} in [{}, {}]",
            label,
            value.value(),
            value.vmin(),
            value.vmax()
        );
        Self {
            label,
            value,
            mapper: PointerMapper::new(policy, &style.slider),
            interaction: Interaction::new(),
            history: HistoryRing::new(style.global.max_history),
            style,
            rng: SplitMix64::default(),
            precision: DEFAULT_PRECISION,
            buttons: true,
            signals: Signals::new(),
        }
    }

    /// Use a shared style. Rates, button steps and history size follow it.
    pub fn with_style(mut self, style: Rc<Style>) -> Self {
        self.mapper = PointerMapper::new(self.mapper.policy().clone(), &style.slider);
        let mut history = HistoryRing::new(style.global.max_history);
        for v in self.history.iter() {
            history.push(v);
        }
        self.history = history;
        self.style = style;
        self.relayout();
        self
    }

    /// Deterministic randomize, for tests and reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SplitMix64::new(seed);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Show or hide the minus/plus buttons.
    pub fn with_buttons(mut self, buttons: bool) -> Self {
        self.buttons = buttons;
        self.relayout();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label shortened to the configured length.
    pub fn display_label(&self) -> String {
        truncate_label(&self.label, self.style.global.max_label_len)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn value(&self) -> T {
        self.value.value()
    }

    pub fn vmin(&self) -> T {
        self.value.vmin()
    }

    pub fn vmax(&self) -> T {
        self.value.vmax()
    }

    pub fn init(&self) -> T {
        self.value.init()
    }

    pub fn history(&self) -> &HistoryRing<T> {
        &self.history
    }

    pub fn has_buttons(&self) -> bool {
        self.buttons
    }

    pub fn interaction(&self) -> &Interaction<SliderRegion, T> {
        &self.interaction
    }

    pub fn signals_mut(&mut self) -> &mut Signals {
        &mut self.signals
    }

    /// Set from the host. Fires `ValueChanged` when the value moved.
    pub fn set_value(&mut self, value: T) -> bool {
        let changed = self.value.set(value);
        if changed {
            self.signals.emit(Signal::ValueChanged);
        }
        changed
    }

    /// Current value as plain text, the way the inline editor starts.
    pub fn value_text(&self) -> String {
        self.value.value().format(self.precision)
    }

    /// Position of the value along the bar, in the mapping's space.
    pub fn bar_fraction(&self) -> Option<f64> {
        let domain = self.domain();
        let (lo, hi) = self.mapper.policy().internal_span(&domain)?;
        if hi <= lo {
            return None;
        }
        let internal = self.mapper.policy().to_internal(self.value.value().to_f64(), &domain);
        Some(((internal - lo) / (hi - lo)).clamp(0.0, 1.0))
    }

    pub fn rect(&self) -> Rect {
        self.interaction.bounds()
    }

    pub fn bar_rect(&self) -> Rect {
        self.interaction
            .regions()
            .rect(SliderRegion::Bar)
            .unwrap_or_else(|| self.rect())
    }

    /// Place the slider and recompute its hit regions.
    pub fn set_rect(&mut self, rect: Rect) {
        self.interaction.regions_mut().reset(rect);
        self.relayout();
    }

    fn relayout(&mut self) {
        let rect = self.interaction.bounds();
        let regions = self.interaction.regions_mut();
        regions.reset(rect);
        if self.buttons {
            let bw = self.style.slider.button_width.min(rect.width() / 2.0).max(0.0);
            let minus = Rect::new(rect.x0, rect.y0, rect.x0 + bw, rect.y1);
            let plus = Rect::new(rect.x1 - bw, rect.y0, rect.x1, rect.y1);
            regions.set(SliderRegion::Minus, minus);
            regions.set(SliderRegion::Plus, plus);
            regions.set(SliderRegion::Bar, Rect::new(minus.x1, rect.y0, plus.x0, rect.y1));
        } else {
            regions.set(SliderRegion::Bar, rect);
        }
    }

    fn domain(&self) -> Domain {
        Domain::new(
            self.value.vmin().to_f64(),
            self.value.vmax().to_f64(),
            self.value.is_bounded(),
        )
    }

    /// Feed one pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent, modifiers: Modifiers) -> Response {
        self.signals.begin();
        let mut menu_requested = false;
        let consumed = match *event {
            PointerEvent::Move { position } => self.on_move(position, modifiers),
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.on_press(position),
            PointerEvent::Down {
                position,
                button: MouseButton::Right,
            } => {
                menu_requested = self.interaction.hover(position).is_some();
                menu_requested
            }
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
            PointerEvent::DoubleClick {
                position,
                button: MouseButton::Left,
            } => self.on_double_click(position),
            PointerEvent::Leave => {
                self.interaction.leave();
                false
            }
            _ => false,
        };
        let mut response = self.signals.finish(consumed);
        response.menu_requested = menu_requested;
        response.with_cursor(self.cursor())
    }

    fn cursor(&self) -> CursorHint {
        match self.interaction.hovered() {
            Some(SliderRegion::Bar) => CursorHint::ResizeHorizontal,
            _ => CursorHint::Default,
        }
    }

    fn on_move(&mut self, position: Point, modifiers: Modifiers) -> bool {
        if let Some((SliderRegion::Bar, anchor, offset)) = self.interaction.drag_to(position) {
            let domain = self.domain();
            let bar_width = self.bar_rect().width();
            let delta = T::quantize_delta(self.mapper.drag_delta(offset.x, bar_width, &domain, modifiers));
            let target = self.mapper.offset(anchor.value.to_f64(), delta, &domain);
            self.set_value(T::from_f64(target));
            return true;
        }
        self.interaction.hover(position).is_some()
    }

    fn on_press(&mut self, position: Point) -> bool {
        match self.interaction.hover(position) {
            Some(SliderRegion::Bar) => {
                let anchor = DragAnchor {
                    value: self.value.value(),
                    pointer: position,
                };
                self.interaction.press(SliderRegion::Bar, Some(anchor));
            }
            Some(region @ SliderRegion::Minus) => {
                self.interaction.press(region, None);
                self.step(StepDirection::Decrease);
            }
            Some(region @ SliderRegion::Plus) => {
                self.interaction.press(region, None);
                self.step(StepDirection::Increase);
            }
            None => return false,
        }
        true
    }

    fn on_release(&mut self, release: Release<SliderRegion, T>) {
        if let (SliderRegion::Bar, Some(anchor)) = (release.region, release.anchor) {
            if anchor.value != self.value.value() {
                self.commit();
            }
        }
    }

    fn on_double_click(&mut self, position: Point) -> bool {
        if self.interaction.hover(position) != Some(SliderRegion::Bar) {
            return false;
        }
        let text = self.value_text();
        self.interaction.begin_text_edit(text);
        true
    }

    /// One button step. Integers always move by one.
    fn step(&mut self, direction: StepDirection) {
        let current = self.value.value().to_f64();
        let target = if T::INTEGRAL {
            match direction {
                StepDirection::Decrease => current - 1.0,
                StepDirection::Increase => current + 1.0,
            }
        } else {
            self.mapper.step(current, direction, &self.domain())
        };
        if self.set_value(T::from_f64(target)) {
            self.commit();
        }
    }

    fn commit(&mut self) {
        let value = self.value.value();
        self.history.push(value);
        log::debug!("Slider '{}' committed {}", self.label, value);
        self.signals.emit(Signal::EditEnded);
    }

    /// Pointer or keyboard focus went away. An active drag ends as if released.
    pub fn focus_lost(&mut self) -> Response {
        self.signals.begin();
        let release = self.interaction.focus_lost();
        let consumed = release.is_some();
        if let Some(release) = release {
            self.on_release(release);
        }
        self.signals.finish(consumed)
    }

    pub fn is_text_editing(&self) -> bool {
        self.interaction.is_text_editing()
    }

    pub fn text_edit_buffer(&self) -> Option<&str> {
        self.interaction.text_edit().map(|edit| edit.text())
    }

    /// Replace the inline editor's text. Ignored when no editor is open.
    pub fn set_text_edit_buffer(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.interaction.text_edit_mut() {
            edit.set_text(text);
        }
    }

    /// Parse and apply the editor's text. Unparsable text is dropped.
    pub fn commit_text_edit(&mut self) -> Response {
        self.signals.begin();
        let Some(text) = self.interaction.end_text_edit() else {
            return self.signals.finish(false);
        };
        if let Some(value) = T::parse_text(&text) {
            if self.set_value(value) {
                self.commit();
            }
        }
        self.signals.finish(true)
    }

    pub fn cancel_text_edit(&mut self) {
        self.interaction.end_text_edit();
    }

    /// Menu entries: randomize (bounded only), reset, then history newest first.
    pub fn context_actions(&self) -> Vec<ContextAction<T>> {
        let mut actions = Vec::with_capacity(self.history.len() + 2);
        if self.value.is_bounded() {
            actions.push(ContextAction::Randomize);
        }
        actions.push(ContextAction::Reset);
        actions.extend(self.history.newest_first().map(ContextAction::SetTo));
        actions
    }

    pub fn apply_context_action(&mut self, action: ContextAction<T>) -> Response {
        self.signals.begin();
        let target = match action {
            ContextAction::Randomize => self.random_value(),
            ContextAction::Reset => Some(self.value.init()),
            ContextAction::SetTo(value) => Some(value),
        };
        if let Some(target) = target {
            if self.set_value(target) {
                self.commit();
            }
        }
        self.signals.finish(true)
    }

    /// Uniform in the mapping's space, so log sliders pick evenly per decade.
    fn random_value(&mut self) -> Option<T> {
        if !self.value.is_bounded() {
            return None;
        }
        let domain = self.domain();
        let (lo, hi) = self.mapper.policy().internal_span(&domain)?;
        let internal = self.rng.uniform(lo, hi);
        Some(T::from_f64(domain.clamp(self.mapper.policy().from_internal(internal))))
    }
}
