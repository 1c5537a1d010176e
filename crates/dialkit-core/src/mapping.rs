//! Pointer-to-value mapping.
//!
//! A [`PointerMapper`] turns pixel deltas into value deltas. The arithmetic runs in
//! an "internal" space chosen by a [`MappingPolicy`]: identity for [`Linear`],
//! `log10` for [`Log`]. Results are converted back before the control clamps them.

use crate::error::{ConstructionError, ConstructionResult};
use crate::input::Modifiers;
use crate::style::SliderStyle;

/// Step used by log controls on unbounded ranges, in decades.
pub const LOG_UNBOUNDED_STEP: f64 = 0.1;

/// Value bounds as seen by a mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub vmin: f64,
    pub vmax: f64,
    /// Both bounds are real limits rather than open-range sentinels.
    pub bounded: bool,
}

impl Domain {
    pub fn new(vmin: f64, vmax: f64, bounded: bool) -> Self {
        Self { vmin, vmax, bounded }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.vmin).min(self.vmax)
    }
}

/// Conversion between values and the space drags accumulate in.
pub trait MappingPolicy: Clone + std::fmt::Debug {
    fn to_internal(&self, value: f64, domain: &Domain) -> f64;

    fn from_internal(&self, internal: f64) -> f64;

    /// Internal extent of the domain, or `None` when drags should use the
    /// configured unbounded rate.
    fn internal_span(&self, domain: &Domain) -> Option<(f64, f64)>;

    /// Button step for unbounded ranges, in internal units.
    fn unbounded_step(&self) -> f64;
}

/// Identity mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Linear;

impl MappingPolicy for Linear {
    fn to_internal(&self, value: f64, _domain: &Domain) -> f64 {
        value
    }

    fn from_internal(&self, internal: f64) -> f64 {
        internal
    }

    fn internal_span(&self, domain: &Domain) -> Option<(f64, f64)> {
        domain.bounded.then_some((domain.vmin, domain.vmax))
    }

    fn unbounded_step(&self) -> f64 {
        1.0
    }
}

/// Base-10 logarithmic mapping over strictly positive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Log {
    log_min: f64,
    log_max: f64,
}

impl Log {
    /// Fails unless both bounds are strictly positive.
    pub fn new(vmin: f64, vmax: f64) -> ConstructionResult<Self> {
        if vmin.is_nan() || vmax.is_nan() || vmin <= 0.0 || vmax <= 0.0 {
            return Err(ConstructionError::InvalidLogRange { vmin, vmax });
        }
        let (vmin, vmax) = if vmin > vmax { (vmax, vmin) } else { (vmin, vmax) };
        Ok(Self {
            log_min: vmin.log10(),
            log_max: vmax.log10(),
        })
    }

    pub fn log_min(&self) -> f64 {
        self.log_min
    }

    pub fn log_max(&self) -> f64 {
        self.log_max
    }

    /// `log10` of the value clamped into the bounds.
    pub fn to_log(&self, value: f64) -> f64 {
        let lo = 10f64.powf(self.log_min);
        let hi = 10f64.powf(self.log_max);
        value.max(lo).min(hi).log10()
    }

    pub fn from_log(&self, log_value: f64) -> f64 {
        10f64.powf(log_value)
    }
}

impl MappingPolicy for Log {
    fn to_internal(&self, value: f64, domain: &Domain) -> f64 {
        domain.clamp(value).log10()
    }

    fn from_internal(&self, internal: f64) -> f64 {
        self.from_log(internal)
    }

    fn internal_span(&self, _domain: &Domain) -> Option<(f64, f64)> {
        Some((self.log_min, self.log_max))
    }

    fn unbounded_step(&self) -> f64 {
        LOG_UNBOUNDED_STEP
    }
}

/// Direction of a button step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Decrease,
    Increase,
}

impl StepDirection {
    fn sign(self) -> f64 {
        match self {
            Self::Decrease => -1.0,
            Self::Increase => 1.0,
        }
    }
}

/// Converts pixel motion into value motion for one control.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerMapper<P> {
    policy: P,
    /// Pixels per unit when no bar-derived rate applies.
    unbounded_ppu: f64,
    /// Multiplier applied by the precise and coarse modifiers.
    fine_tuning: f64,
    /// Button presses needed to cross a bounded range.
    button_ticks: f64,
}

impl<P: MappingPolicy> PointerMapper<P> {
    pub fn new(policy: P, style: &SliderStyle) -> Self {
        Self {
            policy,
            unbounded_ppu: style.ppu,
            fine_tuning: style.ppu_multiplier_fine_tuning,
            button_ticks: style.button_ticks,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Override the modifier multiplier, e.g. with the canvas setting.
    pub fn with_fine_tuning(mut self, multiplier: f64) -> Self {
        self.fine_tuning = multiplier;
        self
    }

    /// Base pixels per internal unit for a bar of the given width.
    pub fn ppu(&self, bar_width: f64, domain: &Domain) -> f64 {
        match self.policy.internal_span(domain) {
            Some((lo, hi)) if hi > lo && bar_width > 0.0 => bar_width / (hi - lo),
            _ => self.unbounded_ppu,
        }
    }

    /// Apply the precise/coarse modifiers to a rate.
    pub fn fine_tune(&self, ppu: f64, modifiers: Modifiers) -> f64 {
        if modifiers.precise() {
            ppu * self.fine_tuning
        } else if modifiers.coarse() {
            ppu / self.fine_tuning
        } else {
            ppu
        }
    }

    /// Internal-space delta for a pixel delta.
    pub fn drag_delta(&self, dx: f64, bar_width: f64, domain: &Domain, modifiers: Modifiers) -> f64 {
        let ppu = self.fine_tune(self.ppu(bar_width, domain), modifiers);
        if ppu > 0.0 && ppu.is_finite() { dx / ppu } else { 0.0 }
    }

    /// Move `baseline` by an internal-space delta and convert back.
    pub fn offset(&self, baseline: f64, delta: f64, domain: &Domain) -> f64 {
        let mut internal = self.policy.to_internal(baseline, domain) + delta;
        if let Some((lo, hi)) = self.policy.internal_span(domain) {
            internal = internal.max(lo).min(hi);
        }
        self.policy.from_internal(internal)
    }

    /// Value after dragging `dx` pixels away from `baseline`.
    pub fn drag(
        &self,
        baseline: f64,
        dx: f64,
        bar_width: f64,
        domain: &Domain,
        modifiers: Modifiers,
    ) -> f64 {
        let delta = self.drag_delta(dx, bar_width, domain, modifiers);
        self.offset(baseline, delta, domain)
    }

    /// Internal-space size of one button step.
    pub fn step_size(&self, domain: &Domain) -> f64 {
        match self.policy.internal_span(domain) {
            Some((lo, hi)) if domain.bounded && self.button_ticks > 0.0 => {
                (hi - lo) / self.button_ticks
            }
            _ => self.policy.unbounded_step(),
        }
    }

    /// Value after one button step from `current`.
    pub fn step(&self, current: f64, direction: StepDirection, domain: &Domain) -> f64 {
        self.offset(current, direction.sign() * self.step_size(domain), domain)
    }
}
