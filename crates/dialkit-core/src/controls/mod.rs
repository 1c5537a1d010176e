//! Interactive controls. Each one owns its value model, an [`Interaction`]
//! state machine and a [`Signals`] list, and is driven by the host through
//! `handle_pointer`, `focus_lost` and the setters.
//!
//! [`Interaction`]: crate::interaction::Interaction
//! [`Signals`]: crate::signals::Signals

mod color;
mod curve;
mod field;
mod point2d;
mod points;
mod range;
mod slider;
mod vector;

pub use color::{ColorPicker, ColorStop, GradientEditor, Preset, SwatchRegion, sample_stops};
pub use curve::CurveEditor;
pub use field::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, FieldCanvas, FieldRegion};
pub use point2d::{Point2DRegion, Point2DSelector};
pub use points::{PointCanvas, PointSet};
pub use range::{HistogramFn, RangeRegion, RangeSlider};
pub use slider::{ContextAction, ScalarSlider, SliderFloat, SliderFloatLog, SliderInt, SliderRegion};
pub use vector::VectorEditor;
