//! DialKit Core Library
//!
//! Headless direct-manipulation value engine: pointer-to-value mapping, the
//! hover/drag/commit state machine, clamped value models, curve and spline
//! interpolation, and a scalar-field brush. Hosts feed events in and paint
//! what the controls expose.

pub mod controls;
pub mod curve;
pub mod error;
pub mod field;
pub mod input;
pub mod interaction;
pub mod mapping;
pub mod picker;
pub mod random;
pub mod signals;
pub mod spline;
pub mod style;
pub mod value;

pub use controls::{
    ColorPicker, ColorStop, ContextAction, CurveEditor, FieldCanvas, GradientEditor, Point2DSelector,
    PointCanvas, Preset, RangeSlider, ScalarSlider, SliderFloat, SliderFloatLog, SliderInt, VectorEditor,
};
pub use curve::{CurveModel, Interpolation};
pub use error::{ConstructionError, ConstructionResult};
pub use field::{Brush, BrushMode, FieldPair, ScalarField};
pub use input::{ClickTracker, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{DragAnchor, Interaction, Phase};
pub use mapping::{Domain, Linear, Log, MappingPolicy, PointerMapper, StepDirection};
pub use picker::{ConfirmPicker, ModalPicker, PickResult};
pub use signals::{CursorHint, Response, Signal, Signals};
pub use spline::{HistogramBins, Interpolator1D, Method};
pub use style::{Style, StyleColor, StyleError, StyleResult};
pub use value::{HistoryRing, RangeHandle, RangeOrdering, RangeValue, Scalar, ScalarValue};
