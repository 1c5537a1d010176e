//! egui adapters for the dialkit controls.
//!
//! Each `show` function allocates space, feeds the frame's input to a core
//! control and paints what the control exposes. No value arithmetic happens
//! here:
//!
//! - **Sliders**: scalar sliders (linear, log, int) and the range slider
//! - **Canvases**: point set, scalar field, curve, vector, 2D point
//! - **Colors**: color swatch and gradient editor, with egui picker windows

pub mod canvases;
pub mod colors;
pub mod convert;
pub mod events;
pub mod paint;
pub mod pickers;
pub mod sliders;

pub use canvases::{
    FieldView, show_curve_editor, show_field_canvas, show_point2d_selector, show_point_canvas, show_vector_editor,
};
pub use colors::{show_color_picker, show_gradient_editor};
pub use events::{EventPump, FrameInput};
pub use pickers::{Answer, DeferredConfirm, DeferredPicker};
pub use sliders::{show_range_slider, show_slider};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Label and value text
    pub const FONT_SIZE: f32 = 12.0;
    /// Canvas height relative to the minimum width
    pub const CANVAS_ASPECT: f32 = 0.5;
    /// Segments of a full-turn arc
    pub const ARC_SEGMENTS: usize = 48;
    /// Evaluations when drawing a curve
    pub const CURVE_RESOLUTION: usize = 128;
    /// Slices when drawing a gradient bar
    pub const GRADIENT_SLICES: usize = 64;
    /// Bars of the range slider density overlay
    pub const DENSITY_SAMPLES: usize = 64;
}

use dialkit_core::signals::{CursorHint, Response};

/// What a control reported over one frame of events.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Outcome {
    changed: bool,
    edit_ended: bool,
    cursor: CursorHint,
}

impl Outcome {
    pub(crate) fn merge(&mut self, response: Response) {
        self.changed |= response.value_changed;
        self.edit_ended |= response.edit_ended;
        if response.consumed || response.cursor != CursorHint::Default {
            self.cursor = response.cursor;
        }
    }

    /// A change made outside an event handler, e.g. from a window or menu.
    pub(crate) fn commit(&mut self) {
        self.changed = true;
        self.edit_ended = true;
    }

    /// Mirror onto the egui response and request the cursor.
    pub(crate) fn apply(&self, ui: &egui::Ui, response: &mut egui::Response) {
        if self.changed || self.edit_ended {
            response.mark_changed();
        }
        if self.cursor != CursorHint::Default && (response.hovered() || response.dragged()) {
            ui.ctx().set_cursor_icon(convert::cursor_icon(self.cursor));
        }
    }
}
