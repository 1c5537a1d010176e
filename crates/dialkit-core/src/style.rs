//! Read-only style configuration shared by every control.
//!
//! A [`Style`] is built once (in code or from JSON) and handed to controls as an
//! `Rc<Style>`. Controls read it and never mutate it.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Errors that can occur while loading a style.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid style JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for style loading.
pub type StyleResult<T> = Result<T, StyleError>;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StyleColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
}

impl From<Color> for StyleColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<StyleColor> for Color {
    fn from(color: StyleColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Colors, borders and limits common to all controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalStyle {
    pub color_text: StyleColor,
    pub color_border: StyleColor,
    pub color_hovered: StyleColor,
    pub color_selected: StyleColor,
    pub color_faded: StyleColor,
    pub color_bg: StyleColor,
    pub width_border: f64,
    pub width_hovered: f64,
    /// Corner radius, also the base of the curve editor hit radius.
    pub radius: f64,
    /// Inner margin of canvas-like controls.
    pub padding: f64,
    pub width_min: f64,
    pub max_label_len: usize,
    pub max_history: usize,
}

impl Default for GlobalStyle {
    fn default() -> Self {
        Self {
            color_text: StyleColor::WHITE,
            color_border: StyleColor::gray(0x5B),
            color_hovered: StyleColor::WHITE,
            color_selected: StyleColor::rgb(0x47, 0x72, 0xB3),
            color_faded: StyleColor::gray(0x5B),
            color_bg: StyleColor::gray(0x2B),
            width_border: 1.0,
            width_hovered: 1.0,
            radius: 4.0,
            padding: 4.0,
            width_min: 256.0,
            max_label_len: 16,
            max_history: 8,
        }
    }
}

/// Point and field canvases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasStyle {
    /// Half-size of a point's hit square in pixels.
    pub point_radius: f64,
    pub value_arc_width: f64,
    pub ppu_multiplier_fine_tuning: f64,
    /// z change per wheel notch.
    pub wheel_diff: f64,
    pub wheel_multiplier_fine_tuning: f64,
    /// Half-size of the smoothing box, in cells.
    pub brush_avg_radius: usize,
    /// Strength change per wheel notch.
    pub brush_strength_tick: f64,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            point_radius: 7.0,
            value_arc_width: 6.0,
            ppu_multiplier_fine_tuning: 10.0,
            wheel_diff: 0.05,
            wheel_multiplier_fine_tuning: 10.0,
            brush_avg_radius: 1,
            brush_strength_tick: 0.01,
        }
    }
}

/// Scalar and range sliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderStyle {
    pub padding_v: f64,
    pub padding_h: f64,
    pub padding_middle: f64,
    /// Pixels per unit when the range is unbounded.
    pub ppu: f64,
    pub ppu_multiplier_fine_tuning: f64,
    /// Button presses needed to cross a bounded range.
    pub button_ticks: f64,
    /// Width of the minus and plus buttons.
    pub button_width: f64,
    /// Height of one text row, used by the range slider layout.
    pub row_height: f64,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            padding_v: 8.0,
            padding_h: 4.0,
            padding_middle: 8.0,
            ppu: 1.0,
            ppu_multiplier_fine_tuning: 10.0,
            button_ticks: 50.0,
            button_width: 20.0,
            row_height: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeStyle {
    pub handle_radius: f64,
}

impl Default for RangeStyle {
    fn default() -> Self {
        Self { handle_radius: 5.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveStyle {
    pub draw_sampling_points: bool,
    pub sampling_point_radius: f64,
    pub sample_count: usize,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            draw_sampling_points: true,
            sampling_point_radius: 2.0,
            sample_count: 8,
        }
    }
}

/// Complete style snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub global: GlobalStyle,
    pub canvas: CanvasStyle,
    pub slider: SliderStyle,
    pub range: RangeStyle,
    pub curve: CurveStyle,
}

impl Style {
    /// Parse a style. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a style file.
    pub fn load(path: impl AsRef<Path>) -> StyleResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let style = Self::from_json(&json)?;
        log::debug!("Loaded style from {}", path.display());
        Ok(style)
    }

    pub fn to_json(&self) -> StyleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Wrap into the shared handle controls take.
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}
