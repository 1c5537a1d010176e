//! Drawing helpers shared by the adapters. Colors and radii come from the
//! control's [`Style`].

use dialkit_core::style::Style;
use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind};

use crate::convert::style_color;
use crate::sizing;

pub fn corner_radius(style: &Style) -> CornerRadius {
    CornerRadius::same(style.global.radius.clamp(0.0, 255.0) as u8)
}

/// Background plus border, highlighted while hovered.
pub fn panel(painter: &Painter, rect: Rect, hovered: bool, style: &Style) {
    let cr = corner_radius(style);
    painter.rect_filled(rect, cr, style_color(style.global.color_bg));
    let stroke = if hovered {
        Stroke::new(style.global.width_hovered as f32, style_color(style.global.color_hovered))
    } else {
        Stroke::new(style.global.width_border as f32, style_color(style.global.color_border))
    };
    painter.rect_stroke(rect, cr, stroke, StrokeKind::Inside);
}

pub fn border(painter: &Painter, rect: Rect, style: &Style) {
    painter.rect_stroke(
        rect,
        CornerRadius::ZERO,
        Stroke::new(style.global.width_border as f32, style_color(style.global.color_border)),
        StrokeKind::Inside,
    );
}

pub fn text(painter: &Painter, pos: Pos2, anchor: Align2, text: &str, style: &Style) {
    painter.text(
        pos,
        anchor,
        text,
        FontId::proportional(sizing::FONT_SIZE),
        style_color(style.global.color_text),
    );
}

pub fn polyline(painter: &Painter, points: Vec<Pos2>, color: Color32, width: f32) {
    if points.len() > 1 {
        painter.add(Shape::line(points, Stroke::new(width, color)));
    }
}

/// Arc around `center`, clockwise from the top, covering `fraction` of a turn.
pub fn arc(painter: &Painter, center: Pos2, radius: f32, fraction: f32, stroke: Stroke) {
    let fraction = fraction.clamp(0.0, 1.0);
    let segments = ((sizing::ARC_SEGMENTS as f32) * fraction).ceil().max(1.0) as usize;
    let points: Vec<Pos2> = (0..=segments)
        .map(|i| {
            let a = std::f32::consts::TAU * fraction * i as f32 / segments as f32;
            center + radius * egui::vec2(a.sin(), -a.cos())
        })
        .collect();
    painter.add(Shape::line(points, stroke));
}
