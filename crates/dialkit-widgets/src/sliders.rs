//! Scalar and range slider adapters.

use dialkit_core::controls::{ContextAction, RangeRegion, RangeSlider, ScalarSlider, SliderRegion};
use dialkit_core::mapping::MappingPolicy;
use dialkit_core::value::{RangeHandle, Scalar};
use egui::{Align2, Color32, CornerRadius, Key, Response, Sense, Stroke, StrokeKind, TextEdit, Ui, pos2, vec2};

use crate::Outcome;
use crate::convert::{style_color, to_egui_rect, to_kurbo_rect, to_pos};
use crate::events::EventPump;
use crate::paint;
use crate::sizing;

/// Show a scalar slider. Double click opens the inline editor, right click
/// opens randomize/reset/history.
pub fn show_slider<T: Scalar, P: MappingPolicy>(ui: &mut Ui, slider: &mut ScalarSlider<T, P>) -> Response {
    let width = ui.available_width().max(slider.style().global.width_min as f32);
    let height = slider.style().slider.row_height as f32;
    let (rect, mut response) = ui.allocate_exact_size(vec2(width, height), Sense::click_and_drag());
    let bounds = to_kurbo_rect(rect);
    if slider.rect() != bounds {
        slider.set_rect(bounds);
    }

    let input = EventPump::collect(ui, response.id, rect);
    let mut outcome = Outcome::default();
    for event in &input.pointer {
        outcome.merge(slider.handle_pointer(event, input.modifiers));
    }
    if input.focus_lost {
        outcome.merge(slider.focus_lost());
    }

    if ui.is_rect_visible(rect) {
        paint_slider(ui, slider);
    }
    if slider.is_text_editing() {
        outcome.merge(text_editor(ui, slider));
    }

    response.context_menu(|ui| {
        for action in slider.context_actions() {
            let label = match action {
                ContextAction::Randomize => "Randomize".to_string(),
                ContextAction::Reset => "Reset".to_string(),
                ContextAction::SetTo(value) => value.to_string(),
            };
            if ui.button(label).clicked() {
                outcome.merge(slider.apply_context_action(action));
                ui.close();
            }
        }
    });

    outcome.apply(ui, &mut response);
    response
}

fn paint_slider<T: Scalar, P: MappingPolicy>(ui: &Ui, slider: &ScalarSlider<T, P>) {
    let painter = ui.painter();
    let style = slider.style();
    let rect = to_egui_rect(slider.rect());
    let bar = to_egui_rect(slider.bar_rect());
    let hovered = slider.interaction().hovered();
    paint::panel(painter, rect, hovered.is_some(), style);

    match slider.bar_fraction() {
        Some(f) => {
            let filled = egui::Rect::from_min_max(bar.min, pos2(bar.min.x + f as f32 * bar.width(), bar.max.y));
            painter.rect_filled(filled.shrink(1.0), CornerRadius::ZERO, style_color(style.global.color_selected));
        }
        None => {
            painter.rect_filled(bar.shrink(1.0), CornerRadius::ZERO, style_color(style.global.color_faded));
        }
    }

    if slider.has_buttons() {
        for (region, glyph) in [(SliderRegion::Minus, "-"), (SliderRegion::Plus, "+")] {
            if let Some(r) = slider.interaction().regions().rect(region) {
                let r = to_egui_rect(r);
                if hovered == Some(region) {
                    painter.rect_filled(r.shrink(1.0), CornerRadius::ZERO, style_color(style.global.color_faded));
                }
                paint::text(painter, r.center(), Align2::CENTER_CENTER, glyph, style);
            }
        }
    }

    if !slider.is_text_editing() {
        let pad = style.slider.padding_h as f32;
        paint::text(painter, pos2(bar.min.x + pad, bar.center().y), Align2::LEFT_CENTER, &slider.display_label(), style);
        paint::text(painter, pos2(bar.max.x - pad, bar.center().y), Align2::RIGHT_CENTER, &slider.value_text(), style);
    }
}

/// Enter commits, losing focus cancels.
fn text_editor<T: Scalar, P: MappingPolicy>(ui: &mut Ui, slider: &mut ScalarSlider<T, P>) -> dialkit_core::Response {
    let mut buffer = slider.text_edit_buffer().unwrap_or_default().to_string();
    let edit = ui.put(to_egui_rect(slider.bar_rect()), TextEdit::singleline(&mut buffer));
    if edit.changed() {
        slider.set_text_edit_buffer(buffer);
    }
    if edit.lost_focus() {
        if ui.input(|i| i.key_pressed(Key::Enter)) {
            return slider.commit_text_edit();
        }
        log::debug!("Inline edit of {} cancelled", slider.label());
        slider.cancel_text_edit();
    } else if !edit.has_focus() {
        edit.request_focus();
    }
    dialkit_core::Response::ignored()
}

/// Show a range slider: bar with two handles and the toggle buttons above,
/// label in the bottom row.
pub fn show_range_slider(ui: &mut Ui, slider: &mut RangeSlider) -> Response {
    let width = ui.available_width().max(slider.style().global.width_min as f32);
    let height = 2.0 * slider.style().slider.row_height as f32;
    let (rect, mut response) = ui.allocate_exact_size(vec2(width, height), Sense::click_and_drag());
    let bounds = to_kurbo_rect(rect);
    if slider.rect() != bounds {
        slider.set_rect(bounds);
    }

    let input = EventPump::collect(ui, response.id, rect);
    let mut outcome = Outcome::default();
    for event in &input.pointer {
        outcome.merge(slider.handle_pointer(event, input.modifiers));
    }
    if input.focus_lost {
        outcome.merge(slider.focus_lost());
    }

    if ui.is_rect_visible(rect) {
        paint_range(ui, slider);
    }
    outcome.apply(ui, &mut response);
    response
}

fn paint_range(ui: &Ui, slider: &RangeSlider) {
    let painter = ui.painter();
    let style = slider.style();
    let rect = to_egui_rect(slider.rect());
    let bar = to_egui_rect(slider.bar_rect());
    let hovered = slider.interaction().hovered();
    paint::panel(painter, rect, hovered.is_some(), style);

    let density = slider.density(sizing::DENSITY_SAMPLES);
    if !density.is_empty() {
        let w = bar.width() / density.len() as f32;
        for (i, d) in density.iter().enumerate() {
            let h = (*d as f32).clamp(0.0, 1.0) * bar.height();
            let x = bar.min.x + i as f32 * w;
            let r = egui::Rect::from_min_max(pos2(x, bar.max.y - h), pos2(x + w, bar.max.y));
            painter.rect_filled(r, CornerRadius::ZERO, style_color(style.global.color_faded));
        }
    }

    let lower = to_pos(slider.handle_position(RangeHandle::Lower));
    let upper = to_pos(slider.handle_position(RangeHandle::Upper));
    let span_color = if slider.is_enabled() {
        style_color(style.global.color_selected)
    } else {
        style_color(style.global.color_faded)
    };
    let span = egui::Rect::from_x_y_ranges(lower.x.min(upper.x)..=lower.x.max(upper.x), bar.y_range());
    painter.rect_filled(span, CornerRadius::ZERO, span_color.gamma_multiply(0.5));
    painter.line_segment([pos2(bar.min.x, bar.max.y), pos2(bar.max.x, bar.max.y)], Stroke::new(1.0, span_color));

    let radius = style.range.handle_radius as f32;
    for (handle, region, pos) in [
        (RangeHandle::Lower, RangeRegion::Lower, lower),
        (RangeHandle::Upper, RangeRegion::Upper, upper),
    ] {
        let color = if hovered == Some(region) {
            style_color(style.global.color_hovered)
        } else {
            span_color
        };
        painter.circle_filled(pos, radius, color);
        let anchor = match handle {
            RangeHandle::Lower => Align2::RIGHT_BOTTOM,
            RangeHandle::Upper => Align2::LEFT_BOTTOM,
        };
        paint::text(painter, pos - vec2(0.0, radius), anchor, &slider.value_text(handle), style);
    }

    let pad = style.slider.padding_h as f32;
    paint::text(
        painter,
        pos2(rect.min.x + pad, bar.max.y + 0.5 * (rect.max.y - bar.max.y)),
        Align2::LEFT_CENTER,
        &slider.display_label(),
        style,
    );

    for (region, glyph, active) in [
        (RangeRegion::OnOff, "I", slider.is_enabled()),
        (RangeRegion::Reset, "R", false),
        (RangeRegion::Autorange, "A", slider.is_autorange()),
        (RangeRegion::ResetUnit, "U", false),
    ] {
        let Some(r) = slider.region_rect(region) else {
            continue;
        };
        let r = to_egui_rect(r).shrink(2.0);
        let fill = if active {
            style_color(style.global.color_selected)
        } else {
            Color32::TRANSPARENT
        };
        painter.rect_filled(r, paint::corner_radius(style), fill);
        if hovered == Some(region) {
            painter.rect_stroke(
                r,
                paint::corner_radius(style),
                Stroke::new(style.global.width_hovered as f32, style_color(style.global.color_hovered)),
                StrokeKind::Inside,
            );
        }
        paint::text(painter, r.center(), Align2::CENTER_CENTER, glyph, style);
    }
}
