//! Color swatch and gradient editor adapters.
//!
//! Both controls ask for colors through a [`ModalPicker`]. Here the request is
//! deferred: the first frame opens a window with egui's color picker, and the
//! chosen color is handed back as an [`Answer`] once the user confirms.
//!
//! [`ModalPicker`]: dialkit_core::picker::ModalPicker

use dialkit_core::controls::{ColorPicker, GradientEditor, Preset};
use dialkit_core::input::{MouseButton, PointerEvent};
use egui::color_picker::{Alpha, color_picker_color32};
use egui::{Align2, Color32, CornerRadius, Id, Response, Sense, Stroke, StrokeKind, Ui, pos2, vec2};
use peniko::Color;

use crate::Outcome;
use crate::convert::{from_color32, style_color, to_color32, to_egui_rect, to_kurbo_rect, to_point};
use crate::events::EventPump;
use crate::paint;
use crate::pickers::{Answer, DeferredPicker};
use crate::sizing;

/// Open picker window: what it edits and the color being chosen.
#[derive(Debug, Clone, Copy)]
struct PickerWindow {
    stop: Option<usize>,
    color: Color32,
}

/// Outcome of showing a picker window for one frame.
enum PickerAnswer {
    Pending,
    Confirmed(Option<usize>, Color),
    Cancelled,
}

fn open_window(ui: &Ui, id: Id, stop: Option<usize>, color: Color) {
    let window = PickerWindow {
        stop,
        color: to_color32(color),
    };
    ui.data_mut(|d| d.insert_temp(id, window));
}

fn picker_window(ui: &Ui, id: Id, title: &str) -> PickerAnswer {
    let Some(mut window) = ui.data(|d| d.get_temp::<PickerWindow>(id)) else {
        return PickerAnswer::Pending;
    };
    let mut answer = PickerAnswer::Pending;
    egui::Window::new(title)
        .id(id)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            color_picker_color32(ui, &mut window.color, Alpha::OnlyBlend);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    answer = PickerAnswer::Confirmed(window.stop, from_color32(window.color));
                }
                if ui.button("Cancel").clicked() {
                    answer = PickerAnswer::Cancelled;
                }
            });
        });
    if let PickerAnswer::Pending = answer {
        ui.data_mut(|d| d.insert_temp(id, window));
    } else {
        ui.data_mut(|d| d.remove::<PickerWindow>(id));
    }
    answer
}

/// Show a color swatch. Clicking it opens a color window.
pub fn show_color_picker(ui: &mut Ui, control: &mut ColorPicker) -> Response {
    let width = ui.available_width().max(control.style().global.width_min as f32);
    let height = control.style().slider.row_height as f32;
    let (rect, mut response) = ui.allocate_exact_size(vec2(width, height), Sense::click());
    let bounds = to_kurbo_rect(rect);
    if control.rect() != bounds {
        control.set_rect(bounds);
    }

    let input = EventPump::collect(ui, response.id, rect);
    let mut outcome = Outcome::default();
    let mut picker = DeferredPicker::new();
    for event in &input.pointer {
        outcome.merge(control.handle_pointer(event, &mut picker));
    }

    let window_id = response.id.with("picker");
    if let Some(current) = picker.take_request() {
        open_window(ui, window_id, None, current);
    }
    if let PickerAnswer::Confirmed(_, color) = picker_window(ui, window_id, &control.display_label()) {
        if control.pick(&mut Answer(color)) {
            outcome.commit();
        }
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let style = control.style();
        paint::panel(painter, rect, control.is_hovered(), style);
        let pad = style.slider.padding_h as f32;
        paint::text(painter, pos2(rect.min.x + pad, rect.center().y), Align2::LEFT_CENTER, &control.display_label(), style);
        let swatch = egui::Rect::from_min_max(
            pos2(rect.center().x, rect.min.y + pad),
            pos2(rect.max.x - pad, rect.max.y - pad),
        );
        painter.rect_filled(swatch, paint::corner_radius(style), to_color32(control.color()));
    }

    outcome.apply(ui, &mut response);
    response
}

/// Show a gradient editor. Double click a stop to recolor it, double click
/// the bar to add one, right click a stop to remove it. Right click elsewhere
/// lists the presets.
pub fn show_gradient_editor(ui: &mut Ui, editor: &mut GradientEditor) -> Response {
    let width = ui.available_width().max(editor.style().global.width_min as f32);
    let height = 2.0 * editor.style().slider.row_height as f32;
    let (rect, mut response) = ui.allocate_exact_size(vec2(width, height), Sense::click_and_drag());
    let bounds = to_kurbo_rect(rect);
    if editor.rect() != bounds {
        editor.set_rect(bounds);
    }

    let input = EventPump::collect(ui, response.id, rect);
    let mut outcome = Outcome::default();
    let mut picker = DeferredPicker::new();
    let mut right_press = None;
    for event in &input.pointer {
        let r = editor.handle_pointer(event, &mut picker);
        outcome.merge(r);
        match *event {
            PointerEvent::Down {
                button: MouseButton::Right,
                ..
            } => right_press = Some(r.menu_requested),
            PointerEvent::DoubleClick {
                position,
                button: MouseButton::Left,
            } => {
                if let Some(current) = picker.take_request() {
                    open_window(ui, response.id.with("picker"), editor.stop_at(position), current);
                }
            }
            _ => {}
        }
    }
    if input.focus_lost {
        outcome.merge(editor.focus_lost());
    }

    match picker_window(ui, response.id.with("picker"), &editor.display_label()) {
        PickerAnswer::Confirmed(Some(stop), color) => {
            if editor.set_stop_color(stop, color) {
                outcome.commit();
            }
        }
        PickerAnswer::Confirmed(None, _) | PickerAnswer::Cancelled | PickerAnswer::Pending => {}
    }

    if ui.is_rect_visible(rect) {
        paint_gradient(ui, editor);
    }

    // Remember whether the right press wanted the menu: egui opens it on release.
    let menu_id = response.id.with("presets");
    if let Some(wanted) = right_press {
        ui.data_mut(|d| d.insert_temp(menu_id, wanted));
    }
    if !response.secondary_clicked() || ui.data(|d| d.get_temp::<bool>(menu_id)).unwrap_or(false) {
        response.context_menu(|ui| {
            for preset in Preset::ALL {
                if ui.button(preset.name()).clicked() {
                    editor.apply_preset(preset);
                    outcome.commit();
                    ui.close();
                }
            }
        });
    }

    outcome.apply(ui, &mut response);
    response
}

fn paint_gradient(ui: &Ui, editor: &GradientEditor) {
    let painter = ui.painter();
    let style = editor.style();
    let rect = to_egui_rect(editor.rect());
    let bar = to_egui_rect(editor.bar_rect());
    paint::panel(painter, rect, false, style);

    let n = sizing::GRADIENT_SLICES;
    let w = bar.width() / n as f32;
    for i in 0..n {
        let t = (i as f64 + 0.5) / n as f64;
        let x = bar.min.x + i as f32 * w;
        let slice = egui::Rect::from_min_max(pos2(x, bar.min.y), pos2(x + w + 0.5, bar.max.y));
        painter.rect_filled(slice, CornerRadius::ZERO, to_color32(editor.sample(t)));
    }
    paint::border(painter, bar, style);

    let hover = ui.input(|i| i.pointer.hover_pos()).map(to_point);
    let hovered = hover.and_then(|p| editor.stop_at(p));
    for (i, stop) in editor.stops().iter().enumerate() {
        let marker = to_egui_rect(editor.stop_rect(stop));
        painter.rect_filled(marker, CornerRadius::ZERO, to_color32(stop.color));
        let stroke = if editor.selected_stop() == Some(i) || hovered == Some(i) {
            Stroke::new(style.global.width_hovered as f32 + 1.0, style_color(style.global.color_hovered))
        } else {
            Stroke::new(style.global.width_border as f32, style_color(style.global.color_border))
        };
        painter.rect_stroke(marker, CornerRadius::ZERO, stroke, StrokeKind::Outside);
    }
}
