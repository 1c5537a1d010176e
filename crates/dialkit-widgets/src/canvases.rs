//! Canvas adapters: point set, scalar field, curve, vector and 2D point.

use dialkit_core::controls::{CurveEditor, FieldCanvas, Point2DSelector, PointCanvas, VectorEditor};
use egui::{
    Align2, Color32, ColorImage, Id, Rect, Response, Sense, Shape, Stroke, TextureHandle, TextureOptions, Ui, pos2,
    vec2,
};

use crate::Outcome;
use crate::convert::{style_color, to_egui_rect, to_kurbo_rect, to_point, to_pos};
use crate::events::{EventPump, FrameInput};
use crate::paint;
use crate::pickers::{Answer, DeferredConfirm};
use crate::sizing;

/// Allocate a canvas of `min_width` x `aspect` and sync the control's rect.
fn allocate(ui: &mut Ui, min_width: f64, aspect: f32, rect_of: impl FnOnce(kurbo::Rect)) -> (Rect, Response, FrameInput) {
    let width = ui.available_width().max(min_width as f32);
    let (rect, response) = ui.allocate_exact_size(vec2(width, width * aspect), Sense::click_and_drag());
    rect_of(to_kurbo_rect(rect));
    let input = EventPump::collect(ui, response.id, rect);
    (rect, response, input)
}

pub fn show_point_canvas(ui: &mut Ui, canvas: &mut PointCanvas) -> Response {
    let min_width = canvas.style().global.width_min;
    let (rect, mut response, input) = allocate(ui, min_width, sizing::CANVAS_ASPECT, |r| {
        if canvas.rect() != r {
            canvas.set_rect(r);
        }
    });
    let mut outcome = Outcome::default();
    for event in &input.pointer {
        outcome.merge(canvas.handle_pointer(event, input.modifiers));
    }
    if input.focus_lost {
        outcome.merge(canvas.focus_lost());
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let style = canvas.style();
        paint::panel(painter, rect, response.hovered(), style);
        paint::text(painter, rect.left_top() + vec2(4.0, 2.0), Align2::LEFT_TOP, &canvas.display_label(), style);

        let points = canvas.points();
        let screen: Vec<egui::Pos2> = (0..points.len())
            .filter_map(|i| points.get(i))
            .map(|(x, y, _)| to_pos(canvas.to_screen(x, y)))
            .collect();
        if canvas.connected_points() {
            paint::polyline(painter, screen.clone(), style_color(style.global.color_border), 1.0);
        }

        let radius = style.canvas.point_radius as f32;
        let hovered = canvas.hovered_point();
        for (i, pos) in screen.iter().enumerate() {
            let color = if hovered == Some(i) {
                style_color(style.global.color_hovered)
            } else {
                style_color(style.global.color_selected)
            };
            painter.circle_filled(*pos, radius, color);
            if canvas.draw_z_value() {
                if let Some((_, _, z)) = points.get(i) {
                    let width = style.canvas.value_arc_width as f32;
                    paint::arc(
                        painter,
                        *pos,
                        radius + 0.5 * width,
                        z as f32,
                        Stroke::new(width, style_color(style.global.color_faded)),
                    );
                }
            }
        }
        if let Some(text) = hovered.and_then(|i| canvas.value_text(i)) {
            paint::text(painter, rect.left_bottom() + vec2(4.0, -2.0), Align2::LEFT_BOTTOM, &text, style);
        }
    }

    outcome.apply(ui, &mut response);
    response
}

/// Texture cache for a [`FieldCanvas`]. Keep one per canvas across frames.
#[derive(Default)]
pub struct FieldView {
    texture: Option<TextureHandle>,
    showing_angle: bool,
    stale: bool,
}

impl FieldView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-upload on the next frame, e.g. after the host replaced the data.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    fn image(canvas: &FieldCanvas) -> ColorImage {
        let data = if canvas.angle_mode() {
            canvas.field_angle_data()
        } else {
            canvas.field_data()
        };
        let gray: Vec<u8> = data.iter().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8).collect();
        ColorImage::from_gray([canvas.field_width(), canvas.field_height()], &gray)
    }

    fn refresh(&mut self, ui: &Ui, canvas: &FieldCanvas, changed: bool) {
        let needs_upload = changed || self.stale || self.showing_angle != canvas.angle_mode();
        match &mut self.texture {
            Some(texture) if needs_upload => texture.set(Self::image(canvas), TextureOptions::NEAREST),
            Some(_) => {}
            None => {
                self.texture = Some(ui.ctx().load_texture(canvas.label(), Self::image(canvas), TextureOptions::NEAREST));
            }
        }
        self.showing_angle = canvas.angle_mode();
        self.stale = false;
    }
}

/// Show a field canvas. `c` asks before clearing, answered in a window.
pub fn show_field_canvas(ui: &mut Ui, canvas: &mut FieldCanvas, view: &mut FieldView) -> Response {
    let min_width = canvas.style().global.width_min;
    let aspect = if canvas.field_width() > 0 {
        canvas.field_height() as f32 / canvas.field_width() as f32
    } else {
        sizing::CANVAS_ASPECT
    };
    let (rect, mut response, input) = allocate(ui, min_width, aspect, |r| {
        if canvas.rect() != r {
            canvas.set_rect(r);
        }
    });

    let mut outcome = Outcome::default();
    let mut confirm = DeferredConfirm::default();
    for key in &input.keys {
        outcome.merge(canvas.handle_key(*key, &mut confirm));
    }
    for event in &input.pointer {
        outcome.merge(canvas.handle_pointer(event, input.modifiers));
    }
    if input.focus_lost {
        outcome.merge(canvas.focus_lost());
    }

    let clear_id = response.id.with("clear");
    if let Some(message) = confirm.take_request() {
        ui.data_mut(|d| d.insert_temp(clear_id, message));
    }
    if confirm_window(ui, clear_id) {
        outcome.merge(canvas.request_clear(&mut Answer(true)));
    }

    view.refresh(ui, canvas, outcome.changed);

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let style = canvas.style();
        paint::panel(painter, rect, response.hovered(), style);
        let image = to_egui_rect(canvas.image_rect());
        if let Some(texture) = &view.texture {
            painter.image(
                texture.id(),
                image,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        paint::text(painter, rect.left_top() + vec2(4.0, 2.0), Align2::LEFT_TOP, &canvas.display_label(), style);

        if let Some(hover) = response.hover_pos() {
            if canvas.is_on_image(to_point(hover)) && canvas.field_width() > 0 {
                let scale = image.width() / canvas.field_width() as f32;
                painter.circle_stroke(
                    hover,
                    canvas.brush().radius() as f32 * scale,
                    Stroke::new(1.0, style_color(style.global.color_hovered)),
                );
            }
        }
        if let Some(hint) = canvas.brush_hint() {
            paint::text(painter, rect.right_top() + vec2(-4.0, 2.0), Align2::RIGHT_TOP, &hint, style);
        }
    }

    outcome.apply(ui, &mut response);
    response
}

/// Shows the pending question stored under `id`. True once confirmed.
fn confirm_window(ui: &Ui, id: Id) -> bool {
    let Some(message) = ui.data(|d| d.get_temp::<String>(id)) else {
        return false;
    };
    let mut answer = None;
    egui::Window::new("Confirm")
        .id(id)
        .collapsible(false)
        .resizable(false)
        .show(ui.ctx(), |ui| {
            ui.label(&message);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    answer = Some(true);
                }
                if ui.button("No").clicked() {
                    answer = Some(false);
                }
            });
        });
    match answer {
        Some(confirmed) => {
            ui.data_mut(|d| d.remove::<String>(id));
            confirmed
        }
        None => false,
    }
}

pub fn show_curve_editor(ui: &mut Ui, editor: &mut CurveEditor) -> Response {
    let min_width = editor.style().global.width_min;
    let (rect, mut response, input) = allocate(ui, min_width, sizing::CANVAS_ASPECT, |r| {
        if editor.rect() != r {
            editor.set_rect(r);
        }
    });
    let mut outcome = Outcome::default();
    for event in &input.pointer {
        outcome.merge(editor.handle_pointer(event));
    }
    if input.focus_lost {
        outcome.merge(editor.focus_lost());
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let style = editor.style();
        paint::panel(painter, rect, response.hovered(), style);
        paint::border(painter, to_egui_rect(editor.plot_rect()), style);
        paint::text(painter, rect.left_top() + vec2(4.0, 2.0), Align2::LEFT_TOP, &editor.display_label(), style);

        let model = editor.model();
        let n = sizing::CURVE_RESOLUTION;
        let curve: Vec<egui::Pos2> = (0..=n)
            .map(|i| {
                let t = i as f64 / n as f64;
                to_pos(editor.point_to_screen(kurbo::Point::new(t, model.interpolate(t))))
            })
            .collect();
        paint::polyline(painter, curve, style_color(style.global.color_selected), 1.5);

        if style.curve.draw_sampling_points {
            let r = style.curve.sampling_point_radius as f32;
            for p in editor.sample_positions() {
                painter.circle_filled(to_pos(p), r, style_color(style.global.color_faded));
            }
        }

        let radius = style.global.radius as f32;
        let hovered = editor.hovered_point();
        for (i, p) in editor.points().iter().enumerate() {
            let color = if hovered == Some(i) {
                style_color(style.global.color_hovered)
            } else {
                style_color(style.global.color_text)
            };
            painter.circle_filled(to_pos(editor.point_to_screen(*p)), radius, color);
        }
    }

    outcome.apply(ui, &mut response);
    response
}

pub fn show_vector_editor(ui: &mut Ui, editor: &mut VectorEditor) -> Response {
    let min_width = editor.style().global.width_min;
    let (rect, mut response, input) = allocate(ui, min_width, sizing::CANVAS_ASPECT, |r| {
        if editor.rect() != r {
            editor.set_rect(r);
        }
    });
    let mut outcome = Outcome::default();
    for event in &input.pointer {
        outcome.merge(editor.handle_pointer(event));
    }
    if input.focus_lost {
        outcome.merge(editor.focus_lost());
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let style = editor.style();
        paint::panel(painter, rect, editor.is_hovered(), style);
        paint::text(painter, rect.left_top() + vec2(4.0, 2.0), Align2::LEFT_TOP, &editor.display_label(), style);

        let area = to_egui_rect(editor.value_area());
        let positions: Vec<egui::Pos2> = (0..editor.values().len())
            .filter_map(|i| editor.index_to_screen(i))
            .map(to_pos)
            .collect();
        let stroke = Stroke::new(1.0, style_color(style.global.color_faded));
        for p in &positions {
            painter.line_segment([pos2(p.x, area.max.y), *p], stroke);
        }
        paint::polyline(painter, positions.clone(), style_color(style.global.color_selected), 1.5);
        let active = editor.active_index();
        for (i, p) in positions.iter().enumerate() {
            let color = if active == Some(i) {
                style_color(style.global.color_hovered)
            } else {
                style_color(style.global.color_selected)
            };
            painter.circle_filled(*p, style.global.radius as f32, color);
        }
    }

    outcome.apply(ui, &mut response);
    response
}

pub fn show_point2d_selector(ui: &mut Ui, selector: &mut Point2DSelector) -> Response {
    let min_width = selector.style().global.width_min;
    let (rect, mut response, input) = allocate(ui, min_width, sizing::CANVAS_ASPECT, |r| {
        if selector.rect() != r {
            selector.set_rect(r);
        }
    });
    let mut outcome = Outcome::default();
    for event in &input.pointer {
        outcome.merge(selector.handle_pointer(event));
    }
    if input.focus_lost {
        outcome.merge(selector.focus_lost());
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let style = selector.style();
        let area = to_egui_rect(selector.area());
        paint::panel(painter, rect, response.hovered(), style);
        paint::border(painter, area, style);

        let axis = Stroke::new(1.0, style_color(style.global.color_faded));
        let (zero_x, zero_y) = selector.zero_axes();
        if let Some(x) = zero_x {
            let x = x as f32;
            painter.extend(Shape::dashed_line(&[pos2(x, area.min.y), pos2(x, area.max.y)], axis, 4.0, 4.0));
        }
        if let Some(y) = zero_y {
            let y = y as f32;
            painter.extend(Shape::dashed_line(&[pos2(area.min.x, y), pos2(area.max.x, y)], axis, 4.0, 4.0));
        }

        let point = to_pos(selector.to_screen(selector.value()));
        let color = if selector.is_point_hovered() || selector.is_dragging() {
            style_color(style.global.color_hovered)
        } else {
            style_color(style.global.color_selected)
        };
        painter.circle_filled(point, style.canvas.point_radius as f32, color);

        paint::text(painter, area.left_top() + vec2(4.0, 2.0), Align2::LEFT_TOP, &selector.display_label(), style);
        if selector.show_value() {
            paint::text(
                painter,
                area.left_bottom() + vec2(4.0, -2.0),
                Align2::LEFT_BOTTOM,
                &selector.value_text(),
                style,
            );
        }
    }

    outcome.apply(ui, &mut response);
    response
}
