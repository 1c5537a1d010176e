//! Turns one frame of egui input into the core's pointer and key events.
//!
//! State that must survive between frames (double-click tracking, previous
//! modifiers, whether the pointer was inside) lives in [`EventPump`], which the
//! adapters keep in egui's temporary memory keyed by widget id.

use std::time::Instant;

use dialkit_core::input::{ClickTracker, Key, KeyEvent, Modifiers, PointerEvent};
use egui::{Id, Rect, Ui};

use crate::convert;

/// Everything a control should see this frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub pointer: Vec<PointerEvent>,
    pub keys: Vec<KeyEvent>,
    pub modifiers: Modifiers,
    /// The window lost focus: treat as a release.
    pub focus_lost: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EventPump {
    clicks: ClickTracker,
    modifiers: Modifiers,
    inside: bool,
    focused: bool,
}

impl EventPump {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    /// Read this frame's input for the widget `id` covering `rect`.
    pub fn collect(ui: &Ui, id: Id, rect: Rect) -> FrameInput {
        let mut pump = ui.data(|d| d.get_temp::<EventPump>(id)).unwrap_or_else(EventPump::new);
        let (events, modifiers, focused) = ui.input(|i| (i.events.clone(), i.modifiers, i.focused));
        let frame = pump.translate(&events, &modifiers, focused, rect, Instant::now());
        ui.data_mut(|d| d.insert_temp(id, pump));
        frame
    }

    /// Pointer presses and wheel ticks only count inside `rect`. Moves and
    /// releases always pass so drags keep working outside the widget.
    pub fn translate(
        &mut self,
        events: &[egui::Event],
        modifiers: &egui::Modifiers,
        focused: bool,
        rect: Rect,
        now: Instant,
    ) -> FrameInput {
        let mut frame = FrameInput {
            modifiers: convert::modifiers(modifiers),
            ..Default::default()
        };
        self.modifier_keys(frame.modifiers, &mut frame.keys);

        for event in events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    let inside = rect.contains(*pos);
                    frame.pointer.push(PointerEvent::Move {
                        position: convert::to_point(*pos),
                    });
                    if self.inside && !inside {
                        frame.pointer.push(PointerEvent::Leave);
                    }
                    self.inside = inside;
                }
                egui::Event::PointerButton {
                    pos, button, pressed, ..
                } => {
                    let Some(button) = convert::mouse_button(*button) else {
                        continue;
                    };
                    let position = convert::to_point(*pos);
                    if !*pressed {
                        frame.pointer.push(PointerEvent::Up { position, button });
                    } else if rect.contains(*pos) {
                        frame.pointer.push(self.clicks.press(position, button, now));
                    }
                }
                egui::Event::MouseWheel { delta, .. } if self.inside => {
                    frame.pointer.push(PointerEvent::Scroll {
                        position: self.last_position(&frame).unwrap_or_default(),
                        delta: kurbo::Vec2::new(f64::from(delta.x), f64::from(delta.y)),
                    });
                }
                egui::Event::PointerGone => {
                    if self.inside {
                        frame.pointer.push(PointerEvent::Leave);
                    }
                    self.inside = false;
                }
                egui::Event::Key { key, pressed, .. } if self.inside => {
                    let key = match key {
                        egui::Key::Tab => Key::Tab,
                        egui::Key::Escape => Key::Escape,
                        egui::Key::Enter => Key::Enter,
                        _ => continue,
                    };
                    frame.keys.push(if *pressed {
                        KeyEvent::Pressed(key)
                    } else {
                        KeyEvent::Released(key)
                    });
                }
                egui::Event::Text(text) if self.inside => {
                    frame
                        .keys
                        .extend(text.chars().map(|c| KeyEvent::Pressed(Key::Char(c))));
                }
                _ => {}
            }
        }

        if self.focused && !focused {
            frame.focus_lost = true;
            self.clicks.reset();
        }
        self.focused = focused;
        frame
    }

    /// egui has no key events for bare modifiers, so derive them from the state.
    fn modifier_keys(&mut self, now: Modifiers, keys: &mut Vec<KeyEvent>) {
        let before = self.modifiers;
        for (key, was, is) in [(Key::Ctrl, before.ctrl, now.ctrl), (Key::Shift, before.shift, now.shift)] {
            match (was, is) {
                (false, true) => keys.push(KeyEvent::Pressed(key)),
                (true, false) => keys.push(KeyEvent::Released(key)),
                _ => {}
            }
        }
        self.modifiers = now;
    }

    fn last_position(&self, frame: &FrameInput) -> Option<kurbo::Point> {
        frame.pointer.iter().rev().find_map(PointerEvent::position)
    }
}
