use egui::{Context, Pos2, Rect};

/// Pointer activity on the drawing surface, in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button went down inside the surface.
    Pressed(Pos2),
    /// Pointer moved while inside the surface.
    Moved(Pos2),
    /// Primary button came up inside the surface.
    Released,
    /// Pointer left the surface or the whole window.
    Exited,
}

/// Turns egui's per-frame pointer state into [`PointerEvent`]s against the
/// canvas rectangle.
///
/// egui reports at most one pointer position per frame, so a frame yields at
/// most one move. Exits are detected by comparing canvas membership across
/// frames, which also covers the pointer leaving the window mid-drag.
pub struct PointerTracker {
    canvas_rect: Rect,
    last_pos: Option<Pos2>,
    was_inside: bool,
}

impl PointerTracker {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            last_pos: None,
            was_inside: false,
        }
    }

    /// Updates the canvas rectangle (panel moved or resized).
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn to_local(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    /// Reads this frame's pointer state and returns the events it implies,
    /// in application order: exit first, then move, press, release.
    pub fn process(&mut self, ctx: &Context) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let inside = hover.is_some_and(|pos| self.canvas_rect.contains(pos));

            if self.was_inside && !inside {
                events.push(PointerEvent::Exited);
            }

            if let Some(pos) = hover {
                if inside && self.last_pos != Some(pos) {
                    events.push(PointerEvent::Moved(self.to_local(pos)));
                }
            }

            if input.pointer.primary_pressed() && inside {
                if let Some(pos) = hover {
                    events.push(PointerEvent::Pressed(self.to_local(pos)));
                }
            }

            if input.pointer.primary_released() && inside {
                events.push(PointerEvent::Released);
            }

            self.last_pos = hover;
            self.was_inside = inside;
        });

        events
    }
}
