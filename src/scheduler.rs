use egui::Context;

/// Frame-tick capability injected into the drawing session.
///
/// While started, the host calls the session's `on_frame` once per tick so
/// a burst of move events coalesces into a single render. The session
/// performs its own final render when it stops the scheduler, so
/// implementations only start and stop the tick source.
pub trait FrameScheduler {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Scheduler for hosts without a frame loop. Sessions built on it render
/// synchronously on every event; headless tests use it as the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScheduler;

impl FrameScheduler for NullScheduler {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

/// egui-backed scheduler. Starting requests an immediate repaint; the app
/// keeps requesting one per frame for as long as the session reports its
/// loop running, which is what turns egui's reactive rendering into a
/// steady tick.
pub struct RepaintScheduler {
    ctx: Context,
}

impl RepaintScheduler {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn start(&mut self) {
        self.ctx.request_repaint();
    }

    fn stop(&mut self) {}
}
