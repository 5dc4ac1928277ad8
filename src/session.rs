use egui::Pos2;

use crate::drawer::Drawer;
use crate::history::History;
use crate::layout::{Layout, Tool};
use crate::scheduler::{FrameScheduler, NullScheduler};
use crate::surface::{PixelSurface, RasterSurface};

/// Gesture phase. One pointer, no nesting: a press that arrives while
/// dragging aborts the active gesture before starting the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Dragging { tool: Tool },
}

/// Orchestrates a drawing surface: owns the gesture state machine and
/// everything it feeds, the in-progress layout buffer, the committed
/// history, and the drawer.
///
/// Pointer coordinates are surface-local. Events that cannot apply (a move
/// with no active gesture, a non-finite coordinate) are ignored rather than
/// treated as errors; nothing malformed ever reaches the history or the
/// drawer.
pub struct DrawingSession<S: RasterSurface = PixelSurface> {
    drawer: Drawer<S>,
    history: History,
    /// Layouts of the active gesture, oldest first; only its last element
    /// may be open.
    buffer: Vec<Layout>,
    gesture: Gesture,
    tool: Tool,
    can_undo: bool,
    can_redo: bool,
    render_loop: bool,
    loop_running: bool,
    render_pending: bool,
    scheduler: Box<dyn FrameScheduler>,
}

impl<S: RasterSurface> DrawingSession<S> {
    /// Session over `drawer`, rendering synchronously on every event.
    pub fn new(drawer: Drawer<S>) -> Self {
        Self::with_scheduler(drawer, Box::new(NullScheduler))
    }

    /// Session whose optional render loop is driven by `scheduler`.
    pub fn with_scheduler(drawer: Drawer<S>, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            drawer,
            history: History::new(),
            buffer: Vec::new(),
            gesture: Gesture::Idle,
            tool: Tool::default(),
            can_undo: false,
            can_redo: false,
            render_loop: false,
            loop_running: false,
            render_pending: false,
            scheduler,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Picks the tool for the next gesture. An active gesture keeps the
    /// tool it started with.
    pub fn select_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            log::info!("tool selected: {}", tool.name());
        }
        self.tool = tool;
    }

    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.can_redo
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn surface(&self) -> &S {
        self.drawer.surface()
    }

    /// Drawer revision, the host's texture re-upload key.
    pub fn revision(&self) -> u64 {
        self.drawer.revision()
    }

    /// Layouts of the gesture in progress, empty while idle.
    pub fn pending_layouts(&self) -> &[Layout] {
        &self.buffer
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn buffering(&self) -> bool {
        self.drawer.buffering()
    }

    pub fn set_buffering(&mut self, enabled: bool) {
        self.drawer.set_buffering(enabled);
    }

    pub fn render_loop(&self) -> bool {
        self.render_loop
    }

    /// Enables per-frame coalescing of move renders. Takes effect when the
    /// next gesture starts; a loop already running keeps going until its
    /// gesture ends.
    pub fn set_render_loop(&mut self, enabled: bool) {
        self.render_loop = enabled;
    }

    /// True while the scheduler is driving frame ticks for an active
    /// gesture; the host calls [`DrawingSession::on_frame`] each tick.
    pub fn loop_running(&self) -> bool {
        self.loop_running
    }

    /// Swaps in a resized surface and repaints the committed drawing onto
    /// it.
    pub fn replace_surface(&mut self, surface: S) {
        self.drawer.replace_surface(surface);
        self.render();
    }

    /// Starts a gesture: an open layout anchored at `pos` joins the buffer
    /// and is rendered right away (a brush already paints its first dot).
    pub fn pointer_pressed(&mut self, pos: Pos2) {
        if !pos.is_finite() {
            return;
        }
        if self.gesture != Gesture::Idle {
            // Only reachable when the host missed a release.
            self.abort_gesture();
        }
        self.gesture = Gesture::Dragging { tool: self.tool };
        self.buffer.push(Layout::open(self.tool, pos));
        if self.render_loop {
            self.scheduler.start();
            self.loop_running = true;
        }
        self.render();
        log::debug!("gesture started at {:?} with {:?}", pos, self.tool);
    }

    /// Reshapes the gesture tip to end at `pos`. The brush instead closes
    /// the tip there and chains a new open layout anchored at `pos`, which
    /// is how a continuous stroke becomes a run of short segments.
    pub fn pointer_moved(&mut self, pos: Pos2) {
        let Gesture::Dragging { tool } = self.gesture else {
            return;
        };
        if !pos.is_finite() {
            return;
        }
        let Some(&tip) = self.buffer.last() else {
            return;
        };
        let idx = self.buffer.len() - 1;
        self.buffer[idx] = tip.close_at(pos);
        if tool == Tool::Brush {
            self.buffer.push(Layout::open(Tool::Brush, pos));
        }
        self.request_render();
    }

    /// Ends the gesture and commits its layouts as one history step. The
    /// commit drops the stale redo branch, so redo is exhausted afterwards.
    pub fn pointer_released(&mut self) {
        if !self.is_dragging() {
            return;
        }
        self.stop_loop();
        self.gesture = Gesture::Idle;
        let layouts = self.take_gesture_layouts();
        if !layouts.is_empty() {
            self.history.add_step(layouts);
            log::info!(
                "committed step {} of {}",
                self.history.current_step(),
                self.history.last_step_index()
            );
        }
        self.refresh_edit_state();
        self.render();
    }

    /// The pointer left the drawing surface mid-gesture: the gesture aborts,
    /// nothing is committed, and the canvas reverts to the committed state.
    pub fn pointer_exited(&mut self) {
        if !self.is_dragging() {
            return;
        }
        self.abort_gesture();
        self.render();
        log::debug!(
            "gesture aborted, reverted to step {}",
            self.history.current_step()
        );
    }

    /// Steps one back and re-renders. Safe at the floor; the render then
    /// degenerates to a no-op inside the drawer.
    pub fn undo(&mut self) {
        if self.history.undo() {
            log::info!("undo to step {}", self.history.current_step());
        }
        self.refresh_edit_state();
        self.render();
    }

    /// Steps one forward and re-renders. Safe at the ceiling.
    pub fn redo(&mut self) {
        if self.history.redo() {
            log::info!("redo to step {}", self.history.current_step());
        }
        self.refresh_edit_state();
        self.render();
    }

    /// Drops the whole drawing: aborts any active gesture, empties the
    /// history, repaints the blank surface.
    pub fn clear(&mut self) {
        self.abort_gesture();
        self.history.clear();
        self.refresh_edit_state();
        self.render();
        log::info!("canvas cleared");
    }

    /// Frame tick while the render loop runs: performs the one coalesced
    /// render covering every move since the previous tick.
    pub fn on_frame(&mut self) {
        if self.loop_running && self.render_pending {
            self.render_pending = false;
            self.render();
        }
    }

    /// Hands the drawer the full candidate sequence: applied history steps
    /// flattened, then the in-progress buffer. Idempotent between state
    /// changes because the drawer diffs against its own cache.
    pub fn render(&mut self) {
        let mut layouts: Vec<Layout> = self
            .history
            .current_steps()
            .iter()
            .flat_map(|step| step.layouts().iter().copied())
            .collect();
        layouts.extend(self.buffer.iter().copied());
        self.drawer.update(layouts);
    }

    fn request_render(&mut self) {
        if self.loop_running {
            self.render_pending = true;
        } else {
            self.render();
        }
    }

    fn stop_loop(&mut self) {
        if self.loop_running {
            self.scheduler.stop();
            self.loop_running = false;
        }
        // Callers render synchronously right after stopping.
        self.render_pending = false;
    }

    fn abort_gesture(&mut self) {
        self.stop_loop();
        self.buffer.clear();
        self.gesture = Gesture::Idle;
    }

    /// Drains the gesture buffer into the committable layout group.
    ///
    /// Committed steps hold closed layouts only. A trailing open brush tip
    /// behind at least one closed segment is dropped, since it sits exactly
    /// on the previous segment's end point. Any other open tip (a click
    /// without movement) collapses to a zero-length layout, which is what
    /// makes such a click commit a brush dot or a degenerate shape.
    fn take_gesture_layouts(&mut self) -> Vec<Layout> {
        let mut layouts = std::mem::take(&mut self.buffer);
        if let Some(&tip) = layouts.last() {
            if tip.is_open() {
                if tip.tool() == Tool::Brush && layouts.len() > 1 {
                    layouts.pop();
                } else {
                    let idx = layouts.len() - 1;
                    layouts[idx] = tip.collapse();
                }
            }
        }
        layouts
    }

    fn refresh_edit_state(&mut self) {
        self.can_undo = self.history.can_undo();
        self.can_redo = self.history.can_redo();
    }
}
