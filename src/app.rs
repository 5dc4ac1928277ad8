use egui::Rect;

use crate::drawer::{BACKGROUND, Drawer};
use crate::input::{PointerEvent, PointerTracker};
use crate::layout::Tool;
use crate::panels;
use crate::scheduler::RepaintScheduler;
use crate::session::DrawingSession;
use crate::surface::{PixelSurface, RasterSurface};

/// We derive Deserialize/Serialize so we can persist UI settings on shutdown.
/// Drawings themselves are never persisted.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SketchApp {
    tool: Tool,
    buffering: bool,
    render_loop: bool,
    // Runtime state is rebuilt on launch once the canvas size is known.
    #[serde(skip)]
    session: Option<DrawingSession>,
    #[serde(skip)]
    tracker: Option<PointerTracker>,
    #[serde(skip)]
    texture: Option<egui::TextureHandle>,
    #[serde(skip)]
    uploaded_revision: Option<u64>,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            buffering: false,
            render_loop: false,
            session: None,
            tracker: None,
            texture: None,
            uploaded_revision: None,
        }
    }
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            return eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        }
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
        if let Some(session) = &mut self.session {
            session.select_tool(tool);
        }
    }

    pub fn buffering(&self) -> bool {
        self.buffering
    }

    pub fn set_buffering(&mut self, enabled: bool) {
        self.buffering = enabled;
        if let Some(session) = &mut self.session {
            session.set_buffering(enabled);
        }
    }

    pub fn render_loop(&self) -> bool {
        self.render_loop
    }

    pub fn set_render_loop(&mut self, enabled: bool) {
        self.render_loop = enabled;
        if let Some(session) = &mut self.session {
            session.set_render_loop(enabled);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.can_redo())
    }

    pub fn undo(&mut self) {
        if let Some(session) = &mut self.session {
            session.undo();
        }
    }

    pub fn redo(&mut self) {
        if let Some(session) = &mut self.session {
            session.redo();
        }
    }

    pub fn clear(&mut self) {
        if let Some(session) = &mut self.session {
            session.clear();
        }
    }

    /// Step readout for the status line: (applied, committed).
    pub fn step_bounds(&self) -> (usize, usize) {
        self.session.as_ref().map_or((0, 0), |s| {
            (s.history().current_step(), s.history().last_step_index())
        })
    }

    /// Keeps the pixel surface matched to the canvas rectangle, creating the
    /// session on the first laid-out frame and swapping in a resized surface
    /// whenever the available area changes.
    pub fn prepare_canvas(&mut self, ctx: &egui::Context, canvas_rect: Rect) {
        let width = canvas_rect.width().round().max(1.0) as usize;
        let height = canvas_rect.height().round().max(1.0) as usize;

        match &mut self.session {
            Some(session) => {
                if session.surface().size() != (width, height) {
                    match PixelSurface::new(width, height, BACKGROUND) {
                        Ok(surface) => session.replace_surface(surface),
                        Err(err) => log::error!("canvas resize failed: {err}"),
                    }
                }
            }
            None => match PixelSurface::new(width, height, BACKGROUND) {
                Ok(surface) => {
                    let scheduler = Box::new(RepaintScheduler::new(ctx.clone()));
                    let mut session = DrawingSession::with_scheduler(Drawer::new(surface), scheduler);
                    session.select_tool(self.tool);
                    session.set_buffering(self.buffering);
                    session.set_render_loop(self.render_loop);
                    self.session = Some(session);
                    log::info!("canvas ready at {width}x{height}");
                }
                Err(err) => log::error!("canvas setup failed: {err}"),
            },
        }

        match &mut self.tracker {
            Some(tracker) => tracker.set_canvas_rect(canvas_rect),
            None => self.tracker = Some(PointerTracker::new(canvas_rect)),
        }
    }

    /// Feeds this frame's pointer activity into the session.
    pub fn route_pointer_input(&mut self, ctx: &egui::Context) {
        let (Some(session), Some(tracker)) = (&mut self.session, &mut self.tracker) else {
            return;
        };
        for event in tracker.process(ctx) {
            match event {
                PointerEvent::Pressed(pos) => session.pointer_pressed(pos),
                PointerEvent::Moved(pos) => session.pointer_moved(pos),
                PointerEvent::Released => session.pointer_released(),
                PointerEvent::Exited => session.pointer_exited(),
            }
        }
    }

    /// Runs the coalesced render tick and keeps frames coming while the
    /// session's render loop is active.
    pub fn tick_frame(&mut self, ctx: &egui::Context) {
        let Some(session) = &mut self.session else {
            return;
        };
        if session.loop_running() {
            session.on_frame();
            ctx.request_repaint();
        }
    }

    /// Uploads the pixel surface into an egui texture when the drawer
    /// revision advanced, and returns what the canvas should display.
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        let session = self.session.as_ref()?;
        let revision = session.revision();
        if self.uploaded_revision != Some(revision) || self.texture.is_none() {
            let image = session.surface().image().clone();
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("sketch_canvas", image, egui::TextureOptions::NEAREST));
                }
            }
            self.uploaded_revision = Some(revision);
        }
        self.texture.as_ref()
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::toolbar(self, ctx);
        panels::canvas_panel(self, ctx);
    }
}
