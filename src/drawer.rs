use egui::{Color32, vec2};

use crate::layout::{Layout, Tool};
use crate::surface::RasterSurface;

/// Stroke thickness shared by every tool.
pub const STROKE_WEIGHT: f32 = 4.0;

/// Fixed palette: color selection is out of scope, the drawer always paints
/// black ink on a white background.
pub const INK: Color32 = Color32::BLACK;
pub const BACKGROUND: Color32 = Color32::WHITE;

/// Incremental rasterizer.
///
/// Owns the surface and the layout sequence that is actually on its pixels
/// (the cache). [`Drawer::update`] diffs a candidate sequence against the
/// cache and picks between a full repaint, a lone appended rasterization
/// (buffering mode), or nothing at all. The cache is the sole diff input; it
/// is never rebuilt from history because in-progress layouts are merged into
/// the candidate before it gets here.
pub struct Drawer<S> {
    surface: S,
    cache: Vec<Layout>,
    buffering: bool,
    revision: u64,
}

impl<S: RasterSurface> Drawer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            cache: Vec::new(),
            buffering: false,
            revision: 0,
        }
    }

    /// The surface the drawer paints into.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Layouts currently on the surface.
    pub fn cache(&self) -> &[Layout] {
        &self.cache
    }

    /// Counts pixel-changing updates. Hosts re-upload the surface to the
    /// screen when this advances and skip the copy otherwise.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn buffering(&self) -> bool {
        self.buffering
    }

    /// Enables rasterizing a strict single append on top of the existing
    /// pixels instead of replaying the whole sequence.
    pub fn set_buffering(&mut self, buffering: bool) {
        self.buffering = buffering;
    }

    /// Swaps the backing surface (host resize) and forgets the cache, so the
    /// next update repaints from scratch and hosts re-upload.
    pub fn replace_surface(&mut self, surface: S) {
        self.surface = surface;
        self.cache.clear();
        self.revision += 1;
    }

    /// Diffs `layouts` against the cache and repaints only the delta.
    ///
    /// Buffering handles the one shape everything here changes by: a single
    /// new layout on an otherwise untouched sequence. Everything else is
    /// either a full repaint (length or tip changed) or a no-op.
    pub fn update(&mut self, layouts: Vec<Layout>) {
        if self.buffering && self.is_strict_append(&layouts) {
            let appended = layouts[layouts.len() - 1];
            self.rasterize(&appended);
            self.cache = layouts;
            self.revision += 1;
            log::debug!("rasterized appended layout, revision {}", self.revision);
            return;
        }

        if layouts.len() != self.cache.len() {
            self.repaint(layouts);
            return;
        }

        // Same length: only the tip can differ, and only while a gesture is
        // reshaping it. Interior layouts are immutable once committed.
        let tip_changed = match (layouts.last(), self.cache.last()) {
            (Some(new_tip), Some(old_tip)) => new_tip != old_tip,
            _ => false,
        };
        if tip_changed {
            self.repaint(layouts);
        }
    }

    /// True when `layouts` extends the cache by exactly one element over an
    /// unchanged prefix. Only then does painting the newcomer on top of the
    /// existing pixels reproduce a full replay exactly; rasterization is a
    /// pure function of the sequence, so the shared prefix contributes the
    /// same pixels either way.
    fn is_strict_append(&self, layouts: &[Layout]) -> bool {
        !self.cache.is_empty()
            && layouts.len() == self.cache.len() + 1
            && layouts[..self.cache.len()] == self.cache[..]
    }

    fn repaint(&mut self, layouts: Vec<Layout>) {
        self.surface.clear(BACKGROUND);
        for layout in &layouts {
            self.rasterize(layout);
        }
        self.cache = layouts;
        self.revision += 1;
        log::debug!(
            "full repaint of {} layouts, revision {}",
            self.cache.len(),
            self.revision
        );
    }

    fn rasterize(&mut self, layout: &Layout) {
        match layout.tool() {
            Tool::Rect => self.draw_rect(layout),
            Tool::Circle => self.draw_circle(layout),
            Tool::Line => self.draw_line(layout),
            Tool::Brush => self.draw_brush(layout),
        }
    }

    /// Outer ink fill, then an inset background fill when both dimensions
    /// leave room for the stroke on each side. Simulates a stroked,
    /// unfilled rectangle without any blending.
    fn draw_rect(&mut self, layout: &Layout) {
        if layout.is_open() {
            return;
        }
        let (min, max) = layout.normalized();
        self.surface.fill_rect(min, max, INK);
        if max.x - min.x > 2.0 * STROKE_WEIGHT && max.y - min.y > 2.0 * STROKE_WEIGHT {
            let inset = vec2(STROKE_WEIGHT, STROKE_WEIGHT);
            self.surface.fill_rect(min + inset, max - inset, BACKGROUND);
        }
    }

    /// Center is the anchor, radius the distance to the drag point; same
    /// outer-fill/inner-fill technique as the rectangle.
    fn draw_circle(&mut self, layout: &Layout) {
        let Some(drag) = layout.drag() else {
            return;
        };
        let center = layout.anchor();
        let radius = center.distance(drag);
        self.surface.fill_circle(center, radius, INK);
        if radius > 2.0 * STROKE_WEIGHT {
            self.surface.fill_circle(center, radius - STROKE_WEIGHT, BACKGROUND);
        }
    }

    /// Raw endpoints, direction preserved.
    fn draw_line(&mut self, layout: &Layout) {
        let Some(drag) = layout.drag() else {
            return;
        };
        self.surface.stroke_line(layout.anchor(), drag, STROKE_WEIGHT, INK);
    }

    /// A dot at the anchor; once a drag point exists, a segment to it plus a
    /// dot there. Chained segment by segment this approximates a round
    /// brush tip. An open brush layout still draws its start dot.
    fn draw_brush(&mut self, layout: &Layout) {
        let dot = STROKE_WEIGHT / 2.0;
        self.surface.fill_circle(layout.anchor(), dot, INK);
        let Some(drag) = layout.drag() else {
            return;
        };
        self.surface.stroke_line(layout.anchor(), drag, STROKE_WEIGHT, INK);
        self.surface.fill_circle(drag, dot, INK);
    }
}
