use egui::{Color32, ColorImage, Pos2};
use thiserror::Error;

/// Errors from constructing a raster surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Low-level shape rasterization seam.
///
/// The drawer reduces every layout to these primitive calls. Coordinates are
/// surface-local; implementations clip to their own bounds and never fail on
/// out-of-range or degenerate input.
pub trait RasterSurface {
    /// Surface size in pixels as (width, height).
    fn size(&self) -> (usize, usize);

    /// Fills the whole surface with one color.
    fn clear(&mut self, color: Color32);

    /// Fills the axis-aligned rectangle spanned by `min` and `max`.
    fn fill_rect(&mut self, min: Pos2, max: Pos2, color: Color32);

    /// Fills the disc of `radius` around `center`.
    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    /// Strokes a segment from `from` to `to`, `width` thick, round caps.
    fn stroke_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);
}

/// CPU pixel buffer backed by an [`egui::ColorImage`].
///
/// The host displays it by uploading the image as an egui texture whenever
/// the drawer reports a pixel change.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    image: ColorImage,
}

impl PixelSurface {
    /// Creates a surface filled with `background`.
    pub fn new(width: usize, height: usize, background: Color32) -> SurfaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            image: ColorImage::new([width, height], background),
        })
    }

    /// The backing image, ready for texture upload.
    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    /// Pixel at (x, y). Callers stay within `size()`.
    pub fn pixel(&self, x: usize, y: usize) -> Color32 {
        self.image.pixels[y * self.image.size[0] + x]
    }

    fn width(&self) -> usize {
        self.image.size[0]
    }

    fn height(&self) -> usize {
        self.image.size[1]
    }
}

/// Rounds `[lo, hi]` to pixel indices clipped to `0..limit`, or `None` when
/// the span misses the surface entirely. Saturating casts keep non-finite
/// input from panicking.
fn clip_span(lo: f32, hi: f32, limit: usize) -> Option<std::ops::RangeInclusive<usize>> {
    let lo = (lo.round() as i64).max(0);
    let hi = (hi.round() as i64).min(limit as i64 - 1);
    if lo > hi {
        return None;
    }
    Some(lo as usize..=hi as usize)
}

/// Squared distance from `p` to the segment `a..b`, treating a zero-length
/// segment as the point `a`.
fn dist_sq_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    };
    let closest = a + t * ab;
    (p - closest).length_sq()
}

impl RasterSurface for PixelSurface {
    fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn clear(&mut self, color: Color32) {
        for pixel in &mut self.image.pixels {
            *pixel = color;
        }
    }

    fn fill_rect(&mut self, min: Pos2, max: Pos2, color: Color32) {
        let width = self.width();
        let Some(rows) = clip_span(min.y, max.y, self.height()) else {
            return;
        };
        let Some(cols) = clip_span(min.x, max.x, width) else {
            return;
        };
        for y in rows {
            let row = y * width;
            for x in cols.clone() {
                self.image.pixels[row + x] = color;
            }
        }
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        // Degenerate radius paints nothing, matching a zero-size arc.
        if !(radius > 0.0) {
            return;
        }
        let width = self.width();
        let Some(rows) = clip_span(center.y - radius, center.y + radius, self.height()) else {
            return;
        };
        for y in rows {
            let dy = y as f32 - center.y;
            let chord_sq = radius * radius - dy * dy;
            if chord_sq < 0.0 {
                continue;
            }
            let half = chord_sq.sqrt();
            let Some(cols) = clip_span(center.x - half, center.x + half, width) else {
                continue;
            };
            let row = y * width;
            for x in cols {
                self.image.pixels[row + x] = color;
            }
        }
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        let half = width / 2.0;
        if !(half > 0.0) {
            return;
        }
        let surface_width = self.width();
        let lo_y = from.y.min(to.y) - half;
        let hi_y = from.y.max(to.y) + half;
        let lo_x = from.x.min(to.x) - half;
        let hi_x = from.x.max(to.x) + half;
        let Some(rows) = clip_span(lo_y, hi_y, self.height()) else {
            return;
        };
        let Some(cols) = clip_span(lo_x, hi_x, surface_width) else {
            return;
        };
        let half_sq = half * half;
        for y in rows {
            let row = y * surface_width;
            for x in cols.clone() {
                let p = Pos2::new(x as f32, y as f32);
                if dist_sq_to_segment(p, from, to) <= half_sq {
                    self.image.pixels[row + x] = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const BG: Color32 = Color32::WHITE;
    const INK: Color32 = Color32::BLACK;

    fn surface() -> PixelSurface {
        PixelSurface::new(32, 32, BG).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            PixelSurface::new(0, 32, BG),
            Err(SurfaceError::InvalidDimensions { width: 0, height: 32 })
        ));
        assert!(matches!(
            PixelSurface::new(32, 0, BG),
            Err(SurfaceError::InvalidDimensions { width: 32, height: 0 })
        ));
    }

    #[test]
    fn test_new_surface_is_background_filled() {
        let s = surface();
        assert_eq!(s.size(), (32, 32));
        assert_eq!(s.pixel(0, 0), BG);
        assert_eq!(s.pixel(31, 31), BG);
    }

    #[test]
    fn test_fill_rect_covers_inclusive_span() {
        let mut s = surface();
        s.fill_rect(pos2(2.0, 3.0), pos2(5.0, 6.0), INK);
        assert_eq!(s.pixel(2, 3), INK);
        assert_eq!(s.pixel(5, 6), INK);
        assert_eq!(s.pixel(1, 3), BG);
        assert_eq!(s.pixel(6, 6), BG);
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut s = surface();
        s.fill_rect(pos2(-10.0, -10.0), pos2(1.0, 1.0), INK);
        assert_eq!(s.pixel(0, 0), INK);
        assert_eq!(s.pixel(1, 1), INK);
        assert_eq!(s.pixel(2, 2), BG);

        s.fill_rect(pos2(100.0, 100.0), pos2(200.0, 200.0), INK);
        assert_eq!(s.pixel(31, 31), BG);
    }

    #[test]
    fn test_fill_circle_paints_disc_within_radius() {
        let mut s = surface();
        s.fill_circle(pos2(16.0, 16.0), 5.0, INK);
        assert_eq!(s.pixel(16, 16), INK);
        assert_eq!(s.pixel(20, 16), INK);
        assert_eq!(s.pixel(16, 20), INK);
        assert_eq!(s.pixel(25, 16), BG);
        // Corner of the bounding box lies outside the disc.
        assert_eq!(s.pixel(21, 21), BG);
    }

    #[test]
    fn test_fill_circle_ignores_degenerate_radius() {
        let mut s = surface();
        s.fill_circle(pos2(16.0, 16.0), 0.0, INK);
        s.fill_circle(pos2(16.0, 16.0), -3.0, INK);
        assert_eq!(s.pixel(16, 16), BG);
    }

    #[test]
    fn test_stroke_line_covers_endpoints_and_midpoint() {
        let mut s = surface();
        s.stroke_line(pos2(4.0, 16.0), pos2(28.0, 16.0), 4.0, INK);
        assert_eq!(s.pixel(4, 16), INK);
        assert_eq!(s.pixel(16, 16), INK);
        assert_eq!(s.pixel(28, 16), INK);
        // One stroke half-width above the segment is still covered.
        assert_eq!(s.pixel(16, 14), INK);
        assert_eq!(s.pixel(16, 10), BG);
    }

    #[test]
    fn test_stroke_line_zero_length_paints_round_cap() {
        let mut s = surface();
        s.stroke_line(pos2(16.0, 16.0), pos2(16.0, 16.0), 4.0, INK);
        assert_eq!(s.pixel(16, 16), INK);
        assert_eq!(s.pixel(18, 16), INK);
        assert_eq!(s.pixel(16, 18), INK);
        assert_eq!(s.pixel(20, 16), BG);
    }

    #[test]
    fn test_clear_overwrites_everything() {
        let mut s = surface();
        s.fill_rect(pos2(0.0, 0.0), pos2(31.0, 31.0), INK);
        s.clear(BG);
        assert_eq!(s.pixel(0, 0), BG);
        assert_eq!(s.pixel(16, 16), BG);
        assert_eq!(s.pixel(31, 31), BG);
    }
}
