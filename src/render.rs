//! Composites annotations over a base image.
//!
//! Rendering is a pure function of its inputs: the base image is copied,
//! shapes are stroked in log order, then text is drawn on top. Pixels that
//! fall outside the image are clipped.

use ab_glyph::{point, Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use image::{Rgb, RgbImage};

use crate::model::{ShapeAnnotation, ShapeKind, TextAnnotation};
use crate::style::{Style, STROKE_WIDTH};

/// Glyph height in pixels for a text size of 1.0.
const TEXT_BASE_PX: f32 = 30.0;

/// Offsets stamped per glyph pixel to thicken the text to a 2px stroke.
const TEXT_STAMP: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("no proportional font in the default font definitions")]
    Missing,
    #[error("default font could not be parsed: {0}")]
    Invalid(#[from] ab_glyph::InvalidFont),
}

pub struct Renderer {
    font: FontArc,
}

impl Renderer {
    /// Uses egui's bundled proportional font as the fixed text face.
    pub fn new() -> Result<Self, FontError> {
        let defs = egui::FontDefinitions::default();
        let name = defs
            .families
            .get(&egui::FontFamily::Proportional)
            .and_then(|names| names.first())
            .ok_or(FontError::Missing)?;
        let data = defs.font_data.get(name).ok_or(FontError::Missing)?;
        let font = FontArc::try_from_vec(data.font.to_vec())?;
        Ok(Self { font })
    }

    pub fn render<'a>(
        &self,
        base: &RgbImage,
        shapes: impl IntoIterator<Item = &'a ShapeAnnotation>,
        texts: &[TextAnnotation],
        style: &Style,
    ) -> RgbImage {
        let mut out = base.clone();
        let color = Rgb(style.annotation_color);
        for shape in shapes {
            draw_shape(&mut out, shape, color);
        }
        let text_color = Rgb(style.text_color);
        for text in texts {
            self.draw_text(&mut out, text, text_color, style.text_size);
        }
        out
    }

    fn draw_text(&self, img: &mut RgbImage, ann: &TextAnnotation, color: Rgb<u8>, size: f32) {
        let px = TEXT_BASE_PX * size;
        if ann.text.is_empty() || px.is_nan() || px <= 0.0 {
            return;
        }
        let glyphs = self.layout(ann, px);
        let Some(area) = TextArea::covering(&glyphs, img.width(), img.height()) else {
            return;
        };
        let mut coverage = vec![0.0f32; area.len()];

        for outlined in &glyphs {
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x.floor() as i64, bounds.min.y.floor() as i64);
            outlined.draw(|gx, gy, c| {
                for (dx, dy) in TEXT_STAMP {
                    let x = ox + gx as i64 + dx as i64;
                    let y = oy + gy as i64 + dy as i64;
                    if let Some(i) = area.index(x, y) {
                        coverage[i] = coverage[i].max(c);
                    }
                }
            });
        }

        for y in area.y0..area.y1 {
            for x in area.x0..area.x1 {
                let Some(i) = area.index(x, y) else {
                    continue;
                };
                let a = coverage[i].min(1.0);
                if a > 0.0 {
                    let pixel = img.get_pixel_mut(x as u32, y as u32);
                    for ch in 0..3 {
                        let blended = pixel[ch] as f32 * (1.0 - a) + color[ch] as f32 * a;
                        pixel[ch] = blended.round() as u8;
                    }
                }
            }
        }
    }

    /// Positions and outlines each glyph, starting at the baseline anchor.
    fn layout(&self, ann: &TextAnnotation, px: f32) -> Vec<OutlinedGlyph> {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let baseline = ann.anchor.y as f32;
        let mut caret = ann.anchor.x as f32;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::new();

        for ch in ann.text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);
            glyphs.extend(self.font.outline_glyph(glyph));
        }
        glyphs
    }
}

/// Pixel box covered by a laid-out string (stamp included), clipped to the
/// image. Upper bounds are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TextArea {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl TextArea {
    fn covering(glyphs: &[OutlinedGlyph], width: u32, height: u32) -> Option<Self> {
        let mut area: Option<Self> = None;
        for g in glyphs {
            let b = g.px_bounds();
            let (x0, y0) = (b.min.x.floor() as i64, b.min.y.floor() as i64);
            let (x1, y1) = (b.max.x.ceil() as i64 + 1, b.max.y.ceil() as i64 + 1);
            area = Some(match area {
                Some(a) => Self {
                    x0: a.x0.min(x0),
                    y0: a.y0.min(y0),
                    x1: a.x1.max(x1),
                    y1: a.y1.max(y1),
                },
                None => Self { x0, y0, x1, y1 },
            });
        }
        let a = area?;
        let clipped = Self {
            x0: a.x0.max(0),
            y0: a.y0.max(0),
            x1: a.x1.min(width as i64),
            y1: a.y1.min(height as i64),
        };
        (clipped.x0 < clipped.x1 && clipped.y0 < clipped.y1).then_some(clipped)
    }

    fn len(&self) -> usize {
        ((self.x1 - self.x0) * (self.y1 - self.y0)) as usize
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < self.x0 || x >= self.x1 || y < self.y0 || y >= self.y1 {
            return None;
        }
        Some(((y - self.y0) * (self.x1 - self.x0) + (x - self.x0)) as usize)
    }
}

// ── Raster primitives ───────────────────────────────────────────────────────

pub fn draw_shape(img: &mut RgbImage, shape: &ShapeAnnotation, color: Rgb<u8>) {
    let half = STROKE_WIDTH / 2.0;
    match shape.kind {
        ShapeKind::Line => {
            stroke_segment(img, to_f32(shape.start), to_f32(shape.end), half, color);
        }
        ShapeKind::Rectangle => {
            let (min, max) = shape.bounds();
            let (x0, y0) = to_f32(min);
            let (x1, y1) = to_f32(max);
            stroke_segment(img, (x0, y0), (x1, y0), half, color);
            stroke_segment(img, (x1, y0), (x1, y1), half, color);
            stroke_segment(img, (x1, y1), (x0, y1), half, color);
            stroke_segment(img, (x0, y1), (x0, y0), half, color);
        }
        ShapeKind::Circle => {
            stroke_ring(img, to_f32(shape.start), shape.radius() as f32, half, color);
        }
    }
}

fn to_f32(p: crate::model::Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Visits every in-image pixel inside the given box, or nothing if the box
/// misses the image.
fn for_each_in_box(
    img: &mut RgbImage,
    (lo_x, lo_y): (f32, f32),
    (hi_x, hi_y): (f32, f32),
    mut f: impl FnMut(&mut Rgb<u8>, f32, f32),
) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    let max_x = (img.width() - 1) as f32;
    let max_y = (img.height() - 1) as f32;
    if hi_x < 0.0 || hi_y < 0.0 || lo_x > max_x || lo_y > max_y {
        return;
    }
    let x0 = lo_x.floor().max(0.0) as u32;
    let y0 = lo_y.floor().max(0.0) as u32;
    let x1 = hi_x.ceil().min(max_x) as u32;
    let y1 = hi_y.ceil().min(max_y) as u32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            f(img.get_pixel_mut(x, y), x as f32, y as f32);
        }
    }
}

fn stroke_segment(img: &mut RgbImage, a: (f32, f32), b: (f32, f32), half: f32, color: Rgb<u8>) {
    let lo = (a.0.min(b.0) - half, a.1.min(b.1) - half);
    let hi = (a.0.max(b.0) + half, a.1.max(b.1) + half);
    for_each_in_box(img, lo, hi, |pixel, x, y| {
        if point_to_segment_dist((x, y), a, b) <= half {
            *pixel = color;
        }
    });
}

fn stroke_ring(img: &mut RgbImage, c: (f32, f32), radius: f32, half: f32, color: Rgb<u8>) {
    let reach = radius + half;
    for_each_in_box(img, (c.0 - reach, c.1 - reach), (c.0 + reach, c.1 + reach), |pixel, x, y| {
        let d = (x - c.0).hypot(y - c.1);
        if (d - radius).abs() <= half {
            *pixel = color;
        }
    });
}

fn point_to_segment_dist(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (p.0 - a.0, p.1 - a.1);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;
    let t = if len_sq > 0.0 {
        ((ap.0 * ab.0 + ap.1 * ab.1) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = (a.0 + ab.0 * t, a.1 + ab.1 * t);
    (p.0 - closest.0).hypot(p.1 - closest.1)
}
