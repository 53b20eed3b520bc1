use eframe::egui;

use crate::model::Point;

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// Pan & zoom of the image inside the canvas. The image centre sits at the
/// canvas centre offset by `pan`.
#[derive(Clone, Debug)]
pub struct Viewport {
    pub pan: egui::Vec2,
    pub zoom: f32,
    pub image_size: egui::Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            image_size: egui::vec2(800.0, 600.0),
        }
    }
}

impl Viewport {
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            image_size: egui::vec2(width as f32, height as f32),
            ..Self::default()
        }
    }

    /// Convert image-space coords to screen-space
    pub fn image_to_screen(&self, canvas: egui::Rect, img_pos: egui::Pos2) -> egui::Pos2 {
        canvas.center() + self.pan + (img_pos.to_vec2() - self.image_size * 0.5) * self.zoom
    }

    /// Convert screen-space coords to image-space
    pub fn screen_to_image(&self, canvas: egui::Rect, screen_pos: egui::Pos2) -> egui::Pos2 {
        let rel = screen_pos - canvas.center() - self.pan;
        (rel / self.zoom + self.image_size * 0.5).to_pos2()
    }

    /// Screen position snapped to the image pixel underneath it.
    pub fn pixel_at(&self, canvas: egui::Rect, screen_pos: egui::Pos2) -> Point {
        let p = self.screen_to_image(canvas, screen_pos);
        Point::new(p.x.floor() as i32, p.y.floor() as i32)
    }

    pub fn image_rect(&self, canvas: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.image_to_screen(canvas, egui::Pos2::ZERO),
            self.image_to_screen(canvas, self.image_size.to_pos2()),
        )
    }

    /// Zooms by `scroll` wheel units, keeping the point under `cursor` fixed.
    pub fn zoom_around(&mut self, canvas: egui::Rect, cursor: Option<egui::Pos2>, scroll: f32) {
        let new_zoom = (self.zoom * (1.0 + scroll * 0.002)).clamp(MIN_ZOOM, MAX_ZOOM);
        if let Some(cursor) = cursor {
            let cursor_rel = cursor - canvas.center() - self.pan;
            self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
        }
        self.zoom = new_zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 300.0))
    }

    #[test]
    fn unzoomed_image_is_centred() {
        let vp = Viewport::for_image(200, 100);
        let rect = vp.image_rect(canvas());
        assert_eq!(rect.min, egui::pos2(100.0, 100.0));
        assert_eq!(rect.max, egui::pos2(300.0, 200.0));
        assert_eq!(vp.pixel_at(canvas(), egui::pos2(110.5, 120.9)), Point::new(10, 20));
    }

    #[test]
    fn pixels_left_of_the_image_are_negative() {
        let vp = Viewport::for_image(200, 100);
        assert_eq!(vp.pixel_at(canvas(), egui::pos2(99.5, 99.5)), Point::new(-1, -1));
    }

    #[test]
    fn zoom_keeps_cursor_point_fixed() {
        let mut vp = Viewport::for_image(200, 100);
        let cursor = egui::pos2(150.0, 130.0);
        let before = vp.screen_to_image(canvas(), cursor);
        vp.zoom_around(canvas(), Some(cursor), 250.0);
        assert!(vp.zoom > 1.0);
        let after = vp.screen_to_image(canvas(), cursor);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_around(canvas(), None, -10_000.0);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }
}
