//! Colorspace conversion and brightness/contrast adjustment.

use image::{Rgb, RgbImage};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Rgb,
    Grayscale,
    Binary,
}

impl ColorMode {
    pub const ALL: [ColorMode; 3] = [ColorMode::Rgb, ColorMode::Grayscale, ColorMode::Binary];

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Grayscale => "Grayscale",
            ColorMode::Binary => "Binary",
        }
    }
}

pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<f32> = 0.0..=100.0;
pub const CONTRAST_RANGE: std::ops::RangeInclusive<f32> = 1.0..=3.0;

const BINARY_THRESHOLD: u8 = 127;

#[derive(Clone, Debug, PartialEq)]
pub struct Adjustments {
    pub mode: ColorMode,
    /// Slider position; 50 is neutral.
    pub brightness: f32,
    /// Gain applied before the brightness offset.
    pub contrast: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            mode: ColorMode::Rgb,
            brightness: 50.0,
            contrast: 1.0,
        }
    }
}

impl Adjustments {
    /// Converts `src` to the selected mode, then applies
    /// `|v * contrast + (brightness - 50)|` saturated to 0..=255.
    pub fn apply(&self, src: &RgbImage) -> RgbImage {
        let alpha = self.contrast;
        let beta = self.brightness - 50.0;
        let mode = self.mode;

        let mut out = src.clone();
        for pixel in out.pixels_mut() {
            let converted = match mode {
                ColorMode::Rgb => *pixel,
                ColorMode::Grayscale => {
                    let l = luma(pixel);
                    Rgb([l, l, l])
                }
                ColorMode::Binary => {
                    let v = if luma(pixel) > BINARY_THRESHOLD { 255 } else { 0 };
                    Rgb([v, v, v])
                }
            };
            *pixel = Rgb(converted.0.map(|c| scale_abs(c, alpha, beta)));
        }
        out
    }
}

fn luma(p: &Rgb<u8>) -> u8 {
    let [r, g, b] = p.0;
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8
}

fn scale_abs(v: u8, alpha: f32, beta: f32) -> u8 {
    (v as f32 * alpha + beta).abs().round().min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(1, 1, Rgb(rgb))
    }

    fn run(adj: &Adjustments, rgb: [u8; 3]) -> [u8; 3] {
        adj.apply(&single(rgb)).get_pixel(0, 0).0
    }

    #[test]
    fn neutral_defaults_are_identity() {
        let adj = Adjustments::default();
        let img = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8 * 60, y as u8 * 60, 7]));
        assert_eq!(adj.apply(&img), img);
    }

    #[test]
    fn grayscale_uses_weighted_luma() {
        let adj = Adjustments {
            mode: ColorMode::Grayscale,
            ..Adjustments::default()
        };
        assert_eq!(run(&adj, [255, 0, 0]), [76, 76, 76]);
        assert_eq!(run(&adj, [0, 255, 0]), [150, 150, 150]);
        assert_eq!(run(&adj, [0, 0, 255]), [29, 29, 29]);
    }

    #[test]
    fn binary_thresholds_above_127() {
        let adj = Adjustments {
            mode: ColorMode::Binary,
            ..Adjustments::default()
        };
        assert_eq!(run(&adj, [127, 127, 127]), [0, 0, 0]);
        assert_eq!(run(&adj, [128, 128, 128]), [255, 255, 255]);
    }

    #[test]
    fn brightness_and_contrast_saturate() {
        let adj = Adjustments {
            mode: ColorMode::Rgb,
            brightness: 100.0,
            contrast: 3.0,
        };
        assert_eq!(run(&adj, [10, 100, 0]), [80, 255, 50]);
    }

    #[test]
    fn negative_results_fold_to_absolute_value() {
        let adj = Adjustments {
            mode: ColorMode::Rgb,
            brightness: 0.0,
            contrast: 1.0,
        };
        assert_eq!(run(&adj, [0, 50, 70]), [50, 0, 20]);
    }
}
