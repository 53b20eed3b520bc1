use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info};

use crate::process::Adjustments;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The loaded image: an untouched original and the processed base that
/// annotations are drawn over.
pub struct Document {
    path: PathBuf,
    original: RgbImage,
    base: RgbImage,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let decoded = image::open(path).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let original = decoded.to_rgb8();
        info!(
            path = %path.display(),
            width = original.width(),
            height = original.height(),
            "image loaded"
        );
        Ok(Self::from_image(path.to_path_buf(), original))
    }

    pub fn from_image(path: PathBuf, original: RgbImage) -> Self {
        let base = original.clone();
        Self {
            path,
            original,
            base,
        }
    }

    /// Rebuilds the base from the original; earlier adjustments don't stack.
    pub fn reprocess(&mut self, adjustments: &Adjustments) {
        debug!(
            mode = ?adjustments.mode,
            brightness = adjustments.brightness,
            contrast = adjustments.contrast,
            "reprocessing base image"
        );
        self.base = adjustments.apply(&self.original);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base(&self) -> &RgbImage {
        &self.base
    }

    pub fn size(&self) -> (u32, u32) {
        self.original.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationLog, Point, ShapeKind};
    use crate::process::ColorMode;
    use crate::render::Renderer;
    use crate::style::Style;
    use image::Rgb;

    fn gradient() -> RgbImage {
        RgbImage::from_fn(32, 32, |x, y| Rgb([x as u8 * 8, y as u8 * 8, 128]))
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = Document::open(Path::new("/definitely/not/here.png"))
            .err()
            .expect("open should fail");
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn open_reads_png_as_rgb() {
        let path = std::env::temp_dir().join(format!("annotator-{}.png", std::process::id()));
        gradient().save(&path).expect("write fixture");

        let doc = Document::open(&path).expect("open fixture");
        let _ = std::fs::remove_file(&path);

        assert_eq!(doc.size(), (32, 32));
        assert_eq!(doc.base(), &gradient());
        assert_eq!(doc.path(), path.as_path());
    }

    #[test]
    fn reprocess_always_starts_from_original() {
        let mut doc = Document::from_image(PathBuf::from("mem"), gradient());
        let darker = Adjustments {
            mode: ColorMode::Rgb,
            brightness: 0.0,
            contrast: 1.0,
        };
        doc.reprocess(&darker);
        let once = doc.base().clone();
        doc.reprocess(&darker);
        assert_eq!(doc.base(), &once);
        assert_eq!(doc.original, gradient());

        doc.reprocess(&Adjustments::default());
        assert_eq!(doc.base(), &doc.original);
    }

    #[test]
    fn annotations_render_over_processed_base() {
        let mut doc = Document::from_image(PathBuf::from("mem"), gradient());
        doc.reprocess(&Adjustments {
            mode: ColorMode::Binary,
            ..Adjustments::default()
        });

        let mut log = AnnotationLog::new();
        log.add_shape(ShapeKind::Line, Point::new(0, 0), Point::new(31, 0));

        let renderer = Renderer::new().expect("default font");
        let out = renderer.render(doc.base(), log.shapes(), log.texts(), &Style::default());

        // untouched pixels come from the binarised base, not the gradient
        let far = *out.get_pixel(20, 20);
        assert!(far == Rgb([0, 0, 0]) || far == Rgb([255, 255, 255]));
        assert_eq!(far, *doc.base().get_pixel(20, 20));
        assert_eq!(*out.get_pixel(15, 0), Rgb([0, 255, 0]));
    }
}
