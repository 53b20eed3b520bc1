use std::path::{Path, PathBuf};

use eframe::egui;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::interaction::Interaction;
use crate::model::{AnnotationLog, Point, ShapeAnnotation, TextAnnotation};
use crate::process::{Adjustments, ColorMode, BRIGHTNESS_RANGE, CONTRAST_RANGE};
use crate::render::Renderer;
use crate::style::{Style, Tool};
use crate::viewport::Viewport;

const TEXT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=5.0;
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

pub struct AnnotatorApp {
    renderer: Renderer,
    document: Option<Document>,
    log: AnnotationLog,
    style: Style,
    adjustments: Adjustments,
    interaction: Interaction,

    texture: Option<egui::TextureHandle>,
    // composed image no longer matches the texture
    dirty: bool,

    viewport: Viewport,
    panning: bool,
}

impl AnnotatorApp {
    pub fn new(renderer: Renderer, initial_image: Option<PathBuf>) -> Self {
        let mut app = Self {
            renderer,
            document: None,
            log: AnnotationLog::new(),
            style: Style::default(),
            adjustments: Adjustments::default(),
            interaction: Interaction::default(),
            texture: None,
            dirty: false,
            viewport: Viewport::default(),
            panning: false,
        };
        if let Some(path) = initial_image {
            app.load(&path);
        }
        app
    }

    // ── Commands ────────────────────────────────────────────────────────────

    fn browse_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();
        match picked {
            Some(path) => self.load(&path),
            None => debug!("file dialog cancelled"),
        }
    }

    /// Failures leave the current image in place.
    fn load(&mut self, path: &Path) {
        match Document::open(path) {
            Ok(doc) => {
                let (w, h) = doc.size();
                self.viewport = Viewport::for_image(w, h);
                self.interaction.reset();
                self.document = Some(doc);
                self.dirty = true;
            }
            Err(e) => warn!(error = %e, "image not loaded"),
        }
    }

    fn process_image(&mut self) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        doc.reprocess(&self.adjustments);
        self.dirty = true;
    }

    fn commit_shape(&mut self, shape: ShapeAnnotation) {
        debug!(kind = ?shape.kind, start = ?shape.start, end = ?shape.end, "shape committed");
        self.log.add_shape(shape.kind, shape.start, shape.end);
        self.dirty = true;
    }

    fn commit_text(&mut self, text: TextAnnotation) {
        debug!(anchor = ?text.anchor, len = text.text.len(), "text committed");
        self.log.add_text(text.text, text.anchor);
        self.dirty = true;
    }

    fn undo(&mut self) {
        if self.log.undo() {
            info!(redo_depth = self.log.redo_depth(), "annotations cleared");
            self.dirty = true;
        }
    }

    fn redo(&mut self) {
        if self.log.redo() {
            info!(
                shapes = self.log.shapes().len(),
                texts = self.log.texts().len(),
                "annotations restored"
            );
            self.dirty = true;
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────────

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.dirty {
            return;
        }
        let Some(doc) = &self.document else {
            return;
        };
        let preview = self.interaction.preview();
        let composed = self.renderer.render(
            doc.base(),
            self.log.shapes().iter().chain(preview.iter()),
            self.log.texts(),
            &self.style,
        );
        let size = [composed.width() as usize, composed.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, composed.as_raw());
        match &mut self.texture {
            Some(tex) => tex.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(ctx.load_texture("composed", color_image, egui::TextureOptions::NEAREST));
            }
        }
        self.dirty = false;
    }

    // ── UI ──────────────────────────────────────────────────────────────────

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Browse Image").clicked() {
                self.browse_image();
            }
            if ui.button("Process Image").clicked() {
                self.process_image();
            }
            ui.separator();
            ui.label("Convert To:");
            egui::ComboBox::from_id_salt("convert_to")
                .selected_text(self.adjustments.mode.label())
                .show_ui(ui, |ui| {
                    for mode in ColorMode::ALL {
                        ui.selectable_value(&mut self.adjustments.mode, mode, mode.label());
                    }
                });
            ui.label("Brightness:");
            ui.add(egui::Slider::new(&mut self.adjustments.brightness, BRIGHTNESS_RANGE));
            ui.label("Contrast:");
            ui.add(egui::Slider::new(&mut self.adjustments.contrast, CONTRAST_RANGE));
        });

        ui.horizontal(|ui| {
            for tool in Tool::ALL {
                ui.selectable_value(&mut self.style.tool, tool, tool.label());
            }
            ui.separator();
            ui.label("Annotation:");
            if ui.color_edit_button_srgb(&mut self.style.annotation_color).changed() {
                self.dirty = true;
            }
            ui.label("Text:");
            if ui.color_edit_button_srgb(&mut self.style.text_color).changed() {
                self.dirty = true;
            }
            ui.label("Size:");
            if ui
                .add(egui::Slider::new(&mut self.style.text_size, TEXT_SIZE_RANGE))
                .changed()
            {
                self.dirty = true;
            }
            ui.separator();
            if ui.add_enabled(!self.log.is_empty(), egui::Button::new("Undo")).clicked() {
                self.undo();
            }
            if ui.add_enabled(self.log.can_redo(), egui::Button::new("Redo")).clicked() {
                self.redo();
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| match &self.document {
            Some(doc) => {
                let (w, h) = doc.size();
                ui.label(format!("{} ({w}×{h})", doc.path().display()));
                ui.separator();
                ui.label(format!(
                    "{} shapes, {} texts",
                    self.log.shapes().len(),
                    self.log.texts().len()
                ));
                ui.separator();
                ui.label(format!("Zoom: {:.0}%", self.viewport.zoom * 100.0));
            }
            None => {
                ui.label("No image loaded");
            }
        });
    }

    fn handle_pan_zoom(&mut self, ctx: &egui::Context, response: &egui::Response) {
        if ctx.input(|i| i.pointer.middle_down()) {
            self.viewport.pan += ctx.input(|i| i.pointer.delta());
            self.panning = true;
        } else {
            self.panning = false;
        }

        let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 && response.hovered() {
            self.viewport
                .zoom_around(response.rect, response.hover_pos(), scroll);
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let canvas = response.rect;
        let (pressed, released, latest) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });
        let pixel = latest.map(|pos| self.viewport.pixel_at(canvas, pos));
        self.pointer_event(pressed && response.hovered(), released, pixel);
    }

    /// Panning only blocks starting and previewing a drag; a primary release
    /// always ends one.
    fn pointer_event(&mut self, pressed: bool, released: bool, pixel: Option<Point>) {
        if !self.panning {
            if pressed {
                if let Some(at) = pixel {
                    self.interaction.pointer_down(self.style.tool, at);
                }
            }

            if self.interaction.is_dragging() {
                if let Some(at) = pixel {
                    let before = self.interaction.preview();
                    if self.interaction.pointer_move(at) != before {
                        self.dirty = true;
                    }
                }
            }
        }

        if released {
            if let Some(shape) = self.interaction.pointer_up(pixel) {
                self.commit_shape(shape);
            }
        }
    }

    fn text_prompt(&mut self, ctx: &egui::Context) {
        let mut submit = false;
        let mut cancel = false;
        if let Some(buffer) = self.interaction.text_buffer() {
            egui::Window::new("Input")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label("Enter text:");
                    let te = ui.text_edit_singleline(buffer);
                    if te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    } else {
                        te.request_focus();
                    }
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            submit = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                });
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                cancel = true;
            }
        }

        if submit {
            if let Some(text) = self.interaction.submit_text() {
                self.commit_text(text);
            }
        } else if cancel {
            debug!("text prompt cancelled");
            self.interaction.cancel_text();
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.interaction.is_prompting() {
            let (undo, redo) = ctx.input(|i| {
                let cmd = i.modifiers.command;
                let z = i.key_pressed(egui::Key::Z);
                (
                    cmd && z && !i.modifiers.shift,
                    cmd && ((z && i.modifiers.shift) || i.key_pressed(egui::Key::Y)),
                )
            });
            if undo {
                self.undo();
            }
            if redo {
                self.redo();
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        self.text_prompt(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas = response.rect;
            painter.rect_filled(canvas, 0.0, egui::Color32::from_gray(40));

            if self.document.is_none() {
                painter.text(
                    canvas.center(),
                    egui::Align2::CENTER_CENTER,
                    "Browse an image to start annotating",
                    egui::FontId::proportional(18.0),
                    egui::Color32::GRAY,
                );
                return;
            }

            self.handle_pan_zoom(ctx, &response);
            self.handle_pointer(ctx, &response);
            self.refresh_texture(ctx);

            if let Some(ref tex) = self.texture {
                painter.image(
                    tex.id(),
                    self.viewport.image_rect(canvas),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
        });
    }
}
