mod app;
mod document;
mod interaction;
mod model;
mod process;
mod render;
mod style;
mod viewport;

use std::path::PathBuf;

use eframe::egui;
use tracing::error;

use app::AnnotatorApp;
use render::Renderer;

const TITLE: &str = "Image Processor";

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,image_annotator=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

fn main() {
    setup_logging();

    // optional image to open at startup
    let initial_image = std::env::args_os().nth(1).map(PathBuf::from);

    let renderer = match Renderer::new() {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("cannot start renderer: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(TITLE),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(renderer, initial_image)))),
    ) {
        error!("eframe exited with an error: {e}");
        std::process::exit(1);
    }
}
