mod app;
mod bubble;
mod errors;
mod model;

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    // RUST_LOG overrides; otherwise info everywhere, debug for this crate
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,comicbubble=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .init();
}

fn main() -> eframe::Result<()> {
    setup_logging();
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Comic Bubbles")
            .with_inner_size([1200.0, 860.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Comic Bubbles",
        native_options,
        Box::new(|cc| Ok(Box::new(app::ComicApp::new(cc)))),
    )
}
