use anyhow::Context;
use clap::Parser;
use log::info;
use placeholder_gen::config::Config;
use placeholder_gen::server::{announce, PlaceholderServer};
use placeholder_gen::{Font, Renderer};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = Config::parse();

    let font = Font::load_from_path(&config.font)
        .with_context(|| format!("Failed to preload font {}", config.font.display()))?;
    info!(
        "Loaded font {} from {}",
        font.name().unwrap_or_else(|| "<unnamed>".to_string()),
        config.font.display()
    );

    let renderer_config = config.renderer_config();
    info!(
        "Face cache capacity {}, canvas policy {:?}, max dimension {}",
        renderer_config.face_cache_capacity,
        renderer_config.canvas_policy,
        renderer_config.max_dimension
    );
    let renderer = Arc::new(Renderer::new(Arc::new(font), renderer_config));

    let server = PlaceholderServer::bind(&config.bind_address(), renderer)
        .context("Failed to start HTTP server")?;
    announce(server.local_addr(), config.port);

    let workers = config.worker_count();
    info!("Handling requests on {workers} worker threads");
    server.run(workers).context("HTTP server stopped")?;

    Ok(())
}
