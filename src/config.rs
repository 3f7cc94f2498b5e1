//! Process configuration, read from command-line flags with environment
//! fallbacks.

use crate::{CanvasPolicy, RendererConfig, DEFAULT_FACE_CACHE_CAPACITY, DEFAULT_MAX_DIMENSION};
use clap::Parser;
use std::path::PathBuf;

/// Serve placeholder images over HTTP
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "placeholder-gen", version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// TTF or OTF font used for all text
    #[arg(long, env = "PLACEHOLDER_FONT", default_value = "assets/DejaVuSans.ttf")]
    pub font: PathBuf,

    /// Largest accepted width or height, in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION)]
    pub max_dimension: u32,

    /// Number of font sizes kept ready between requests
    #[arg(long, default_value_t = DEFAULT_FACE_CACHE_CAPACITY)]
    pub face_cache_capacity: usize,

    /// Keep finished pixel buffers around and reuse them for requests of the same size
    #[arg(long)]
    pub reuse_canvas: bool,

    /// Idle buffers kept when --reuse-canvas is set
    #[arg(long, default_value_t = 4)]
    pub canvas_pool_size: usize,

    /// Request handling threads; defaults to the number of CPUs
    #[arg(long)]
    pub workers: Option<usize>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn renderer_config(&self) -> RendererConfig {
        let canvas_policy = if self.reuse_canvas {
            CanvasPolicy::Pooled {
                pool_size: self.canvas_pool_size,
            }
        } else {
            CanvasPolicy::Fresh
        };

        RendererConfig {
            face_cache_capacity: self.face_cache_capacity,
            max_dimension: self.max_dimension,
            canvas_policy,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "placeholder-gen",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--max-dimension",
            "1024",
            "--face-cache-capacity",
            "9",
            "--reuse-canvas",
            "--canvas-pool-size",
            "3",
            "--workers",
            "2",
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.worker_count(), 2);

        let renderer = config.renderer_config();
        assert_eq!(renderer.max_dimension, 1024);
        assert_eq!(renderer.face_cache_capacity, 9);
        assert_eq!(renderer.canvas_policy, CanvasPolicy::Pooled { pool_size: 3 });
    }

    #[test]
    fn canvas_reuse_is_off_by_default() {
        let config = Config::try_parse_from(["placeholder-gen", "--port", "1"]).unwrap();
        assert_eq!(config.renderer_config().canvas_policy, CanvasPolicy::Fresh);
        assert_eq!(config.max_dimension, 1920);
        assert_eq!(config.face_cache_capacity, 5);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn zero_workers_still_runs_one() {
        let config = Config::try_parse_from(["placeholder-gen", "--workers", "0"]).unwrap();
        assert_eq!(config.worker_count(), 1);
    }
}
