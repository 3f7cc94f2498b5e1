//! Placeholder image generation.
//!
//! Renders a solid-colour image with a single line of centered text, picking
//! a font size that fits the text when none is given. A [Renderer] holds the
//! long-lived state (the [Font], a bounded [FaceCache] and a [CanvasManager])
//! and is shared by every request handler.
//!
//! ```
//! use std::sync::Arc;
//! use placeholder_gen::{encode_png, Font, RenderRequest, Renderer, RendererConfig};
//!
//! let font_data = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSans.ttf"));
//! let font = Font::load(font_data.to_vec()).expect("can load font");
//! let renderer = Renderer::new(Arc::new(font), RendererConfig::default());
//!
//! let request = RenderRequest::from_query("w=200&h=100&text=Hello").expect("valid query");
//! let canvas = renderer.render_placeholder(&request).expect("can render");
//! let png = encode_png(&canvas).expect("can encode");
//! assert!(!png.is_empty());
//! ```

mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

pub mod config;

mod error;
pub use error::*;

mod face;
pub use face::*;

mod face_cache;
pub use face_cache::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

/// Fitting and drawing a line of text onto a canvas
pub mod layout;

mod renderer;
pub use renderer::*;

mod request;
pub use request::*;

pub mod server;

mod units;
pub use units::*;
