//! Text placement for placeholder images.
//!
//! Two steps turn a string into pixels:
//!
//! - [`FitCalculator`](crate::layout::FitCalculator) picks a font size so a single
//!   line of text fits between the horizontal [`Margins`](crate::layout::Margins)
//!   of the image
//! - [`draw_text`](crate::layout::draw_text) centers that line and paints its
//!   glyphs onto the canvas
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use placeholder_gen::{colours, FaceCache, Font};
//! use placeholder_gen::layout::{draw_text, FitCalculator};
//!
//! let font_data = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/DejaVuSans.ttf"));
//! let font = Arc::new(Font::load(font_data.to_vec()).expect("can load font"));
//! let faces = FaceCache::new(font, 5);
//!
//! let size = FitCalculator::default()
//!     .compute_font_size(&faces, "Placeholder", 400, 300)
//!     .expect("can fit text");
//! let face = faces.get_face(size).expect("can build face");
//!
//! let mut canvas = image::RgbaImage::from_pixel(400, 300, colours::WHITE.into());
//! draw_text(&mut canvas, "Placeholder", &face, 400, 300, colours::BLACK);
//! ```

mod fit;
mod margins;
mod text;

pub use fit::*;
pub use margins::*;
pub use text::*;
