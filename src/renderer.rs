use crate::layout::{draw_text, FitCalculator};
use crate::{
    Canvas, CanvasManager, CanvasPolicy, FaceCache, Font, PlaceholderError, Pt, RenderRequest,
    DEFAULT_FACE_CACHE_CAPACITY, DEFAULT_MAX_DIMENSION,
};
use log::debug;
use std::sync::Arc;

/// Tunables for a [Renderer]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    pub face_cache_capacity: usize,
    pub max_dimension: u32,
    pub canvas_policy: CanvasPolicy,
    pub fit: FitCalculator,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            face_cache_capacity: DEFAULT_FACE_CACHE_CAPACITY,
            max_dimension: DEFAULT_MAX_DIMENSION,
            canvas_policy: CanvasPolicy::Fresh,
            fit: FitCalculator::default(),
        }
    }
}

/// Everything a render needs that outlives a single request: the font, the
/// face cache and the canvas manager.
///
/// Build one at startup and share it between request handlers behind an `Arc`;
/// every method takes `&self` and is safe to call concurrently.
pub struct Renderer {
    faces: FaceCache,
    canvases: CanvasManager,
    fit: FitCalculator,
}

impl Renderer {
    pub fn new(font: Arc<Font>, config: RendererConfig) -> Renderer {
        Renderer {
            faces: FaceCache::new(font, config.face_cache_capacity),
            canvases: CanvasManager::new(config.canvas_policy, config.max_dimension),
            fit: config.fit,
        }
    }

    pub fn font(&self) -> &Arc<Font> {
        self.faces.font()
    }

    pub fn faces(&self) -> &FaceCache {
        &self.faces
    }

    pub fn canvases(&self) -> &CanvasManager {
        &self.canvases
    }

    /// The size text will be drawn at: the requested size, or the fitted one
    pub fn font_size_for(&self, request: &RenderRequest) -> Result<Pt, PlaceholderError> {
        match request.font_size {
            Some(size) => Ok(size),
            None => self.fit.compute_font_size(
                &self.faces,
                &request.text,
                request.width,
                request.height,
            ),
        }
    }

    /// Render a placeholder image: a background-filled canvas with the request's
    /// text centered on it. Sizes are validated before any work is done.
    pub fn render_placeholder(&self, request: &RenderRequest) -> Result<Canvas<'_>, PlaceholderError> {
        let mut canvas = self
            .canvases
            .prepare(request.width, request.height, request.background)?;

        let size = self.font_size_for(request)?;
        let face = self.faces.get_face(size)?;
        let placement = draw_text(
            &mut canvas,
            &request.text,
            &face,
            request.width,
            request.height,
            request.font_colour,
        );
        debug!(
            "rendered {}x{} placeholder at {size}, text origin ({}, {})",
            request.width, request.height, placement.x, placement.baseline
        );

        Ok(canvas)
    }
}
