use crate::{Font, PlaceholderError, Pt};
use lru::LruCache;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Faces larger than this are refused; glyph masks grow with the square of the size
pub const MAX_FACE_SIZE: Pt = Pt(1000.0);

/// Bytes of coverage masks a face keeps between draws
pub const GLYPH_CACHE_BUDGET: usize = 4 * 1024 * 1024;

/// The rendering configuration a face is built with. Advances and kerning are
/// always snapped to whole pixels (full hinting).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaceOptions {
    pub size: Pt,
    pub dpi: f32,
}

impl FaceOptions {
    /// The configuration every face in the service is built with: 72 DPI, so one
    /// point maps to one pixel
    pub fn at_size(size: Pt) -> FaceOptions {
        FaceOptions { size, dpi: 72.0 }
    }
}

impl Default for FaceOptions {
    fn default() -> Self {
        FaceOptions::at_size(Pt(12.0))
    }
}

/// Vertical metrics of a face, in whole pixels. Both values are rounded up and
/// `descent` is positive below the baseline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FaceMetrics {
    pub ascent: i32,
    pub descent: i32,
}

/// A rasterized glyph coverage mask
#[derive(Debug, Clone)]
pub struct GlyphBitmap {
    /// Offset from the pen position to the left edge of the mask
    pub left: i32,
    /// Offset from the baseline up to the top edge of the mask
    pub top: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, 0-255 per pixel
    pub coverage: Vec<u8>,
}

/// A glyph placed along a run of text, relative to the run's origin
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub id: u16,
    pub x: f32,
}

/// Masks kept by a face. Once their combined size passes the budget, the least
/// recently drawn masks are dropped.
struct GlyphCache {
    masks: LruCache<u16, Arc<GlyphBitmap>>,
    bytes: usize,
    budget: usize,
}

impl GlyphCache {
    fn new(budget: usize) -> GlyphCache {
        GlyphCache {
            masks: LruCache::unbounded(),
            bytes: 0,
            budget,
        }
    }

    fn get(&mut self, gid: u16) -> Option<Arc<GlyphBitmap>> {
        self.masks.get(&gid).cloned()
    }

    fn insert(&mut self, gid: u16, mask: Arc<GlyphBitmap>) {
        self.bytes += mask.coverage.len();
        if let Some((_, replaced)) = self.masks.push(gid, mask) {
            self.bytes -= replaced.coverage.len();
        }

        while self.bytes > self.budget {
            match self.masks.pop_lru() {
                Some((_, evicted)) => self.bytes -= evicted.coverage.len(),
                None => break,
            }
        }
    }
}

/// A [Font] at one specific size and rendering configuration. Measures text
/// and hands out glyph masks, keeping recently drawn masks up to
/// [GLYPH_CACHE_BUDGET] bytes.
pub struct Face {
    font: Arc<Font>,
    size: Pt,
    px: f32,
    metrics: FaceMetrics,
    glyphs: Mutex<GlyphCache>,
}

impl Face {
    pub fn new(font: Arc<Font>, options: FaceOptions) -> Result<Face, PlaceholderError> {
        Face::with_glyph_budget(font, options, GLYPH_CACHE_BUDGET)
    }

    pub(crate) fn with_glyph_budget(
        font: Arc<Font>,
        options: FaceOptions,
        budget: usize,
    ) -> Result<Face, PlaceholderError> {
        let size = options.size;
        if !size.is_finite()
            || size <= Pt(0.0)
            || size > MAX_FACE_SIZE
            || !options.dpi.is_finite()
            || options.dpi <= 0.0
        {
            return Err(PlaceholderError::FaceCreation(size));
        }

        let px = size.to_px(options.dpi);
        let metrics = FaceMetrics {
            ascent: font.ascent(size).to_px(options.dpi).ceil() as i32,
            descent: (-font.descent(size).to_px(options.dpi)).ceil() as i32,
        };

        Ok(Face {
            font,
            size,
            px,
            metrics,
            glyphs: Mutex::new(GlyphCache::new(budget)),
        })
    }

    pub fn size(&self) -> Pt {
        self.size
    }

    /// The em size in pixels
    pub fn pixel_size(&self) -> f32 {
        self.px
    }

    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn to_px(&self, units: f32) -> f32 {
        (units * self.px / self.font.units_per_em() as f32).round()
    }

    /// Advance of a single glyph, in whole pixels
    pub fn advance(&self, gid: u16) -> f32 {
        self.to_px(self.font.hor_advance(gid) as f32)
    }

    /// Kerning adjustment between two glyphs, in whole pixels
    pub fn kern(&self, left: u16, right: u16) -> f32 {
        self.to_px(self.font.kerning(left, right) as f32)
    }

    /// Lay the text out on a single line. Returns each glyph's pen position and
    /// the total advance of the run.
    pub fn layout(&self, text: &str) -> (Vec<PositionedGlyph>, f32) {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0;
        let mut previous: Option<u16> = None;

        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(previous) = previous {
                pen += self.kern(previous, id);
            }
            glyphs.push(PositionedGlyph { id, x: pen });
            pen += self.advance(id);
            previous = Some(id);
        }

        (glyphs, pen)
    }

    /// Width of the rendered text in whole pixels, rounded up
    pub fn measure(&self, text: &str) -> i32 {
        let (_, advance) = self.layout(text);
        advance.ceil() as i32
    }

    /// Coverage mask for a glyph, rasterized on first use
    pub fn glyph(&self, gid: u16) -> Arc<GlyphBitmap> {
        if let Some(mask) = self.lock_glyphs().get(gid) {
            return mask;
        }

        // Rasterize without holding the lock; a concurrent miss on the same
        // glyph just replaces an identical mask.
        let (metrics, coverage) = self.font.rasterize(gid, self.px);
        let mask = Arc::new(GlyphBitmap {
            left: metrics.xmin,
            top: metrics.ymin + metrics.height as i32,
            width: metrics.width,
            height: metrics.height,
            coverage,
        });
        self.lock_glyphs().insert(gid, mask.clone());
        mask
    }

    fn lock_glyphs(&self) -> MutexGuard<'_, GlyphCache> {
        self.glyphs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of glyph masks currently kept
    pub fn cached_glyphs(&self) -> usize {
        self.lock_glyphs().masks.len()
    }

    /// Total size of the kept glyph masks, in bytes
    pub fn cached_glyph_bytes(&self) -> usize {
        self.lock_glyphs().bytes
    }
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("size", &self.size)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
