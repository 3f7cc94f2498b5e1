use super::Margins;
use crate::{FaceCache, PlaceholderError, Pt, MAX_FACE_SIZE};

/// Smallest size the fit calculator will shrink text to
pub const MIN_FIT_SIZE: Pt = Pt(10.0);

/// Amount the candidate size shrinks by on each step
pub const FIT_STEP: Pt = Pt(1.0);

/// Starting size as a fraction of the image height
pub const FIT_HEIGHT_RATIO: f32 = 0.4;

/// Finds the largest font size at which a single line of text fits inside an
/// image, leaving a horizontal margin on both sides.
///
/// The search is linear: it starts at `height * 0.4`, capped at [MAX_FACE_SIZE],
/// and shrinks by one point until the text fits or [MIN_FIT_SIZE] is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitCalculator {
    pub margins: Margins,
    pub min_size: Pt,
    pub max_size: Pt,
    pub step: Pt,
    pub height_ratio: f32,
}

impl Default for FitCalculator {
    fn default() -> Self {
        FitCalculator {
            margins: Margins::symmetric(0, 10),
            min_size: MIN_FIT_SIZE,
            max_size: MAX_FACE_SIZE,
            step: FIT_STEP,
            height_ratio: FIT_HEIGHT_RATIO,
        }
    }
}

impl FitCalculator {
    /// The size the search starts from for an image of the given height
    pub fn initial_size(&self, height: u32) -> Pt {
        Pt(height as f32 * self.height_ratio).min(self.max_size)
    }

    /// Compute the font size for `text` using faces from the cache
    pub fn compute_font_size(
        &self,
        faces: &FaceCache,
        text: &str,
        width: u32,
        height: u32,
    ) -> Result<Pt, PlaceholderError> {
        self.fit(width, height, |size| Ok(faces.get_face(size)?.measure(text)))
    }

    /// Run the search with an arbitrary measurement. `measure` returns the width
    /// in pixels of the text at a candidate size and is called once per
    /// candidate, largest first.
    ///
    /// A candidate never drops below the minimum size: a step that would cross
    /// it lands on the minimum instead. A starting size already below the
    /// minimum is returned as is.
    pub fn fit<F>(&self, width: u32, height: u32, mut measure: F) -> Result<Pt, PlaceholderError>
    where
        F: FnMut(Pt) -> Result<i32, PlaceholderError>,
    {
        let available = self.margins.inner_width(width);
        let mut size = self.initial_size(height);

        let mut text_width = measure(size)?;
        while text_width > available && size > self.min_size {
            size = (size - self.step).max(self.min_size);
            text_width = measure(size)?;
        }

        Ok(size)
    }
}
