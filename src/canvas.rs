use crate::{Colour, PlaceholderError};
use image::RgbaImage;
use log::debug;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Largest width or height accepted when nothing else is configured
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;

/// How pixel buffers are obtained for each render
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum CanvasPolicy {
    /// Allocate a new buffer for every request
    #[default]
    Fresh,
    /// Check out an idle buffer of the same dimensions if one exists, and return
    /// it to the pool once the caller is done with it
    Pooled { pool_size: usize },
}

/// Hands out pixel buffers filled with a background colour, enforcing the
/// maximum image size before anything is allocated.
pub struct CanvasManager {
    policy: CanvasPolicy,
    max_dimension: u32,
    idle: Mutex<VecDeque<RgbaImage>>,
}

impl CanvasManager {
    pub fn new(policy: CanvasPolicy, max_dimension: u32) -> CanvasManager {
        CanvasManager {
            policy,
            max_dimension,
            idle: Mutex::new(VecDeque::new()),
        }
    }

    pub fn policy(&self) -> CanvasPolicy {
        self.policy
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Reject sizes that are empty or over the configured maximum
    pub fn check_size(&self, width: u32, height: u32) -> Result<(), PlaceholderError> {
        if width == 0 || height == 0 {
            return Err(PlaceholderError::EmptyImage { width, height });
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(PlaceholderError::SizeTooLarge {
                width,
                height,
                max: self.max_dimension,
            });
        }
        Ok(())
    }

    /// Obtain a `width` x `height` canvas with every pixel set to `background`
    pub fn prepare(
        &self,
        width: u32,
        height: u32,
        background: Colour,
    ) -> Result<Canvas<'_>, PlaceholderError> {
        self.check_size(width, height)?;

        let image = match self.policy {
            CanvasPolicy::Fresh => RgbaImage::from_pixel(width, height, background.into()),
            CanvasPolicy::Pooled { .. } => match self.checkout(width, height) {
                Some(mut reused) => {
                    let background: image::Rgba<u8> = background.into();
                    reused.pixels_mut().for_each(|pixel| *pixel = background);
                    reused
                }
                None => RgbaImage::from_pixel(width, height, background.into()),
            },
        };

        Ok(Canvas {
            image,
            manager: self,
        })
    }

    fn checkout(&self, width: u32, height: u32) -> Option<RgbaImage> {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        let index = idle
            .iter()
            .position(|image| image.dimensions() == (width, height))?;
        debug!("reusing pooled {width}x{height} canvas");
        idle.remove(index)
    }

    fn release(&self, image: RgbaImage) {
        let CanvasPolicy::Pooled { pool_size } = self.policy else {
            return;
        };
        if pool_size == 0 {
            return;
        }

        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        idle.push_back(image);
        while idle.len() > pool_size {
            idle.pop_front();
        }
    }

    /// Number of buffers waiting in the pool
    pub fn idle(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A pixel buffer owned exclusively by one render. Under a pooled policy the
/// buffer goes back to its [CanvasManager] when dropped.
pub struct Canvas<'m> {
    image: RgbaImage,
    manager: &'m CanvasManager,
}

impl Canvas<'_> {
    /// Take the buffer out, so it is not returned to the pool
    pub fn into_image(mut self) -> RgbaImage {
        std::mem::replace(&mut self.image, RgbaImage::new(0, 0))
    }
}

impl Deref for Canvas<'_> {
    type Target = RgbaImage;

    fn deref(&self) -> &RgbaImage {
        &self.image
    }
}

impl DerefMut for Canvas<'_> {
    fn deref_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

impl Drop for Canvas<'_> {
    fn drop(&mut self) {
        let image = std::mem::replace(&mut self.image, RgbaImage::new(0, 0));
        if image.width() > 0 {
            self.manager.release(image);
        }
    }
}

impl std::fmt::Debug for Canvas<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("dimensions", &self.image.dimensions())
            .finish()
    }
}
