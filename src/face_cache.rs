use crate::{Face, FaceOptions, Font, PlaceholderError, Pt};
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Number of faces kept resident when no capacity is configured
pub const DEFAULT_FACE_CACHE_CAPACITY: usize = 5;

/// A bounded map from font size to [Face]. When full, the least recently used
/// face is evicted to make room for a new one.
///
/// Faces are handed out as `Arc`s, so an evicted face stays alive for as long
/// as a request is still drawing with it.
pub struct FaceCache {
    font: Arc<Font>,
    faces: Mutex<LruCache<u32, Arc<Face>>>,
}

impl FaceCache {
    /// A capacity of zero is treated as one
    pub fn new(font: Arc<Font>, capacity: usize) -> FaceCache {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        FaceCache {
            font,
            faces: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn font(&self) -> &Arc<Font> {
        &self.font
    }

    fn key(size: Pt) -> u32 {
        size.0.to_bits()
    }

    /// Obtain the face for a font size, building and caching it if needed
    pub fn get_face(&self, size: Pt) -> Result<Arc<Face>, PlaceholderError> {
        let mut faces = self.faces.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(face) = faces.get(&Self::key(size)) {
            return Ok(face.clone());
        }

        let face = Arc::new(Face::new(self.font.clone(), FaceOptions::at_size(size))?);
        if let Some((evicted, _)) = faces.push(Self::key(size), face.clone()) {
            debug!(
                "face cache full, evicted {}",
                Pt(f32::from_bits(evicted))
            );
        }
        debug!("face cache miss for {size}, {} resident", faces.len());

        Ok(face)
    }

    pub fn contains(&self, size: Pt) -> bool {
        self.faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&Self::key(size))
    }

    pub fn len(&self) -> usize {
        self.faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cap()
            .get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::dejavu;

    #[test]
    fn hits_return_the_same_face() {
        let cache = FaceCache::new(dejavu(), 5);
        let a = cache.get_face(Pt(20.0)).unwrap();
        let b = cache.get_face(Pt(20.0)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn never_exceeds_capacity() {
        let cache = FaceCache::new(dejavu(), 5);
        for size in 10..40 {
            let face = cache.get_face(Pt(size as f32)).unwrap();
            assert_eq!(face.size(), Pt(size as f32));
            assert!(cache.len() <= 5);
        }
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.capacity(), 5);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = FaceCache::new(dejavu(), 2);
        cache.get_face(Pt(10.0)).unwrap();
        cache.get_face(Pt(11.0)).unwrap();
        // touch 10 so 11 becomes the eviction candidate
        cache.get_face(Pt(10.0)).unwrap();
        cache.get_face(Pt(12.0)).unwrap();

        assert!(cache.contains(Pt(10.0)));
        assert!(!cache.contains(Pt(11.0)));
        assert!(cache.contains(Pt(12.0)));
    }

    #[test]
    fn creation_errors_propagate_and_are_not_cached() {
        let cache = FaceCache::new(dejavu(), 3);
        assert!(matches!(
            cache.get_face(Pt(-3.0)),
            Err(PlaceholderError::FaceCreation(_))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_holds_one_face() {
        let cache = FaceCache::new(dejavu(), 0);
        cache.get_face(Pt(10.0)).unwrap();
        cache.get_face(Pt(11.0)).unwrap();
        assert_eq!(cache.len(), 1);
    }
}
