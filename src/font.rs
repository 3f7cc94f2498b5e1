use crate::{PlaceholderError, Pt};
use fontdue::FontSettings;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::path::Path;

/// A parsed font program. Fonts can be TTF or OTF fonts and are loaded once, at
/// startup, then shared read-only by every [crate::Face] derived from them.
///
/// The OpenType tables (cmap, advances, kerning, vertical metrics) are read
/// through [owned_ttf_parser]; glyph coverage masks come from [fontdue], which
/// is handed the same bytes so glyph ids agree between the two.
pub struct Font {
    face: OwnedFace,
    raster: fontdue::Font,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PlaceholderError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        let raster = fontdue::Font::from_bytes(face.as_slice(), FontSettings::default())
            .map_err(PlaceholderError::Rasterizer)?;

        Ok(Font { face, raster })
    }

    /// Read and parse a font file from disk
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Font, PlaceholderError> {
        let bytes = std::fs::read(path)?;
        Self::load(bytes)
    }

    /// Obtain the full name of the font, if the font carries one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Obtain the family name of the font, if the font carries one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    pub fn units_per_em(&self) -> u16 {
        self.face.as_face_ref().units_per_em()
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        let scaling: Pt = size / self.units_per_em() as f32;
        scaling * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        let scaling: Pt = size / self.units_per_em() as f32;
        scaling * self.face.as_face_ref().descender() as f32
    }

    /// Map a character to a glyph, falling back to the replacement character,
    /// then `?`, then the `.notdef` glyph
    pub fn glyph_id(&self, ch: char) -> u16 {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .map(|gid| gid.0)
            .unwrap_or(0)
    }

    /// Horizontal advance of a glyph, in font units
    pub fn hor_advance(&self, gid: u16) -> u16 {
        self.face
            .as_face_ref()
            .glyph_hor_advance(GlyphId(gid))
            .unwrap_or_default()
    }

    /// Pair kerning from the `kern` table, in font units. Only horizontal,
    /// non-variable subtables are consulted.
    pub fn kerning(&self, left: u16, right: u16) -> i16 {
        let Some(kern) = self.face.as_face_ref().tables().kern else {
            return 0;
        };

        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| subtable.glyphs_kerning(GlyphId(left), GlyphId(right)))
            .unwrap_or(0)
    }

    /// Rasterize a glyph's coverage at the given pixel size
    pub(crate) fn rasterize(&self, gid: u16, px: f32) -> (fontdue::Metrics, Vec<u8>) {
        self.raster.rasterize_indexed(gid, px)
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family())
            .field("units_per_em", &self.units_per_em())
            .finish()
    }
}
