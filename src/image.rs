use crate::PlaceholderError;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

/// Content type of the bytes produced by [encode_png]
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Serialize a canvas as PNG. Fully opaque canvases are written without an
/// alpha channel; anything with transparency is written as RGBA.
///
/// The whole image is encoded in memory, so a failure never leaves a partial
/// image behind.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, PlaceholderError> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);

    if image.pixels().all(|pixel| pixel.0[3] == 255) {
        let rgb: Vec<u8> = image
            .pixels()
            .flat_map(|pixel| [pixel.0[0], pixel.0[1], pixel.0[2]])
            .collect();
        encoder.write_image(&rgb, width, height, ColorType::Rgb8)?;
    } else {
        encoder.write_image(image.as_raw(), width, height, ColorType::Rgba8)?;
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    #[test]
    fn opaque_canvas_is_written_as_rgb() {
        let canvas = RgbaImage::from_pixel(8, 4, colours::RED.into());
        let bytes = encode_png(&canvas).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!(decoded.to_rgba8(), canvas);
    }

    #[test]
    fn transparency_is_preserved() {
        let mut canvas = RgbaImage::from_pixel(3, 3, colours::WHITE.into());
        canvas.put_pixel(1, 1, colours::TRANSPARENT.into());
        let bytes = encode_png(&canvas).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgba8);
        assert_eq!(decoded.to_rgba8().get_pixel(1, 1).0, [0, 0, 0, 0]);
    }
}
