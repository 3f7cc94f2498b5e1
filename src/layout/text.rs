use crate::{Colour, Face};
use image::RgbaImage;

/// Where a run of text starts: the left edge of the first glyph's pen position
/// and the baseline, both in image pixels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub baseline: i32,
    pub text_width: i32,
}

/// Calculates the origin that centers a single line of text within a box of the
/// given size. Horizontal centering uses the measured advance of the text;
/// vertical centering balances the face's ascent against its descent. Both use
/// integer division, so odd remainders truncate toward zero.
pub fn placement(face: &Face, text: &str, width: u32, height: u32) -> Placement {
    let text_width = face.measure(text);
    let metrics = face.metrics();
    Placement {
        x: (width as i32 - text_width) / 2,
        baseline: (height as i32 + metrics.ascent - metrics.descent) / 2,
        text_width,
    }
}

/// Draws text centered within the first `width` x `height` pixels of the
/// canvas, filling glyphs with a uniform colour.
///
/// Only pixels under a glyph's coverage are touched. Text larger than the
/// canvas is not an error; the parts that fall outside are simply not drawn.
///
/// Returns where the text was placed.
pub fn draw_text(
    canvas: &mut RgbaImage,
    text: &str,
    face: &Face,
    width: u32,
    height: u32,
    colour: Colour,
) -> Placement {
    let placement = placement(face, text, width, height);
    let (glyphs, _) = face.layout(text);
    // Ink stays within an em of the glyph's advance box
    let em = face.pixel_size().ceil() as i32;

    for positioned in glyphs {
        let pen_x = placement.x + positioned.x.round() as i32;
        let advance = face.advance(positioned.id) as i32;
        if pen_x + advance + em < 0 || pen_x - em >= canvas.width() as i32 {
            continue;
        }

        let glyph = face.glyph(positioned.id);
        let origin_x = pen_x + glyph.left;
        let origin_y = placement.baseline - glyph.top;

        for (row, coverage_row) in glyph.coverage.chunks(glyph.width.max(1)).enumerate() {
            let y = origin_y + row as i32;
            if y < 0 || y >= canvas.height() as i32 {
                continue;
            }
            for (col, &coverage) in coverage_row.iter().enumerate() {
                let x = origin_x + col as i32;
                if coverage == 0 || x < 0 || x >= canvas.width() as i32 {
                    continue;
                }
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                *pixel = blend(*pixel, colour, coverage);
            }
        }
    }

    placement
}

/// Composite `colour` over `dst` with straight alpha, scaled by glyph coverage
fn blend(dst: image::Rgba<u8>, colour: Colour, coverage: u8) -> image::Rgba<u8> {
    let alpha = (coverage as f32 / 255.0) * (colour.a as f32 / 255.0);
    if alpha >= 1.0 {
        return colour.into();
    }

    let [dr, dg, db, da] = dst.0;
    let dst_alpha = da as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= 0.0 {
        return image::Rgba([0, 0, 0, 0]);
    }

    let mix = |src: u8, dst: u8| -> u8 {
        let value = (src as f32 * alpha + dst as f32 * dst_alpha * (1.0 - alpha)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    image::Rgba([
        mix(colour.r, dr),
        mix(colour.g, dg),
        mix(colour.b, db),
        (out_alpha * 255.0).round() as u8,
    ])
}
