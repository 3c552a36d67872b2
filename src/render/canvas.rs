// Pixel buffer conversions between the codec and raster layers

use crate::error::{CaptionError, Result};
use std::io::Cursor;

/// Premultiply straight-alpha RGBA8 in place (the raster pipeline's layout).
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Inverse of premultiplication, for handing pixels back to the encoder.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u32 * 255 + a / 2) / a) as u8;
        px[1] = ((px[1] as u32 * 255 + a / 2) / a) as u8;
        px[2] = ((px[2] as u32 * 255 + a / 2) / a) as u8;
    }
}

/// Wrap premultiplied RGBA8 bytes into a raster pixmap.
pub fn pixmap_from_premul_rgba8(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> Result<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CaptionError::Internal("canvas width exceeds u16".to_string()))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CaptionError::Internal("canvas height exceeds u16".to_string()))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CaptionError::Internal(
            "canvas byte length mismatch".to_string(),
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Encode a premultiplied RGBA8 canvas as PNG.
pub fn encode_png(premul_rgba8: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut rgba = premul_rgba8.to_vec();
    unpremultiply_rgba8_in_place(&mut rgba);

    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| CaptionError::Internal("canvas byte length mismatch".to_string()))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CaptionError::Internal(format!("PNG encode failed: {}", e)))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiply_round_trip_opaque() {
        let mut px = vec![10u8, 128, 250, 255, 0, 77, 200, 255];
        let original = px.clone();
        premultiply_rgba8_in_place(&mut px);
        assert_eq!(px, original);
        unpremultiply_rgba8_in_place(&mut px);
        assert_eq!(px, original);
    }

    #[test]
    fn test_premultiply_half_alpha() {
        let mut px = vec![100u8, 50, 200, 128];
        premultiply_rgba8_in_place(&mut px);
        assert_eq!(
            px,
            vec![
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128
            ]
        );
    }

    #[test]
    fn test_unpremultiply_zero_alpha_clears_color() {
        let mut px = vec![9u8, 9, 9, 0];
        unpremultiply_rgba8_in_place(&mut px);
        assert_eq!(px, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_png_round_trips_dimensions() {
        let premul = vec![255u8; 3 * 2 * 4];
        let png = encode_png(&premul, 3, 2).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
    }

    #[test]
    fn test_pixmap_rejects_length_mismatch() {
        assert!(pixmap_from_premul_rgba8(&[0u8; 8], 3, 2).is_err());
    }
}
