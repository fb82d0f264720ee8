//! Pixel buffer export
//!
//! Channels are stored as 12-bit intensities; every export shifts them right
//! by 4 to get 8-bit values.

use std::io::Write;
use std::path::Path;

use super::pixel_buffer::{Pixel, PixelBuffer};
use super::RenderError;

/// Write the buffer as binary PPM: header `P6 {width} {height} 255\r`
/// followed by red, green, blue bytes per pixel, row-major
pub fn write_ppm<W: Write>(buffer: &PixelBuffer, writer: &mut W) -> Result<(), RenderError> {
    write!(writer, "P6 {} {} 255\r", buffer.width(), buffer.height())?;
    let bytes: Vec<u8> = buffer
        .pixels()
        .iter()
        .flat_map(|p| [Pixel::to_byte(p.red), Pixel::to_byte(p.green), Pixel::to_byte(p.blue)])
        .collect();
    writer.write_all(&bytes)?;
    Ok(())
}

/// Blue, green, red bytes per pixel for direct presentation
pub fn to_framebuffer(buffer: &PixelBuffer) -> Vec<u8> {
    buffer
        .pixels()
        .iter()
        .flat_map(|p| [Pixel::to_byte(p.blue), Pixel::to_byte(p.green), Pixel::to_byte(p.red)])
        .collect()
}

/// Save the buffer as an 8-bit RGB PNG
pub fn save_png<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    let width = u32::try_from(buffer.width()).map_err(|e| RenderError::Image(e.to_string()))?;
    let height = u32::try_from(buffer.height()).map_err(|e| RenderError::Image(e.to_string()))?;

    let raw: Vec<u8> = buffer
        .pixels()
        .iter()
        .flat_map(|p| [Pixel::to_byte(p.red), Pixel::to_byte(p.green), Pixel::to_byte(p.blue)])
        .collect();
    let image = image::RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| RenderError::Image("pixel data does not match dimensions".to_string()))?;

    image
        .save(path)
        .map_err(|e| RenderError::Image(format!("Failed to save {}: {}", path.display(), e)))?;
    log::info!("Saved {}x{} image to {:?}", width, height, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pixel_buffer() -> PixelBuffer {
        let mut buffer = PixelBuffer::with_background(2, 1, Pixel::background(0, 0, 0, 1));
        buffer.put(0, 0, Pixel::new(4095, 2048, 16, 1, 0)).unwrap();
        buffer
    }

    #[test]
    fn test_ppm_header_and_body() {
        let mut out = Vec::new();
        write_ppm(&two_pixel_buffer(), &mut out).unwrap();

        let header = b"P6 2 1 255\r";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[255, 128, 1, 0, 0, 0]);
    }

    #[test]
    fn test_framebuffer_is_bgr() {
        assert_eq!(to_framebuffer(&two_pixel_buffer()), vec![1, 128, 255, 0, 0, 0]);
    }

    #[test]
    fn test_png_round_trip() {
        let path = std::env::temp_dir().join("soft_render_output_test.png");
        save_png(&two_pixel_buffer(), &path).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0).0, [255, 128, 1]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_png_with_unknown_extension_fails() {
        let path = std::env::temp_dir().join("soft_render_output_test.unknownext");
        assert!(matches!(save_png(&two_pixel_buffer(), &path), Err(RenderError::Image(_))));
    }

    #[test]
    fn test_default_background_bytes() {
        let buffer = PixelBuffer::new(1, 1);
        assert_eq!(to_framebuffer(&buffer), vec![96, 112, 128]);
    }
}
