//! Cropping and encoding of captured rasters.

use image::RgbaImage;

use crate::capture::RasterFrame;
use crate::error::CaptureError;
use crate::geometry::RasterCropRect;

/// Crop a frame to a bounds-checked raster rectangle.
///
/// The rectangle was validated against this frame's dimensions by
/// `to_raster_crop`, so the crop itself cannot run off the buffer.
pub fn crop_raster(frame: &RasterFrame, crop: &RasterCropRect) -> RgbaImage {
    image::imageops::crop_imm(frame.image(), crop.x, crop.y, crop.width, crop.height).to_image()
}

/// Encode an image to in-memory PNG bytes — no disk I/O.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut png_bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut png_bytes),
            image::ImageFormat::Png,
        )
        .map_err(|e| CaptureError::ImageEncode(e.to_string()))?;
    Ok(png_bytes)
}
