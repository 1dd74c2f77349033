use std::path::Path;

use anyhow::{Context, Result};
use pw_core::frame::FrameBuffer;

/// Decode an image file (PNG, JPEG, BMP, GIF) into an RGBA [`FrameBuffer`].
///
/// # Errors
/// Returns an error if the image cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use pw_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("line.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let frame = frame_from_image(&img);
    log::debug!(
        "Image {} décodée : {}×{}",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

/// Convert an already decoded image into a [`FrameBuffer`].
///
/// # Example
/// ```
/// use pw_source::image::frame_from_image;
/// let img = image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 2, image::Luma([200])));
/// let frame = frame_from_image(&img);
/// assert_eq!((frame.width, frame.height), (4, 2));
/// assert_eq!(frame.red(3, 1), 200);
/// ```
#[must_use]
pub fn frame_from_image(img: &image::DynamicImage) -> FrameBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let img = image::RgbaImage::from_fn(8, 8, |x, y| {
            image::Rgba([(x * 32) as u8, (y * 32) as u8, 0, 255])
        });
        img.save(&path).unwrap();

        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (8, 8));
        assert_eq!(frame.red(3, 5), 96);
        let idx = (5 * 8 + 3) * 4;
        assert_eq!(&frame.data[idx..idx + 4], &[96, 160, 0, 255]);
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("absent.png")).unwrap_err();
        assert!(err.to_string().contains("absent.png"));
    }
}
