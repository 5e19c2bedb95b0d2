use std::{
    io,
    path::{Path, PathBuf},
};

use crate::error::{GtError, GtResult};

use super::color::linear_to_srgb_u8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Y,
    Rgb,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Y => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

/// Linear radiance, row-major from the top-left pixel.
pub struct ImageBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<f32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum BitmapFormat {
    Png,
    Jpeg,
    Exr,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * format.channels(),
            "image data doesn't match its size"
        );
        Self {
            width,
            height,
            format,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[f32] {
        let channels = self.format.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &self.data[start..start + channels]
    }

    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            0.0
        } else {
            self.data.iter().sum::<f32>() / self.data.len() as f32
        }
    }

    fn to_dynamic_image(&self) -> io::Result<image::DynamicImage> {
        let bytes = self
            .data
            .iter()
            .map(|v| linear_to_srgb_u8(*v))
            .collect::<Vec<_>>();
        let image = match self.format {
            PixelFormat::Y => image::GrayImage::from_raw(self.width, self.height, bytes)
                .map(image::DynamicImage::ImageLuma8),
            PixelFormat::Rgb => image::RgbImage::from_raw(self.width, self.height, bytes)
                .map(image::DynamicImage::ImageRgb8),
        };
        image.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "image buffer size mismatch"))
    }

    fn rgb_at(&self, x: usize, y: usize) -> (f32, f32, f32) {
        let p = self.pixel(x as u32, y as u32);
        match self.format {
            PixelFormat::Y => (p[0], p[0], p[0]),
            PixelFormat::Rgb => (p[0], p[1], p[2]),
        }
    }
}

/// Encodes `image` by the extension of `path` and moves it into place.
///
/// The bitmap is written to a hidden sibling first and renamed over `path`, so a
/// failed write never leaves a truncated file behind or clobbers an existing one.
pub fn write_bitmap<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> GtResult<()> {
    let path = path.as_ref();
    let format = bitmap_format(path).map_err(|err| GtError::io(path, err))?;
    let temp_path = temp_sibling(path).map_err(|err| GtError::io(path, err))?;

    log::debug!(
        "encoding {}x{} {:?} image as {:?} via '{}'",
        image.width,
        image.height,
        image.format,
        format,
        temp_path.display()
    );

    let result = encode_to(&temp_path, format, image).and_then(|_| std::fs::rename(&temp_path, path));
    if let Err(err) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(GtError::io(path, err));
    }
    Ok(())
}

fn bitmap_format(path: &Path) -> io::Result<BitmapFormat> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => Ok(BitmapFormat::Png),
        Some("jpg") | Some("jpeg") => Ok(BitmapFormat::Jpeg),
        Some("exr") => Ok(BitmapFormat::Exr),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "unsupported bitmap extension, expected png, jpg or exr",
        )),
    }
}

fn temp_sibling(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;
    Ok(path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id())))
}

fn encode_to(path: &Path, format: BitmapFormat, image: &ImageBuffer) -> io::Result<()> {
    match format {
        BitmapFormat::Png | BitmapFormat::Jpeg => {
            let image_format = if format == BitmapFormat::Png {
                image::ImageFormat::Png
            } else {
                image::ImageFormat::Jpeg
            };
            image
                .to_dynamic_image()?
                .save_with_format(path, image_format)
                .map_err(|err| match err {
                    image::ImageError::IoError(err) => err,
                    err => io::Error::new(io::ErrorKind::Other, err.to_string()),
                })
        }
        BitmapFormat::Exr => exr::prelude::write_rgb_file(
            path,
            image.width as usize,
            image.height as usize,
            |x, y| image.rgb_at(x, y),
        )
        .map_err(|err| match err {
            exr::error::Error::Io(err) => err,
            err => io::Error::new(io::ErrorKind::Other, err.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(format: PixelFormat) -> ImageBuffer {
        let (width, height) = (4, 2);
        let data = (0..width * height * format.channels() as u32)
            .map(|i| i as f32 / 24.0)
            .collect();
        ImageBuffer::new(width, height, format, data)
    }

    #[test]
    fn png_is_written_and_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_bitmap(&path, &gradient(PixelFormat::Rgb)).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 2));
        // first pixel is linear [0, 1/24, 2/24], stored sRGB encoded
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 58, 82]);
        // no temp file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn mono_png_is_grayscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_bitmap(&path, &gradient(PixelFormat::Y)).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn exr_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.exr");
        write_bitmap(&path, &gradient(PixelFormat::Rgb)).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn unknown_extension_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmpx");
        let err = write_bitmap(&path, &gradient(PixelFormat::Rgb)).unwrap_err();
        assert!(matches!(err, GtError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory can't be replaced by a file
        let path = dir.path().join("out.png");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), b"old").unwrap();

        let err = write_bitmap(&path, &gradient(PixelFormat::Rgb)).unwrap_err();
        assert!(matches!(err, GtError::Io { .. }));
        assert_eq!(std::fs::read(path.join("keep.txt")).unwrap(), b"old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
