use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use crate::error::EditorError;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn as_str(&self) -> &str {
        match self {
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Png => "PNG",
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }

    /// Every extension accepted for this format, for file-dialog filters.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Jpeg => &["jpg", "jpeg"],
            ExportFormat::Png => &["png"],
        }
    }

    pub fn all() -> Vec<ExportFormat> {
        vec![ExportFormat::Jpeg, ExportFormat::Png]
    }

    pub fn from_path(path: &Path) -> Result<ExportFormat, EditorError> {
        let ext: String = path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        ExportFormat::all().into_iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
            .ok_or(EditorError::UnsupportedFormat(ext))
    }
}

/// Appends `.jpg` when the chosen file name has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() { path.to_path_buf() }
    else { path.with_extension(ExportFormat::Jpeg.extension()) }
}

pub fn export_image(img: &RgbImage, path: &Path, format: ExportFormat, jpeg_quality: u8) -> Result<(), EditorError> {
    let file: File = File::create(path)
        .map_err(|source| EditorError::Io { path: path.to_path_buf(), source })?;
    let writer: BufWriter<File> = BufWriter::new(file);
    let (w, h) = img.dimensions();

    let encoded = match format {
        ExportFormat::Jpeg => {
            JpegEncoder::new_with_quality(writer, jpeg_quality.clamp(1, 100))
                .write_image(img.as_raw(), w, h, ExtendedColorType::Rgb8)
        }
        ExportFormat::Png => {
            PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive)
                .write_image(img.as_raw(), w, h, ExtendedColorType::Rgb8)
        }
    };
    encoded.map_err(|source| EditorError::Save { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("simple_photo_editor_{}_{}", std::process::id(), name))
    }

    #[test]
    fn format_follows_extension_case_insensitively() {
        assert_eq!(ExportFormat::from_path(Path::new("a/b.JPG")).ok(), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_path(Path::new("b.jpeg")).ok(), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_path(Path::new("c.png")).ok(), Some(ExportFormat::Png));
        assert!(matches!(
            ExportFormat::from_path(Path::new("d.gif")),
            Err(EditorError::UnsupportedFormat(ext)) if ext == "gif"
        ));
    }

    #[test]
    fn missing_extension_defaults_to_jpeg() {
        assert_eq!(with_default_extension(Path::new("/tmp/out")), PathBuf::from("/tmp/out.jpg"));
        assert_eq!(with_default_extension(Path::new("/tmp/out.png")), PathBuf::from("/tmp/out.png"));
    }

    #[test]
    fn png_export_is_lossless() {
        let img = RgbImage::from_fn(8, 6, |x, y| Rgb([x as u8 * 30, y as u8 * 40, 7]));
        let path = temp_path("lossless.png");
        export_image(&img, &path, ExportFormat::Png, DEFAULT_JPEG_QUALITY).unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, img);
    }

    #[test]
    fn jpeg_export_keeps_dimensions() {
        let img = RgbImage::from_pixel(16, 9, Rgb([120, 60, 30]));
        let path = temp_path("dims.jpg");
        export_image(&img, &path, ExportFormat::Jpeg, 90).unwrap();
        let back = image::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((back.width(), back.height()), (16, 9));
    }

    #[test]
    fn unwritable_path_reports_io_error() {
        let img = RgbImage::new(2, 2);
        let path = temp_path("missing_dir").join("nested").join("x.png");
        assert!(matches!(export_image(&img, &path, ExportFormat::Png, 90), Err(EditorError::Io { .. })));
    }
}
