// src/demo/image.rs
use chrono::{DateTime, Utc};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

use super::DemoError;
use crate::models::demo::ImageInfo;

/// The image currently loaded into the demo lab.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Arc<[u8]>,
    pub selected_at: DateTime<Utc>,
}

impl SelectedImage {
    /// Validates the upload by decoding its header and wraps it.
    pub fn from_upload(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DemoError> {
        let file_name = file_name.into();
        let probe = probe_image(&bytes).ok_or_else(|| {
            tracing::warn!(
                "Rejected '{}' ({} bytes): not a recognised image",
                file_name,
                bytes.len()
            );
            DemoError::UnsupportedImage(file_name.clone())
        })?;

        Ok(Self {
            id: Uuid::new_v4(),
            file_name,
            mime_type: probe.mime_type,
            width: probe.width,
            height: probe.height,
            bytes: bytes.into(),
            selected_at: Utc::now(),
        })
    }

    pub fn preview_url(&self) -> String {
        format!("/api/demo/images/{}", self.id)
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            id: self.id,
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.to_string(),
            size_bytes: self.bytes.len(),
            width: self.width,
            height: self.height,
            preview_url: self.preview_url(),
            selected_at: self.selected_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProbe {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Sniffs the format and decodes the header. Returns `None` for anything
/// that is not a readable JPEG, PNG, GIF, WebP or BMP.
pub fn probe_image(bytes: &[u8]) -> Option<ImageProbe> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format().ok()?;
    let mime_type = match reader.format()? {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => return None,
    };

    match reader.into_dimensions() {
        Ok((width, height)) if width > 0 && height > 0 => Some(ImageProbe {
            mime_type,
            width,
            height,
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("{} header failed to decode: {}", mime_type, e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        // gif only encodes with an alpha channel here
        let img = match format {
            ImageFormat::Gif => image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 3)),
            _ => image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 3)),
        };
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    pub(crate) fn png_bytes() -> Vec<u8> {
        encoded(ImageFormat::Png)
    }

    pub(crate) fn jpeg_bytes() -> Vec<u8> {
        encoded(ImageFormat::Jpeg)
    }

    #[test]
    fn test_detects_common_formats() {
        for (format, mime) in [
            (ImageFormat::Png, "image/png"),
            (ImageFormat::Jpeg, "image/jpeg"),
            (ImageFormat::Gif, "image/gif"),
            (ImageFormat::WebP, "image/webp"),
            (ImageFormat::Bmp, "image/bmp"),
        ] {
            let probe = probe_image(&encoded(format)).unwrap();
            assert_eq!(probe.mime_type, mime);
            assert_eq!((probe.width, probe.height), (4, 3));
        }
    }

    #[test]
    fn test_rejects_non_images() {
        assert_eq!(probe_image(b""), None);
        assert_eq!(probe_image(b"%PDF-1.7"), None);
        assert_eq!(probe_image(b"RIFF\x10\x00\x00\x00WAVE"), None);

        let err = SelectedImage::from_upload("notes.txt", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, DemoError::UnsupportedImage(name) if name == "notes.txt"));
    }

    #[test]
    fn test_rejects_corrupt_image_with_valid_signature() {
        let mut garbage = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        garbage.extend_from_slice(&[0u8; 24]);
        assert_eq!(probe_image(&garbage), None);

        let truncated = png_bytes()[..12].to_vec();
        let err = SelectedImage::from_upload("crack.png", truncated).unwrap_err();
        assert!(matches!(err, DemoError::UnsupportedImage(_)));
    }

    #[test]
    fn test_preview_url_uses_image_id() {
        let bytes = png_bytes();
        let image = SelectedImage::from_upload("crack.png", bytes.clone()).unwrap();
        assert_eq!(image.preview_url(), format!("/api/demo/images/{}", image.id));
        let info = image.info();
        assert_eq!(info.size_bytes, bytes.len());
        assert_eq!((info.width, info.height), (4, 3));
        assert_eq!(info.mime_type, "image/png");
    }
}
