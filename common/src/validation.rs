//! 送信前の画像検証（形式・サイズ）

use crate::error::ValidationError;
use crate::types::ImagePayload;
use image::ImageFormat;

/// 画像サイズ上限のデフォルト（10 MiB）
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// 画像を検証し、判定した形式を返す
///
/// 形式判定の優先順位:
/// 1. バイト列のマジックナンバー
/// 2. 宣言されたMIMEタイプ
/// 3. ファイル拡張子
pub fn validate_image(image: &ImagePayload, max_bytes: usize) -> Result<ImageFormat, ValidationError> {
    if image.bytes.is_empty() {
        return Err(ValidationError::Empty);
    }

    if image.size() > max_bytes {
        return Err(ValidationError::TooLarge { size: image.size(), max: max_bytes });
    }

    let format = image::guess_format(&image.bytes)
        .ok()
        .or_else(|| ImageFormat::from_mime_type(&image.mime_type))
        .or_else(|| ImageFormat::from_path(&image.filename).ok());

    match format {
        Some(f) if ACCEPTED_FORMATS.contains(&f) => Ok(f),
        Some(f) => Err(ValidationError::UnsupportedType(format!("{:?}", f))),
        None => Err(ValidationError::UnsupportedType(describe_unknown(image))),
    }
}

fn describe_unknown(image: &ImagePayload) -> String {
    if image.mime_type.is_empty() {
        image.filename.clone()
    } else {
        image.mime_type.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00";
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";

    #[test]
    fn test_accepts_jpeg_by_magic() {
        let image = ImagePayload::new("photo.bin", "application/octet-stream", JPEG_MAGIC.to_vec());
        assert_eq!(validate_image(&image, DEFAULT_MAX_IMAGE_BYTES), Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn test_magic_wins_over_declared_type() {
        // 拡張子が.jpgでも中身がPNGならPNG
        let image = ImagePayload::new("photo.jpg", "image/jpeg", PNG_MAGIC.to_vec());
        assert_eq!(validate_image(&image, DEFAULT_MAX_IMAGE_BYTES), Ok(ImageFormat::Png));
    }

    #[test]
    fn test_falls_back_to_extension() {
        let image = ImagePayload::new("photo.webp", "", b"not sniffable".to_vec());
        assert_eq!(validate_image(&image, DEFAULT_MAX_IMAGE_BYTES), Ok(ImageFormat::WebP));
    }

    #[test]
    fn test_rejects_empty() {
        let image = ImagePayload::new("empty.jpg", "image/jpeg", Vec::new());
        assert_eq!(validate_image(&image, DEFAULT_MAX_IMAGE_BYTES), Err(ValidationError::Empty));
    }

    #[test]
    fn test_rejects_too_large() {
        let image = ImagePayload::new("big.jpg", "image/jpeg", JPEG_MAGIC.to_vec());
        let result = validate_image(&image, 4);
        assert_eq!(result, Err(ValidationError::TooLarge { size: JPEG_MAGIC.len(), max: 4 }));
    }

    #[test]
    fn test_rejects_unknown_type() {
        let image = ImagePayload::new("notes.txt", "text/plain", b"hello".to_vec());
        let result = validate_image(&image, DEFAULT_MAX_IMAGE_BYTES);
        assert_eq!(result, Err(ValidationError::UnsupportedType("text/plain".to_string())));
    }

    #[test]
    fn test_rejects_known_but_unaccepted_type() {
        let image = ImagePayload::new("scan.bmp", "image/bmp", b"BM\x00\x00\x00\x00".to_vec());
        assert!(matches!(
            validate_image(&image, DEFAULT_MAX_IMAGE_BYTES),
            Err(ValidationError::UnsupportedType(_))
        ));
    }
}
