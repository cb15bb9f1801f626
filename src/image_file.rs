//! ローカル画像ファイルの読み込み

use crate::error::{RecommenderError, Result};
use clothing_recommender_common::ImagePayload;
use image::ImageFormat;
use std::path::Path;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// 画像ファイルを読み込む
///
/// MIMEタイプは拡張子から推定する。形式・サイズの検証は送信前にワークフロー側で行う。
pub fn load_image(path: &Path) -> Result<ImagePayload> {
    if !path.is_file() {
        return Err(RecommenderError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| RecommenderError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImagePayload::new(file_name, mime_type_for(path), bytes))
}

/// 拡張子からMIMEタイプを推定
pub fn mime_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("a.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_type_for(Path::new("notes.txt")), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_load_image_not_found() {
        let result = load_image(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(RecommenderError::FileNotFound(_))));
    }
}
