//! エラー型定義

use thiserror::Error;

/// 送信前の画像検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The selected file is empty")]
    Empty,

    #[error("Unsupported image type: {0} (accepted: JPEG, PNG, WebP, GIF)")]
    UnsupportedType(String),

    #[error("Image is too large: {size} bytes (limit {max} bytes)")]
    TooLarge { size: usize, max: usize },
}

/// API呼び出しエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 通信失敗（接続不可など）
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// 2xx以外のレスポンス
    #[error("Server error {status}: {detail}")]
    Server { status: u16, detail: String },

    /// 未知のID
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_server() {
        let error = ApiError::Server { status: 500, detail: "Failed to extract tags from image.".to_string() };
        assert_eq!(format!("{}", error), "Server error 500: Failed to extract tags from image.");
    }

    #[test]
    fn test_error_display_validation_is_transparent() {
        let error: ApiError = ValidationError::TooLarge { size: 20, max: 10 }.into();
        assert_eq!(format!("{}", error), "Image is too large: 20 bytes (limit 10 bytes)");
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ApiError = json_error.into();
        assert!(matches!(error, ApiError::Decode(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = ApiError::NotFound("item 42".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("NotFound"));
        assert!(debug.contains("item 42"));
    }
}
