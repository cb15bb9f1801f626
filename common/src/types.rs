//! バックエンドとやり取りする型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Tag: 検出された衣類の属性ラベル
//! - UploadResult: アップロードAPIの出力
//! - RecommendationItem: 類似アイテムAPIの出力
//! - ImagePayload: ユーザーが選択した画像

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 検出タグ（例: "shirt", "long sleeve"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag(s.to_string())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag(s)
    }
}

/// アップロード結果
///
/// `id` は類似アイテム取得の結合キー。`tags` が null/欠落の場合は空配列として扱う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
}

impl UploadResult {
    /// 類似アイテム取得に使えるID（空文字はIDなしとみなす）
    pub fn item_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// 類似アイテム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub id: String,

    #[serde(default)]
    pub filename: String,

    /// 類似度 [0, 1]
    #[serde(rename = "similarity", alias = "similarityScore")]
    pub similarity_score: f64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// 選択された画像
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// FileReader の Data URL から画像を復元
    ///
    /// # Arguments
    /// * `filename` - 元のファイル名
    /// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
    ///
    /// # Returns
    /// 復元した画像、Base64部分が取り出せない・不正な場合はNone
    pub fn from_data_url(filename: impl Into<String>, data_url: &str) -> Option<Self> {
        let data = extract_base64_from_data_url(data_url)?;
        let bytes = STANDARD.decode(data).ok()?;
        Some(Self::new(filename, extract_mime_type_from_data_url(data_url), bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// プレビュー表示用のData URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Data URLからBase64データ部分を抽出
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出
///
/// 抽出失敗時は"application/octet-stream"を返す（形式判定はバイト列で行う）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("application/octet-stream")
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_result_deserialize() {
        let json = r#"{"id": "1", "filename": "a.jpg", "tags": ["shirt", "long sleeve"]}"#;

        let result: UploadResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.item_id(), Some("1"));
        assert_eq!(result.filename.as_deref(), Some("a.jpg"));
        assert_eq!(result.tags, vec![Tag::from("shirt"), Tag::from("long sleeve")]);
    }

    #[test]
    fn test_upload_result_missing_fields() {
        let result: UploadResult = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert_eq!(result.item_id(), None);
        assert!(result.tags.is_empty());

        let result: UploadResult =
            serde_json::from_str(r#"{"id": null, "tags": null}"#).expect("デシリアライズ失敗");
        assert_eq!(result.item_id(), None);
        assert!(result.tags.is_empty());
    }

    #[test]
    fn test_upload_result_empty_id_is_absent() {
        let result: UploadResult =
            serde_json::from_str(r#"{"id": "", "tags": []}"#).expect("デシリアライズ失敗");
        assert_eq!(result.item_id(), None);
    }

    #[test]
    fn test_recommendation_item_wire_key() {
        let json = r#"{"id": "x", "filename": "x.jpg", "similarity": 0.873, "tags": ["casual", "shirt"]}"#;
        let item: RecommendationItem = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.similarity_score, 0.873);
        assert_eq!(item.tags, vec!["casual", "shirt"]);

        let json = r#"{"id": "y", "similarityScore": 0.5}"#;
        let item: RecommendationItem = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(item.similarity_score, 0.5);
        assert!(item.filename.is_empty());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_recommendation_item_serialize() {
        let item = RecommendationItem {
            id: "x".to_string(),
            filename: "x.jpg".to_string(),
            similarity_score: 0.5,
            tags: vec!["casual".to_string()],
        };
        let json = serde_json::to_string(&item).expect("シリアライズ失敗");
        assert!(json.contains("\"similarity\":0.5"));
    }

    #[test]
    fn test_tag_is_transparent() {
        let json = serde_json::to_string(&vec![Tag::from("shirt")]).expect("シリアライズ失敗");
        assert_eq!(json, r#"["shirt"]"#);
    }

    #[test]
    fn test_image_payload_from_data_url() {
        let image = ImagePayload::from_data_url("a.png", "data:image/png;base64,iVBORw0KGgo=")
            .expect("Data URL復元失敗");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(&image.bytes[..4], b"\x89PNG");
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_image_payload_from_invalid_data_url() {
        assert!(ImagePayload::from_data_url("a.png", "not a data url").is_none());
        assert!(ImagePayload::from_data_url("a.png", "data:image/png;base64,@@@").is_none());
    }

    #[test]
    fn test_extract_mime_type_default() {
        assert_eq!(extract_mime_type_from_data_url("invalid"), "application/octet-stream");
        assert_eq!(extract_mime_type_from_data_url("data:image/webp;base64,UklGR"), "image/webp");
    }

    #[test]
    fn test_image_payload_debug_hides_bytes() {
        let image = ImagePayload::new("a.jpg", "image/jpeg", vec![0xFF; 2048]);
        let debug = format!("{:?}", image);
        assert!(debug.contains("size: 2048"));
        assert!(!debug.contains("255"));
    }
}
