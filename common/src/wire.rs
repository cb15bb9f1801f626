//! バックエンドAPIのワイヤ契約
//!
//! エンドポイントURL、リクエストボディ、ステータス判定を
//! ネイティブ(reqwest)とWASM(fetch)の両クライアントで共有する

use crate::error::{ApiError, Result};
use crate::types::{ImagePayload, RecommendationItem, Tag, UploadResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 類似アイテム取得件数のデフォルト
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// アップロードAPIリクエスト
#[derive(Debug, Serialize)]
pub struct UploadRequest {
    pub image_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl UploadRequest {
    pub fn from_image(image: &ImagePayload) -> Self {
        Self {
            image_base64: image.to_base64(),
            filename: Some(image.filename.clone()).filter(|name| !name.is_empty()),
        }
    }
}

/// タグ付けAPIリクエスト
#[derive(Debug, Serialize)]
pub struct TagRequest {
    pub image_base64: String,
}

impl TagRequest {
    pub fn from_image(image: &ImagePayload) -> Self {
        Self { image_base64: image.to_base64() }
    }
}

/// タグ付けAPIレスポンス
#[derive(Debug, Deserialize)]
pub struct TagResponse {
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
}

/// FastAPIのエラーボディ `{"detail": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// エンドポイントURL組み立て
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self { base: base.trim_end_matches('/').to_string() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn upload(&self) -> String {
        format!("{}/clothing/upload", self.base)
    }

    pub fn tag(&self) -> String {
        format!("{}/clothing/tag", self.base)
    }

    pub fn similar(&self, id: &str, limit: usize) -> String {
        format!("{}/clothing/similar/{}?limit={}", self.base, urlencoding::encode(id), limit)
    }

    pub fn recommendations(&self, image_url: &str, limit: usize) -> String {
        format!(
            "{}/clothing/recommendations?image_url={}&limit={}",
            self.base,
            urlencoding::encode(image_url),
            limit
        )
    }

    pub fn process_catalog(&self) -> String {
        format!("{}/clothing/process-csv", self.base)
    }
}

/// ステータスコードを判定
///
/// # Arguments
/// * `status` - HTTPステータス
/// * `body` - レスポンスボディ（エラー詳細の抽出に使用）
/// * `resource` - 404時のメッセージに含める対象名
pub fn check_status(status: u16, body: &str, resource: &str) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        404 => Err(ApiError::NotFound(resource.to_string())),
        _ => Err(ApiError::Server { status, detail: error_detail(body) }),
    }
}

/// エラーボディから詳細メッセージを取り出す
///
/// `{"detail": "..."}` 以外の場合はボディをそのまま返す
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail: serde_json::Value::String(s) }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(ApiError::from)
}

pub fn decode_upload(body: &str) -> Result<UploadResult> {
    decode(body)
}

pub fn decode_tags(body: &str) -> Result<Vec<Tag>> {
    let response: TagResponse = decode(body)?;
    Ok(response.tags.unwrap_or_default())
}

/// 類似アイテム一覧（null は空配列）
pub fn decode_similar(body: &str) -> Result<Vec<RecommendationItem>> {
    let items: Option<Vec<RecommendationItem>> = decode(body)?;
    Ok(items.unwrap_or_default())
}
