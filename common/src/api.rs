//! バックエンドAPIクライアントの抽象
//!
//! ブラウザ(spawn_local)とネイティブの両方で使うため、
//! 返り値のFutureに `Send` 制約は課さない。

use crate::error::Result;
use crate::types::{ImagePayload, RecommendationItem, Tag, UploadResult};

#[allow(async_fn_in_trait)]
pub trait RecommenderApi {
    /// 画像をアップロードし、ID とタグを受け取る
    async fn upload_item(&self, image: &ImagePayload) -> Result<UploadResult>;

    /// 保存せずにタグ付けのみ行う
    async fn tag_image(&self, image: &ImagePayload) -> Result<Vec<Tag>>;

    /// アップロード済みアイテムに類似するアイテムを取得
    async fn fetch_similar_items(&self, id: &str, limit: usize) -> Result<Vec<RecommendationItem>>;
}
