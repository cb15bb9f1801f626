//! アップロード → 類似アイテム取得 のワークフロー
//!
//! 1. 選択画像を検証
//! 2. アップロード（タグ取得）
//! 3. 返却IDで類似アイテム取得
//!
//! 各段階のレスポンスはリクエストトークン付きでセッションへ適用され、
//! より新しいsubmit/cancelが発行されていれば破棄される。

use crate::api::RecommenderApi;
use crate::session::{Event, FailureStage, RequestToken, Session};
use crate::types::ImagePayload;
use crate::validation::{validate_image, DEFAULT_MAX_IMAGE_BYTES};
use crate::wire::DEFAULT_SIMILAR_LIMIT;
use std::cell::RefCell;

/// セッション状態の保持先
///
/// ネイティブでは `LocalStore`、ブラウザではシグナルでラップする
pub trait SessionStore {
    fn snapshot(&self) -> Session;

    /// イベントを適用し、反映されたかを返す
    fn apply(&self, event: Event) -> bool;

    fn current_token(&self) -> RequestToken {
        self.snapshot().issued_token()
    }
}

/// シングルスレッド用のストア
#[derive(Debug, Default)]
pub struct LocalStore {
    session: RefCell<Session>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Session {
        self.session.into_inner()
    }
}

impl SessionStore for LocalStore {
    fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    fn apply(&self, event: Event) -> bool {
        self.session.borrow_mut().apply(event)
    }

    fn current_token(&self) -> RequestToken {
        self.session.borrow().issued_token()
    }
}

/// submit / tag_only の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 画像未選択（何もしない）
    NoImage,
    /// 検証エラーで送信しなかった
    Rejected,
    Completed,
    Failed(FailureStage),
    /// より新しいリクエストに置き換えられた
    Superseded,
}

#[derive(Debug, Clone)]
pub struct Workflow<A, S> {
    api: A,
    store: S,
    similar_limit: usize,
    max_image_bytes: usize,
}

impl<A, S> Workflow<A, S>
where
    A: RecommenderApi,
    S: SessionStore,
{
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_similar_limit(mut self, limit: usize) -> Self {
        self.similar_limit = limit;
        self
    }

    pub fn with_max_image_bytes(mut self, max_bytes: usize) -> Self {
        self.max_image_bytes = max_bytes;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    pub fn select_image(&self, image: ImagePayload) {
        tracing::debug!(filename = %image.filename, size = image.size(), "image selected");
        self.store.apply(Event::ImageSelected(image));
    }

    pub fn clear_image(&self) {
        self.store.apply(Event::ImageCleared);
    }

    /// 選択中の画像をアップロードし、類似アイテムまで取得する
    pub async fn submit(&self) -> Outcome {
        let Some(image) = self.validated_image(Event::UploadStarted) else {
            return self.rejection();
        };
        let token = self.store.current_token();

        let result = match self.api.upload_item(&image).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(token, %error, "upload failed");
                return self.settle(Event::UploadFailed { token, error }, Outcome::Failed(FailureStage::Upload));
            }
        };

        let item_id = result.item_id().map(str::to_string);
        tracing::info!(token, tags = result.tags.len(), id = ?item_id, "upload complete");
        if !self.store.apply(Event::UploadSucceeded { token, result }) {
            return Outcome::Superseded;
        }

        let Some(id) = item_id else {
            tracing::info!(token, "upload returned no id; similar items not fetched");
            return self.settle(Event::Finished { token }, Outcome::Completed);
        };

        if !self.store.apply(Event::SimilarStarted { token }) {
            return Outcome::Superseded;
        }

        match self.api.fetch_similar_items(&id, self.similar_limit).await {
            Ok(items) => {
                tracing::info!(token, count = items.len(), "similar items received");
                self.settle(Event::SimilarSucceeded { token, items }, Outcome::Completed)
            }
            Err(error) => {
                tracing::warn!(token, %error, "similar items fetch failed");
                self.settle(Event::SimilarFailed { token, error }, Outcome::Failed(FailureStage::Similar))
            }
        }
    }

    /// 保存せずにタグ付けのみ行う
    pub async fn tag_only(&self) -> Outcome {
        let Some(image) = self.validated_image(Event::TaggingStarted) else {
            return self.rejection();
        };
        let token = self.store.current_token();

        match self.api.tag_image(&image).await {
            Ok(tags) => self.settle(Event::TagsReceived { token, tags }, Outcome::Completed),
            Err(error) => {
                tracing::warn!(token, %error, "tagging failed");
                self.settle(Event::TaggingFailed { token, error }, Outcome::Failed(FailureStage::Tagging))
            }
        }
    }

    /// 処理中のリクエストを破棄する
    pub fn cancel(&self) -> bool {
        let cancelled = self.store.apply(Event::Cancelled);
        if cancelled {
            tracing::info!("pending request cancelled");
        }
        cancelled
    }

    /// 画像を取り出して検証し、開始イベントを適用する
    ///
    /// 画像未選択・検証失敗の場合はNone
    fn validated_image(&self, start: Event) -> Option<ImagePayload> {
        let image = self.store.snapshot().selected_image().cloned()?;
        if let Err(error) = validate_image(&image, self.max_image_bytes) {
            tracing::warn!(filename = %image.filename, %error, "image rejected");
            self.store.apply(Event::ValidationFailed(error));
            return None;
        }
        self.store.apply(start);
        Some(image)
    }

    fn rejection(&self) -> Outcome {
        if self.store.snapshot().selected_image().is_none() {
            tracing::debug!("submit without a selected image ignored");
            Outcome::NoImage
        } else {
            Outcome::Rejected
        }
    }

    fn settle(&self, event: Event, outcome: Outcome) -> Outcome {
        if self.store.apply(event) {
            outcome
        } else {
            Outcome::Superseded
        }
    }
}
