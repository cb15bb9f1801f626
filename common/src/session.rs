//! セッション状態
//!
//! 状態遷移はすべて `Session::apply` を通す。レスポンス系のイベントは
//! 発行時のリクエストトークンを持ち、最新トークンと一致しない場合は破棄される。

use crate::error::{ApiError, ValidationError};
use crate::types::{ImagePayload, RecommendationItem, Tag, UploadResult};

/// ネットワーク系の失敗時にユーザーへ表示するメッセージ
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while processing the image. Please try again.";

/// submit毎に発行される単調増加トークン
pub type RequestToken = u64;

/// ワークフローの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    TaggingComplete,
    FetchingSimilar,
    Done,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Uploading => "uploading",
            Phase::TaggingComplete => "tagging-complete",
            Phase::FetchingSimilar => "fetching-similar",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::Uploading => "Uploading image...",
            Phase::TaggingComplete => "Tags detected",
            Phase::FetchingSimilar => "Finding similar items...",
            Phase::Done => "Done",
            Phase::Failed => "Failed",
        }
    }

    /// リクエスト処理中か
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Phase::Uploading | Phase::TaggingComplete | Phase::FetchingSimilar)
    }
}

/// 失敗した段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Validation,
    Upload,
    Similar,
    Tagging,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Validation => "validation",
            FailureStage::Upload => "upload",
            FailureStage::Similar => "similar",
            FailureStage::Tagging => "tagging",
        }
    }
}

/// ユーザーに表示するエラー
///
/// `message` は画面表示用、`detail` はログ用の元エラー
#[derive(Debug, Clone, PartialEq)]
pub struct SessionError {
    pub stage: FailureStage,
    pub message: String,
    pub detail: String,
}

impl SessionError {
    pub fn from_api(stage: FailureStage, error: &ApiError) -> Self {
        Self {
            stage,
            message: GENERIC_FAILURE_MESSAGE.to_string(),
            detail: error.to_string(),
        }
    }

    pub fn from_validation(error: &ValidationError) -> Self {
        Self {
            stage: FailureStage::Validation,
            message: error.to_string(),
            detail: error.to_string(),
        }
    }
}

/// 状態遷移イベント
#[derive(Debug, Clone)]
pub enum Event {
    ImageSelected(ImagePayload),
    ImageCleared,
    /// 送信前検証の失敗（トークンを発行する）
    ValidationFailed(ValidationError),
    /// アップロード開始（トークンを発行する）
    UploadStarted,
    /// タグ付けのみ開始（トークンを発行する）
    TaggingStarted,
    UploadSucceeded { token: RequestToken, result: UploadResult },
    UploadFailed { token: RequestToken, error: ApiError },
    SimilarStarted { token: RequestToken },
    SimilarSucceeded { token: RequestToken, items: Vec<RecommendationItem> },
    SimilarFailed { token: RequestToken, error: ApiError },
    TagsReceived { token: RequestToken, tags: Vec<Tag> },
    TaggingFailed { token: RequestToken, error: ApiError },
    /// IDなしのアップロード結果など、類似取得を行わずに完了
    Finished { token: RequestToken },
    /// 処理中のリクエストを破棄（トークンを発行する）
    Cancelled,
}

/// セッション状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    selected_image: Option<ImagePayload>,
    detected_tags: Vec<Tag>,
    recommendations: Vec<RecommendationItem>,
    error: Option<SessionError>,
    phase: Phase,
    issued_token: RequestToken,
    last_item_id: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_image(&self) -> Option<&ImagePayload> {
        self.selected_image.as_ref()
    }

    pub fn detected_tags(&self) -> &[Tag] {
        &self.detected_tags
    }

    pub fn recommendations(&self) -> &[RecommendationItem] {
        &self.recommendations
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// 画面表示用のエラーメッセージ
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn issued_token(&self) -> RequestToken {
        self.issued_token
    }

    /// 直近のアップロードで受け取ったID
    pub fn last_item_id(&self) -> Option<&str> {
        self.last_item_id.as_deref()
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.issued_token
    }

    /// 状態遷移（所有権版）
    pub fn reduce(mut self, event: Event) -> Self {
        self.apply(event);
        self
    }

    /// イベントを適用する
    ///
    /// # Returns
    /// 状態が変化した場合true、古いトークンのイベントなど無視した場合false
    pub fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::ImageSelected(image) => {
                self.selected_image = Some(image);
                true
            }
            Event::ImageCleared => self.selected_image.take().is_some(),
            Event::ValidationFailed(error) => {
                self.issue_token();
                self.error = Some(SessionError::from_validation(&error));
                self.phase = Phase::Failed;
                true
            }
            Event::UploadStarted | Event::TaggingStarted => {
                // 前回のエラーは次のレスポンスまで残す
                self.issue_token();
                self.phase = Phase::Uploading;
                true
            }
            Event::UploadSucceeded { token, result } => {
                if !self.accept(token) {
                    return false;
                }
                self.last_item_id = result.item_id().map(str::to_string);
                self.detected_tags = result.tags;
                self.error = None;
                self.phase = Phase::TaggingComplete;
                true
            }
            Event::UploadFailed { token, error } => {
                self.fail(token, FailureStage::Upload, &error)
            }
            Event::SimilarStarted { token } => {
                if !self.accept(token) {
                    return false;
                }
                self.phase = Phase::FetchingSimilar;
                true
            }
            Event::SimilarSucceeded { token, items } => {
                if !self.accept(token) {
                    return false;
                }
                self.recommendations = items;
                self.phase = Phase::Done;
                true
            }
            Event::SimilarFailed { token, error } => {
                self.fail(token, FailureStage::Similar, &error)
            }
            Event::TagsReceived { token, tags } => {
                if !self.accept(token) {
                    return false;
                }
                self.detected_tags = tags;
                self.error = None;
                self.phase = Phase::Done;
                true
            }
            Event::TaggingFailed { token, error } => {
                self.fail(token, FailureStage::Tagging, &error)
            }
            Event::Finished { token } => {
                if !self.accept(token) {
                    return false;
                }
                self.phase = Phase::Done;
                true
            }
            Event::Cancelled => {
                if !self.phase.is_in_flight() {
                    return false;
                }
                self.issue_token();
                self.phase = Phase::Idle;
                true
            }
        }
    }

    fn issue_token(&mut self) {
        self.issued_token += 1;
    }

    fn accept(&self, token: RequestToken) -> bool {
        if self.is_current(token) {
            return true;
        }
        tracing::debug!(token, current = self.issued_token, "stale response discarded");
        false
    }

    fn fail(&mut self, token: RequestToken, stage: FailureStage, error: &ApiError) -> bool {
        if !self.accept(token) {
            return false;
        }
        self.error = Some(SessionError::from_api(stage, error));
        self.phase = Phase::Failed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_result(id: Option<&str>, tags: &[&str]) -> UploadResult {
        UploadResult {
            id: id.map(str::to_string),
            filename: None,
            tags: tags.iter().map(|t| Tag::from(*t)).collect(),
        }
    }

    fn item(id: &str, score: f64) -> RecommendationItem {
        RecommendationItem {
            id: id.to_string(),
            filename: format!("{}.jpg", id),
            similarity_score: score,
            tags: vec!["casual".to_string()],
        }
    }

    #[test]
    fn test_default_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.issued_token(), 0);
        assert!(session.detected_tags().is_empty());
        assert!(session.recommendations().is_empty());
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_full_sequence() {
        let mut session = Session::new();
        session.apply(Event::UploadStarted);
        let token = session.issued_token();
        assert_eq!(session.phase(), Phase::Uploading);

        assert!(session.apply(Event::UploadSucceeded { token, result: upload_result(Some("1"), &["shirt"]) }));
        assert_eq!(session.phase(), Phase::TaggingComplete);
        assert_eq!(session.detected_tags(), &[Tag::from("shirt")]);
        assert_eq!(session.last_item_id(), Some("1"));

        assert!(session.apply(Event::SimilarStarted { token }));
        assert_eq!(session.phase(), Phase::FetchingSimilar);

        assert!(session.apply(Event::SimilarSucceeded { token, items: vec![item("x", 0.873)] }));
        assert_eq!(session.phase(), Phase::Done);
        assert_eq!(session.recommendations().len(), 1);
    }

    #[test]
    fn test_error_persists_until_next_response() {
        let mut session = Session::new();
        session.apply(Event::UploadStarted);
        let first = session.issued_token();
        session.apply(Event::UploadFailed { token: first, error: ApiError::Timeout });
        assert_eq!(session.error_message(), Some(GENERIC_FAILURE_MESSAGE));

        // 再送信しただけではエラーは消えない
        session.apply(Event::UploadStarted);
        assert_eq!(session.error_message(), Some(GENERIC_FAILURE_MESSAGE));

        let second = session.issued_token();
        session.apply(Event::UploadSucceeded { token: second, result: upload_result(None, &[]) });
        assert!(session.error().is_none());
    }

    #[test]
    fn test_upload_failure_keeps_previous_results() {
        let mut session = Session::new();
        session.apply(Event::UploadStarted);
        let token = session.issued_token();
        session.apply(Event::UploadSucceeded { token, result: upload_result(Some("1"), &["shirt"]) });
        session.apply(Event::SimilarSucceeded { token, items: vec![item("x", 0.9)] });

        session.apply(Event::UploadStarted);
        let token = session.issued_token();
        session.apply(Event::UploadFailed { token, error: ApiError::Network("refused".to_string()) });

        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.detected_tags(), &[Tag::from("shirt")]);
        assert_eq!(session.recommendations().len(), 1);
        let error = session.error().expect("エラーが設定されていない");
        assert_eq!(error.stage, FailureStage::Upload);
        assert!(error.detail.contains("refused"));
    }

    #[test]
    fn test_stale_responses_are_discarded() {
        let mut session = Session::new();
        session.apply(Event::UploadStarted);
        let first = session.issued_token();
        session.apply(Event::UploadStarted);
        let second = session.issued_token();
        assert!(second > first);

        // 新しいリクエストが先に返る
        assert!(session.apply(Event::UploadSucceeded { token: second, result: upload_result(Some("2"), &["dress"]) }));
        // 古いレスポンスは破棄
        assert!(!session.apply(Event::UploadSucceeded { token: first, result: upload_result(Some("1"), &["shirt"]) }));
        assert!(!session.apply(Event::SimilarSucceeded { token: first, items: vec![item("old", 0.1)] }));

        assert_eq!(session.detected_tags(), &[Tag::from("dress")]);
        assert_eq!(session.last_item_id(), Some("2"));
        assert!(session.recommendations().is_empty());
    }

    #[test]
    fn test_cancel_invalidates_pending_request() {
        let mut session = Session::new();
        session.apply(Event::UploadStarted);
        let token = session.issued_token();

        assert!(session.apply(Event::Cancelled));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.apply(Event::UploadSucceeded { token, result: upload_result(Some("1"), &["shirt"]) }));
        assert!(session.detected_tags().is_empty());
    }

    #[test]
    fn test_cancel_without_pending_request_is_noop() {
        let mut session = Session::new();
        assert!(!session.apply(Event::Cancelled));
        assert_eq!(session.issued_token(), 0);
    }

    #[test]
    fn test_validation_failure_message() {
        let session = Session::new().reduce(Event::ValidationFailed(ValidationError::Empty));
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.issued_token(), 1);
        let error = session.error().expect("エラーが設定されていない");
        assert_eq!(error.stage, FailureStage::Validation);
        assert_eq!(error.message, "The selected file is empty");
    }

    #[test]
    fn test_similar_failure_keeps_recommendations() {
        let mut session = Session::new();
        session.apply(Event::UploadStarted);
        let token = session.issued_token();
        session.apply(Event::UploadSucceeded { token, result: upload_result(Some("1"), &["shirt"]) });
        session.apply(Event::SimilarSucceeded { token, items: vec![item("x", 0.9)] });

        session.apply(Event::UploadStarted);
        let token = session.issued_token();
        session.apply(Event::UploadSucceeded { token, result: upload_result(Some("2"), &["jeans"]) });
        session.apply(Event::SimilarStarted { token });
        session.apply(Event::SimilarFailed { token, error: ApiError::NotFound("2".to_string()) });

        assert_eq!(session.detected_tags(), &[Tag::from("jeans")]);
        assert_eq!(session.recommendations()[0].id, "x");
        assert_eq!(session.error().map(|e| e.stage), Some(FailureStage::Similar));
        assert_eq!(session.error_message(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn test_image_selection() {
        let image = ImagePayload::new("a.jpg", "image/jpeg", vec![1, 2, 3]);
        let mut session = Session::new();
        assert!(session.apply(Event::ImageSelected(image.clone())));
        assert_eq!(session.selected_image(), Some(&image));
        assert!(session.apply(Event::ImageCleared));
        assert!(!session.apply(Event::ImageCleared));
    }

    #[test]
    fn test_phase_in_flight() {
        assert!(Phase::Uploading.is_in_flight());
        assert!(Phase::FetchingSimilar.is_in_flight());
        assert!(!Phase::Done.is_in_flight());
        assert!(!Phase::Failed.is_in_flight());
        assert_eq!(Phase::FetchingSimilar.as_str(), "fetching-similar");
    }
}
