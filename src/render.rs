//! 端末向けの表示

use clothing_recommender_common::{format_similarity, join_tags, RecommendationItem, Session, Tag};
use serde::Serialize;

/// 検出タグ（空の場合は何も出力しない）
pub fn render_tags(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let mut out = String::from("Detected tags:\n");
    for tag in tags {
        out.push_str(&format!("  - {}\n", tag));
    }
    out
}

/// 類似アイテム（空の場合は何も出力しない、順序はバックエンドのまま）
pub fn render_recommendations(items: &[RecommendationItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut out = String::from("Similar items:\n");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, item.filename));
        out.push_str(&format!("     Similarity: {}\n", format_similarity(item.similarity_score)));
        out.push_str(&format!("     Tags: {}\n", join_tags(&item.tags)));
    }
    out
}

/// セッション全体（エラー → タグ → 類似アイテム）
pub fn render_session(session: &Session) -> String {
    let mut out = String::new();
    if let Some(message) = session.error_message() {
        out.push_str(&format!("Error: {}\n", message));
    }
    out.push_str(&render_tags(session.detected_tags()));
    out.push_str(&render_recommendations(session.recommendations()));
    out
}

/// `--json` 出力
#[derive(Debug, Serialize)]
pub struct SessionReport<'a> {
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub tags: &'a [Tag],
    pub recommendations: &'a [RecommendationItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> SessionReport<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            phase: session.phase().as_str(),
            id: session.last_item_id(),
            tags: session.detected_tags(),
            recommendations: session.recommendations(),
            error: session.error_message(),
        }
    }
}
