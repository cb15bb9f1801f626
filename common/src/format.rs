//! 表示用フォーマット

/// 類似度をパーセント表示（小数点以下1桁）
///
/// # Examples
/// ```
/// use clothing_recommender_common::format_similarity;
///
/// assert_eq!(format_similarity(0.873), "87.3%");
/// ```
pub fn format_similarity(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// タグを ", " 区切りで連結
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join(", ")
}
