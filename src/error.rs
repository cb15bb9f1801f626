use clothing_recommender_common::{ApiError, FailureStage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Could not read image: {0}")]
    ImageLoad(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// ワークフローが失敗段階で終了した
    #[error("{} failed: {detail}", .stage.as_str())]
    Workflow { stage: FailureStage, detail: String },

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecommenderError>;
