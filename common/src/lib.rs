//! Clothing Recommender Common Library
//!
//! CLIとWeb(WASM)で共有される型・セッション状態・ワークフロー

pub mod types;
pub mod error;
pub mod validation;
pub mod wire;
pub mod api;
pub mod session;
pub mod workflow;
pub mod format;

pub use types::{Tag, RecommendationItem, UploadResult, ImagePayload};
pub use error::{ApiError, ValidationError, Result};
pub use validation::{validate_image, DEFAULT_MAX_IMAGE_BYTES};
pub use wire::{Endpoints, DEFAULT_SIMILAR_LIMIT};
pub use api::RecommenderApi;
pub use session::{Event, FailureStage, Phase, RequestToken, Session, SessionError, GENERIC_FAILURE_MESSAGE};
pub use workflow::{LocalStore, Outcome, SessionStore, Workflow};
pub use format::{format_similarity, join_tags};
