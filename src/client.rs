//! バックエンドAPIクライアント（reqwest）

use crate::config::Config;
use crate::error::Result;
use clothing_recommender_common::wire::{self, Endpoints, TagRequest, UploadRequest};
use clothing_recommender_common::{ApiError, ImagePayload, RecommendationItem, RecommenderApi, Tag, UploadResult};
use reqwest::RequestBuilder;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoints: Endpoints::new(base_url),
        })
    }

    pub fn from_config(config: &Config, base_url: &str) -> Result<Self> {
        Self::new(base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// 画像URLから推薦アイテムを取得
    pub async fn recommend_by_url(
        &self,
        image_url: &str,
        limit: usize,
    ) -> clothing_recommender_common::Result<Vec<RecommendationItem>> {
        let url = self.endpoints.recommendations(image_url, limit);
        let body = self.send(self.client.get(&url), image_url).await?;
        wire::decode_similar(&body)
    }

    /// カタログCSVの再処理を依頼（管理用）
    pub async fn process_catalog(&self) -> clothing_recommender_common::Result<serde_json::Value> {
        let url = self.endpoints.process_catalog();
        let body = self.send(self.client.post(&url), "catalog").await?;
        wire::decode(&body)
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> clothing_recommender_common::Result<String> {
        let response = request.send().await.map_err(to_api_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(to_api_error)?;
        tracing::debug!(status, bytes = body.len(), resource, "response received");

        wire::check_status(status, &body, resource)?;
        Ok(body)
    }
}

impl RecommenderApi for HttpClient {
    async fn upload_item(&self, image: &ImagePayload) -> clothing_recommender_common::Result<UploadResult> {
        let request = self
            .client
            .post(self.endpoints.upload())
            .json(&UploadRequest::from_image(image));
        let body = self.send(request, &image.filename).await?;
        wire::decode_upload(&body)
    }

    async fn tag_image(&self, image: &ImagePayload) -> clothing_recommender_common::Result<Vec<Tag>> {
        let request = self
            .client
            .post(self.endpoints.tag())
            .json(&TagRequest::from_image(image));
        let body = self.send(request, &image.filename).await?;
        wire::decode_tags(&body)
    }

    async fn fetch_similar_items(
        &self,
        id: &str,
        limit: usize,
    ) -> clothing_recommender_common::Result<Vec<RecommendationItem>> {
        let url = self.endpoints.similar(id, limit);
        let body = self.send(self.client.get(&url), &format!("item {}", id)).await?;
        wire::decode_similar(&body)
    }
}

fn to_api_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}
