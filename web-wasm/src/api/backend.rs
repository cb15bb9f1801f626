//! バックエンドAPIクライアント（fetch）

use clothing_recommender_common::wire::{self, Endpoints, TagRequest, UploadRequest};
use clothing_recommender_common::{ApiError, ImagePayload, RecommendationItem, RecommenderApi, Result, Tag, UploadResult};
use futures::future::{select, Either};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// バックエンドの既定ポート
pub const DEFAULT_API_PORT: u16 = 8000;

/// リクエストのタイムアウト（ミリ秒）
pub const DEFAULT_TIMEOUT_MS: u32 = 30_000;

#[derive(Debug, Clone)]
pub struct FetchClient {
    endpoints: Endpoints,
    timeout_ms: u32,
}

impl FetchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoints: Endpoints::new(base_url),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// ページの設定からベースURLを決める
    pub fn from_page() -> Self {
        Self::new(&api_base())
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn send(&self, method: &str, url: &str, body: Option<String>, resource: &str) -> Result<String> {
        let request = Box::pin(fetch_text(method, url, body, resource));
        let timeout = TimeoutFuture::new(self.timeout_ms);

        match select(request, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                gloo::console::warn!(format!("{} {} timed out after {}ms", method, url, self.timeout_ms));
                Err(ApiError::Timeout)
            }
        }
    }
}

impl RecommenderApi for FetchClient {
    async fn upload_item(&self, image: &ImagePayload) -> Result<UploadResult> {
        let body = serde_json::to_string(&UploadRequest::from_image(image))?;
        let text = self
            .send("POST", &self.endpoints.upload(), Some(body), &image.filename)
            .await?;
        wire::decode_upload(&text)
    }

    async fn tag_image(&self, image: &ImagePayload) -> Result<Vec<Tag>> {
        let body = serde_json::to_string(&TagRequest::from_image(image))?;
        let text = self
            .send("POST", &self.endpoints.tag(), Some(body), &image.filename)
            .await?;
        wire::decode_tags(&text)
    }

    async fn fetch_similar_items(&self, id: &str, limit: usize) -> Result<Vec<RecommendationItem>> {
        let url = self.endpoints.similar(id, limit);
        let text = self.send("GET", &url, None, &format!("item {}", id)).await?;
        wire::decode_similar(&text)
    }
}

async fn fetch_text(method: &str, url: &str, body: Option<String>, resource: &str) -> Result<String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
    }

    let window = web_sys::window().ok_or_else(|| ApiError::Network("window not available".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    let text = text.as_string().unwrap_or_default();

    wire::check_status(resp.status(), &text, resource)?;
    Ok(text)
}

fn js_error(value: JsValue) -> ApiError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));
    ApiError::Network(message)
}

/// APIのベースURL
///
/// `<meta name="api-base" content="...">` があればそれを使い、
/// なければページと同じホストの既定ポートを使う
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return resolve_api_base(None, "http:", "localhost");
    };

    let meta = window
        .document()
        .and_then(|doc| doc.query_selector("meta[name=\"api-base\"]").ok().flatten())
        .and_then(|el| el.get_attribute("content"));

    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location.hostname().unwrap_or_else(|_| "localhost".to_string());

    resolve_api_base(meta, &protocol, &hostname)
}

fn resolve_api_base(meta: Option<String>, protocol: &str, hostname: &str) -> String {
    if let Some(base) = meta.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
        return base;
    }

    let hostname = if hostname.is_empty() { "localhost" } else { hostname };
    format!("{}//{}:{}", protocol, hostname, DEFAULT_API_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_tag_wins() {
        let base = resolve_api_base(Some(" https://api.example.com ".to_string()), "http:", "localhost");
        assert_eq!(base, "https://api.example.com");
    }

    #[test]
    fn test_falls_back_to_page_host() {
        assert_eq!(resolve_api_base(None, "https:", "shop.local"), "https://shop.local:8000");
        assert_eq!(resolve_api_base(Some("  ".to_string()), "http:", ""), "http://localhost:8000");
    }

    #[test]
    fn test_endpoints_from_base() {
        let client = FetchClient::new("http://localhost:8000/").with_timeout_ms(500);
        assert_eq!(client.timeout_ms, 500);
        assert_eq!(client.endpoints.similar("7", 5), "http://localhost:8000/clothing/similar/7?limit=5");
    }
}
