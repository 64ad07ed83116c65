use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use super::{
    atom::{self, FeedPage},
    auth::AccessTokens,
    error::{ApiError, ApiResult},
    retry::RetryPolicy,
    transport::{HttpRequest, HttpResponse, Method, Transport},
    VideoPlatform,
};
use crate::types::{RemoteVideo, VideoUpdate};

pub const API_BASE: &str = "https://gdata.youtube.com/";

/// The most entries YouTube returns per page.
pub const PAGE_SIZE: u32 = 50;

pub struct YouTubeClient<T: Transport, A: AccessTokens> {
    transport: T,
    tokens: A,
    developer_key: String,
    base: Url,
    retry: RetryPolicy,
    sleep: fn(Duration),
}

impl<T: Transport, A: AccessTokens> YouTubeClient<T, A> {
    pub fn new(transport: T, tokens: A, developer_key: &str) -> ApiResult<Self> {
        let base = Url::parse(API_BASE).map_err(|e| ApiError::Encode(e.to_string()))?;

        Ok(YouTubeClient {
            transport,
            tokens,
            developer_key: developer_key.to_string(),
            base,
            retry: RetryPolicy::default(),
            sleep: std::thread::sleep,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[cfg(test)]
    fn without_sleeping(mut self) -> Self {
        self.sleep = |_| {};
        self
    }

    fn resolve(&self, path: &str) -> ApiResult<String> {
        self.base
            .join(path)
            .map(String::from)
            .map_err(|e| ApiError::Encode(format!("invalid url {}: {}", path, e)))
    }

    fn send(&self, method: Method, path: &str, body: Option<String>) -> ApiResult<HttpResponse> {
        let mut request = HttpRequest::get(&self.resolve(path)?)
            .header("X-GData-Key", &format!("key={}", self.developer_key))
            .header(
                "Authorization",
                &format!("Bearer {}", self.tokens.access_token()?),
            );
        request.method = method;

        if let Some(body) = body {
            request = request.header("Content-Type", "application/xml; charset=utf-8");
            request.body = Some(body);
        }

        self.transport.execute(request)?.error_for_status()
    }

    fn fetch_feed(&self, path: &str) -> ApiResult<FeedPage> {
        let response = self.send(Method::Get, path, None)?;
        atom::decode(&response.body)
    }
}

impl<T: Transport, A: AccessTokens> VideoPlatform for YouTubeClient<T, A> {
    fn uploads_page(&self, cursor: Option<&str>) -> ApiResult<FeedPage> {
        let first = format!(
            "/feeds/api/users/default/uploads?v=2&max-results={}",
            PAGE_SIZE
        );
        let path = cursor.unwrap_or(&first);

        debug!("fetching uploads page {}", path);
        self.fetch_feed(path)
    }

    fn video(&self, video_id: &str, editable: bool) -> ApiResult<RemoteVideo> {
        let path = if editable {
            format!("/feeds/api/users/default/uploads/{}?v=2", video_id)
        } else {
            format!("/feeds/api/videos/{}?v=2", video_id)
        };

        self.fetch_feed(&path)?
            .videos
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode(format!("no entry returned for {}", video_id)))
    }

    fn update(&self, video: &RemoteVideo, update: &VideoUpdate) -> ApiResult<()> {
        let edit_url = video.edit_url.as_deref().ok_or_else(|| ApiError::NotEditable {
            video_id: video.id.clone(),
        })?;

        if update.is_empty() {
            return Ok(());
        }

        let body = atom::encode_update(update)?;

        self.retry.run(self.sleep, || {
            self.send(Method::Patch, edit_url, Some(body.clone()))
                .map(|_| ())
        })?;

        info!("updated {}", video.id);
        Ok(())
    }
}
