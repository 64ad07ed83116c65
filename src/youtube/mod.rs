use crate::types::{RemoteVideo, VideoUpdate};

use self::{atom::FeedPage, error::ApiResult};

pub mod atom;
pub mod auth;
pub mod client;
pub mod error;
pub mod retry;
pub mod transport;
pub mod watch_url;

pub trait VideoPlatform {
    /// One page of the authenticated user's uploads. `cursor` is the `next`
    /// link of the previous page, `None` for the first one.
    fn uploads_page(&self, cursor: Option<&str>) -> ApiResult<FeedPage>;

    fn video(&self, video_id: &str, editable: bool) -> ApiResult<RemoteVideo>;

    fn update(&self, video: &RemoteVideo, update: &VideoUpdate) -> ApiResult<()>;
}
