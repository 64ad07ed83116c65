use anyhow::Result;
use url::Url;

pub fn is_youtube_video_url(url: &str) -> Result<bool> {
    let parsed = Url::parse(url)?;

    let is_correct_domain = matches!(
        parsed.domain(),
        Some("youtube.com")
            | Some("www.youtube.com")
            | Some("m.youtube.com")
            | Some("www.m.youtube.com")
            | Some("music.youtube.com")
    );

    let has_watch_path = parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .map(|segment| segment == "watch")
        .unwrap_or(false);

    let has_v_query = parsed.query_pairs().any(|(name, _)| name == "v");

    Ok(is_correct_domain && has_watch_path && has_v_query)
}

/// Video id from a watch URL, or `None` for anything else.
pub fn get_youtube_video_id(url: &str) -> Result<Option<String>> {
    if !is_youtube_video_url(url)? {
        return Ok(None);
    }

    let parsed = Url::parse(url)?;

    Ok(parsed
        .query_pairs()
        .find(|(name, _)| name == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty()))
}
