use tracing::warn;

use crate::types::VideoUpdate;

pub mod credits;
pub mod links;

/// A style of description annotation the reconciler can add and remove.
pub trait Annotator {
    fn is_annotated(&self, description: Option<&str>) -> bool;

    /// Canonical description for a catalog video. `catalog_id` is the id the
    /// catalog knows the video by, which may differ from the channel's id.
    fn annotate(&self, description: Option<&str>, catalog_id: &str) -> String;

    fn unannotate(&self, description: Option<&str>) -> String;
}

#[derive(Debug, PartialEq, Eq)]
pub struct Sanitized {
    pub value: String,
    pub dropped: Vec<String>,
}

/// YouTube refuses single character keywords, and a single bad entry fails
/// the whole update.
pub fn sanitize_keywords(keywords: &str) -> Sanitized {
    let (kept, dropped): (Vec<&str>, Vec<&str>) = keywords
        .split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .partition(|k| k.chars().count() > 1);

    Sanitized {
        value: kept.join(", "),
        dropped: dropped.into_iter().map(String::from).collect(),
    }
}

pub fn sanitize_description(description: &str) -> Sanitized {
    let mut dropped = vec![];
    let value: String = description
        .chars()
        .filter(|c| {
            let rejected = matches!(*c, '<' | '>');
            if rejected {
                dropped.push(c.to_string());
            }
            !rejected
        })
        .collect();

    Sanitized { value, dropped }
}

/// Builds the update that writes `description`, cleaning what the platform
/// would reject. Keywords are only sent when something had to be removed.
pub fn build_update(video_id: &str, description: &str, keywords: Option<&str>) -> VideoUpdate {
    let description = sanitize_description(description);
    if !description.dropped.is_empty() {
        warn!(
            "{}: removed {} rejected character(s) from description: {}",
            video_id,
            description.dropped.len(),
            description.dropped.join("")
        );
    }

    let keywords = keywords.map(sanitize_keywords).and_then(|k| {
        if k.dropped.is_empty() {
            None
        } else {
            warn!("{}: dropped keywords {:?}", video_id, k.dropped);
            Some(k.value)
        }
    });

    VideoUpdate {
        title: None,
        description: Some(description.value),
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_update, sanitize_description, sanitize_keywords};

    #[test]
    fn it_drops_single_character_keywords() {
        let result = sanitize_keywords("algebra, x, equations,y ,  , math");

        assert_eq!(result.value, "algebra, equations, math");
        assert_eq!(result.dropped, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn it_keeps_clean_keywords_as_they_are() {
        let result = sanitize_keywords("algebra, equations");

        assert_eq!(result.value, "algebra, equations");
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn it_strips_angle_brackets_from_description() {
        let result = sanitize_description("if x < 3 and y > 2");

        assert_eq!(result.value, "if x  3 and y  2");
        assert_eq!(result.dropped.len(), 2);
    }

    #[test]
    fn it_sends_keywords_only_when_they_changed() {
        let clean = build_update("abc", "desc", Some("algebra, math"));
        assert_eq!(clean.description.as_deref(), Some("desc"));
        assert_eq!(clean.keywords, None);
        assert_eq!(clean.title, None);

        let dirty = build_update("abc", "desc", Some("algebra, a"));
        assert_eq!(dirty.keywords.as_deref(), Some("algebra"));

        let missing = build_update("abc", "desc", None);
        assert_eq!(missing.keywords, None);
    }
}
