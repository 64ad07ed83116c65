use std::fmt;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum CatalogNode {
    Topic {
        #[serde(default)]
        children: Vec<CatalogNode>,
    },
    Video {
        youtube_id: String,
        #[serde(default)]
        translated_youtube_id: Option<String>,
        #[serde(default)]
        author_names: Vec<String>,
    },
    // Exercises, articles, separators and whatever else the tree carries
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVideo {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub is_draft: bool,
    /// Present only when the video was read through the owner's uploads feed.
    pub edit_url: Option<String>,
}

/// Fields to change on a video. `None` fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl VideoUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.keywords.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOutcome {
    Unpublished,
    Updated,
    AlreadyAnnotated,
    NotInCatalog,
    AnnotationRemoved,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub updated: usize,
    pub unpublished: usize,
    pub already_annotated: usize,
    pub not_in_catalog: usize,
    pub annotation_removed: usize,
}

impl RunCounters {
    pub fn record(&mut self, outcome: VideoOutcome) {
        match outcome {
            VideoOutcome::Unpublished => self.unpublished += 1,
            VideoOutcome::Updated => self.updated += 1,
            VideoOutcome::AlreadyAnnotated => self.already_annotated += 1,
            VideoOutcome::NotInCatalog => self.not_in_catalog += 1,
            VideoOutcome::AnnotationRemoved => self.annotation_removed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated
            + self.unpublished
            + self.already_annotated
            + self.not_in_catalog
            + self.annotation_removed
    }
}

impl fmt::Display for RunCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} unpublished, {} already annotated, {} not in catalog, {} annotation removed",
            self.updated,
            self.unpublished,
            self.already_annotated,
            self.not_in_catalog,
            self.annotation_removed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogNode, RunCounters, VideoOutcome};

    #[test]
    fn it_parses_nested_topic_tree() {
        let json = r#"{
            "kind": "Topic",
            "children": [
                {"kind": "Video", "youtube_id": "abc", "author_names": ["Sal"]},
                {"kind": "Exercise", "name": "addition"},
                {"kind": "Topic", "children": [
                    {"kind": "Video", "youtube_id": "def", "translated_youtube_id": "xyz"}
                ]}
            ]
        }"#;

        let node: CatalogNode = serde_json::from_str(json).unwrap();

        match node {
            CatalogNode::Topic { children } => {
                assert_eq!(children.len(), 3);
                assert!(matches!(children[1], CatalogNode::Other));
            }
            _ => panic!("root should be a topic"),
        }
    }

    #[test]
    fn it_counts_each_outcome_in_its_own_bucket() {
        let mut counters = RunCounters::default();

        counters.record(VideoOutcome::Updated);
        counters.record(VideoOutcome::Updated);
        counters.record(VideoOutcome::Unpublished);
        counters.record(VideoOutcome::AnnotationRemoved);

        assert_eq!(counters.updated, 2);
        assert_eq!(counters.unpublished, 1);
        assert_eq!(counters.annotation_removed, 1);
        assert_eq!(counters.total(), 4);
        assert_eq!(
            counters.to_string(),
            "2 updated, 1 unpublished, 0 already annotated, 0 not in catalog, 1 annotation removed"
        );
    }
}
