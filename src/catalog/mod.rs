use std::collections::HashMap;

use thiserror::Error;

use crate::youtube::error::ApiError;

pub mod id_file;
pub mod topic_tree;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot fetch catalog: {0}")]
    Fetch(#[from] ApiError),

    #[error("cannot parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read id file {path}: {source}")]
    IdFile {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid entry {entry:?} in id file {path}")]
    InvalidEntry { path: String, entry: String },
}

/// Videos that should carry the annotation, keyed by their id on the channel.
/// The value is the id the catalog links to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetIds {
    ids: HashMap<String, String>,
}

impl TargetIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel_id: &str, catalog_id: &str) {
        self.ids
            .insert(channel_id.to_string(), catalog_id.to_string());
    }

    pub fn extend(&mut self, other: TargetIds) {
        self.ids.extend(other.ids);
    }

    pub fn catalog_id(&self, channel_id: &str) -> Option<&str> {
        self.ids.get(channel_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub trait Catalog {
    fn targets(&self) -> Result<TargetIds, CatalogError>;
}
