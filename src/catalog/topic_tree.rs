use tracing::info;

use super::{Catalog, CatalogError, TargetIds};
use crate::{
    annotation::links::subdomain_for,
    types::CatalogNode,
    youtube::transport::{HttpRequest, Transport},
};

/// Which catalog videos become targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    AllVideos,
    AuthoredBy(String),
}

impl Selection {
    fn accepts(&self, author_names: &[String]) -> bool {
        match self {
            Selection::AllVideos => true,
            Selection::AuthoredBy(author) => author_names.iter().any(|a| a == author),
        }
    }
}

pub struct TopicTreeCatalog<T: Transport> {
    transport: T,
    host: String,
    locale: String,
    selection: Selection,
}

impl<T: Transport> TopicTreeCatalog<T> {
    pub fn new(transport: T, host: &str, locale: &str, selection: Selection) -> Self {
        TopicTreeCatalog {
            transport,
            host: host.to_string(),
            locale: locale.to_string(),
            selection,
        }
    }

    pub fn url(&self) -> String {
        format!(
            "https://{}.{}/api/v1/topictree?kind=Video",
            subdomain_for(&self.locale),
            self.host
        )
    }

    pub fn fetch_tree(&self) -> Result<CatalogNode, CatalogError> {
        let url = self.url();
        info!("fetching topic tree from {}", url);

        let response = self
            .transport
            .execute(HttpRequest::get(&url))?
            .error_for_status()?;

        Ok(serde_json::from_str(&response.body)?)
    }
}

impl<T: Transport> Catalog for TopicTreeCatalog<T> {
    fn targets(&self) -> Result<TargetIds, CatalogError> {
        let tree = self.fetch_tree()?;
        let localized = subdomain_for(&self.locale) != "www";

        let mut targets = TargetIds::new();
        collect_targets(&tree, localized, &self.selection, &mut targets);

        info!("{} catalog videos selected", targets.len());
        Ok(targets)
    }
}

/// Walks the tree depth first. Localized catalogs key videos by their
/// translated id, since that is what the localized channel hosts.
pub fn collect_targets(
    node: &CatalogNode,
    localized: bool,
    selection: &Selection,
    targets: &mut TargetIds,
) {
    match node {
        CatalogNode::Topic { children } => {
            for child in children {
                collect_targets(child, localized, selection, targets);
            }
        }
        CatalogNode::Video {
            youtube_id,
            translated_youtube_id,
            author_names,
        } => {
            if !selection.accepts(author_names) {
                return;
            }

            let channel_id = match translated_youtube_id {
                Some(translated) if localized && !translated.is_empty() => translated,
                _ => youtube_id,
            };

            targets.insert(channel_id, youtube_id);
        }
        CatalogNode::Other => {}
    }
}
