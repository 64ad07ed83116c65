use std::{fs, path::PathBuf};

use super::{Catalog, CatalogError, TargetIds};
use crate::youtube::watch_url::get_youtube_video_id;

/// Extra video ids kept in a local file, separated by whitespace. Entries
/// may also be full watch URLs.
pub struct IdFileCatalog {
    path: PathBuf,
}

impl IdFileCatalog {
    pub fn new(path: PathBuf) -> Self {
        IdFileCatalog { path }
    }
}

impl Catalog for IdFileCatalog {
    fn targets(&self) -> Result<TargetIds, CatalogError> {
        let display = self.path.display().to_string();
        let data = fs::read_to_string(&self.path).map_err(|source| CatalogError::IdFile {
            path: display.clone(),
            source,
        })?;

        let mut targets = TargetIds::new();

        for entry in data.split_whitespace() {
            let id = if entry.contains("://") {
                get_youtube_video_id(entry)
                    .ok()
                    .flatten()
                    .ok_or_else(|| CatalogError::InvalidEntry {
                        path: display.clone(),
                        entry: entry.to_string(),
                    })?
            } else {
                entry.to_string()
            };

            targets.insert(&id, &id);
        }

        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::IdFileCatalog;
    use crate::catalog::{Catalog, CatalogError};

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn it_reads_ids_and_watch_urls() {
        let file = file_with("abc def\n\nhttps://www.youtube.com/watch?v=ghi\n");

        let targets = IdFileCatalog::new(file.path().to_path_buf())
            .targets()
            .unwrap();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets.catalog_id("ghi"), Some("ghi"));
        assert!(targets.catalog_id("abc").is_some());
    }

    #[test]
    fn it_rejects_foreign_urls() {
        let file = file_with("https://example.com/watch?v=abc");

        let result = IdFileCatalog::new(file.path().to_path_buf()).targets();

        assert!(matches!(result, Err(CatalogError::InvalidEntry { .. })));
    }

    #[test]
    fn it_reports_missing_file() {
        let result = IdFileCatalog::new("/nonexistent/ids.txt".into()).targets();

        assert!(matches!(result, Err(CatalogError::IdFile { .. })));
    }
}
