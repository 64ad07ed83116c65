use super::Annotator;

const MARKER: &str = "Content provided by TheNROCproject.org";

pub const FOOTER: &str =
    "Content provided by TheNROCproject.org - (c) Monterey Institute for Technology and Education";

/// Credit footer for partner-produced videos.
pub struct CreditAnnotator;

impl Annotator for CreditAnnotator {
    fn is_annotated(&self, description: Option<&str>) -> bool {
        description.map(|d| d.contains(MARKER)).unwrap_or(false)
    }

    fn annotate(&self, description: Option<&str>, _catalog_id: &str) -> String {
        match description {
            Some(d) if self.is_annotated(Some(d)) => d.to_string(),
            Some(d) if !d.trim().is_empty() => format!("{}\n{}", d.trim(), FOOTER),
            _ => FOOTER.to_string(),
        }
    }

    fn unannotate(&self, description: Option<&str>) -> String {
        let kept = description
            .unwrap_or("")
            .split('\n')
            .filter(|line| !line.contains(MARKER))
            .collect::<Vec<_>>()
            .join("\n");

        kept.trim().to_string()
    }
}
