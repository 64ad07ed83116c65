use std::sync::OnceLock;

use regex::Regex;

use super::Annotator;

const ENGLISH_PREAMBLE: &str = "More free lessons at:";

/// Call-to-action phrase written in front of the link, per catalog locale.
const PREAMBLES: &[(&str, &str)] = &[
    ("en", ENGLISH_PREAMBLE),
    ("pt", "Mais aulas gratuitas em:"),
    ("es", "Más clases gratuitas en:"),
    ("fr", "Plus de leçons gratuites sur :"),
    ("de", "Weitere kostenlose Lektionen unter:"),
];

/// Phrases no longer written but still present on older descriptions.
/// Never remove entries from here, or old links become unremovable.
const DEPRECATED_PREAMBLES: &[&str] = &["Learn more:"];

pub fn preamble_for(locale: &str) -> &'static str {
    let locale = normalize_locale(locale);

    PREAMBLES
        .iter()
        .find(|(code, _)| *code == locale)
        .map(|(_, preamble)| *preamble)
        .unwrap_or(ENGLISH_PREAMBLE)
}

pub fn is_known_locale(locale: &str) -> bool {
    let locale = normalize_locale(locale);
    PREAMBLES.iter().any(|(code, _)| *code == locale)
}

/// Catalog subdomain serving `locale`.
pub fn subdomain_for(locale: &str) -> String {
    match normalize_locale(locale) {
        "en" => "www".to_string(),
        other => other.to_string(),
    }
}

pub fn catalog_link(host: &str, locale: &str, video_id: &str) -> String {
    format!("https://{}.{}/video?v={}", subdomain_for(locale), host, video_id)
}

fn normalize_locale(locale: &str) -> &str {
    match locale {
        "" | "www" => "en",
        other => other,
    }
}

fn annotation_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();

    LINE.get_or_init(|| {
        let preambles = PREAMBLES
            .iter()
            .map(|(_, preamble)| *preamble)
            .chain(DEPRECATED_PREAMBLES.iter().copied())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        Regex::new(&format!(
            r"^[ \t]*(?:{})[ \t]*https?://\S+[ \t]*\r?$",
            preambles
        ))
        .expect("annotation pattern is valid")
    })
}

pub fn is_annotated(description: Option<&str>) -> bool {
    description
        .unwrap_or("")
        .split('\n')
        .any(|line| annotation_line().is_match(line))
}

pub fn unannotate(description: Option<&str>) -> String {
    description
        .unwrap_or("")
        .split('\n')
        .filter(|line| !annotation_line().is_match(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Puts the link on the second line, after the first line of the original
/// description, replacing any link written before.
pub fn annotate(description: Option<&str>, locale: &str, url: &str) -> String {
    let header = format!("{} {}", preamble_for(locale), url);
    let stripped = unannotate(description);

    if stripped.is_empty() {
        return header;
    }

    match stripped.split_once('\n') {
        Some((first, rest)) => format!("{}\n{}\n{}", first, header, rest),
        None => format!("{}\n{}", stripped, header),
    }
}

/// Link annotations for one catalog locale.
pub struct LinkAnnotator {
    locale: String,
    host: String,
}

impl LinkAnnotator {
    pub fn new(locale: &str, host: &str) -> Self {
        LinkAnnotator {
            locale: locale.to_string(),
            host: host.to_string(),
        }
    }
}

impl Annotator for LinkAnnotator {
    fn is_annotated(&self, description: Option<&str>) -> bool {
        is_annotated(description)
    }

    fn annotate(&self, description: Option<&str>, catalog_id: &str) -> String {
        let url = catalog_link(&self.host, &self.locale, catalog_id);
        annotate(description, &self.locale, &url)
    }

    fn unannotate(&self, description: Option<&str>) -> String {
        unannotate(description)
    }
}

#[cfg(test)]
mod tests {
    use super::{annotate, catalog_link, is_annotated, preamble_for, unannotate};

    const URL: &str = "http://www.khanacademy.org/video?v=2aUFB9hQncQ";

    #[test]
    fn it_does_not_double_annotate() {
        let desc = "Two worked examples of solving simple equations";

        let once = annotate(Some(desc), "www", URL);
        assert!(once.contains(URL));

        let twice = annotate(Some(&once), "www", URL);
        assert_eq!(once, twice);
    }

    #[test]
    fn it_annotates_missing_description_with_header_only() {
        let once = annotate(None, "www", URL);
        assert_eq!(once, format!("More free lessons at: {}", URL));

        let twice = annotate(Some(&once), "www", URL);
        assert_eq!(once, twice);
    }

    #[test]
    fn it_treats_empty_like_missing() {
        assert_eq!(annotate(Some(""), "en", URL), annotate(None, "en", URL));
        assert_eq!(unannotate(Some("")), "");
        assert_eq!(unannotate(None), "");
        assert!(!is_annotated(None));
    }

    #[test]
    fn it_inserts_link_as_second_line() {
        let desc = "Title line\nMore details\nEven more";

        assert_eq!(
            annotate(Some(desc), "en", URL),
            format!("Title line\nMore free lessons at: {}\nMore details\nEven more", URL)
        );
    }

    #[test]
    fn it_unannotates_deprecated_preamble() {
        let desc = "Learn more: http://www.khanacademy.org/video?v=2aUFB9hQncQ\nMonet's Cliff Walk";

        assert_eq!(unannotate(Some(desc)), "Monet's Cliff Walk");
    }

    #[test]
    fn it_unannotates_localized_preamble() {
        let desc = "Mais aulas gratuitas em: http://pt.khanacademy.org/video?v=2aUFB9hQncQ\nMonet's Cliff Walk";

        assert_eq!(unannotate(Some(desc)), "Monet's Cliff Walk");
    }

    #[test]
    fn it_removes_every_historical_annotation() {
        let desc = format!(
            "Learn more: {}\nFirst line\nMore free lessons at: {}\nLast line",
            URL, URL
        );

        assert_eq!(unannotate(Some(&desc)), "First line\nLast line");
    }

    #[test]
    fn it_renormalizes_old_preamble_and_url() {
        let desc = "Learn more: http://www.khanacademy.org/video?v=old\nMonet's Cliff Walk";

        assert_eq!(
            annotate(Some(desc), "en", URL),
            format!("Monet's Cliff Walk\nMore free lessons at: {}", URL)
        );
    }

    #[test]
    fn it_ignores_preamble_without_url_or_mid_line() {
        assert!(!is_annotated(Some("Learn more: about fractions")));
        assert!(!is_annotated(Some(
            "Some text. Learn more: http://www.khanacademy.org/video?v=x"
        )));
        assert!(is_annotated(Some(
            "Intro\n  Learn more: https://www.khanacademy.org/video?v=x  \nOutro"
        )));
    }

    #[test]
    fn it_satisfies_annotation_laws() {
        let descriptions = [
            None,
            Some(""),
            Some("one line"),
            Some("two\nlines"),
            Some("trailing newline\n"),
            Some("\n"),
            Some("Learn more: http://www.khanacademy.org/video?v=a\nold"),
            Some("x\r\nMais aulas gratuitas em: http://pt.khanacademy.org/video?v=a\r\ny"),
        ];

        for locale in ["en", "pt", "xx"] {
            for d in descriptions {
                let annotated = annotate(d, locale, URL);

                assert!(is_annotated(Some(&annotated)), "{:?}", d);
                assert_eq!(annotate(Some(&annotated), locale, URL), annotated);
                assert_eq!(unannotate(Some(&annotated)), unannotate(d));

                let stripped = unannotate(d);
                assert_eq!(unannotate(Some(&stripped)), stripped);
            }
        }
    }

    #[test]
    fn it_falls_back_to_english_preamble() {
        assert_eq!(preamble_for("www"), "More free lessons at:");
        assert_eq!(preamble_for("xx"), "More free lessons at:");
        assert_eq!(preamble_for("pt"), "Mais aulas gratuitas em:");
    }

    #[test]
    fn it_builds_catalog_links_per_subdomain() {
        assert_eq!(
            catalog_link("khanacademy.org", "en", "abc"),
            "https://www.khanacademy.org/video?v=abc"
        );
        assert_eq!(
            catalog_link("khanacademy.org", "pt", "abc"),
            "https://pt.khanacademy.org/video?v=abc"
        );
    }
}
