//! Decoding GData Atom feeds into [`RemoteVideo`]s and encoding partial
//! update entries.

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    name::{Namespace, ResolveResult},
    reader::NsReader,
    Writer,
};

use super::error::{ApiError, ApiResult};
use crate::types::{RemoteVideo, VideoUpdate};

const ATOM: &[u8] = b"http://www.w3.org/2005/Atom";
const MEDIA: &[u8] = b"http://search.yahoo.com/mrss/";
const YT: &[u8] = b"http://gdata.youtube.com/schemas/2007";
const APP: &[u8] = b"http://www.w3.org/2007/app";

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const MEDIA_NS: &str = "http://search.yahoo.com/mrss/";
const GD_NS: &str = "http://schemas.google.com/g/2005";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeedPage {
    pub videos: Vec<RemoteVideo>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ns {
    Atom,
    Media,
    Yt,
    App,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Keywords,
    VideoId,
}

#[derive(Default)]
struct EntryBuilder {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
    is_draft: bool,
    edit_url: Option<String>,
}

impl EntryBuilder {
    fn set(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Keywords => self.keywords = value,
            Field::VideoId => self.id = value,
        }
    }

    fn build(self) -> ApiResult<RemoteVideo> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::Decode("entry without yt:videoid".to_string()))?;

        Ok(RemoteVideo {
            id,
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            is_draft: self.is_draft,
            edit_url: self.edit_url,
        })
    }
}

fn namespace(resolved: &ResolveResult) -> Ns {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) if *ns == ATOM => Ns::Atom,
        ResolveResult::Bound(Namespace(ns)) if *ns == MEDIA => Ns::Media,
        ResolveResult::Bound(Namespace(ns)) if *ns == YT => Ns::Yt,
        ResolveResult::Bound(Namespace(ns)) if *ns == APP => Ns::App,
        _ => Ns::Other,
    }
}

fn field(ns: Ns, local: &[u8]) -> Option<Field> {
    match (ns, local) {
        (Ns::Media, b"title") => Some(Field::Title),
        (Ns::Media, b"description") => Some(Field::Description),
        (Ns::Media, b"keywords") => Some(Field::Keywords),
        (Ns::Yt, b"videoid") => Some(Field::VideoId),
        _ => None,
    }
}

fn attribute(element: &BytesStart, name: &[u8]) -> ApiResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(decode_error)?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value().map_err(decode_error)?.into_owned()));
        }
    }

    Ok(None)
}

fn decode_error<E: std::fmt::Display>(e: E) -> ApiError {
    ApiError::Decode(e.to_string())
}

fn encode_error<E: std::fmt::Display>(e: E) -> ApiError {
    ApiError::Encode(e.to_string())
}

/// Decodes either a `<feed>` of entries or a single `<entry>` document.
pub fn decode(xml: &str) -> ApiResult<FeedPage> {
    let mut reader = NsReader::from_str(xml);
    let mut page = FeedPage::default();

    // (namespace, local name) of every open element
    let mut path: Vec<(Ns, Vec<u8>)> = vec![];
    let mut entry: Option<EntryBuilder> = None;
    let mut capture: Option<(Field, String)> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(decode_error)?;
        let ns = namespace(&resolved);

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let local = e.local_name().as_ref().to_vec();
                let parent = path.last().map(|(ns, name)| (*ns, name.as_slice()));

                match (ns, local.as_slice()) {
                    (Ns::Atom, b"entry") => entry = Some(EntryBuilder::default()),
                    (Ns::Atom, b"link") => {
                        let rel = attribute(e, b"rel")?;
                        let href = attribute(e, b"href")?;

                        match (parent, rel.as_deref()) {
                            (Some((Ns::Atom, b"entry")), Some("edit")) => {
                                if let Some(entry) = entry.as_mut() {
                                    entry.edit_url = href;
                                }
                            }
                            (Some((Ns::Atom, b"feed")), Some("next")) => page.next = href,
                            _ => {}
                        }
                    }
                    (Ns::App, b"draft") => {
                        if let Some(entry) = entry.as_mut() {
                            entry.is_draft = true;
                        }
                    }
                    _ => {
                        let in_group = matches!(parent, Some((Ns::Media, b"group")));
                        if let (true, Some(field)) = (in_group, field(ns, &local)) {
                            if is_empty {
                                if let Some(entry) = entry.as_mut() {
                                    entry.set(field, None);
                                }
                            } else {
                                capture = Some((field, String::new()));
                            }
                        }
                    }
                }

                if !is_empty {
                    path.push((ns, local));
                }
            }
            Event::Text(e) => {
                if let Some((_, buffer)) = capture.as_mut() {
                    buffer.push_str(&e.unescape().map_err(decode_error)?);
                }
            }
            Event::CData(e) => {
                if let Some((_, buffer)) = capture.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(ref e) => {
                path.pop();

                if let Some((field, buffer)) = capture.take() {
                    if let Some(entry) = entry.as_mut() {
                        let value = if buffer.is_empty() { None } else { Some(buffer) };
                        entry.set(field, value);
                    }
                } else if ns == Ns::Atom && e.local_name().as_ref() == b"entry" {
                    if let Some(finished) = entry.take() {
                        page.videos.push(finished.build()?);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(page)
}

/// Encodes an entry carrying only the fields present in `update`, with a
/// `gd:fields` mask naming exactly those fields.
pub fn encode_update(update: &VideoUpdate) -> ApiResult<String> {
    let fields: Vec<(&str, &str)> = [
        ("media:title", update.title.as_deref()),
        ("media:description", update.description.as_deref()),
        ("media:keywords", update.keywords.as_deref()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name, v)))
    .collect();

    let mask = format!(
        "media:group({})",
        fields.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(",")
    );

    let mut writer = Writer::new(Vec::new());

    let root = BytesStart::new("entry").with_attributes([
        ("xmlns", ATOM_NS),
        ("xmlns:media", MEDIA_NS),
        ("xmlns:gd", GD_NS),
        ("gd:fields", mask.as_str()),
    ]);
    writer
        .write_event(Event::Start(root))
        .map_err(encode_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("media:group")))
        .map_err(encode_error)?;

    for (name, value) in fields {
        writer
            .write_event(Event::Start(
                BytesStart::new(name).with_attributes([("type", "plain")]),
            ))
            .map_err(encode_error)?;
        writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(encode_error)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(encode_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("media:group")))
        .map_err(encode_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("entry")))
        .map_err(encode_error)?;

    String::from_utf8(writer.into_inner()).map_err(encode_error)
}

#[cfg(test)]
pub mod fixtures {
    pub const FEED_HEAD: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<feed xmlns='http://www.w3.org/2005/Atom' xmlns:app='http://www.w3.org/2007/app' xmlns:media='http://search.yahoo.com/mrss/' xmlns:yt='http://gdata.youtube.com/schemas/2007' xmlns:gd='http://schemas.google.com/g/2005'>"#;

    pub fn entry(id: &str, description: &str, draft: bool) -> String {
        let control = if draft {
            "<app:control><app:draft>yes</app:draft></app:control>"
        } else {
            ""
        };

        format!(
            "<entry><link rel='alternate' href='https://www.youtube.com/watch?v={id}'/>\
             <link rel='edit' href='https://gdata.youtube.com/feeds/api/users/default/uploads/{id}'/>\
             {control}<media:group><media:title type='plain'>Video {id}</media:title>\
             <media:description type='plain'>{description}</media:description>\
             <media:keywords>algebra, math</media:keywords><yt:videoid>{id}</yt:videoid>\
             </media:group></entry>"
        )
    }

    pub fn feed(entries: &[String], next: Option<&str>) -> String {
        let next = next
            .map(|href| format!("<link rel='next' type='application/atom+xml' href='{}'/>", href))
            .unwrap_or_default();

        format!("{}{}{}</feed>", FEED_HEAD, next, entries.join(""))
    }
}
