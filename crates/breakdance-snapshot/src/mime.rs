//! Media type and file extension mapping.

/// Media type to extension pairs. Order matters: the first entry for an
/// extension is its canonical media type.
const MIME_TABLE: &[(&str, &str)] = &[
    ("application/json", "json"),
    ("application/xml", "xml"),
    ("text/xml", "xml"),
    ("text/html", "html"),
    ("text/plain", "txt"),
    ("text/csv", "csv"),
    ("text/css", "css"),
    ("application/javascript", "js"),
    ("text/javascript", "js"),
];

/// Extension used when the Accept header is missing or unknown.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Media type used for unknown extensions.
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain";

/// File extension (without the dot) for an Accept header value.
///
/// Only the first media range counts; parameters and case are ignored.
/// Structured syntax suffixes such as `application/odata+json` fall back to
/// their base format.
#[must_use]
pub fn extension_for_accept(accept: Option<&str>) -> &'static str {
    let Some(media_type) = accept.and_then(primary_media_type) else {
        return DEFAULT_EXTENSION;
    };

    if let Some(&(_, extension)) = MIME_TABLE.iter().find(|(mime, _)| *mime == media_type) {
        return extension;
    }
    if media_type.ends_with("+json") {
        "json"
    } else if media_type.ends_with("+xml") {
        "xml"
    } else {
        DEFAULT_EXTENSION
    }
}

/// Media type for a file extension, with or without the leading dot.
#[must_use]
pub fn media_type_for_extension(extension: &str) -> &'static str {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    MIME_TABLE
        .iter()
        .find(|(_, ext)| *ext == extension)
        .map_or(DEFAULT_MEDIA_TYPE, |&(mime, _)| mime)
}

fn primary_media_type(accept: &str) -> Option<String> {
    let first = accept.split(',').next()?;
    let media_type = first.split(';').next()?.trim().to_ascii_lowercase();
    (!media_type.is_empty()).then_some(media_type)
}
