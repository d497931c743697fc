//! File suffix to content-type resolution
//!
//! A fixed allow-list of supported types. Unknown suffixes are never
//! rejected: they coerce to the default textual type, which is used both in
//! the negotiation request and the outgoing content-type header.

/// Content type applied to unrecognized suffixes
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Suffix an unrecognized one coerces to, matching the default content type
pub const DEFAULT_SUFFIX: &str = "txt";

/// Supported suffixes and their content types
const CONTENT_TYPES: &[(&str, &str)] = &[
    // Images
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    // Audio
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("aac", "audio/aac"),
    ("m4a", "audio/mp4"),
    // Video
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    // Documents
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("rtf", "application/rtf"),
    // Data formats
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
];

/// Resolve a suffix (without the dot) to a content type
pub fn content_type_for(suffix: &str) -> &'static str {
    let suffix = suffix.to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| *known == suffix)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Whether a suffix is on the allow-list
pub fn is_supported(suffix: &str) -> bool {
    let suffix = suffix.to_ascii_lowercase();
    CONTENT_TYPES.iter().any(|(known, _)| *known == suffix)
}

/// Extract the lowercased suffix from a file name
///
/// A name without a dot yields an empty suffix.
pub fn file_suffix(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, suffix)) if !suffix.is_empty() => suffix.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Resolve a file name to a supported suffix
///
/// An unrecognized or missing suffix coerces to [`DEFAULT_SUFFIX`], so the
/// same resolved value goes into negotiation requests and the content-type
/// header.
pub fn resolve_suffix(file_name: &str) -> String {
    let suffix = file_suffix(file_name);
    if is_supported(&suffix) {
        suffix
    } else {
        DEFAULT_SUFFIX.to_string()
    }
}
