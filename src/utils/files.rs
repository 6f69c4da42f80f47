use std::path::Path;

/// Extension fallbacks for content that has no reliable magic bytes
const EXTENSION_TYPES: &[(&str, &str)] = &[
    // Text
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("svg", "image/svg+xml"),
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
    // Media
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    // Archives
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
];

/// Name used when a suggested download name has nothing usable left
pub const FALLBACK_DOWNLOAD_NAME: &str = "download";

/// Guess the content type the way a browser fills in `File.type`:
/// magic bytes first, then the extension, then `application/octet-stream`.
pub fn detect_content_type(filename: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    if let Some(ext) = extension {
        if let Some((_, mime_type)) = EXTENSION_TYPES.iter().find(|(e, _)| *e == ext) {
            return (*mime_type).to_string();
        }
    }

    mime::APPLICATION_OCTET_STREAM.to_string()
}

/// Final path component of `path` as UTF-8, if any
pub fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

/// Whether `filename` has anything in front of its final path component
pub fn carries_path(filename: &str) -> bool {
    filename.contains(['/', '\\'])
}

/// Reduce a suggested download name to a safe single file name.
pub fn sanitize_filename(filename: &str) -> String {
    // Get only the filename component (remove any path)
    let component = filename.rsplit(['/', '\\']).next().unwrap_or("");
    let name = component.trim();

    if carries_path(filename) {
        tracing::warn!("Suggested filename carried a path, using '{}'", name);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return FALLBACK_DOWNLOAD_NAME.to_string();
    }

    sanitized
}
