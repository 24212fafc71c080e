//! Content-Type detection from file extensions.
//!
//! `.png` deliberately reports `image/jpeg`; existing clients rely on the
//! table exactly as it is.

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Returns the Content-Type for an extension that includes its leading dot.
///
/// Matching is case-sensitive.
///
/// ```
/// use vodserver::http::mime::content_type_for;
/// assert_eq!(content_type_for(".mp4"), "video/mp4");
/// assert_eq!(content_type_for(".MP4"), "application/octet-stream");
/// ```
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        ".txt" => "text/plain",
        ".html" | ".htm" => "text/html",
        ".css" => "text/css",
        ".js" => "text/javascript",
        ".gif" => "image/gif",
        ".jpg" | ".jpeg" | ".png" => "image/jpeg",
        ".mp4" => "video/mp4",
        ".webm" | ".ogg" => "video/webm",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Extension of the last path component, leading dot included.
///
/// Leading dots of the file name are not an extension, so `.profile` has none.
pub fn extension_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem_start = name.len() - name.trim_start_matches('.').len();

    match name[stem_start..].rfind('.') {
        Some(idx) => &name[stem_start + idx..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(extension_of("movies/trailer.mp4"), ".mp4");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("dir.d/README"), "");
        assert_eq!(extension_of(".profile"), "");
        assert_eq!(extension_of("..x.css"), ".css");
        assert_eq!(extension_of("trailing."), ".");
    }
}
