use vodserver::http::mime::{content_type_for, extension_of};

#[test]
fn test_mime_table() {
    let table = [
        (".txt", "text/plain"),
        (".html", "text/html"),
        (".htm", "text/html"),
        (".css", "text/css"),
        (".js", "text/javascript"),
        (".gif", "image/gif"),
        (".jpg", "image/jpeg"),
        (".jpeg", "image/jpeg"),
        (".png", "image/jpeg"),
        (".mp4", "video/mp4"),
        (".webm", "video/webm"),
        (".ogg", "video/webm"),
    ];

    for (ext, expected) in table {
        assert_eq!(content_type_for(ext), expected, "extension {ext}");
    }
}

#[test]
fn test_mime_unknown_is_octet_stream() {
    for ext in ["", ".bin", ".json", ".PNG", ".Mp4", "mp4"] {
        assert_eq!(content_type_for(ext), "application/octet-stream", "extension {ext:?}");
    }
}

#[test]
fn test_mime_from_path() {
    assert_eq!(content_type_for(extension_of("videos/clip.webm")), "video/webm");
    assert_eq!(content_type_for(extension_of("photo.png")), "image/jpeg");
    assert_eq!(content_type_for(extension_of("Makefile")), "application/octet-stream");
}
