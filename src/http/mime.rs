//! Static MIME lookup and the file-type allow-list.

/// File extensions the store will serve or accept.
pub const ALLOWED_EXTENSIONS: &[&str] = &["html", "txt", "gif", "jpeg", "jpg", "css"];

/// Extension of a filename, without the dot.
pub fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Whether the extension is on the allow-list (case-sensitive, no dot).
pub fn is_supported(ext: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&ext)
}

/// Content-Type for a file extension.
pub fn content_type(ext: &str) -> &'static str {
    match ext {
        "html" => "text/html",
        "txt" => "text/plain",
        "gif" => "image/gif",
        "jpeg" | "jpg" => "image/jpeg",
        "css" => "text/css",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_takes_last_dot() {
        assert_eq!(extension("photo.jpg"), Some("jpg"));
        assert_eq!(extension("archive.tar.gz"), Some("gz"));
        assert_eq!(extension("noext"), None);
    }

    #[test]
    fn allow_list_is_case_sensitive() {
        assert!(is_supported("html"));
        assert!(!is_supported("HTML"));
        assert!(!is_supported("exe"));
    }
}
