//! Content type derivation from file extensions.

/// Fallback type for unrecognized extensions.
const OCTET_STREAM: &str = "application/octet-stream";

/// Derives a MIME content type from a filename's extension.
///
/// Matching is case-insensitive. Unrecognized or missing extensions fall
/// back to `application/octet-stream`.
#[must_use]
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_extensions() {
        assert_eq!(content_type_for("report.pdf"), "application/pdf");
        assert_eq!(content_type_for("logo.png"), "image/png");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type_for("SCAN.PDF"), "application/pdf");
        assert_eq!(content_type_for("Logo.PNG"), "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for("data.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_no_extension_falls_back() {
        assert_eq!(content_type_for("Makefile"), "application/octet-stream");
        assert_eq!(content_type_for(""), "application/octet-stream");
    }

    #[test]
    fn test_last_extension_wins() {
        assert_eq!(content_type_for("archive.tar.gz"), "application/gzip");
    }
}
