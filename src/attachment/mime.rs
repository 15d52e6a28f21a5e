//! Extension → MIME type lookup

use std::path::Path;

/// Fallback for unknown or missing extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Infer a MIME type from the extension of a file name or path.
pub fn mime_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // documents
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        // spreadsheets
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        // presentations
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        // text and structured data
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("zip") => "application/zip",
        // images
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tiff" | "tif") => "image/tiff",
        // web
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        // audio / video
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("report.pdf", "application/pdf")]
    #[case("REPORT.PDF", "application/pdf")]
    #[case("/var/data/sheet.xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")]
    #[case("deck.pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation")]
    #[case("photo.JPEG", "image/jpeg")]
    #[case("scan.tif", "image/tiff")]
    #[case("notes.txt", "text/plain")]
    #[case("index.htm", "text/html")]
    #[case("clip.mp4", "video/mp4")]
    #[case("archive.tar.gz", OCTET_STREAM)]
    #[case("README", OCTET_STREAM)]
    #[case("", OCTET_STREAM)]
    fn test_mime_type_for(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(mime_type_for(name), expected);
    }
}
