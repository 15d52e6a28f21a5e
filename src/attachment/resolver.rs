use std::io::ErrorKind;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::fs;

use super::mime::mime_type_for;
use super::{non_empty, AttachmentDescriptor, AttachmentError, ResolvedAttachment};

/// 25 MiB
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 25 * 1024 * 1024;

/// Size ceilings applied during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentLimits {
    /// Largest single attachment, inclusive
    pub max_attachment_bytes: u64,
    /// Largest sum over all attachments of one message, inclusive
    pub max_total_bytes: u64,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            max_total_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

/// Resolves attachment descriptors into decoded payloads
#[derive(Debug, Clone, Default)]
pub struct AttachmentResolver {
    limits: AttachmentLimits,
}

impl AttachmentResolver {
    pub fn new(limits: AttachmentLimits) -> Self {
        Self { limits }
    }

    /// Resolve a single descriptor.
    ///
    /// A non-empty `file_path` wins over inline content. The file name falls
    /// back to the path's base name. Without an explicit MIME type, it is
    /// looked up from the path's extension for files and from the file name
    /// for inline content.
    pub async fn resolve(
        &self,
        descriptor: &AttachmentDescriptor,
    ) -> Result<ResolvedAttachment, AttachmentError> {
        let explicit_name = non_empty(&descriptor.file_name);
        let explicit_mime = non_empty(&descriptor.mime_type);

        let (bytes, file_name, inferred_mime) =
            if let Some(path) = non_empty(&descriptor.file_path) {
                let bytes = self.read_file(path).await?;
                let file_name = match explicit_name {
                    Some(name) => name.to_string(),
                    None => Path::new(path)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string()),
                };
                (bytes, file_name, mime_type_for(path))
            } else if let (Some(content), Some(name)) =
                (non_empty(&descriptor.content), explicit_name)
            {
                (decode_base64(content)?, name.to_string(), mime_type_for(name))
            } else {
                return Err(AttachmentError::NoSource);
            };

        self.check_size(bytes.len() as u64)?;

        let mime_type = explicit_mime.unwrap_or(inferred_mime).to_string();

        Ok(ResolvedAttachment {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// Resolve descriptors strictly in order.
    ///
    /// The first failing descriptor aborts the batch, and so does the first
    /// one that pushes the running total over the cumulative ceiling.
    /// Nothing after that point is read or decoded.
    pub async fn resolve_all(
        &self,
        descriptors: &[AttachmentDescriptor],
    ) -> Result<Vec<ResolvedAttachment>, AttachmentError> {
        let mut resolved = Vec::with_capacity(descriptors.len());
        let mut total: u64 = 0;

        for (index, descriptor) in descriptors.iter().enumerate() {
            let attachment = self.resolve(descriptor).await?;

            total += attachment.len() as u64;
            if total > self.limits.max_total_bytes {
                tracing::warn!(
                    index,
                    total,
                    max = self.limits.max_total_bytes,
                    "Cumulative attachment size exceeded"
                );
                return Err(AttachmentError::TotalSizeExceeded {
                    total,
                    max: self.limits.max_total_bytes,
                });
            }

            resolved.push(attachment);
        }

        Ok(resolved)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, AttachmentError> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AttachmentError::FileNotFound(path.to_string()))
            }
            Err(e) => return Err(AttachmentError::Io(e)),
        };

        // Refuse oversized files before reading them into memory
        self.check_size(metadata.len())?;

        Ok(fs::read(path).await?)
    }

    fn check_size(&self, size: u64) -> Result<(), AttachmentError> {
        if size > self.limits.max_attachment_bytes {
            return Err(AttachmentError::SizeExceeded {
                size,
                max: self.limits.max_attachment_bytes,
            });
        }
        Ok(())
    }
}

fn decode_base64(content: &str) -> Result<Vec<u8>, AttachmentError> {
    let decoded = if content.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        BASE64.decode(compact)
    } else {
        BASE64.decode(content)
    };
    decoded.map_err(|_| AttachmentError::InvalidBase64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn small_limits(per_item: u64, total: u64) -> AttachmentResolver {
        AttachmentResolver::new(AttachmentLimits {
            max_attachment_bytes: per_item,
            max_total_bytes: total,
        })
    }

    fn inline_of_len(len: usize, name: &str) -> AttachmentDescriptor {
        AttachmentDescriptor::inline(BASE64.encode(vec![b'x'; len]), name)
    }

    #[tokio::test]
    async fn test_inline_content() {
        let resolver = AttachmentResolver::default();
        let descriptor = AttachmentDescriptor::inline(BASE64.encode("hello"), "hello.txt");

        let attachment = resolver.resolve(&descriptor).await.unwrap();
        assert_eq!(attachment.file_name, "hello.txt");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.bytes, b"hello");
    }

    #[tokio::test]
    async fn test_explicit_mime_type_wins() {
        let resolver = AttachmentResolver::default();
        let descriptor = AttachmentDescriptor::inline(BASE64.encode("{}"), "data.bin")
            .with_mime_type("application/json");

        let attachment = resolver.resolve(&descriptor).await.unwrap();
        assert_eq!(attachment.mime_type, "application/json");
    }

    #[tokio::test]
    async fn test_base64_with_line_breaks() {
        let resolver = AttachmentResolver::default();
        let descriptor = AttachmentDescriptor::inline("aGVs\nbG8=\r\n", "hello.txt");

        let attachment = resolver.resolve(&descriptor).await.unwrap();
        assert_eq!(attachment.bytes, b"hello");
    }

    #[tokio::test]
    async fn test_invalid_base64() {
        let resolver = AttachmentResolver::default();
        let descriptor = AttachmentDescriptor::inline("not base64!!", "file.txt");

        let err = resolver.resolve(&descriptor).await.unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidBase64));
    }

    #[tokio::test]
    async fn test_no_source() {
        let resolver = AttachmentResolver::default();

        let err = resolver.resolve(&AttachmentDescriptor::default()).await.unwrap_err();
        assert!(matches!(err, AttachmentError::NoSource));

        let content_only = AttachmentDescriptor {
            content: Some(BASE64.encode("x")),
            ..Default::default()
        };
        let err = resolver.resolve(&content_only).await.unwrap_err();
        assert!(matches!(err, AttachmentError::NoSource));
    }

    #[tokio::test]
    async fn test_file_path_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.4")
            .unwrap();

        let resolver = AttachmentResolver::default();
        let attachment = resolver
            .resolve(&AttachmentDescriptor::from_file(path.to_string_lossy()))
            .await
            .unwrap();

        assert_eq!(attachment.file_name, "report.pdf");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_file_path_takes_precedence_over_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("from-disk.csv");
        std::fs::write(&path, b"a,b").unwrap();

        let descriptor = AttachmentDescriptor {
            content: Some(BASE64.encode("inline")),
            file_name: Some("renamed.csv".to_string()),
            mime_type: None,
            file_path: Some(path.to_string_lossy().into_owned()),
        };

        let attachment = AttachmentResolver::default().resolve(&descriptor).await.unwrap();
        assert_eq!(attachment.bytes, b"a,b");
        assert_eq!(attachment.file_name, "renamed.csv");
        assert_eq!(attachment.mime_type, "text/csv");
    }

    #[tokio::test]
    async fn test_file_mime_follows_path_not_explicit_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let descriptor = AttachmentDescriptor {
            file_name: Some("renamed.txt".to_string()),
            file_path: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        let attachment = AttachmentResolver::default().resolve(&descriptor).await.unwrap();
        assert_eq!(attachment.file_name, "renamed.txt");
        assert_eq!(attachment.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");
        let path = path.to_string_lossy().into_owned();

        let err = AttachmentResolver::default()
            .resolve(&AttachmentDescriptor::from_file(path.clone()))
            .await
            .unwrap_err();

        match err {
            AttachmentError::FileNotFound(p) => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_size_boundary() {
        let resolver = small_limits(16, 1024);

        let exact = resolver.resolve(&inline_of_len(16, "a.bin")).await.unwrap();
        assert_eq!(exact.len(), 16);

        let err = resolver.resolve(&inline_of_len(17, "b.bin")).await.unwrap_err();
        assert!(matches!(err, AttachmentError::SizeExceeded { size: 17, max: 16 }));
        assert!(err.to_string().contains("(17 bytes)"));
        assert!(err.to_string().contains("(16 bytes)"));
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 32]).unwrap();

        let err = small_limits(31, 1024)
            .resolve(&AttachmentDescriptor::from_file(path.to_string_lossy()))
            .await
            .unwrap_err();
        assert!(matches!(err, AttachmentError::SizeExceeded { size: 32, max: 31 }));
    }

    #[tokio::test]
    async fn test_resolve_all_in_order() {
        let resolver = AttachmentResolver::default();
        let descriptors = vec![
            AttachmentDescriptor::inline(BASE64.encode("one"), "1.txt"),
            AttachmentDescriptor::inline(BASE64.encode("two"), "2.png"),
        ];

        let resolved = resolver.resolve_all(&descriptors).await.unwrap();
        let names: Vec<_> = resolved.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.txt", "2.png"]);
        assert_eq!(resolved[1].mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_resolve_all_total_exactly_at_limit() {
        let resolver = small_limits(10, 20);
        let descriptors = vec![inline_of_len(10, "a.bin"), inline_of_len(10, "b.bin")];

        let resolved = resolver.resolve_all(&descriptors).await.unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_all_stops_at_cumulative_limit() {
        let resolver = small_limits(10, 20);
        // the third descriptor is invalid; reaching it would yield InvalidBase64
        let descriptors = vec![
            inline_of_len(10, "a.bin"),
            inline_of_len(10, "b.bin"),
            inline_of_len(1, "c.bin"),
            AttachmentDescriptor::inline("%%%", "never.bin"),
        ];

        let err = resolver.resolve_all(&descriptors).await.unwrap_err();
        assert!(matches!(err, AttachmentError::TotalSizeExceeded { total: 21, max: 20 }));
    }

    #[tokio::test]
    async fn test_resolve_all_fails_on_first_bad_descriptor() {
        let resolver = AttachmentResolver::default();
        let descriptors = vec![
            AttachmentDescriptor::inline(BASE64.encode("ok"), "ok.txt"),
            AttachmentDescriptor::default(),
            AttachmentDescriptor::inline("%%%", "bad.txt"),
        ];

        let err = resolver.resolve_all(&descriptors).await.unwrap_err();
        assert!(matches!(err, AttachmentError::NoSource));
    }

    #[tokio::test]
    async fn test_resolve_all_empty() {
        let resolved = AttachmentResolver::default().resolve_all(&[]).await.unwrap();
        assert!(resolved.is_empty());
    }
}
