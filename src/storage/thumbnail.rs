use super::encoding::looks_like_base64;
use super::{ServerBase64StorageProvider, StorageContext, StorageProvider};
use crate::config::Config;
use crate::constants::DEFAULT_BASE64_DETECTION_MIN_LEN;
use crate::errors::{StorageError, StorageResult};

const INVALID_FORMAT: &str = "Invalid thumbnail format. Must be URL or base64 string.";

/// Strips whitespace and byte order marks, as browsers do when trimming.
fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Normalizes the thumbnail field of templates and user pages.
///
/// - blank input clears the thumbnail (`None`)
/// - `http://` and `https://` URLs pass through without touching storage
/// - data URLs and long base64-looking strings go through the storage context
/// - anything else is a validation error
///
/// Base64 detection is a plain heuristic: at least `min_base64_len` characters,
/// all in `[A-Za-z0-9+/=]`. Short payloads and long alphanumeric text are
/// misclassified.
#[derive(Clone, Debug)]
pub struct ThumbnailProcessor {
    context: StorageContext,
    min_base64_len: usize,
}

impl Default for ThumbnailProcessor {
    fn default() -> Self {
        Self::new(
            StorageContext::new(StorageProvider::read_only(
                ServerBase64StorageProvider::default(),
            )),
            DEFAULT_BASE64_DETECTION_MIN_LEN,
        )
    }
}

impl ThumbnailProcessor {
    pub fn new(context: StorageContext, min_base64_len: usize) -> Self {
        Self {
            context,
            min_base64_len,
        }
    }

    /// Server-side processor backed by the base64 validator and the
    /// configured limits.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            StorageContext::new(StorageProvider::read_only(ServerBase64StorageProvider::new(
                config.max_upload_size,
            ))),
            config.base64_detection_min_len,
        )
    }

    pub fn context(&self) -> &StorageContext {
        &self.context
    }

    pub async fn process(&self, thumbnail: Option<&str>) -> StorageResult<Option<String>> {
        let trimmed = match thumbnail.map(trim_blank) {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(None),
        };

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Some(trimmed.to_string()));
        }

        if trimmed.starts_with("data:") || looks_like_base64(trimmed, self.min_base64_len) {
            let result = self.context.upload(trimmed.into(), None).await?;
            return Ok(Some(result.url));
        }

        Err(StorageError::validation(INVALID_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UploadOptions, UploadResult};
    use crate::storage::{UploadInput, Uploader};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Uploader for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn upload(
            &self,
            _input: UploadInput,
            _options: Option<&UploadOptions>,
        ) -> StorageResult<UploadResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UploadResult {
                url: "https://cdn.example.com/t.png".into(),
                metadata: None,
            })
        }
    }

    fn process(thumbnail: Option<&str>) -> StorageResult<Option<String>> {
        block_on(ThumbnailProcessor::default().process(thumbnail))
    }

    #[test]
    fn blank_input_clears_thumbnail() {
        assert_eq!(process(None).unwrap(), None);
        assert_eq!(process(Some("")).unwrap(), None);
        assert_eq!(process(Some("   \n\t")).unwrap(), None);
    }

    #[test]
    fn byte_order_marks_count_as_blank() {
        assert_eq!(process(Some("\u{FEFF}")).unwrap(), None);
        let result = process(Some("\u{FEFF} https://example.com/a.png\u{FEFF}")).unwrap();
        assert_eq!(result.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn urls_pass_through_without_storage() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: calls.clone(),
        };
        let processor = ThumbnailProcessor::new(
            StorageContext::new(StorageProvider::read_only(provider)),
            DEFAULT_BASE64_DETECTION_MIN_LEN,
        );

        for url in ["http://example.com/a.png", "https://example.com/not an image"] {
            assert_eq!(block_on(processor.process(Some(url))).unwrap().as_deref(), Some(url));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let result = process(Some("  https://example.com/a.png \n")).unwrap();
        assert_eq!(result.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn valid_data_url_is_returned_unchanged() {
        let url = "data:image/webp;base64,UklGRhoAAABXRUJQVlA4TA0AAAAvAAAAEAcQERGIiP4HAA==";
        assert_eq!(process(Some(url)).unwrap().as_deref(), Some(url));
    }

    #[test]
    fn long_bare_base64_goes_through_storage() {
        let calls = Arc::new(AtomicUsize::new(0));
        let processor = ThumbnailProcessor::new(
            StorageContext::new(StorageProvider::read_only(CountingProvider {
                calls: calls.clone(),
            })),
            DEFAULT_BASE64_DETECTION_MIN_LEN,
        );
        let bare = "QUJD".repeat(25);

        let result = block_on(processor.process(Some(&bare))).unwrap();
        assert_eq!(result.as_deref(), Some("https://cdn.example.com/t.png"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn short_or_foreign_strings_are_invalid() {
        let symbols = "#".repeat(120);
        for input in ["QUJD", "ftp://example.com/a.png", "just some text", symbols.as_str()] {
            let err = process(Some(input)).unwrap_err();
            assert_eq!(err.to_string(), INVALID_FORMAT, "{input:?}");
        }
    }

    #[test]
    fn data_url_with_wrong_mime_is_rejected_by_validator() {
        let err = process(Some("data:text/plain;base64,aGk=")).unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
    }

    #[test]
    fn oversized_thumbnail_hits_size_limit() {
        let config = Config {
            max_upload_size: 3,
            ..Config::default()
        };
        let processor = ThumbnailProcessor::from_config(&config);
        let err = block_on(processor.process(Some("data:image/png;base64,AAAAAAAA"))).unwrap_err();
        assert!(matches!(err, StorageError::SizeLimit { size: 6, max: 3 }));
    }
}
