use async_trait::async_trait;
use futures::io::AsyncReadExt;
use serde_json::json;

use super::encoding::{is_canonical_base64, DataUrl, LENIENT};
use super::{merge_metadata, FileUpload, UploadInput, Uploader};
use crate::constants::BASE64_PROVIDER_NAME;
use crate::errors::{StorageError, StorageResult};
use crate::models::{Metadata, UploadOptions, UploadResult};
use base64::Engine;

/// Default provider: images are inlined as base64 data URLs and stored with
/// the document that references them.
///
/// Encoded strings are validated and returned unchanged, so re-uploading an
/// existing data URL is idempotent. Files are read to completion and encoded.
/// The read cannot be cancelled once started.
#[derive(Clone, Copy, Debug, Default)]
pub struct Base64StorageProvider;

impl Base64StorageProvider {
    fn validate(encoded: &str) -> StorageResult<()> {
        if encoded.starts_with("data:") {
            let data_url = DataUrl::parse(encoded)
                .ok_or_else(|| StorageError::validation("Invalid data URL"))?;
            if !data_url.is_image() {
                return Err(StorageError::validation(format!(
                    "Unsupported MIME type {}; expected image/*",
                    data_url.mime_type
                )));
            }
            LENIENT
                .decode(data_url.payload)
                .map_err(|_| StorageError::validation("Invalid base64 string"))?;
            return Ok(());
        }

        if encoded.is_empty() || !is_canonical_base64(encoded) {
            return Err(StorageError::validation("Invalid base64 string"));
        }
        Ok(())
    }

    /// Only image files are read; the override in `options` wins over the
    /// type the file declares.
    async fn read_file(
        mut file: FileUpload,
        options: Option<&UploadOptions>,
    ) -> StorageResult<UploadResult> {
        let content_type = options
            .and_then(|o| o.content_type.clone())
            .unwrap_or_else(|| file.content_type.clone());
        if !content_type.starts_with("image/") {
            return Err(StorageError::validation(format!(
                "Unsupported MIME type {:?}; expected image/*",
                content_type
            )));
        }

        let mut bytes = Vec::new();
        file.reader.read_to_end(&mut bytes).await?;
        let url = DataUrl::encode(&content_type, &bytes);

        let filename = options
            .and_then(|o| o.filename.clone())
            .unwrap_or_else(|| file.name.clone());

        let mut facts = Metadata::new();
        facts.insert("provider".into(), json!(BASE64_PROVIDER_NAME));
        facts.insert("filename".into(), json!(filename));
        facts.insert("contentType".into(), json!(content_type));
        facts.insert("size".into(), json!(bytes.len()));

        Ok(UploadResult {
            url,
            metadata: Some(merge_metadata(facts, options)),
        })
    }
}

#[async_trait]
impl Uploader for Base64StorageProvider {
    fn name(&self) -> &'static str {
        BASE64_PROVIDER_NAME
    }

    async fn upload(
        &self,
        input: UploadInput,
        options: Option<&UploadOptions>,
    ) -> StorageResult<UploadResult> {
        match input {
            UploadInput::Encoded(encoded) => {
                Self::validate(&encoded)?;
                let mut facts = Metadata::new();
                facts.insert("provider".into(), json!(BASE64_PROVIDER_NAME));
                Ok(UploadResult {
                    url: encoded,
                    metadata: Some(merge_metadata(facts, options)),
                })
            }
            UploadInput::File(file) => Self::read_file(file, options).await,
        }
    }
}
