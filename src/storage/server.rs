use async_trait::async_trait;
use serde_json::json;
use sha2::{Digest, Sha256};

use super::encoding::{approximate_decoded_size, DataUrl, LENIENT};
use super::{merge_metadata, UploadInput, Uploader};
use crate::constants::{BASE64_PROVIDER_NAME, DEFAULT_MAX_UPLOAD_SIZE};
use crate::errors::{StorageError, StorageResult};
use crate::models::{Metadata, UploadOptions, UploadResult};
use base64::Engine;

/// Server-side counterpart of the base64 provider.
///
/// Clients inline files before the network hop, so only strings are accepted.
/// Data URLs must carry an `image/*` MIME type and a decodable payload; bare
/// strings only need to decode. Payloads whose approximate decoded size is
/// above `max_size` are rejected.
#[derive(Clone, Copy, Debug)]
pub struct ServerBase64StorageProvider {
    max_size: u64,
}

impl Default for ServerBase64StorageProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_SIZE)
    }
}

impl ServerBase64StorageProvider {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Checks format then size, returning the decoded bytes.
    pub fn validate(&self, encoded: &str) -> StorageResult<Vec<u8>> {
        let bytes = decode(encoded)?;

        let size = approximate_decoded_size(encoded);
        if size > self.max_size {
            return Err(StorageError::SizeLimit {
                size,
                max: self.max_size,
            });
        }
        Ok(bytes)
    }
}

fn decode(encoded: &str) -> StorageResult<Vec<u8>> {
    let payload = if encoded.starts_with("data:") {
        let data_url = DataUrl::parse(encoded)
            .ok_or_else(|| StorageError::validation("Invalid base64 string"))?;
        if !data_url.is_image() {
            return Err(StorageError::validation(format!(
                "Unsupported MIME type {}; expected image/*",
                data_url.mime_type
            )));
        }
        data_url.payload
    } else {
        encoded
    };

    LENIENT
        .decode(payload)
        .map_err(|_| StorageError::validation("Invalid base64 string"))
}

#[async_trait]
impl Uploader for ServerBase64StorageProvider {
    fn name(&self) -> &'static str {
        BASE64_PROVIDER_NAME
    }

    async fn upload(
        &self,
        input: UploadInput,
        options: Option<&UploadOptions>,
    ) -> StorageResult<UploadResult> {
        let encoded = match input {
            UploadInput::Encoded(encoded) => encoded,
            UploadInput::File(file) => {
                return Err(StorageError::validation(format!(
                    "Server uploads accept only base64 strings, got file {}",
                    file.name
                )))
            }
        };

        let bytes = self.validate(&encoded)?;

        let mut facts = Metadata::new();
        facts.insert("provider".into(), json!(BASE64_PROVIDER_NAME));
        facts.insert("size".into(), json!(approximate_decoded_size(&encoded)));
        facts.insert("sha256".into(), json!(hex::encode(Sha256::digest(&bytes))));

        Ok(UploadResult {
            url: encoded,
            metadata: Some(merge_metadata(facts, options)),
        })
    }
}
