//! # Blob Storage
//!
//! Pluggable storage for invitation page images. A provider turns an uploaded
//! image (a file or an already encoded string) into a URL that can be stored
//! on a template or user page.
//!
//! ## Providers
//!
//! - [`Base64StorageProvider`]: client-side default, inlines files as data URLs
//! - [`ServerBase64StorageProvider`]: validates untrusted base64 before persistence
//!
//! Providers are wrapped in [`StorageProvider`], whose variant records whether
//! the backend supports deletion. The active provider is held by a
//! [`StorageContext`] that callers construct once and pass down explicitly.
//!
//! ## Example
//!
//! ```rust,ignore
//! let context = StorageContext::new(StorageProvider::read_only(
//!     ServerBase64StorageProvider::new(DEFAULT_MAX_UPLOAD_SIZE),
//! ));
//! let result = context.upload("data:image/png;base64,iVBORw0KGgo=".into(), None).await?;
//! ```

use async_trait::async_trait;
use futures::io::AsyncRead;
use std::fmt;
use std::sync::Arc;

use crate::errors::{StorageError, StorageResult};
use crate::models::{Metadata, UploadOptions, UploadResult};

mod client;
pub mod encoding;
mod server;
mod thumbnail;

pub use self::client::Base64StorageProvider;
pub use self::server::ServerBase64StorageProvider;
pub use self::thumbnail::ThumbnailProcessor;

/// A binary file handed to a provider, read lazily through `reader`.
pub struct FileUpload {
    pub name: String,
    /// Declared MIME type; empty when the source did not provide one.
    pub content_type: String,
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl FileUpload {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            reader: Box::new(reader),
        }
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Input accepted by [`Uploader::upload`].
#[derive(Debug)]
pub enum UploadInput {
    /// A data URL or a bare base64 string.
    Encoded(String),
    File(FileUpload),
}

impl From<String> for UploadInput {
    fn from(value: String) -> Self {
        UploadInput::Encoded(value)
    }
}

impl From<&str> for UploadInput {
    fn from(value: &str) -> Self {
        UploadInput::Encoded(value.to_string())
    }
}

impl From<FileUpload> for UploadInput {
    fn from(value: FileUpload) -> Self {
        UploadInput::File(value)
    }
}

/// Upload capability every provider implements.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Identifier reported in metadata and errors.
    fn name(&self) -> &'static str;

    async fn upload(
        &self,
        input: UploadInput,
        options: Option<&UploadOptions>,
    ) -> StorageResult<UploadResult>;
}

/// Deletion capability for providers backed by real storage.
#[async_trait]
pub trait Deleter: Uploader {
    async fn delete(&self, url: &str) -> StorageResult<()>;
}

/// A provider tagged with the capabilities it offers.
#[derive(Clone)]
pub enum StorageProvider {
    ReadOnly(Arc<dyn Uploader>),
    ReadWrite(Arc<dyn Deleter>),
}

impl StorageProvider {
    pub fn read_only(provider: impl Uploader + 'static) -> Self {
        StorageProvider::ReadOnly(Arc::new(provider))
    }

    pub fn read_write(provider: impl Deleter + 'static) -> Self {
        StorageProvider::ReadWrite(Arc::new(provider))
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageProvider::ReadOnly(p) => p.name(),
            StorageProvider::ReadWrite(p) => p.name(),
        }
    }

    pub fn supports_delete(&self) -> bool {
        matches!(self, StorageProvider::ReadWrite(_))
    }
}

impl fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            StorageProvider::ReadOnly(_) => "ReadOnly",
            StorageProvider::ReadWrite(_) => "ReadWrite",
        };
        f.debug_tuple(variant).field(&self.name()).finish()
    }
}

impl Default for StorageProvider {
    fn default() -> Self {
        StorageProvider::read_only(Base64StorageProvider)
    }
}

/// Holds the active provider. Built once at start-up and passed to call sites.
///
/// Replacing the provider needs `&mut self`, so it cannot race with uploads
/// running against a shared context.
#[derive(Clone, Debug, Default)]
pub struct StorageContext {
    provider: StorageProvider,
}

impl StorageContext {
    pub fn new(provider: StorageProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &StorageProvider {
        &self.provider
    }

    pub fn set_provider(&mut self, provider: StorageProvider) {
        self.provider = provider;
    }

    pub async fn upload(
        &self,
        input: UploadInput,
        options: Option<&UploadOptions>,
    ) -> StorageResult<UploadResult> {
        match &self.provider {
            StorageProvider::ReadOnly(p) => p.upload(input, options).await,
            StorageProvider::ReadWrite(p) => p.upload(input, options).await,
        }
    }

    /// Deletes `url` through the active provider. Read-only providers fail with
    /// [`StorageError::UnsupportedOperation`].
    pub async fn delete(&self, url: &str) -> StorageResult<()> {
        match &self.provider {
            StorageProvider::ReadWrite(p) => p.delete(url).await,
            StorageProvider::ReadOnly(p) => Err(StorageError::UnsupportedOperation {
                operation: "delete",
                provider: p.name(),
            }),
        }
    }
}

/// Provider facts first, caller metadata last so callers can override them.
pub(crate) fn merge_metadata(mut facts: Metadata, options: Option<&UploadOptions>) -> Metadata {
    if let Some(extra) = options.and_then(|o| o.metadata.as_ref()) {
        facts.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    facts
}
