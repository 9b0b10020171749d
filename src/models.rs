use serde::{Deserialize, Serialize};

/// Open-ended metadata attached to uploads.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Per-upload options. Every field is optional; absence means provider default.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Result of a successful upload.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UploadResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Deserialize, Debug)]
pub struct UploadRequest {
    pub file: String,
    #[serde(default)]
    pub options: Option<UploadOptions>,
}

#[derive(Deserialize, Debug)]
pub struct DeleteRequest {
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub struct ThumbnailRequest {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ThumbnailResponse {
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upload_options_use_camel_case_keys() {
        let options: UploadOptions = serde_json::from_value(json!({
            "filename": "cover.png",
            "contentType": "image/png",
            "metadata": { "templateSlug": "default" }
        }))
        .unwrap();

        assert_eq!(options.content_type.as_deref(), Some("image/png"));
        assert_eq!(options.folder, None);
        assert_eq!(
            options.metadata.unwrap()["templateSlug"],
            json!("default")
        );
    }

    #[test]
    fn upload_result_omits_missing_metadata() {
        let result = UploadResult {
            url: "https://cdn.example.com/a.png".into(),
            metadata: None,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "url": "https://cdn.example.com/a.png" })
        );
    }

    #[test]
    fn thumbnail_request_accepts_null_and_missing() {
        let missing: ThumbnailRequest = serde_json::from_value(json!({})).unwrap();
        let null: ThumbnailRequest = serde_json::from_value(json!({ "thumbnail": null })).unwrap();
        assert!(missing.thumbnail.is_none());
        assert!(null.thumbnail.is_none());
    }
}
