use serde::{Deserialize, Serialize};

use super::fields::ProductFields;

/// Body of `POST /api/u508/products`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub fields: ProductFields,

    /// Product photo, optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageUpload>,
}

/// Image bytes travelling inside the JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    /// Standard base64 of the raw file bytes
    pub data_base64: String,
}

impl ImageUpload {
    pub const DEFAULT_FILE_NAME: &'static str = "upload.jpg";
    pub const DEFAULT_MIME_TYPE: &'static str = "image/jpeg";

    /// File name to announce upstream; blank names fall back to the default.
    pub fn effective_file_name(&self) -> &str {
        if self.file_name.trim().is_empty() {
            Self::DEFAULT_FILE_NAME
        } else {
            &self.file_name
        }
    }

    pub fn effective_mime_type(&self) -> &str {
        if self.mime_type.trim().is_empty() {
            Self::DEFAULT_MIME_TYPE
        } else {
            &self.mime_type
        }
    }
}
