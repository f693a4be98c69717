use serde::{Deserialize, Serialize};

/// Outcome of one create-record call.
///
/// `error` may accompany `success: true` when the product exists but a
/// follow-up step (the price variant) was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CreateProductResponse {
    pub fn created(product_id: impl Into<String>) -> Self {
        Self {
            success: true,
            product_id: Some(product_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            product_id: None,
            error: Some(error.into()),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.error = Some(warning.into());
        self
    }
}
