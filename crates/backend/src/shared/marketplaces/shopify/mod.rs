pub mod client;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use client::ShopifyClient;
use models::{
    ProductCreatePayload, ProductCreateVariables, StagedImage, VariantsBulkCreatePayload,
    VariantsBulkCreateVariables,
};

/// Errors of the Shopify Admin API client
#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Shopify Admin API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Shopify Admin API request failed: {0}")]
    GraphQl(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("No staged upload target returned from Shopify")]
    MissingStagedTarget,

    #[error("{0}")]
    StagedUpload(String),

    #[error("Failed to upload image to Shopify staged upload URL (status {status})")]
    UploadRejected { status: u16 },
}

impl From<reqwest::Error> for ShopifyError {
    fn from(e: reqwest::Error) -> Self {
        ShopifyError::Transport(e.to_string())
    }
}

/// The Admin API calls product creation needs
#[async_trait]
pub trait ShopifyAdminApi: Send + Sync {
    /// Stages the image and uploads it. Returns the resource URL to use
    /// as `originalSource` of product media.
    async fn upload_image(&self, image: StagedImage) -> Result<String, ShopifyError>;

    async fn product_create(
        &self,
        variables: &ProductCreateVariables,
    ) -> Result<ProductCreatePayload, ShopifyError>;

    async fn variants_bulk_create(
        &self,
        variables: &VariantsBulkCreateVariables,
    ) -> Result<VariantsBulkCreatePayload, ShopifyError>;
}
