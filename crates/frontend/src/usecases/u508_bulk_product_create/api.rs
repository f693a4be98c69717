use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use contracts::usecases::u508_bulk_product_create::{
    create_product_path, CreateProductRequest, CreateProductResponse, ImageUpload, ProductFields,
};
use gloo_net::http::Request;

use super::engine::CreateProductApi;
use super::row::Attachment;
use crate::shared::api_utils::api_url;

fn image_upload(attachment: &Attachment) -> ImageUpload {
    ImageUpload {
        file_name: attachment.file_name.clone(),
        mime_type: attachment.mime_type.clone(),
        data_base64: STANDARD.encode(&attachment.bytes),
    }
}

/// Create one product through the backend
pub async fn create_product(request: &CreateProductRequest) -> Result<CreateProductResponse, String> {
    let url = api_url(&create_product_path());

    let response = Request::post(&url)
        .json(request)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json::<CreateProductResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// [`CreateProductApi`] over HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpCreateProductApi;

impl CreateProductApi for HttpCreateProductApi {
    async fn create_product(
        &self,
        fields: ProductFields,
        attachment: Option<Attachment>,
    ) -> Result<CreateProductResponse, String> {
        let request = CreateProductRequest {
            fields,
            image: attachment.as_ref().map(image_upload),
        };
        create_product(&request).await
    }
}
