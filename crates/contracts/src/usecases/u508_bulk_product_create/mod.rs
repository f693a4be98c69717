pub mod catalog;
pub mod fields;
pub mod request;
pub mod response;
pub mod validation;

pub use fields::{FieldKey, ProductFields};
pub use request::{CreateProductRequest, ImageUpload};
pub use response::CreateProductResponse;
pub use validation::{validate, ValidationError};

use crate::usecases::common::UseCaseMetadata;

pub struct BulkProductCreate;

impl UseCaseMetadata for BulkProductCreate {
    fn usecase_index() -> &'static str {
        "u508"
    }

    fn usecase_name() -> &'static str {
        "bulk_product_create"
    }

    fn display_name() -> &'static str {
        "Bulk Product Creator"
    }

    fn description() -> &'static str {
        "Stage product drafts in the browser and create them in the shop in small batches"
    }
}

/// Endpoint that creates one product: "/api/u508/products"
pub fn create_product_path() -> String {
    format!("{}/products", BulkProductCreate::api_prefix())
}
