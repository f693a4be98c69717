use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use contracts::usecases::u508_bulk_product_create::validation::parse_price;
use contracts::usecases::u508_bulk_product_create::{
    validate, CreateProductRequest, CreateProductResponse, ImageUpload, ProductFields,
};
use std::sync::Arc;

use crate::shared::marketplaces::shopify::models::{
    join_messages, CreateMediaInput, MetafieldInput, ProductCreateVariables, StagedImage,
    VariantsBulkCreateVariables,
};
use crate::shared::marketplaces::shopify::{ShopifyAdminApi, ShopifyError};

const PRICE_FAILED_PREFIX: &str = "Product created but price failed: ";

fn decode_image(image: &ImageUpload) -> Result<StagedImage, ShopifyError> {
    let bytes = STANDARD
        .decode(image.data_base64.trim())
        .map_err(|e| ShopifyError::InvalidImage(e.to_string()))?;
    Ok(StagedImage {
        file_name: image.effective_file_name().to_string(),
        mime_type: image.effective_mime_type().to_string(),
        bytes,
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Builds the productCreate input: categories become tags, the koi
/// attributes become `custom.*` metafields. Blank values are left out.
pub fn product_variables(
    fields: &ProductFields,
    original_source: Option<String>,
) -> ProductCreateVariables {
    let tags = [&fields.main_category, &fields.sub_category]
        .into_iter()
        .filter_map(|value| non_empty(value))
        .map(str::to_string)
        .collect();

    let metafields = [
        ("breeder", &fields.breeder),
        ("sex", &fields.sex),
        ("size", &fields.size_cm),
        ("size_in", &fields.size_in),
        ("age", &fields.age),
    ]
    .into_iter()
    .filter_map(|(key, value)| non_empty(value).map(|value| MetafieldInput::custom_text(key, value)))
    .collect();

    let media = original_source
        .map(|source| vec![CreateMediaInput::image(fields.title.clone(), source)])
        .unwrap_or_default();

    ProductCreateVariables {
        title: fields.title.clone(),
        description_html: fields.description.clone(),
        tags,
        metafields,
        media,
    }
}

/// Executor for u508: creates one product in the shop
pub struct ProductCreateExecutor {
    api: Arc<dyn ShopifyAdminApi>,
}

impl ProductCreateExecutor {
    pub fn new(api: Arc<dyn ShopifyAdminApi>) -> Self {
        Self { api }
    }

    /// Never fails: every problem is reported inside the response.
    pub async fn create_product(&self, request: CreateProductRequest) -> CreateProductResponse {
        let title = request.fields.title.clone();
        match self.try_create_product(request).await {
            Ok(response) => {
                if response.success {
                    tracing::info!(
                        "Product '{}' created: {}",
                        title,
                        response.product_id.as_deref().unwrap_or_default()
                    );
                } else {
                    tracing::warn!(
                        "Product '{}' not created: {}",
                        title,
                        response.error.as_deref().unwrap_or_default()
                    );
                }
                response
            }
            Err(e) => {
                tracing::error!("Product '{}' failed: {}", title, e);
                CreateProductResponse::failed(e.to_string())
            }
        }
    }

    async fn try_create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<CreateProductResponse, ShopifyError> {
        let fields = request.fields;
        if let Err(e) = validate(&fields) {
            return Ok(CreateProductResponse::failed(e.to_string()));
        }
        let price = parse_price(&fields.price).unwrap_or_default();

        // 1) image
        let original_source = match request.image.as_ref().map(decode_image).transpose()? {
            Some(image) if !image.bytes.is_empty() => Some(self.api.upload_image(image).await?),
            _ => None,
        };

        // 2) product
        let variables = product_variables(&fields, original_source);
        let payload = self.api.product_create(&variables).await?;
        let product = match payload.product {
            Some(product) if payload.user_errors.is_empty() => product,
            _ => {
                return Ok(CreateProductResponse::failed(join_messages(
                    &payload.user_errors,
                )))
            }
        };

        // 3) price variant
        if price > 0.0 {
            let variants = VariantsBulkCreateVariables::single_price(&product.id, price);
            // The product exists from here on; a failed price step must not
            // make the caller create it again.
            let problem = match self.api.variants_bulk_create(&variants).await {
                Ok(payload) if payload.user_errors.is_empty() => None,
                Ok(payload) => Some(join_messages(&payload.user_errors)),
                Err(e) => Some(e.to_string()),
            };
            if let Some(problem) = problem {
                return Ok(CreateProductResponse::created(product.id)
                    .with_warning(format!("{}{}", PRICE_FAILED_PREFIX, problem)));
            }
        }

        Ok(CreateProductResponse::created(product.id))
    }
}
