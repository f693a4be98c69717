use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::models::{
    join_messages, GraphQlRequest, GraphQlResponse, ProductCreateData, ProductCreatePayload,
    ProductCreateVariables, StagedImage, StagedUploadInput, StagedUploadsCreateData,
    StagedUploadsCreateVariables, VariantsBulkCreateData, VariantsBulkCreatePayload,
    VariantsBulkCreateVariables,
};
use super::{ShopifyAdminApi, ShopifyError};
use crate::shared::config::ShopifyConfig;

const STAGED_UPLOADS_MUTATION: &str = r#"
mutation stagedUploadsCreate($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets { url resourceUrl parameters { name value } }
    userErrors { field message }
  }
}
"#;

const PRODUCT_CREATE_MUTATION: &str = r#"
mutation CreateProductWithMetafieldsAndImage(
  $title: String!
  $descriptionHtml: String!
  $tags: [String!]
  $metafields: [MetafieldInput!]
  $media: [CreateMediaInput!]
) {
  productCreate(
    product: {
      title: $title
      descriptionHtml: $descriptionHtml
      tags: $tags
      metafields: $metafields
    }
    media: $media
  ) {
    product { id title status }
    userErrors { field message }
  }
}
"#;

const VARIANTS_BULK_CREATE_MUTATION: &str = r#"
mutation ProductVariantsCreate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkCreate(
    productId: $productId
    strategy: REMOVE_STANDALONE_VARIANT
    variants: $variants
  ) {
    productVariants { id price }
    userErrors { field message }
  }
}
"#;

/// Unwraps a GraphQL envelope. Top-level `errors` or a missing `data`
/// are failures.
pub(crate) fn parse_graphql_body<T: DeserializeOwned>(body: &str) -> Result<T, ShopifyError> {
    let envelope: GraphQlResponse<T> = serde_json::from_str(body)
        .map_err(|e| ShopifyError::GraphQl(format!("unreadable response: {}", e)))?;
    if let Some(errors) = envelope.errors {
        return Err(ShopifyError::GraphQl(errors.to_string()));
    }
    envelope
        .data
        .ok_or_else(|| ShopifyError::GraphQl("response has no data".to_string()))
}

/// HTTP client for the Shopify Admin GraphQL API
pub struct ShopifyClient {
    client: reqwest::Client,
    graphql_url: String,
    access_token: String,
}

impl ShopifyClient {
    pub fn new(config: &ShopifyConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            graphql_url: config.graphql_url(),
            access_token: config.admin_api_access_token.clone(),
        })
    }

    async fn graphql<V, T>(&self, operation: &str, query: &str, variables: V) -> Result<T, ShopifyError>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        tracing::debug!("Shopify {} -> {}", operation, self.graphql_url);

        let response = self
            .client
            .post(&self.graphql_url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Shopify {} failed with status {}: {}", operation, status, body);
            return Err(ShopifyError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_graphql_body(&body).inspect_err(|e| {
            tracing::error!("Shopify {} returned errors: {}", operation, e);
        })
    }
}

#[async_trait]
impl ShopifyAdminApi for ShopifyClient {
    async fn upload_image(&self, image: StagedImage) -> Result<String, ShopifyError> {
        let variables = StagedUploadsCreateVariables {
            input: vec![StagedUploadInput::image(&image.file_name, &image.mime_type)],
        };
        let data: StagedUploadsCreateData = self
            .graphql("stagedUploadsCreate", STAGED_UPLOADS_MUTATION, variables)
            .await?;

        let payload = data.staged_uploads_create;
        if !payload.user_errors.is_empty() {
            tracing::error!("stagedUploadsCreate errors: {:?}", payload.user_errors);
            return Err(ShopifyError::StagedUpload(join_messages(&payload.user_errors)));
        }
        let target = payload
            .staged_targets
            .into_iter()
            .next()
            .ok_or(ShopifyError::MissingStagedTarget)?;

        let mut form = reqwest::multipart::Form::new();
        for parameter in target.parameters {
            form = form.text(parameter.name, parameter.value);
        }
        let size = image.bytes.len();
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)
            .map_err(|e| ShopifyError::InvalidImage(e.to_string()))?;
        form = form.part("file", part);

        let response = self.client.post(&target.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Staged upload rejected with status {}: {}", status, body);
            return Err(ShopifyError::UploadRejected {
                status: status.as_u16(),
            });
        }

        tracing::info!("Image uploaded to Shopify ({} bytes)", size);
        Ok(target.resource_url)
    }

    async fn product_create(
        &self,
        variables: &ProductCreateVariables,
    ) -> Result<ProductCreatePayload, ShopifyError> {
        let data: ProductCreateData = self
            .graphql("productCreate", PRODUCT_CREATE_MUTATION, variables)
            .await?;
        Ok(data.product_create)
    }

    async fn variants_bulk_create(
        &self,
        variables: &VariantsBulkCreateVariables,
    ) -> Result<VariantsBulkCreatePayload, ShopifyError> {
        let data: VariantsBulkCreateData = self
            .graphql(
                "productVariantsBulkCreate",
                VARIANTS_BULK_CREATE_MUTATION,
                variables,
            )
            .await?;
        Ok(data.product_variants_bulk_create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_errors_fail() {
        let result: Result<ProductCreateData, _> =
            parse_graphql_body(r#"{"errors":[{"message":"Throttled"}]}"#);
        match result {
            Err(ShopifyError::GraphQl(message)) => assert!(message.contains("Throttled")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_fails() {
        let result: Result<ProductCreateData, _> = parse_graphql_body(r#"{"data":null}"#);
        assert!(matches!(result, Err(ShopifyError::GraphQl(_))));
    }

    #[test]
    fn test_product_payload_parses() {
        let data: ProductCreateData = parse_graphql_body(
            r#"{"data":{"productCreate":{"product":{"id":"gid://shopify/Product/7","title":"Koi","status":"ACTIVE"},"userErrors":[]}}}"#,
        )
        .unwrap();
        assert_eq!(data.product_create.product.unwrap().id, "gid://shopify/Product/7");
    }

    #[test]
    fn test_graphql_url_from_config() {
        let config = ShopifyConfig {
            shop_domain: "koi.myshopify.com".into(),
            admin_api_access_token: "token".into(),
            api_version: "2025-01".into(),
            request_timeout_secs: 5,
        };
        let client = ShopifyClient::new(&config).unwrap();
        assert_eq!(
            client.graphql_url,
            "https://koi.myshopify.com/admin/api/2025-01/graphql.json"
        );
    }
}
