//! Shapes of the Shopify Admin GraphQL calls used for product creation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

pub fn join_messages(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ----------------------------------------------------------------------
// stagedUploadsCreate
// ----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadInput {
    pub filename: String,
    pub mime_type: String,
    pub resource: &'static str,
    pub http_method: &'static str,
}

impl StagedUploadInput {
    pub fn image(filename: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            resource: "IMAGE",
            http_method: "POST",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StagedUploadsCreateVariables {
    pub input: Vec<StagedUploadInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadsCreateData {
    pub staged_uploads_create: StagedUploadsCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadsCreatePayload {
    #[serde(default)]
    pub staged_targets: Vec<StagedTarget>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedTarget {
    pub url: String,
    pub resource_url: String,
    #[serde(default)]
    pub parameters: Vec<StagedParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StagedParameter {
    pub name: String,
    pub value: String,
}

/// Decoded image ready for the staged upload
#[derive(Debug, Clone)]
pub struct StagedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// ----------------------------------------------------------------------
// productCreate
// ----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetafieldInput {
    pub namespace: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl MetafieldInput {
    /// `custom.<key>` single line text
    pub fn custom_text(key: &str, value: &str) -> Self {
        Self {
            namespace: "custom".to_string(),
            key: key.to_string(),
            kind: "single_line_text_field".to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaInput {
    pub alt: String,
    pub media_content_type: &'static str,
    pub original_source: String,
}

impl CreateMediaInput {
    pub fn image(alt: impl Into<String>, original_source: impl Into<String>) -> Self {
        Self {
            alt: alt.into(),
            media_content_type: "IMAGE",
            original_source: original_source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateVariables {
    pub title: String,
    pub description_html: String,
    pub tags: Vec<String>,
    pub metafields: Vec<MetafieldInput>,
    pub media: Vec<CreateMediaInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateData {
    pub product_create: ProductCreatePayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatePayload {
    pub product: Option<CreatedProduct>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

// ----------------------------------------------------------------------
// productVariantsBulkCreate
// ----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValueInput {
    pub name: String,
    pub option_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub price: f64,
    pub option_values: Vec<OptionValueInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBulkCreateVariables {
    pub product_id: String,
    pub variants: Vec<VariantInput>,
}

impl VariantsBulkCreateVariables {
    /// One "Default Title" variant carrying the price; it replaces the
    /// standalone variant Shopify creates with the product.
    pub fn single_price(product_id: impl Into<String>, price: f64) -> Self {
        Self {
            product_id: product_id.into(),
            variants: vec![VariantInput {
                price,
                option_values: vec![OptionValueInput {
                    name: "Default Title".to_string(),
                    option_name: "Title".to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBulkCreateData {
    pub product_variants_bulk_create: VariantsBulkCreatePayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsBulkCreatePayload {
    #[serde(default)]
    pub product_variants: Vec<CreatedVariant>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedVariant {
    pub id: String,
    #[serde(default)]
    pub price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metafield_wire_shape() {
        let json = serde_json::to_value(MetafieldInput::custom_text("size_in", "16.5")).unwrap();
        assert_eq!(json["namespace"], "custom");
        assert_eq!(json["type"], "single_line_text_field");
        assert_eq!(json["key"], "size_in");
    }

    #[test]
    fn test_variant_variables_shape() {
        let json = serde_json::to_value(VariantsBulkCreateVariables::single_price("gid://1", 120.5)).unwrap();
        assert_eq!(json["productId"], "gid://1");
        assert_eq!(json["variants"][0]["price"], 120.5);
        assert_eq!(json["variants"][0]["optionValues"][0]["optionName"], "Title");
    }

    #[test]
    fn test_staged_payload_parses() {
        let data: StagedUploadsCreateData = serde_json::from_str(
            r#"{"stagedUploadsCreate":{"stagedTargets":[{"url":"https://u","resourceUrl":"https://r","parameters":[{"name":"key","value":"v"}]}],"userErrors":[]}}"#,
        )
        .unwrap();
        let target = &data.staged_uploads_create.staged_targets[0];
        assert_eq!(target.resource_url, "https://r");
        assert_eq!(target.parameters[0].name, "key");
    }

    #[test]
    fn test_join_messages() {
        let errors = vec![
            UserError { field: None, message: "Title can't be blank".into() },
            UserError { field: Some(vec!["tags".into()]), message: "Tag too long".into() },
        ];
        assert_eq!(join_messages(&errors), "Title can't be blank, Tag too long");
    }
}
