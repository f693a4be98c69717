use axum::extract::State;
use axum::Json;
use contracts::usecases::u508_bulk_product_create::{CreateProductRequest, CreateProductResponse};

use crate::routes::AppState;

/// POST /api/u508/products
///
/// Domain failures are reported in the body with status 200.
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Json<CreateProductResponse> {
    Json(state.product_executor.create_product(request).await)
}
