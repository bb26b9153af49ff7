use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use storefront_core::{ProductId, SeekParams, Validate};
use storefront_infra::Repository;
use storefront_products::{
    Product, can_create_product, can_delete_product, can_read_product, can_update_product,
};

use crate::app::dto::UpdateParams;
use crate::app::errors::ApiResult;
use crate::app::routes::common::{enforce, page_limit, parse_id, readable_page};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/page-limit", get(get_page_limit))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    body: Result<Json<Product>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(product) = body?;

    enforce(ctx.principal(), can_create_product(ctx.principal(), &product))?;
    product.validate()?;

    let created = services.products.create(product)?;
    tracing::info!(product_id = %created.id, name = %created.name, "created product");

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    params: Result<Query<SeekParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    readable_page(&services.products, &services.product_pages, ctx.principal(), &params)
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: ProductId = parse_id(&id)?;
    let product = services.products.get_by_id(id)?;
    enforce(ctx.principal(), can_read_product(ctx.principal(), &product))?;

    Ok(Json(product).into_response())
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    params: Result<Query<UpdateParams>, QueryRejection>,
    body: Result<Json<Product>, JsonRejection>,
) -> ApiResult<Response> {
    let id: ProductId = parse_id(&id)?;
    let Query(params) = params?;
    let Json(mut body) = body?;
    let selection = params.selection();
    body.id = id;

    let stored = services.products.get_by_id(id)?;
    enforce(ctx.principal(), can_update_product(ctx.principal(), &stored))?;
    body.validate_selection(&selection)?;

    let updated = services.products.update(&body, &selection)?;
    tracing::info!(product_id = %id, partial = selection.is_partial(), "updated product");

    Ok(Json(updated).into_response())
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: ProductId = parse_id(&id)?;
    let stored = services.products.get_by_id(id)?;
    enforce(ctx.principal(), can_delete_product(ctx.principal(), &stored))?;

    services.products.delete(id)?;
    tracing::info!(product_id = %id, "deleted product");

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn get_page_limit(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    page_limit(&services.product_pages)
}
