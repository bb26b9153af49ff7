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

use storefront_core::{FieldSelection, OrderId, Record, SeekParams, Validate};
use storefront_infra::Repository;
use storefront_sales::{Order, can_create_order, can_delete_order, can_read_order, can_update_order};

use crate::app::dto::{self, UpdateParams};
use crate::app::errors::ApiResult;
use crate::app::routes::common::{enforce, page_limit, parse_id, readable_page};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/page-limit", get(get_page_limit))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
}

fn price(services: &AppServices, order: &mut Order) -> ApiResult<()> {
    let prices = services.price_table(&order.items)?;
    order.compute_totals(|id| prices.get(&id).copied())?;
    Ok(())
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateOrderRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body?;
    let mut order = body.into_order(services.sales_tax_rate);

    enforce(ctx.principal(), can_create_order(ctx.principal(), &order))?;
    order.validate_new()?;
    price(&services, &mut order)?;

    let created = services.orders.create(order)?;
    tracing::info!(
        order_id = %created.id,
        owner_id = %created.owner_id,
        placed_by = ctx.name(),
        total = created.total,
        "created order"
    );

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    params: Result<Query<SeekParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    readable_page(&services.orders, &services.order_pages, ctx.principal(), &params)
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: OrderId = parse_id(&id)?;
    let order = services.orders.get_by_id(id)?;
    enforce(ctx.principal(), can_read_order(ctx.principal(), &order))?;

    Ok(Json(order).into_response())
}

/// Full update by default; `?fields=` switches to a partial update where
/// `items` are merged by product.
///
/// Totals are recomputed only when the update writes `items` or `taxrate`;
/// otherwise the stored amounts stand, even if a product has since left the
/// catalog.
pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    params: Result<Query<UpdateParams>, QueryRejection>,
    body: Result<Json<Order>, JsonRejection>,
) -> ApiResult<Response> {
    let id: OrderId = parse_id(&id)?;
    let Query(params) = params?;
    let Json(mut body) = body?;
    let selection = params.selection();
    body.id = id;

    let stored = services.orders.get_by_id(id)?;
    let mut candidate = stored.clone();
    candidate.patch(&body, &selection);

    enforce(ctx.principal(), can_update_order(ctx.principal(), &stored, &candidate))?;
    body.validate_selection(&selection)?;
    let repriced = selection.includes("items") || selection.includes("taxrate");
    if repriced {
        price(&services, &mut candidate)?;
    }

    let updated = services.orders.update(&candidate, &FieldSelection::All)?;
    tracing::info!(
        order_id = %updated.id,
        partial = selection.is_partial(),
        repriced,
        total = updated.total,
        "updated order"
    );

    Ok(Json(updated).into_response())
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: OrderId = parse_id(&id)?;
    let stored = services.orders.get_by_id(id)?;
    enforce(ctx.principal(), can_delete_order(ctx.principal(), &stored))?;

    services.orders.delete(id)?;
    tracing::info!(order_id = %id, "deleted order");

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn get_page_limit(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    page_limit(&services.order_pages)
}
