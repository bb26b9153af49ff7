use axum::{
    Json,
    http::header::CONTENT_RANGE,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use storefront_auth::{AuthDecision, Guarded, Principal, filter_readable};
use storefront_core::{DomainError, Record, SeekPaginator, SeekParams};
use storefront_infra::Repository;

use crate::app::dto::PageLimitResponse;
use crate::app::errors::ApiResult;

/// Turn a policy decision into a handler result, logging denials.
pub fn enforce(principal: &Principal, decision: AuthDecision) -> ApiResult<()> {
    if !decision.allowed {
        tracing::warn!(
            user_id = %principal.user_id,
            role = %principal.role,
            reason = decision.denial_reason.as_deref().unwrap_or_default(),
            "request denied"
        );
    }
    Ok(decision.into_result()?)
}

/// Parse a path segment into a typed record id.
pub fn parse_id<I>(raw: &str) -> ApiResult<I>
where
    I: core::str::FromStr<Err = DomainError>,
{
    Ok(raw.parse::<I>()?)
}

/// One listing page: the readable part of the seek window, with a
/// `Content-Range` header describing it.
///
/// Rows the principal may not read are dropped silently.
pub fn readable_page<T, R>(
    repo: &R,
    pages: &SeekPaginator,
    principal: &Principal,
    params: &SeekParams,
) -> ApiResult<Response>
where
    T: Record + Guarded + Serialize,
    R: Repository<T>,
{
    let seek = pages.compute_window(params)?;
    let total = repo.count(&seek)?;
    let window = repo.fetch(&seek)?;
    let visible = filter_readable(principal, &window);
    let range = pages.render_range(total, &visible);

    tracing::info!(
        resource = T::RESOURCE,
        fetched = window.len(),
        visible = visible.len(),
        range = %range,
        "listed page"
    );

    Ok(([(CONTENT_RANGE, range)], Json(visible)).into_response())
}

pub fn page_limit(pages: &SeekPaginator) -> Json<PageLimitResponse> {
    Json(PageLimitResponse {
        limit: pages.max_limit(),
    })
}
