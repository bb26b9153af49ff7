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

use storefront_auth::{
    Role, User, can_create_user, can_delete_user, can_read_user, can_update_user,
    password_policy_message,
};
use storefront_core::{DomainError, FieldSelection, Record, SeekParams, UserId, Validate};
use storefront_infra::{Repository, UserDirectory};

use crate::app::dto::{MessageResponse, UpdateParams};
use crate::app::errors::ApiResult;
use crate::app::routes::common::{enforce, page_limit, parse_id, readable_page};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/page-limit", get(get_page_limit))
        .route("/password-format", get(password_format))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

fn ensure_name_free(services: &AppServices, name: &str, owner: Option<UserId>) -> ApiResult<()> {
    match services.users.find_by_name(name)? {
        Some(existing) if Some(existing.id) != owner => Err(DomainError::bad_request(format!(
            "failed to create user {name}: a user with that name already exists"
        ))
        .into()),
        _ => Ok(()),
    }
}

/// Replace the plaintext candidate with its hash.
fn seal_password(services: &AppServices, user: &mut User) -> ApiResult<()> {
    if let Some(plaintext) = user.password.take() {
        user.password_hash = services.hasher.hash(&plaintext)?;
    }
    Ok(())
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    body: Result<Json<User>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(mut user) = body?;
    // New accounts are customers unless a role is given.
    user.role.get_or_insert(Role::Customer);

    enforce(ctx.principal(), can_create_user(ctx.principal(), &user))?;
    user.validate()?;
    ensure_name_free(&services, &user.name, None)?;
    seal_password(&services, &mut user)?;

    let created = services.users.create(user)?;
    tracing::info!(
        user_id = %created.id,
        role = ?created.role,
        created_by = %ctx.user_id(),
        "created user"
    );

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    params: Result<Query<SeekParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    readable_page(&services.users, &services.user_pages, ctx.principal(), &params)
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: UserId = parse_id(&id)?;
    let user = services.users.get_by_id(id)?;
    enforce(ctx.principal(), can_read_user(ctx.principal(), &user))?;

    Ok(Json(user).into_response())
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    params: Result<Query<UpdateParams>, QueryRejection>,
    body: Result<Json<User>, JsonRejection>,
) -> ApiResult<Response> {
    let id: UserId = parse_id(&id)?;
    let Query(params) = params?;
    let Json(mut body) = body?;
    let selection = params.selection();
    body.id = id;

    let stored = services.users.get_by_id(id)?;
    let mut candidate = stored.clone();
    candidate.patch(&body, &selection);

    enforce(
        ctx.principal(),
        can_update_user(ctx.principal(), &stored, &candidate, &selection),
    )?;
    body.validate_selection(&selection)?;

    if selection.includes("name") {
        ensure_name_free(&services, &candidate.name, Some(id))?;
    }
    if selection.includes("password") {
        seal_password(&services, &mut candidate)?;
    }

    let updated = services.users.update(&candidate, &FieldSelection::All)?;
    tracing::info!(
        user_id = %id,
        partial = selection.is_partial(),
        updated_by = %ctx.user_id(),
        "updated user"
    );

    Ok(Json(updated).into_response())
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id: UserId = parse_id(&id)?;
    let target = services.users.get_by_id(id)?;
    enforce(ctx.principal(), can_delete_user(ctx.principal(), &target))?;

    services.users.delete(id)?;
    tracing::info!(user_id = %id, deleted_by = %ctx.user_id(), "deleted user");

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn get_page_limit(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    page_limit(&services.user_pages)
}

pub async fn password_format() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: password_policy_message(),
    })
}
