use axum::Router;

pub mod common;
pub mod orders;
pub mod products;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/products", products::router())
        .nest("/users", users::router())
}
