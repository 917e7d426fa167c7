//! Read only vocabulary of genres, used to populate form choices.

use axum::{response::IntoResponse, routing::get, Json};
use fyyur_types::Genre;
use http::StatusCode;

use crate::state::AppState;

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Genre", operation_id = "listGenre",
    responses((status = StatusCode::OK, description = "All accepted genres", body = Vec<Genre>))))]
pub async fn list() -> impl IntoResponse {
    (StatusCode::OK, Json(Genre::ALL))
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list))
}
