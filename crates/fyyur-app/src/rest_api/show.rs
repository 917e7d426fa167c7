//! Shows are only listed and created, there is no edit or delete.

use crate::repository_from_request;
use fyyur_dal::show::ShowRepository;

use crate::state::AppState;
use axum::routing::get;

repository_from_request!(ShowRepository);

mod api {
    use axum::{
        extract::{Path, State},
        response::IntoResponse,
        Json,
    };
    #[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
    use fyyur_dal::show::{CreateShow, Show, ShowListing, ShowRepository};
    use http::{header, StatusCode};
    use tracing::info;

    use crate::{error::ApiResult, state::AppState, validate::Garde};

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Show", operation_id = "listShow",
        responses((status = StatusCode::OK, description = "All shows with venue and artist, oldest first", body = Vec<ShowListing>))))]
    pub async fn list(repository: ShowRepository) -> ApiResult<impl IntoResponse> {
        let shows = repository.list_all().await?;
        Ok((StatusCode::OK, Json(shows)))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/count", tag = "Show", operation_id = "countShow",
        responses((status = StatusCode::OK, description = "Count", body = u64))))]
    pub async fn count(repository: ShowRepository) -> ApiResult<impl IntoResponse> {
        let count = repository.count().await?;
        Ok((StatusCode::OK, Json(count)))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Show", operation_id = "getShow",
        responses((status = StatusCode::OK, description = "Get one", body = Show))))]
    pub async fn get(
        Path(id): Path<i64>,
        repository: ShowRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.get(id).await?;
        Ok((StatusCode::OK, Json(record)))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Show", operation_id = "createShow",
        responses((status = StatusCode::CREATED, description = "Created Show", body = Show),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Venue or artist does not exist"))))]
    pub async fn create(
        repository: ShowRepository,
        State(state): State<AppState>,
        Garde(Json(payload)): Garde<Json<CreateShow>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;
        info!(
            "Listed show {} of artist {} at venue {}",
            record.id, record.artist_id, record.venue_id
        );
        let location = state.build_url(&format!("api/show/{}", record.id))?;

        Ok((
            StatusCode::CREATED,
            [(header::LOCATION, location.to_string())],
            Json(record),
        ))
    }
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(api::list, api::count, api::get, api::create))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(api::list).post(api::create))
        .route("/count", get(api::count))
        .route("/{id}", get(api::get))
}
