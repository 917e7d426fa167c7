use crate::{crud_api, publish_api_docs};
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use fyyur_dal::venue::{CreateVenue, Venue, VenueRepository, VenueShort};

use crate::state::AppState;
use axum::routing::{get, post};

publish_api_docs!(extra_crud_api::list_by_area, extra_crud_api::details);
crud_api!(Venue, "api/venue");

mod extra_crud_api {
    use axum::{
        extract::{rejection::QueryRejection, Path, Query},
        response::IntoResponse,
        Json,
    };
    use fyyur_dal::venue::VenueRepository;
    #[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
    use fyyur_dal::{details::VenueDetails, venue::Area};
    use http::StatusCode;
    use time::OffsetDateTime;

    use crate::{error::ApiResult, rest_api::DetailsQuery};

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Venue", operation_id = "listVenueByArea",
        responses((status = StatusCode::OK, description = "Venues grouped by city and state", body = Vec<Area>))))]
    pub async fn list_by_area(repository: VenueRepository) -> ApiResult<impl IntoResponse> {
        let areas = repository.list_by_area(OffsetDateTime::now_utc()).await?;
        Ok((StatusCode::OK, Json(areas)))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}/details", tag = "Venue", operation_id = "getVenueDetails",
        params(DetailsQuery),
        responses((status = StatusCode::OK, description = "Venue with past and upcoming shows", body = VenueDetails))))]
    pub async fn details(
        Path(id): Path<i64>,
        query: Result<Query<DetailsQuery>, QueryRejection>,
        repository: VenueRepository,
    ) -> ApiResult<impl IntoResponse> {
        let Query(query) = query?;
        let details = repository.details(id, query.at()).await?;
        Ok((StatusCode::OK, Json(details)))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(extra_crud_api::list_by_area).post(crud_api::create))
        .route("/all", get(crud_api::list_all))
        .route("/count", get(crud_api::count))
        .route("/search", post(crud_api::search))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
        .route("/{id}/details", get(extra_crud_api::details))
}
