use crate::{crud_api, publish_api_docs};
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use fyyur_dal::artist::{Artist, ArtistRepository, ArtistShort, CreateArtist};

use crate::state::AppState;
use axum::routing::{get, post};

publish_api_docs!(extra_crud_api::details);
crud_api!(Artist, "api/artist");

mod extra_crud_api {
    use axum::{
        extract::{rejection::QueryRejection, Path, Query},
        response::IntoResponse,
        Json,
    };
    #[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
    use fyyur_dal::details::ArtistDetails;
    use fyyur_dal::artist::ArtistRepository;
    use http::StatusCode;

    use crate::{error::ApiResult, rest_api::DetailsQuery};

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}/details", tag = "Artist", operation_id = "getArtistDetails",
        params(DetailsQuery),
        responses((status = StatusCode::OK, description = "Artist with past and upcoming shows", body = ArtistDetails))))]
    pub async fn details(
        Path(id): Path<i64>,
        query: Result<Query<DetailsQuery>, QueryRejection>,
        repository: ArtistRepository,
    ) -> ApiResult<impl IntoResponse> {
        let Query(query) = query?;
        let details = repository.details(id, query.at()).await?;
        Ok((StatusCode::OK, Json(details)))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list_all).post(crud_api::create))
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
