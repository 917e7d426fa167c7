#[macro_export]
macro_rules! api_read_only {
    ($entity:ident) => {
        #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/all", tag = stringify!($entity), operation_id = concat!("listAll", stringify!($entity)),
        responses((status = StatusCode::OK, description = "List all (sorted by id, max limit applies)", body = Vec<EntityShort>))))]
        pub async fn list_all(repository: EntityRepository) -> ApiResult<impl IntoResponse> {
            let records = repository.list_all().await?;
            Ok((StatusCode::OK, Json(records)))
        }

        #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/count", tag = stringify!($entity), operation_id = concat!("count", stringify!($entity)),
        responses((status = StatusCode::OK, description = "Count", body = u64))))]
        pub async fn count(repository: EntityRepository) -> ApiResult<impl IntoResponse> {
            let count = repository.count().await?;
            Ok((StatusCode::OK, Json(count)))
        }

        #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = stringify!($entity), operation_id = concat!("get", stringify!($entity)),
        responses((status = StatusCode::OK, description = "Get one", body = $entity))))]
        pub async fn get(
            Path(id): Path<i64>,
            repository: EntityRepository,
        ) -> ApiResult<impl IntoResponse> {
            let record = repository.get(id).await?;

            Ok((StatusCode::OK, Json(record)))
        }

        #[cfg_attr(feature = "openapi",  utoipa::path(post, path = "/search", tag = stringify!($entity), operation_id = concat!("search", stringify!($entity)),
        request_body(content = crate::rest_api::SearchForm, content_type = "application/x-www-form-urlencoded"),
        responses((status = StatusCode::OK, description = "Case insensitive search by name", body = fyyur_dal::SearchResult<EntityShort>))))]
        pub async fn search(
            repository: EntityRepository,
            Garde(Form(form)): Garde<Form<SearchForm>>,
        ) -> ApiResult<impl IntoResponse> {
            let result = repository.search(&form.search_term).await?;
            debug!("Search for {:?} found {}", form.search_term, result.count);
            Ok((StatusCode::OK, Json(result)))
        }
    };
}

/// Common handlers of venue and artist endpoints.
///
/// Expects `$entity`, `Create$entity`, `$entity Short` and `$entity Repository`
/// in scope of the invoking module, `$path` is the collection path used in `Location`.
#[macro_export]
macro_rules! crud_api {
    ($entity:ident, $path:literal) => {
        type EntityRepository = paste::paste! {[<$entity Repository>]};
        crate::repository_from_request!(EntityRepository);
        pub mod crud_api {
            use super::*;
            use crate::error::ApiResult;
            use crate::rest_api::SearchForm;
            use crate::state::AppState;
            use crate::validate::Garde;
            use axum::{
                extract::{Path, State},
                response::IntoResponse,
                Form, Json,
            };
            use http::{header, StatusCode};
            use tracing::debug;

            type CreateEntity = paste::paste! {[<Create $entity>]};
            #[cfg(feature = "openapi")]
            type EntityShort = paste::paste! {[<$entity Short>]};

            crate::api_read_only!($entity);

            #[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = stringify!($entity), operation_id = concat!("create", stringify!($entity)),
            responses((status = StatusCode::CREATED, description = concat!("Created ", stringify!($entity)), body = $entity))))]
            pub async fn create(
                repository: EntityRepository,
                State(state): State<AppState>,
                Garde(Json(payload)): Garde<Json<CreateEntity>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.create(payload).await?;
                let location = state.build_url(&format!("{}/{}", $path, record.id))?;

                Ok((
                    StatusCode::CREATED,
                    [(header::LOCATION, location.to_string())],
                    Json(record),
                ))
            }

            #[cfg_attr(feature = "openapi",  utoipa::path(put, path = "/{id}", tag = stringify!($entity), operation_id = concat!("update", stringify!($entity)),
            responses((status = StatusCode::OK, description = concat!("Updated ", stringify!($entity)), body = $entity))))]
            pub async fn update(
                Path(id): Path<i64>,
                repository: EntityRepository,
                Garde(Json(payload)): Garde<Json<CreateEntity>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.update(id, payload).await?;

                Ok((StatusCode::OK, Json(record)))
            }

            #[cfg_attr(feature = "openapi",  utoipa::path(delete, path = "/{id}", tag = stringify!($entity), operation_id = concat!("delete", stringify!($entity)),
            responses((status = StatusCode::NO_CONTENT, description = "Deleted"), (status = StatusCode::CONFLICT, description = "Still has shows"))))]
            pub async fn delete(
                Path(id): Path<i64>,
                repository: EntityRepository,
            ) -> ApiResult<impl IntoResponse> {
                repository.delete(id).await?;

                Ok((StatusCode::NO_CONTENT, ()))
            }

            #[cfg(feature = "openapi")]
            #[cfg_attr(feature = "openapi", derive(utoipa::OpenApi))]
            #[openapi(paths(list_all, count, get, search, delete, update, create))]
            struct ApiDocs;

            #[cfg(feature = "openapi")]
            pub(super) fn api_docs() -> utoipa::openapi::OpenApi {
                use utoipa::OpenApi as _;
                ApiDocs::openapi()
            }
        }
    };
}

#[macro_export]
macro_rules! publish_api_docs {
    ($($end_point:path),+) => {
        #[cfg(feature = "openapi")]
        #[derive(utoipa::OpenApi)]
        #[openapi(paths($($end_point),+))]
        struct ModuleDocs;

        #[cfg(feature = "openapi")]
        pub fn api_docs() -> utoipa::openapi::OpenApi {
            use utoipa::OpenApi as _;
            let docs = ModuleDocs::openapi();
            docs.merge_from(crud_api::api_docs())
        }
    };
}
