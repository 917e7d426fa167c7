pub mod error;
pub mod rest_api;
pub mod state;
pub mod validate;

/// Builds repository `$repo` on the shared pool, so handlers can take it as an argument
#[macro_export]
macro_rules! repository_from_request {
    ($repo:ty) => {
        impl axum::extract::FromRequestParts<$crate::state::AppState> for $repo {
            type Rejection = std::convert::Infallible;

            async fn from_request_parts(
                _parts: &mut http::request::Parts,
                state: &$crate::state::AppState,
            ) -> std::result::Result<Self, Self::Rejection> {
                Ok(<$repo>::new(state.pool().clone()))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequestParts as _;
    use fyyur_dal::venue::VenueRepository;
    use url::Url;

    use crate::state::{AppConfig, AppState};

    #[tokio::test]
    async fn test_repository_from_request() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        fyyur_dal::migrate(&pool).await.unwrap();
        let state = AppState::new(
            AppConfig {
                base_url: Url::parse("http://localhost:3000").unwrap(),
            },
            pool,
        );

        let (mut parts, _) = http::Request::new(()).into_parts();
        let repository = VenueRepository::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(repository.count().await.unwrap(), 0);
    }
}
