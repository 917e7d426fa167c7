use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use garde::{Report, Validate};
use http::StatusCode;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use tracing::debug;

use crate::state::AppState;

/// Extractor wrapper that validates extracted payload with garde
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> Garde<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

#[derive(Debug)]
pub enum ValidationRejection<E> {
    /// Payload was extracted, but is not valid
    Valid(Report),
    /// Inner extractor failed
    Inner(E),
}

impl<E: Display> Display for ValidationRejection<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationRejection::Valid(errors) => write!(f, "{errors}"),
            ValidationRejection::Inner(error) => write!(f, "{error}"),
        }
    }
}

impl<E: Error + 'static> Error for ValidationRejection<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ValidationRejection::Valid(ve) => Some(ve),
            ValidationRejection::Inner(e) => Some(e),
        }
    }
}

impl<E: IntoResponse + Display> IntoResponse for ValidationRejection<E> {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ValidationRejection::Valid(report) => {
                (StatusCode::UNPROCESSABLE_ENTITY, report.to_string())
            }
            ValidationRejection::Inner(e) => {
                let message = e.to_string();
                (e.into_response().status(), message)
            }
        };
        debug!("Invalid payload ({status}): {message}");
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<Report> for ValidationRejection<E> {
    fn from(value: Report) -> Self {
        Self::Valid(value)
    }
}

impl<Extractor, T> FromRequest<AppState> for Garde<Extractor>
where
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequest<AppState>,
    <Extractor as FromRequest<AppState>>::Rejection: Display,
{
    type Rejection = ValidationRejection<<Extractor as FromRequest<AppState>>::Rejection>;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state)
            .await
            .map_err(ValidationRejection::Inner)?;

        inner.deref().validate()?;
        Ok(Garde(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Path;

    #[test]
    fn test_garde_wrapper() {
        let v = Garde(String::from("jazz"));
        assert_eq!(v.len(), 4);
        assert_eq!(v.into_inner(), "jazz");
    }

    #[tokio::test]
    async fn test_rejection_response() {
        let mut report = Report::new();
        report.append(Path::empty(), garde::Error::new("unknown state code XX"));
        let rejection = ValidationRejection::<StatusCode>::from(report);
        assert!(rejection.to_string().contains("unknown state code XX"));

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("unknown state code XX"));

    }

    #[tokio::test]
    async fn test_inner_rejection_is_json() {
        use axum::extract::FromRequest as _;
        use axum::Json;
        use fyyur_dal::show::CreateShow;

        let request = http::Request::builder()
            .method("POST")
            .uri("/api/show")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                r#"{"venue_id": 1, "artist_id": 1, "start_time": "01/01/2030"}"#,
            ))
            .unwrap();
        let rejection = Json::<CreateShow>::from_request(request, &())
            .await
            .map_err(ValidationRejection::Inner)
            .unwrap_err();

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("start_time"));

        let response = ValidationRejection::Inner(StatusCode::BAD_REQUEST).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
