//! JSON body extractors that answer 400 with the standard error body.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::errors::AppError;

/// Body deserialized and checked against its `validator` rules.
///
/// ```rust,ignore
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Any well-formed JSON document, for schemaless records.
pub struct RawJson(pub Value);

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::validation("Expected a JSON body (Content-Type: application/json)")
        }
        JsonRejection::JsonSyntaxError(_) => AppError::validation("Malformed JSON body"),
        other => AppError::validation(other.body_text()),
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<S> FromRequest<S> for RawJson
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_rule_failures_become_validation_errors() {
        let err = ValidatedJson::<Probe>::from_request(json_request(r#"{"name": ""}"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(ref m) if m == "name is required"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let err = RawJson::from_request(json_request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Malformed JSON body"));
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let req = HttpRequest::builder()
            .method("POST")
            .body(Body::from("{}"))
            .unwrap();
        let err = RawJson::from_request(req, &()).await.err().unwrap();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Content-Type")));
    }
}
