//! Validated JSON extractor for request bodies.
//!
//! `ValidatedJson<T>` deserializes the body and runs `validator` rules on it.
//! Both malformed JSON and rule violations are answered with 400 in the
//! standard error envelope; rule violations list the failing fields.

use crate::responses::ApiResponse;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::{field_errors, validation_errors_to_catalog_error, ErrorResponse};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let error_response = match self {
            Self::JsonError(rejection) => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: format!("Invalid JSON: {}", rejection.body_text()),
                details: None,
            },
            Self::ValidationError(errors) => {
                let details = field_errors(&errors);
                ErrorResponse::from_error(&validation_errors_to_catalog_error(errors))
                    .with_details(details)
            }
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(error_response)),
        )
            .into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use catalog_core::ProductDraft;
    use http_body_util::BodyExt;

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let body = r#"{"name":"Book 1","category":"Books","price":19.99,"stock":3}"#;
        let ValidatedJson(draft) = ValidatedJson::<ProductDraft>::from_request(request(body), &())
            .await
            .unwrap();
        assert_eq!(draft.price.to_string(), "19.99");
        assert!(draft.description.is_empty());
    }

    #[tokio::test]
    async fn test_rule_violation_lists_fields() {
        let body = r#"{"name":"","category":"all","price":1,"stock":3}"#;
        let rejection = ValidatedJson::<ProductDraft>::from_request(request(body), &())
            .await
            .unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        let fields: Vec<_> = json["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert!(fields.contains(&"name".to_string()));
        assert!(fields.contains(&"category".to_string()));
    }

    #[tokio::test]
    async fn test_bad_price_is_rejected() {
        for price in ["-1", "1.234", "100000000.00"] {
            let body = format!(r#"{{"name":"A","category":"Books","price":{price},"stock":1}}"#);
            let rejection = ValidatedJson::<ProductDraft>::from_request(request(&body), &())
                .await
                .unwrap_err();
            let response = rejection.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{price}");
            let json = body_json(response).await;
            assert_eq!(json["error"]["code"], "INVALID_JSON");
        }
    }
}
