use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::{kind, AppError};
use validator::{Validate, ValidationErrors};

/// JSON body that has passed `Validate`.
///
/// Malformed bodies are `invalid_request`; failed field rules use the rule's
/// code as the error kind and its message as the response message.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            AppError::invalid_request(format!("Invalid JSON format: {}", e.body_text()))
        })?;

        value.validate().map_err(rejection_from)?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_from(errors: ValidationErrors) -> AppError {
    let first = errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .next()
        .cloned();

    match first {
        Some(err) => {
            let message = err
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Validation failed: {}", err.code));
            match err.code.as_ref() {
                kind::INVALID_TAG => AppError::invalid_tag(message),
                _ => AppError::invalid_request(message),
            }
        }
        None => AppError::invalid_request(format!("Validation failed: {}", errors)),
    }
}
