//! Request body validation.
//!
//! Bodies are deserialized and then checked with `validator` derives; both
//! failures come back as a 422 with field-keyed messages.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that passed its `Validate` rules.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Body {
        #[validate(length(min = 1, message = "This field may not be blank."))]
        title: String,
        #[validate(range(min = 1, max = 5))]
        rating: i64,
    }

    #[test]
    fn test_validation_errors_are_keyed_by_field() {
        let body = Body {
            title: String::new(),
            rating: 9,
        };
        let err: AppError = body.validate().unwrap_err().into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            AppError::ValidationError { details } => {
                assert_eq!(details["title"], vec!["This field may not be blank.".to_string()]);
                assert!(details.contains_key("rating"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
