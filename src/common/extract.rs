// src/common/extract.rs
//! Request extractors that bind input and run the request validator of the
//! caller's language (`Accept-Language`, falling back to the default)

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequest, FromRequestParts, Query, Request},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use super::validation::{LocaleCatalog, Validate};
use super::{ApiError, AppState};

async fn locale_catalog<S>(parts: &mut Parts, state: &S) -> Result<Arc<LocaleCatalog>, ApiError>
where
    S: Send + Sync,
{
    let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
        Extension::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

    let catalog = state_lock.read().await.catalog.clone();
    Ok(catalog)
}

fn accept_language(parts: &Parts) -> String {
    parts
        .headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// JSON body that passed validation
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let catalog = locale_catalog(&mut parts, state).await?;
        let lang = accept_language(&parts);

        let req = Request::from_parts(parts, body);
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "Rejected malformed JSON body");
                ApiError::validation(rejection.body_text())
            })?;

        catalog.validator(&lang).check(&value)?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that passed validation
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let catalog = locale_catalog(parts, state).await?;
        let lang = accept_language(parts);

        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "Rejected malformed query string");
                ApiError::validation(rejection.body_text())
            })?;

        catalog.validator(&lang).check(&value)?;
        Ok(ValidatedQuery(value))
    }
}
