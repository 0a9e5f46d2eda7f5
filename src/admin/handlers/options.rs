// src/admin/handlers/options.rs

use axum::Json;

use super::RequireAdmin;
use crate::common::ApiError;
use crate::siteinfo::models::{LanguageOption, ThemeOption};
use crate::siteinfo::options::{language_options, theme_options};

/// GET /answer/admin/api/theme/options
pub async fn get_theme_options(_admin: RequireAdmin) -> Result<Json<Vec<ThemeOption>>, ApiError> {
    Ok(Json(theme_options()))
}

/// GET /answer/admin/api/language/options
pub async fn get_language_options(
    _admin: RequireAdmin,
) -> Result<Json<Vec<LanguageOption>>, ApiError> {
    Ok(Json(language_options()))
}
