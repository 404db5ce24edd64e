//! Validation endpoint: multipart reference upload + breed filter value.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use concord::{Reconciler, ValidationResponse};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Handle `POST /validate`.
///
/// Expects multipart fields `file` (the reference table) and `breed` (the
/// filter value). The upload is saved under the uploads directory, compared
/// against a fresh extraction, and the failure report (if any) is written
/// next to it with its path echoed in the response.
pub async fn validate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ValidationResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut breed: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let name = field
                    .file_name()
                    .unwrap_or("reference.tsv")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((name, bytes.to_vec()));
            }
            Some("breed") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                breed = Some(value.trim().to_string());
            }
            _ => {}
        }
    }

    let Some((file_name, bytes)) = file else {
        return Err(ApiError::BadRequest("No file part".to_string()));
    };
    let breed = breed.unwrap_or_default();
    if breed.is_empty() {
        return Err(ApiError::BadRequest("No breed provided".to_string()));
    }

    // Strip any client-supplied path components before saving.
    let file_name = Path::new(&file_name)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reference.tsv".to_string());
    let reference_path = state.upload_dir.join(&file_name);
    std::fs::write(&reference_path, &bytes)
        .map_err(|e| ApiError::Internal(format!("Failed to save upload: {}", e)))?;

    let reconciler = Reconciler::with_config(state.config.clone());
    let result = reconciler.validate(state.extractor.as_ref(), &breed, &reference_path)?;

    let report_path = if result.is_pass() {
        None
    } else {
        // Timestamped per request so concurrent validations never clobber
        // each other's artifacts.
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");
        let path = state
            .upload_dir
            .join(format!("comparison_report_{stamp}.csv"));
        result.report().write_file(&path, b',')?;
        Some(path)
    };

    Ok(Json(ValidationResponse::from_result(
        &result,
        report_path.as_deref(),
    )))
}
