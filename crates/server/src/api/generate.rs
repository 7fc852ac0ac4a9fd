//! Mockup generation endpoint.
//!
//! Accepts the design brief as a multipart form (plus an optional logo
//! file), fans out one generation job per coverage style and answers with
//! the aggregated per-slot results.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use wrapforge_core::assets::UploadRequest;
use wrapforge_core::generation::JobSpec;
use wrapforge_core::prompt::{build_prompt, plan, CoverageStyle, DesignBrief};

use crate::state::AppState;

/// Response for a generation batch.
///
/// `images` and `errors` are indexed by slot: 0 is the chosen coverage
/// style, 1 and 2 the alternatives in `other_types` order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub images: Vec<Option<String>>,
    pub errors: Vec<Option<String>>,
    pub logo_used: bool,
    pub logo_error: Option<String>,
    pub chosen_type: String,
    pub other_types: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Design brief fields collected from the multipart form.
#[derive(Default)]
struct GenerateForm {
    vehicle_type: Option<String>,
    vehicle_category: Option<String>,
    coverage_type: Option<String>,
    industry: Option<String>,
    brand_name: Option<String>,
    main_text: Option<String>,
    key_info: Option<String>,
    style: Option<String>,
    primary_colors: Option<String>,
    constraints: Option<String>,
    logo_bytes: Option<Vec<u8>>,
    logo_file_name: Option<String>,
}

/// POST /api/v1/generate
///
/// Runs one generation job per coverage style and returns all three
/// mockups. Partial failures are reported per slot; only a batch with zero
/// successes is an error.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, impl IntoResponse> {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(message) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    success: false,
                    error: message,
                }),
            ));
        }
    };

    // Upload the logo before building prompts. A failed upload is reported
    // but never blocks generation; the prompts fall back to typography.
    let logo_provided = form
        .logo_bytes
        .as_ref()
        .map(|bytes| !bytes.is_empty())
        .unwrap_or(false);
    let mut logo_error: Option<String> = None;
    let logo_url: Option<String> = match form.logo_bytes {
        Some(ref bytes) if !bytes.is_empty() => {
            let file_name = form.logo_file_name.clone().unwrap_or_else(|| "logo.png".to_string());
            let request = UploadRequest::new(bytes.clone(), file_name);
            match state.assets().upload_image(&request).await {
                Ok(url) => {
                    info!("Logo uploaded: {}", url);
                    Some(url)
                }
                Err(e) => {
                    warn!("Logo upload failed: {}", e);
                    logo_error = Some(e.to_string());
                    None
                }
            }
        }
        _ => None,
    };

    let chosen = CoverageStyle::parse(form.coverage_type.as_deref().unwrap_or_default());
    let (chosen, others) = plan(chosen);

    let brief = DesignBrief {
        vehicle_type: form.vehicle_type.unwrap_or_default(),
        vehicle_category: form.vehicle_category,
        industry: form.industry,
        brand_name: form.brand_name,
        main_text: form.main_text,
        key_info: form.key_info,
        style: form.style,
        primary_colors: form.primary_colors.unwrap_or_default(),
        constraints: form.constraints,
        logo_provided,
    };

    let specs: Vec<JobSpec> = std::iter::once(chosen)
        .chain(others.iter().copied())
        .enumerate()
        .map(|(slot, style)| {
            let mut spec = JobSpec::new(
                slot,
                style.as_str(),
                build_prompt(&brief, style, logo_url.as_deref()),
            );
            if let Some(ref url) = logo_url {
                spec = spec.with_reference_image(url);
            }
            spec
        })
        .collect();

    match state.orchestrator().run_all(&specs).await {
        Ok(batch) => Ok(Json(GenerateResponse {
            success: batch.success,
            images: batch.results,
            errors: batch.errors,
            logo_used: logo_url.is_some(),
            logo_error,
            chosen_type: chosen.as_str().to_string(),
            other_types: others.iter().map(|s| s.as_str().to_string()).collect(),
        })),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                error: e.to_string(),
            }),
        )),
    }
}

/// Collect the multipart form into a [`GenerateForm`].
///
/// Empty text fields are treated as absent, matching how the frontend
/// submits untouched inputs.
async fn read_form(multipart: &mut Multipart) -> Result<GenerateForm, String> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "logo_file" => {
                form.logo_file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read logo file: {}", e))?;
                form.logo_bytes = Some(bytes.to_vec());
            }
            _ => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(_) => continue,
                };
                if text.is_empty() {
                    continue;
                }
                let slot = match name.as_str() {
                    "vehicle_type" => &mut form.vehicle_type,
                    "vehicle_category" => &mut form.vehicle_category,
                    "coverage_type" => &mut form.coverage_type,
                    "industry" => &mut form.industry,
                    "brand_name" => &mut form.brand_name,
                    "main_text" => &mut form.main_text,
                    "key_info" => &mut form.key_info,
                    "style" => &mut form.style,
                    "primary_colors" => &mut form.primary_colors,
                    "constraints" => &mut form.constraints,
                    _ => continue,
                };
                *slot = Some(text);
            }
        }
    }

    Ok(form)
}
