//! Preset catalog.

use std::collections::BTreeMap;

use axum::Json;
use cm_av::Preset;
use serde::Serialize;

/// Every preset id mapped to its description.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PresetCatalog {
    pub presets: BTreeMap<String, String>,
}

impl PresetCatalog {
    pub fn build() -> Self {
        Self {
            presets: Preset::ALL
                .iter()
                .map(|p| (p.id().to_string(), p.description().to_string()))
                .collect(),
        }
    }
}

/// GET /presets
#[utoipa::path(
    get,
    path = "/presets",
    responses(
        (status = 200, description = "Available presets", body = PresetCatalog)
    )
)]
pub async fn list_presets() -> Json<PresetCatalog> {
    Json(PresetCatalog::build())
}
