//! `/api/social-media-data`: agregacion por plataforma.

use axum::{Json, extract::State};
use impact_core::PlatformReport;
use tracing::{info, instrument};

use crate::state::AppState;

/// Solo corre en un miss del cache: normalmente sirve el middleware lo que
/// dejo el populator. Nunca falla; en el peor caso responde datos sinteticos.
#[instrument(skip_all)]
pub async fn social_media_data(State(state): State<AppState>) -> Json<Vec<PlatformReport>> {
    let (origin, reports) = state.populator().collect().await;
    info!(origin = ?origin, platforms = reports.len(), "Social media data rebuilt");
    Json(reports)
}
