use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::extractors::AuthClaims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip_all)]
pub async fn get_me(AuthClaims(claims): AuthClaims) -> Json<MeResponse> {
    Json(MeResponse {
        id: claims.sub,
        name: claims.name.unwrap_or_else(|| "User".into()),
        email: claims.email.unwrap_or_default(),
        picture: claims.picture,
    })
}
