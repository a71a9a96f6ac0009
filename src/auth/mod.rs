//! Bearer-token boundary. Tokens are issued elsewhere; this side only verifies them.

use crate::state::AppState;
use axum::Router;

pub mod claims;
pub mod extractors;
pub mod handlers;
pub mod jwt;

pub use extractors::{AuthClaims, AuthUser};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::me_routes())
}
