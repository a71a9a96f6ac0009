//! Router-level test harness: in-memory store, frozen clock, signed tokens.
#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::{macros::datetime, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::jwt::JwtKeys,
    config::AppConfig,
    dates::{CanonicalInstant, FixedClock},
    foods::repo_types::Food,
    habits::repo_types::HabitRecord,
    meals::repo_types::MealRecord,
    state::AppState,
    store::{InstantRange, NewFood, Store, StoreError},
};

/// 2024-06-15 10:00 EDT.
pub const NOW: OffsetDateTime = datetime!(2024-06-15 14:00 UTC);

pub struct TestApp {
    pub state: AppState,
    pub user_id: Uuid,
    router: Router,
    token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::from_state(AppState::fake(NOW))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self::from_state(AppState::from_parts(
            store,
            Arc::new(AppConfig::for_tests()),
            Arc::new(FixedClock(NOW)),
        ))
    }

    pub fn from_state(state: AppState) -> Self {
        let user_id = Uuid::new_v4();
        let token = JwtKeys::new(&state.config.jwt).sign(user_id, 5);
        Self {
            router: build_app(state.clone()),
            state,
            user_id,
            token,
        }
    }

    /// Same app and store, different signed-in user.
    pub fn as_other_user(&self) -> Self {
        Self::from_state(self.state.clone())
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.call(req.body(body).unwrap()).await
    }

    pub async fn send_anonymous(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.call(req).await
    }

    async fn call(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}

/// Store whose every call fails, for exercising degraded read paths.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Corrupt("store unavailable".into())
}

#[async_trait]
impl Store for FailingStore {
    async fn insert_food(&self, _food: NewFood) -> Result<Food, StoreError> {
        Err(down())
    }
    async fn find_food(&self, _u: Uuid, _f: Uuid) -> Result<Option<Food>, StoreError> {
        Err(down())
    }
    async fn list_foods(&self, _u: Uuid) -> Result<Vec<Food>, StoreError> {
        Err(down())
    }
    async fn set_food_favorite(&self, _u: Uuid, _f: Uuid, _v: bool) -> Result<Option<Food>, StoreError> {
        Err(down())
    }
    async fn count_foods(&self, _u: Uuid) -> Result<i64, StoreError> {
        Err(down())
    }
    async fn insert_meal(&self, _m: MealRecord) -> Result<MealRecord, StoreError> {
        Err(down())
    }
    async fn delete_meal(&self, _u: Uuid, _m: Uuid) -> Result<bool, StoreError> {
        Err(down())
    }
    async fn list_meals(&self, _u: Uuid, _r: Option<InstantRange>) -> Result<Vec<MealRecord>, StoreError> {
        Err(down())
    }
    async fn count_meals(&self, _u: Uuid) -> Result<i64, StoreError> {
        Err(down())
    }
    async fn upsert_habit(&self, _h: HabitRecord) -> Result<HabitRecord, StoreError> {
        Err(down())
    }
    async fn find_habit(&self, _u: Uuid, _d: CanonicalInstant) -> Result<Option<HabitRecord>, StoreError> {
        Err(down())
    }
    async fn list_habits(&self, _u: Uuid, _r: Option<InstantRange>) -> Result<Vec<HabitRecord>, StoreError> {
        Err(down())
    }
}
